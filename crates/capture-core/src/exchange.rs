//! Frame Exchange: double-buffered publication of the most recent decoded
//! BGRA frame from the capture worker thread to arbitrary readers.

use std::sync::Mutex;

/// One BGRA frame slot plus its geometry.
#[derive(Default)]
struct Slot {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

/// Double buffer with a writer index in `{0, 1}`. The mutex serializes
/// only the index toggle and a reader's copy-out — never the write
/// itself, so the writer never blocks on a slow reader.
pub struct FrameExchange {
    slots: [Mutex<Slot>; 2],
    writer: Mutex<usize>,
}

impl FrameExchange {
    pub fn new() -> Self {
        Self {
            slots: [Mutex::new(Slot::default()), Mutex::new(Slot::default())],
            writer: Mutex::new(0),
        }
    }

    /// Writes into the current writer slot, then toggles the writer index
    /// under the lock so a concurrent reader always sees a fully written
    /// buffer.
    pub fn publish(&self, bgra: &[u8], width: u32, height: u32) {
        let current = *self.writer.lock().unwrap();
        {
            let mut slot = self.slots[current].lock().unwrap();
            slot.data.clear();
            slot.data.extend_from_slice(bgra);
            slot.width = width;
            slot.height = height;
        }
        *self.writer.lock().unwrap() = 1 - current;
    }

    /// Snapshots the current publish slot (`1 - writer`) and copies it out.
    /// Returns `None` if nothing has been published yet.
    pub fn read(&self) -> Option<(Vec<u8>, u32, u32)> {
        let writer = *self.writer.lock().unwrap();
        let published = 1 - writer;
        let slot = self.slots[published].lock().unwrap();
        if slot.data.is_empty() {
            return None;
        }
        Some((slot.data.clone(), slot.width, slot.height))
    }
}

impl Default for FrameExchange {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn read_after_publish_sees_the_new_frame() {
        let exchange = FrameExchange::new();
        assert!(exchange.read().is_none());
        exchange.publish(&[1, 2, 3, 4], 1, 1);
        let (data, w, h) = exchange.read().unwrap();
        assert_eq!(data, vec![1, 2, 3, 4]);
        assert_eq!((w, h), (1, 1));
    }

    #[test]
    fn concurrent_publish_and_read_never_tears() {
        let exchange = Arc::new(FrameExchange::new());
        exchange.publish(&vec![7u8; 16], 2, 2);

        let writer = Arc::clone(&exchange);
        let handle = thread::spawn(move || {
            for i in 0..100u8 {
                writer.publish(&vec![i; 16], 2, 2);
            }
        });

        for _ in 0..100 {
            if let Some((data, _, _)) = exchange.read() {
                let first = data[0];
                assert!(data.iter().all(|&b| b == first));
            }
        }
        handle.join().unwrap();
    }
}
