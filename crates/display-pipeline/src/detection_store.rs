//! Detection Set Store: the latest batch of detection rectangles handed in
//! by an external face/object detector, read once per displayed frame by
//! the overlay pad probe.

use std::sync::Mutex;

pub const MAX_FACE_BOXES: usize = 10;

/// A single detection rectangle in the detector's own source coordinate
/// space, center/size form (matches the original's cairo draw callback).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionBox {
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
    /// Confidence in [0, 1]; a label is only drawn when this is > 0.
    pub score: f32,
}

struct Inner {
    boxes: Vec<DetectionBox>,
    source_width: u32,
    source_height: u32,
}

pub struct DetectionSetStore {
    inner: Mutex<Inner>,
    fallback_width: u32,
    fallback_height: u32,
}

impl DetectionSetStore {
    /// `fallback_width`/`fallback_height` are the detection branch's own
    /// configured dimensions (`face_detect_width`/`face_detect_height`),
    /// used whenever a caller reports zero source geometry.
    pub fn new(fallback_width: u32, fallback_height: u32) -> Self {
        Self {
            inner: Mutex::new(Inner {
                boxes: Vec::new(),
                source_width: fallback_width,
                source_height: fallback_height,
            }),
            fallback_width,
            fallback_height,
        }
    }

    /// Replaces the current detection set. Capped at `MAX_FACE_BOXES`;
    /// anything beyond that is dropped, matching the original's fixed
    /// `face_box_count` ceiling.
    pub fn set(&self, boxes: &[DetectionBox], source_width: u32, source_height: u32) {
        let mut inner = self.inner.lock().unwrap();
        inner.boxes.clear();
        inner.boxes.extend(boxes.iter().take(MAX_FACE_BOXES).copied());
        inner.source_width = if source_width == 0 { self.fallback_width } else { source_width };
        inner.source_height = if source_height == 0 { self.fallback_height } else { source_height };
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.boxes.clear();
    }

    /// A small, bounded clone for the overlay probe to iterate without
    /// holding the lock across the draw.
    pub fn snapshot(&self) -> (Vec<DetectionBox>, u32, u32) {
        let inner = self.inner.lock().unwrap();
        (inner.boxes.clone(), inner.source_width, inner.source_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_box() -> DetectionBox {
        DetectionBox { center_x: 10.0, center_y: 10.0, width: 4.0, height: 4.0, score: 0.9 }
    }

    #[test]
    fn caps_at_max_face_boxes() {
        let store = DetectionSetStore::new(320, 240);
        let boxes: Vec<DetectionBox> = std::iter::repeat(sample_box()).take(25).collect();
        store.set(&boxes, 640, 480);
        let (snapshot, w, h) = store.snapshot();
        assert_eq!(snapshot.len(), MAX_FACE_BOXES);
        assert_eq!((w, h), (640, 480));
    }

    #[test]
    fn zero_source_geometry_falls_back_to_configured_dimensions() {
        let store = DetectionSetStore::new(320, 240);
        store.set(&[sample_box()], 0, 0);
        let (_, w, h) = store.snapshot();
        assert_eq!((w, h), (320, 240));
    }

    #[test]
    fn clear_empties_the_set_without_touching_geometry() {
        let store = DetectionSetStore::new(320, 240);
        store.set(&[sample_box()], 640, 480);
        store.clear();
        let (snapshot, w, h) = store.snapshot();
        assert!(snapshot.is_empty());
        assert_eq!((w, h), (640, 480));
    }
}
