use crate::bindings::*;
use crate::error::{MppError, MppResult};
use std::ptr;

/// An MJPEG packet wrapping a DMA input buffer, with a length set at each decode.
#[derive(Debug)]
pub struct MppPacket {
    packet: crate::bindings::MppPacket,
}

impl MppPacket {
    pub fn from_ptr(packet: crate::bindings::MppPacket) -> Self {
        MppPacket { packet }
    }

    pub fn as_ptr(&self) -> crate::bindings::MppPacket {
        self.packet
    }

    /// Wraps a DMA buffer as a packet of `length` bytes, starting at offset 0.
    pub fn from_buffer(buffer: &crate::buffer::MppBuffer, length: usize) -> MppResult<Self> {
        let mut packet = ptr::null_mut();
        unsafe {
            let ret = mpp_packet_init_with_buffer(&mut packet, buffer.as_ptr());
            if ret != 0 {
                return Err(MppError::MppError(ret));
            }
            mpp_packet_set_length(packet, length);
        }
        Ok(MppPacket { packet })
    }

    pub fn length(&self) -> usize {
        unsafe { mpp_packet_get_length(self.packet) }
    }
}

impl Drop for MppPacket {
    fn drop(&mut self) {
        unsafe {
            let _ = mpp_packet_deinit(&mut self.packet);
        }
    }
}
