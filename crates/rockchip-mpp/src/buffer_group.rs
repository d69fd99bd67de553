use crate::bindings::*;
use crate::buffer::MppBuffer;
use crate::error::{MppError, MppResult};
use std::ptr;

/// A DMA buffer group backing both the input packet buffers and the output
/// frame buffers of a decode slot ring, for the lifetime of the decoder.
#[derive(Debug)]
pub struct MppBufferGroup {
    group: crate::bindings::MppBufferGroup,
}

impl MppBufferGroup {
    pub fn new_dma() -> MppResult<Self> {
        let mut group = ptr::null_mut();
        unsafe {
            let ret = mpp_buffer_group_get_internal(&mut group, MPP_BUFFER_TYPE_DRM);
            if ret != 0 {
                return Err(MppError::MppError(ret));
            }
        }
        Ok(MppBufferGroup { group })
    }

    pub fn get_buffer(&self, size: usize) -> MppResult<MppBuffer> {
        MppBuffer::new(self.group, size)
    }
}

impl Drop for MppBufferGroup {
    fn drop(&mut self) {
        unsafe {
            let _ = mpp_buffer_group_put(self.group);
        }
    }
}
