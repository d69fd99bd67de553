//! The dual-port decode protocol (input task in, output task out) wrapped as
//! a simple `decode`/`release` contract over a round-robin slot ring.

use crate::buffer::MppBuffer;
use crate::buffer_group::MppBufferGroup;
use crate::context::{MppContext, PortPoll};
use crate::error::{MppError, MppResult};
use crate::frame::MppFrame;
use crate::packet::MppPacket;
use crate::task::MppTask;
use crate::bindings::{MppCodingType, MppCtxType};

/// Named per §9 of the design notes — not a magic literal.
pub const DECODE_SLOT_COUNT: usize = 8;

struct DecodeSlot {
    input: MppBuffer,
    output: MppBuffer,
}

/// Hardware JPEG decoder: submits MJPEG packets through MPP's input port and
/// harvests decoded YUV frames from the output port.
pub struct HardwareDecoder {
    ctx: MppContext,
    _group: MppBufferGroup,
    slots: Vec<DecodeSlot>,
    next_slot: usize,
}

impl HardwareDecoder {
    /// `input_capacity` must be >= the largest MJPEG packet expected; `output_capacity`
    /// must be >= `aligned_w * aligned_h * 4` to cover the 4:2:2 worst case.
    pub fn init(input_capacity: usize, output_capacity: usize) -> MppResult<Self> {
        let ctx = MppContext::new(MppCtxType::MPP_CTX_DEC, MppCodingType::MPP_VIDEO_CodingMJPEG)?;

        // Split-parse disabled: every MJPEG packet is already a whole picture.
        let mut split_mode: u32 = 0;
        ctx.control(
            crate::bindings::MpiCmd::MPP_DEC_SET_PARSER_SPLIT_MODE,
            &mut split_mode as *mut u32 as crate::bindings::MppParam,
        )?;

        let group = MppBufferGroup::new_dma()?;
        let mut slots = Vec::with_capacity(DECODE_SLOT_COUNT);
        for _ in 0..DECODE_SLOT_COUNT {
            slots.push(DecodeSlot {
                input: group.get_buffer(input_capacity)?,
                output: group.get_buffer(output_capacity)?,
            });
        }

        Ok(Self {
            ctx,
            _group: group,
            slots,
            next_slot: 0,
        })
    }

    /// Requests MPP's fast-out mode. Best-effort: a rejection is returned to
    /// the caller to log, but the decoder remains usable with framework defaults.
    pub fn try_enable_fast_out(&self) -> MppResult<()> {
        let mut enabled: u32 = 1;
        self.ctx.control(
            crate::bindings::MpiCmd::MPP_DEC_SET_IMMEDIATE_OUT,
            &mut enabled as *mut u32 as crate::bindings::MppParam,
        )
    }

    /// Runs the full per-decode protocol (steps 1-8 of the dual-port contract)
    /// and hands the decoded frame to `consume` before returning the output
    /// task to MPP's pool. A non-zero frame error-info is surfaced as
    /// `MppError::Unknown` but the decoder remains usable afterwards.
    pub fn decode<R>(
        &mut self,
        packet_bytes: &[u8],
        consume: impl FnOnce(&MppFrame) -> R,
    ) -> MppResult<R> {
        self.next_slot = (self.next_slot + 1) % DECODE_SLOT_COUNT;
        let slot = &mut self.slots[self.next_slot];

        slot.input.copy_from_slice(packet_bytes)?;

        let packet = MppPacket::from_buffer(&slot.input, packet_bytes.len())?;
        let mut frame = MppFrame::new()?;
        frame.set_buffer(&slot.output)?;

        self.ctx.poll_input_port(PortPoll::NonBlock)?;
        let mut input_task = self.ctx.dequeue_input_task()?;
        input_task.set_input(&packet)?;
        input_task.set_output(&frame)?;
        self.ctx.enqueue_input_task(input_task)?;

        self.ctx.poll_output_port(PortPoll::Block)?;
        let output_task: MppTask = self.ctx.dequeue_output_task()?;
        let out_frame = output_task.get_output()?;
        let error_info = out_frame.error_info();
        let result = (error_info == 0).then(|| consume(&out_frame));

        // The frame is released back to MPP's pool on every exit path,
        // whether or not the decode itself succeeded.
        self.ctx.enqueue_output_task(output_task)?;

        result.ok_or_else(|| MppError::Unknown(format!("decode error-info {error_info}")))
    }
}
