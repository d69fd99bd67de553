//! Rust bindings and a safe wrapper over Rockchip's Media Process Platform (MPP).
//!
//! MPP exposes the hardware video codec through two independent task ports
//! (input and output); tasks carry packet/frame descriptors as metadata keys.
//! See [`context::MppContext`] for the dual-port decode protocol.

#[allow(
    non_upper_case_globals,
    non_camel_case_types,
    non_snake_case,
    dead_code,
    clippy::all
)]
pub(crate) mod bindings {
    include!(concat!(env!("OUT_DIR"), "/bindings.rs"));
}

mod buffer;
mod buffer_group;
mod context;
mod decoder;
mod error;
mod frame;
mod packet;
mod task;

pub use buffer::MppBuffer;
pub use buffer_group::MppBufferGroup;
pub use context::{MppContext, PortPoll};
pub use decoder::{HardwareDecoder, DECODE_SLOT_COUNT};
pub use error::{MppError, MppResult};
pub use frame::{MppFrame, PixelFormat};
pub use packet::MppPacket;
pub use task::MppTask;

pub use bindings::{MppCodingType, MppCtxType, MpiCmd};
