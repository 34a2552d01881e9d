//! SLIP (RFC 1055) frame escaping over any byte sink.
//!
//! OSC 1.1 streams delimit packets with SLIP instead of a size prefix:
//! - `0xC0` (END) marks frame boundaries
//! - `0xC0` inside a frame is sent as `0xDB 0xDC`
//! - `0xDB` inside a frame is sent as `0xDB 0xDD`
//!
//! This is the lowest layer of oscprims. The packet framer in `oscprims-codec`
//! drives a [`SlipWriter`] for every SLIP-framed packet.

pub mod error;
pub mod writer;

pub use error::{Result, SlipError};
pub use writer::{FrameState, SlipConfig, SlipWriter};

/// Frame end.
pub const END: u8 = 0xC0;

/// Frame escape.
pub const ESC: u8 = 0xDB;

/// Transposed frame end.
pub const ESC_END: u8 = 0xDC;

/// Transposed frame escape.
pub const ESC_ESC: u8 = 0xDD;
