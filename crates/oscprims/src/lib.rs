//! Open Sound Control encoding with length-prefixed and SLIP framing.
//!
//! oscprims turns OSC messages and bundles into wire bytes for TCP, UDP or
//! serial links. The caller owns the transport and hands in any
//! `std::io::Write` sink.
//!
//! # Crate Structure
//!
//! - [`slip`]: SLIP frame escaping (OSC 1.1 stream framing)
//! - [`codec`]: Atomic values, messages, bundles, packet framing and the packet writer
//! - [`builder`]: Convenience builders layered on top of the codec
//!
//! # Example
//!
//! ```
//! use oscprims::builder::message;
//! use oscprims::codec::{FramingMode, Packet};
//!
//! let msg = message("/oscillator/4/frequency").arg(440.0f32).build();
//! let bytes = Packet::new(msg, FramingMode::LengthPrefixed).to_bytes().unwrap();
//! assert_eq!(bytes.len(), 36);
//! ```

pub mod builder;

/// Re-export SLIP types.
pub mod slip {
    pub use oscprims_slip::*;
}

/// Re-export codec types.
pub mod codec {
    pub use oscprims_codec::*;
}

pub use builder::{build_bundle, build_message, bundle, message, BundleBuilder, MessageBuilder};
pub use oscprims_codec::{
    Atomic, Bundle, BundleElement, EncodeError, FramingMode, Message, OscObject, Packet,
    PacketWriter, TimeTag, WriterConfig,
};
