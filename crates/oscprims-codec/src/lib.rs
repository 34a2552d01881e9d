//! Open Sound Control message, bundle and packet encoding.
//!
//! This is the core layer of oscprims. Values are encoded leaf to root:
//! - [`Atomic`] values (int32, float32, string, blob, time tag, T/F/N/I)
//! - [`Message`]s: address, type tag string, arguments
//! - [`Bundle`]s: `#bundle`, time tag, size-prefixed elements (recursive)
//! - [`Packet`]s: a root message or bundle, length-prefixed (OSC 1.0) or
//!   SLIP-framed (OSC 1.1)
//!
//! Everything writes straight to a `std::io::Write` sink. Decoding is out of
//! scope.

pub mod atomic;
pub mod bundle;
#[cfg(feature = "async")]
pub mod codec;
pub mod error;
pub mod message;
pub mod object;
pub mod packet;
pub mod timetag;
pub mod writer;

pub use atomic::Atomic;
pub use bundle::{Bundle, BundleElement, BUNDLE_TAG};
#[cfg(feature = "async")]
pub use codec::OscCodec;
pub use error::{EncodeError, Result};
pub use message::Message;
pub use object::OscObject;
pub use packet::{encode_packet, frame, FramingMode, Packet};
pub use timetag::TimeTag;
pub use writer::{PacketWriter, WriterConfig};
