//! `tokio_util::codec` integration (feature `async`).
//!
//! Only the encoding half is provided: oscprims writes OSC, it does not parse it.

use bytes::BytesMut;
use tokio_util::codec::Encoder;

use crate::error::EncodeError;
use crate::object::OscObject;
use crate::packet::{encode_packet, FramingMode, Packet};

/// Encodes OSC objects for a `FramedWrite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OscCodec {
    mode: FramingMode,
}

impl OscCodec {
    /// Create a codec that frames every object with `mode`.
    pub fn new(mode: FramingMode) -> Self {
        Self { mode }
    }

    /// Framing applied to `OscObject` items.
    pub fn mode(&self) -> FramingMode {
        self.mode
    }
}

impl Encoder<OscObject> for OscCodec {
    type Error = EncodeError;

    fn encode(&mut self, item: OscObject, dst: &mut BytesMut) -> Result<(), Self::Error> {
        encode_packet(&item, self.mode, dst)
    }
}

impl Encoder<&OscObject> for OscCodec {
    type Error = EncodeError;

    fn encode(&mut self, item: &OscObject, dst: &mut BytesMut) -> Result<(), Self::Error> {
        encode_packet(item, self.mode, dst)
    }
}

/// Packets carry their own framing, which overrides the codec's mode.
impl Encoder<Packet> for OscCodec {
    type Error = EncodeError;

    fn encode(&mut self, item: Packet, dst: &mut BytesMut) -> Result<(), Self::Error> {
        encode_packet(&item.root, item.mode, dst)
    }
}
