use std::io::Write;

use bytes::{BufMut, Bytes, BytesMut};
use oscprims_slip::SlipWriter;
use tracing::trace;

use crate::atomic::{write_size, WORD_SIZE};
use crate::error::Result;
use crate::object::{Encode, OscObject};

/// How a packet is delimited on a stream transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramingMode {
    /// OSC 1.0 streams: int32 big-endian size, then the raw packet.
    LengthPrefixed,
    /// OSC 1.1 streams: the packet inside a double-ended SLIP frame.
    #[default]
    Slip,
}

/// A root message or bundle together with its framing.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    /// The packet contents.
    pub root: OscObject,
    /// How the contents are delimited on the wire.
    pub mode: FramingMode,
}

impl Packet {
    /// Create a packet.
    pub fn new(root: impl Into<OscObject>, mode: FramingMode) -> Self {
        Self {
            root: root.into(),
            mode,
        }
    }

    /// Write the framed packet to a sink.
    pub fn write_to<W: Write>(&self, out: W) -> Result<()> {
        frame(&self.root, self.mode, out)
    }

    /// Encode the framed packet into a fresh buffer.
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut dst = BytesMut::new();
        encode_packet(&self.root, self.mode, &mut dst)?;
        Ok(dst.freeze())
    }
}

/// Write `root` to `out` with the given framing.
///
/// Length-prefixed:
/// ```text
/// ┌──────────────┬──────────────────┐
/// │ Size (4B BE) │ Packet           │
/// └──────────────┴──────────────────┘
/// ```
///
/// SLIP:
/// ```text
/// ┌──────┬──────────────────┬──────┐
/// │ 0xC0 │ Escaped packet   │ 0xC0 │
/// └──────┴──────────────────┴──────┘
/// ```
pub fn frame<W: Write>(root: &OscObject, mode: FramingMode, mut out: W) -> Result<()> {
    match mode {
        FramingMode::LengthPrefixed => write_length_prefixed(root, &mut out),
        FramingMode::Slip => {
            let mut slip = SlipWriter::new(out);
            write_slip_frame(root, &mut slip)
        }
    }
}

/// Append the framed encoding of `root` to a buffer.
pub fn encode_packet(root: &OscObject, mode: FramingMode, dst: &mut BytesMut) -> Result<()> {
    if mode == FramingMode::LengthPrefixed {
        dst.reserve(WORD_SIZE + root.size());
    }
    frame(root, mode, dst.writer())
}

pub(crate) fn write_length_prefixed<E, W>(root: &E, out: &mut W) -> Result<()>
where
    E: Encode + ?Sized,
    W: Write,
{
    let size = root.encoded_size();
    trace!(size, "writing length-prefixed packet");
    write_size(out, size)?;
    root.encode_to(out)?;
    Ok(())
}

pub(crate) fn write_slip_frame<E, W>(root: &E, slip: &mut SlipWriter<W>) -> Result<()>
where
    E: Encode + ?Sized,
    W: Write,
{
    trace!(size = root.encoded_size(), "writing slip-framed packet");
    slip.begin_frame()?;
    root.encode_to(slip)?;
    slip.end_frame()?;
    Ok(())
}
