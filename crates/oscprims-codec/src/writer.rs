use std::io::Write;

use oscprims_slip::SlipWriter;
use tracing::debug;

use crate::bundle::Bundle;
use crate::error::{EncodeError, Result};
use crate::message::Message;
use crate::object::{Encode, OscObject};
use crate::packet::{write_length_prefixed, write_slip_frame, FramingMode, Packet};

/// Configuration for a [`PacketWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterConfig {
    /// Framing used by `send`, `send_message` and `send_bundle`. Default: SLIP.
    pub mode: FramingMode,
    /// Flush the sink after every packet. Default: `true`.
    pub flush_after_packet: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            mode: FramingMode::default(),
            flush_after_packet: true,
        }
    }
}

/// Writes framed OSC packets to any `Write` stream.
///
/// Each writer owns the SLIP escaper for its stream, so one writer should be
/// used per connection. Bytes go straight to the sink without intermediate
/// buffering; sink errors are returned as they are, without retries.
pub struct PacketWriter<T> {
    slip: SlipWriter<T>,
    config: WriterConfig,
}

impl<T: Write> PacketWriter<T> {
    /// Create a new packet writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, WriterConfig::default())
    }

    /// Create a new packet writer with explicit configuration.
    pub fn with_config(inner: T, config: WriterConfig) -> Self {
        Self {
            slip: SlipWriter::new(inner),
            config,
        }
    }

    /// Send a message with the configured framing.
    pub fn send_message(&mut self, message: &Message) -> Result<()> {
        self.write_root(message, self.config.mode)
    }

    /// Send a bundle with the configured framing.
    pub fn send_bundle(&mut self, bundle: &Bundle) -> Result<()> {
        self.write_root(bundle, self.config.mode)
    }

    /// Send a message or bundle with the configured framing.
    pub fn send(&mut self, object: &OscObject) -> Result<()> {
        self.write_root(object, self.config.mode)
    }

    /// Write a packet using its own framing mode.
    pub fn write_packet(&mut self, packet: &Packet) -> Result<()> {
        self.write_root(&packet.root, packet.mode)
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        self.slip.flush().map_err(EncodeError::Io)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        self.slip.get_ref()
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        self.slip.get_mut()
    }

    /// Flush and return the inner stream.
    pub fn close(self) -> Result<T> {
        Ok(self.slip.close()?)
    }

    /// Change the framing used for subsequent packets.
    pub fn set_mode(&mut self, mode: FramingMode) {
        self.config.mode = mode;
    }

    /// Current writer configuration.
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    fn write_root<E: Encode + ?Sized>(&mut self, root: &E, mode: FramingMode) -> Result<()> {
        let result = match mode {
            FramingMode::LengthPrefixed => write_length_prefixed(root, self.slip.get_mut()),
            FramingMode::Slip => write_slip_frame(root, &mut self.slip),
        };
        self.finish_packet(result, mode)
    }

    fn finish_packet(&mut self, result: Result<()>, mode: FramingMode) -> Result<()> {
        if let Err(err) = result {
            debug!(?mode, error = %err, "packet write failed");
            if self.slip.is_in_frame() {
                self.slip.reset();
            }
            return Err(err);
        }
        if self.config.flush_after_packet {
            self.flush()?;
        }
        Ok(())
    }
}

impl<T> std::fmt::Debug for PacketWriter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacketWriter")
            .field("slip", &self.slip)
            .field("config", &self.config)
            .finish()
    }
}
