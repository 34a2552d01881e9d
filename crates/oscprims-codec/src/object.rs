use std::io::{self, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::bundle::Bundle;
use crate::message::Message;

/// The contents of a packet or of a bundle element: a message or a bundle.
#[derive(Debug, Clone, PartialEq)]
pub enum OscObject {
    Message(Message),
    Bundle(Bundle),
}

impl OscObject {
    /// Encoded size in bytes, without any framing.
    pub fn size(&self) -> usize {
        match self {
            OscObject::Message(message) => message.size(),
            OscObject::Bundle(bundle) => bundle.size(),
        }
    }

    /// Write the unframed encoding.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        match self {
            OscObject::Message(message) => message.write_to(out),
            OscObject::Bundle(bundle) => bundle.write_to(out),
        }
    }

    /// Encode into a fresh buffer, without any framing.
    pub fn encode(&self) -> io::Result<Bytes> {
        let mut dst = BytesMut::with_capacity(self.size());
        self.write_to(&mut (&mut dst).writer())?;
        Ok(dst.freeze())
    }
}

/// Something that can be the root of a packet.
pub(crate) trait Encode {
    fn encoded_size(&self) -> usize;

    fn encode_to(&self, out: &mut dyn Write) -> io::Result<()>;
}

impl Encode for OscObject {
    fn encoded_size(&self) -> usize {
        self.size()
    }

    fn encode_to(&self, out: &mut dyn Write) -> io::Result<()> {
        self.write_to(out)
    }
}

impl Encode for Message {
    fn encoded_size(&self) -> usize {
        self.size()
    }

    fn encode_to(&self, out: &mut dyn Write) -> io::Result<()> {
        self.write_to(out)
    }
}

impl Encode for Bundle {
    fn encoded_size(&self) -> usize {
        self.size()
    }

    fn encode_to(&self, out: &mut dyn Write) -> io::Result<()> {
        self.write_to(out)
    }
}

impl From<Message> for OscObject {
    fn from(message: Message) -> Self {
        OscObject::Message(message)
    }
}

impl From<Bundle> for OscObject {
    fn from(bundle: Bundle) -> Self {
        OscObject::Bundle(bundle)
    }
}
