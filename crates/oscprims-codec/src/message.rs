use std::io::{self, Write};

use crate::atomic::{string_size, write_string, Atomic};

/// An OSC message: an address pattern and zero or more arguments.
///
/// Wire format:
/// ```text
/// ┌──────────────────┬──────────────────┬────────────────────────┐
/// │ Address (string) │ Type tags        │ Arguments              │
/// │ "/a/b\0\0\0\0"   │ ",if\0"          │ payloads in order      │
/// └──────────────────┴──────────────────┴────────────────────────┘
/// ```
///
/// The address is not validated; it is written as given.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    address: String,
    args: Vec<Atomic>,
}

impl Message {
    /// Create a message from an address and its arguments.
    pub fn new(address: impl Into<String>, args: Vec<Atomic>) -> Self {
        Self {
            address: address.into(),
            args,
        }
    }

    /// Create a message without arguments.
    pub fn empty(address: impl Into<String>) -> Self {
        Self::new(address, Vec::new())
    }

    /// The address pattern.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The arguments, in wire order.
    pub fn args(&self) -> &[Atomic] {
        &self.args
    }

    /// `","` followed by each argument's type tag, e.g. `",iff"`.
    pub fn type_tag_string(&self) -> String {
        let mut tags = String::with_capacity(1 + self.args.len());
        tags.push(',');
        tags.extend(self.args.iter().map(Atomic::type_tag));
        tags
    }

    /// Encoded size in bytes.
    pub fn size(&self) -> usize {
        string_size(&self.address)
            + string_size(&self.type_tag_string())
            + self.args.iter().map(Atomic::size).sum::<usize>()
    }

    /// Write the encoded message.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        write_string(out, &self.address)?;
        write_string(out, &self.type_tag_string())?;
        for arg in &self.args {
            arg.write_to(out)?;
        }
        Ok(())
    }
}
