//! Builders for messages and bundles.
//!
//! Pure sugar over the codec's constructors: a built message or bundle encodes
//! to exactly the same bytes as one assembled by hand.
//!
//! ```
//! use oscprims::builder::{build_bundle, message};
//! use oscprims::codec::TimeTag;
//!
//! let bundle = build_bundle(TimeTag::Immediate, |b| {
//!     b.message("/mixer/fader/1", |m| m.arg(0.75f32));
//!     b.bundle(TimeTag::Immediate, |inner| {
//!         inner.element(message("/mixer/mute/2").arg(true).build());
//!     });
//! });
//! assert_eq!(bundle.elements().len(), 2);
//! ```

use std::time::SystemTime;

use bytes::Bytes;
use oscprims_codec::{Atomic, Bundle, BundleElement, Message, TimeTag};

/// Incrementally assembles a [`Message`].
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    address: String,
    args: Vec<Atomic>,
}

impl MessageBuilder {
    /// Start a message for `address`.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            args: Vec::new(),
        }
    }

    /// Replace the address pattern.
    pub fn address(&mut self, address: impl Into<String>) -> &mut Self {
        self.address = address.into();
        self
    }

    /// Append one argument.
    pub fn arg(&mut self, value: impl Into<Atomic>) -> &mut Self {
        self.args.push(value.into());
        self
    }

    /// Append several arguments in order.
    pub fn args<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Atomic>,
    {
        self.args.extend(values.into_iter().map(Into::into));
        self
    }

    /// Append a blob argument.
    pub fn blob(&mut self, data: impl Into<Bytes>) -> &mut Self {
        self.arg(Atomic::Blob(data.into()))
    }

    /// Append a time tag argument for `instant`.
    pub fn time(&mut self, instant: SystemTime) -> &mut Self {
        self.arg(TimeTag::at(instant))
    }

    /// Append a Nil argument.
    pub fn nil(&mut self) -> &mut Self {
        self.arg(Atomic::Nil)
    }

    /// Append an Impulse argument.
    pub fn impulse(&mut self) -> &mut Self {
        self.arg(Atomic::Impulse)
    }

    /// Build the message from the current state.
    pub fn build(&self) -> Message {
        Message::new(self.address.clone(), self.args.clone())
    }
}

/// Incrementally assembles a [`Bundle`].
#[derive(Debug, Clone, Default)]
pub struct BundleBuilder {
    time_tag: TimeTag,
    elements: Vec<BundleElement>,
}

impl BundleBuilder {
    /// Start an empty bundle to be executed immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time tag. Defaults to immediately.
    pub fn time_tag(&mut self, time_tag: impl Into<TimeTag>) -> &mut Self {
        self.time_tag = time_tag.into();
        self
    }

    /// Append a message, bundle or element.
    pub fn element(&mut self, element: impl Into<BundleElement>) -> &mut Self {
        self.elements.push(element.into());
        self
    }

    /// Append a message assembled by `f`.
    pub fn message<F>(&mut self, address: impl Into<String>, f: F) -> &mut Self
    where
        F: FnOnce(&mut MessageBuilder) -> &mut MessageBuilder,
    {
        self.element(build_message(address, f))
    }

    /// Append a nested bundle assembled by `f`.
    pub fn bundle<F>(&mut self, time_tag: impl Into<TimeTag>, f: F) -> &mut Self
    where
        F: FnOnce(&mut BundleBuilder),
    {
        self.element(build_bundle(time_tag, f))
    }

    /// Build the bundle from the current state.
    pub fn build(&self) -> Bundle {
        Bundle::new(self.time_tag, self.elements.clone())
    }
}

/// Start building a message for `address`.
pub fn message(address: impl Into<String>) -> MessageBuilder {
    MessageBuilder::new(address)
}

/// Start building a bundle to be executed immediately.
pub fn bundle() -> BundleBuilder {
    BundleBuilder::new()
}

/// Build a message in one expression.
pub fn build_message<F>(address: impl Into<String>, f: F) -> Message
where
    F: FnOnce(&mut MessageBuilder) -> &mut MessageBuilder,
{
    let mut builder = MessageBuilder::new(address);
    f(&mut builder);
    builder.build()
}

/// Build a bundle in one expression.
pub fn build_bundle<F>(time_tag: impl Into<TimeTag>, f: F) -> Bundle
where
    F: FnOnce(&mut BundleBuilder),
{
    let mut builder = BundleBuilder::new();
    builder.time_tag(time_tag);
    f(&mut builder);
    builder.build()
}
