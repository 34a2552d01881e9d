use std::io::{self, Write};

use crate::atomic::{write_size, WORD_SIZE};
use crate::message::Message;
use crate::object::OscObject;
use crate::timetag::{TimeTag, TIME_TAG_SIZE};

/// `"#bundle"` encoded as an OSC string.
pub const BUNDLE_TAG: &[u8; 8] = b"#bundle\0";

/// Bundle header size: tag (8) + time tag (8).
pub const BUNDLE_HEADER_SIZE: usize = BUNDLE_TAG.len() + TIME_TAG_SIZE;

/// An OSC bundle: a time tag and zero or more size-prefixed elements.
///
/// Wire format:
/// ```text
/// ┌──────────────┬──────────────┬───────────┬──────────┬─────┐
/// │ "#bundle\0"  │ Time tag     │ Size (4B) │ Element  │ ... │
/// │ (8B)         │ (8B NTP)     │ BE        │ payload  │     │
/// └──────────────┴──────────────┴───────────┴──────────┴─────┘
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    time_tag: TimeTag,
    elements: Vec<BundleElement>,
}

impl Bundle {
    /// Create a bundle from a time tag and its elements.
    pub fn new(time_tag: TimeTag, elements: Vec<BundleElement>) -> Self {
        Self { time_tag, elements }
    }

    /// Create a bundle that wraps each object in an element.
    pub fn from_objects(
        time_tag: TimeTag,
        objects: impl IntoIterator<Item = impl Into<OscObject>>,
    ) -> Self {
        Self::new(
            time_tag,
            objects
                .into_iter()
                .map(|object| BundleElement::new(object.into()))
                .collect(),
        )
    }

    /// The bundle's time tag.
    pub fn time_tag(&self) -> TimeTag {
        self.time_tag
    }

    /// The bundle's elements, in wire order.
    pub fn elements(&self) -> &[BundleElement] {
        &self.elements
    }

    /// Encoded size in bytes: header plus every size-prefixed element.
    pub fn size(&self) -> usize {
        BUNDLE_HEADER_SIZE + self.elements.iter().map(BundleElement::size).sum::<usize>()
    }

    /// Write the encoded bundle, recursing into nested bundles.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(BUNDLE_TAG)?;
        self.time_tag.write_to(out)?;
        for element in &self.elements {
            element.write_to(out)?;
        }
        Ok(())
    }
}

/// One entry of a bundle: a message or bundle behind an int32 size prefix.
///
/// The prefix belongs to the element, not to the wrapped object, so the same
/// object encodes identically as a packet root and as bundle contents.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleElement {
    contents: OscObject,
    /// Encoded size of `contents`, computed once at construction.
    contents_size: usize,
}

impl BundleElement {
    /// Wrap an object as a bundle element.
    pub fn new(contents: OscObject) -> Self {
        // nested elements already carry their sizes, so this is linear in
        // the direct children, not the whole subtree
        let contents_size = contents.size();
        Self {
            contents,
            contents_size,
        }
    }

    /// The wrapped message or bundle.
    pub fn contents(&self) -> &OscObject {
        &self.contents
    }

    /// Encoded size including the 4-byte size prefix.
    pub fn size(&self) -> usize {
        WORD_SIZE + self.contents_size
    }

    /// Write the size prefix followed by the wrapped object.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        write_size(out, self.contents_size)?;
        self.contents.write_to(out)
    }
}

impl From<OscObject> for BundleElement {
    fn from(contents: OscObject) -> Self {
        Self::new(contents)
    }
}

impl From<Message> for BundleElement {
    fn from(message: Message) -> Self {
        Self::new(OscObject::Message(message))
    }
}

impl From<Bundle> for BundleElement {
    fn from(bundle: Bundle) -> Self {
        Self::new(OscObject::Bundle(bundle))
    }
}
