//! OSC atomic data types and their wire encoding.

use std::io::{self, Write};
use std::time::SystemTime;

use bytes::Bytes;

use crate::timetag::TimeTag;

/// Size of an int32 or float32 on the wire.
pub const WORD_SIZE: usize = 4;

const ZEROS: [u8; WORD_SIZE] = [0; WORD_SIZE];

/// A single OSC argument value.
///
/// The set of variants is the fixed OSC 1.1 type tag alphabet. Each variant
/// knows its type tag, its encoded size and how to write itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Atomic {
    /// `i`: 32-bit big-endian two's complement integer.
    Int32(i32),
    /// `f`: 32-bit big-endian IEEE 754 float.
    Float32(f32),
    /// `s`: zero-terminated ASCII string padded to 4 bytes.
    String(String),
    /// `b`: int32 size, raw bytes, zero padding to 4 bytes.
    Blob(Bytes),
    /// `t`: 64-bit NTP time tag.
    TimeTag(TimeTag),
    /// `T`: no payload.
    True,
    /// `F`: no payload.
    False,
    /// `N`: no payload.
    Nil,
    /// `I`: no payload.
    Impulse,
}

impl Atomic {
    /// The one-character type tag of this value.
    pub fn type_tag(&self) -> char {
        match self {
            Atomic::Int32(_) => 'i',
            Atomic::Float32(_) => 'f',
            Atomic::String(_) => 's',
            Atomic::Blob(_) => 'b',
            Atomic::TimeTag(_) => 't',
            Atomic::True => 'T',
            Atomic::False => 'F',
            Atomic::Nil => 'N',
            Atomic::Impulse => 'I',
        }
    }

    /// Number of bytes [`Atomic::write_to`] emits.
    pub fn size(&self) -> usize {
        match self {
            Atomic::Int32(_) | Atomic::Float32(_) => WORD_SIZE,
            Atomic::String(text) => string_size(text),
            Atomic::Blob(data) => blob_size(data),
            Atomic::TimeTag(tag) => tag.size(),
            Atomic::True | Atomic::False | Atomic::Nil | Atomic::Impulse => 0,
        }
    }

    /// Write the payload of this value. Tag-only values write nothing.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        match self {
            Atomic::Int32(value) => out.write_all(&value.to_be_bytes()),
            Atomic::Float32(value) => out.write_all(&value.to_be_bytes()),
            Atomic::String(text) => write_string(out, text),
            Atomic::Blob(data) => write_blob(out, data),
            Atomic::TimeTag(tag) => tag.write_to(out),
            Atomic::True | Atomic::False | Atomic::Nil | Atomic::Impulse => Ok(()),
        }
    }
}

/// Zero bytes needed after `len` bytes of blob data to reach a multiple of 4.
pub fn blob_padding(len: usize) -> usize {
    (WORD_SIZE - len % WORD_SIZE) % WORD_SIZE
}

/// Encoded size of an OSC string with `len` characters.
///
/// Always leaves room for at least one terminating zero, so a string whose
/// length is already a multiple of 4 gets a whole extra zero word.
pub fn padded_string_len(len: usize) -> usize {
    (len + WORD_SIZE) & !(WORD_SIZE - 1)
}

/// Encoded size of `text` as an OSC string.
pub fn string_size(text: &str) -> usize {
    padded_string_len(ascii_len(text))
}

/// Encoded size of `data` as an OSC blob.
pub fn blob_size(data: &[u8]) -> usize {
    WORD_SIZE + data.len() + blob_padding(data.len())
}

/// Write `text` as an OSC string.
///
/// Non-ASCII characters are written as `?`, one byte per character, so the
/// size from [`string_size`] always matches.
pub fn write_string<W: Write + ?Sized>(out: &mut W, text: &str) -> io::Result<()> {
    let len = if text.is_ascii() {
        out.write_all(text.as_bytes())?;
        text.len()
    } else {
        let ascii: Vec<u8> = text
            .chars()
            .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
            .collect();
        out.write_all(&ascii)?;
        ascii.len()
    };
    out.write_all(&ZEROS[..padded_string_len(len) - len])
}

/// Write `data` as an OSC blob.
pub fn write_blob<W: Write + ?Sized>(out: &mut W, data: &[u8]) -> io::Result<()> {
    write_size(out, data.len())?;
    out.write_all(data)?;
    out.write_all(&ZEROS[..blob_padding(data.len())])
}

/// Write a byte count as a big-endian int32 prefix.
///
/// Counts beyond `i32::MAX` cannot be represented on the wire and are
/// rejected instead of being truncated.
pub fn write_size<W: Write + ?Sized>(out: &mut W, size: usize) -> io::Result<()> {
    let size = i32::try_from(size).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("size {size} does not fit an int32 prefix"),
        )
    })?;
    out.write_all(&size.to_be_bytes())
}

fn ascii_len(text: &str) -> usize {
    if text.is_ascii() {
        text.len()
    } else {
        text.chars().count()
    }
}

impl From<i32> for Atomic {
    fn from(value: i32) -> Self {
        Atomic::Int32(value)
    }
}

impl From<f32> for Atomic {
    fn from(value: f32) -> Self {
        Atomic::Float32(value)
    }
}

impl From<&str> for Atomic {
    fn from(value: &str) -> Self {
        Atomic::String(value.to_owned())
    }
}

impl From<String> for Atomic {
    fn from(value: String) -> Self {
        Atomic::String(value)
    }
}

impl From<Bytes> for Atomic {
    fn from(value: Bytes) -> Self {
        Atomic::Blob(value)
    }
}

impl From<Vec<u8>> for Atomic {
    fn from(value: Vec<u8>) -> Self {
        Atomic::Blob(Bytes::from(value))
    }
}

impl From<&[u8]> for Atomic {
    fn from(value: &[u8]) -> Self {
        Atomic::Blob(Bytes::copy_from_slice(value))
    }
}

impl From<TimeTag> for Atomic {
    fn from(value: TimeTag) -> Self {
        Atomic::TimeTag(value)
    }
}

impl From<SystemTime> for Atomic {
    fn from(value: SystemTime) -> Self {
        Atomic::TimeTag(TimeTag::Specified(value))
    }
}

impl From<bool> for Atomic {
    fn from(value: bool) -> Self {
        if value {
            Atomic::True
        } else {
            Atomic::False
        }
    }
}

impl<T: Into<Atomic>> From<Option<T>> for Atomic {
    fn from(value: Option<T>) -> Self {
        value.map_or(Atomic::Nil, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &Atomic) -> Vec<u8> {
        let mut out = Vec::new();
        value.write_to(&mut out).unwrap();
        assert_eq!(out.len(), value.size(), "size must match bytes written");
        out
    }

    #[test]
    fn int32_is_big_endian() {
        for value in [0, 1, -1, 42, i32::MIN, i32::MAX, 0x0102_0304] {
            let bytes = encode(&Atomic::Int32(value));
            assert_eq!(bytes.len(), 4);
            assert_eq!(i32::from_be_bytes(bytes.try_into().unwrap()), value);
        }
        assert_eq!(encode(&Atomic::Int32(0x0102_0304)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn float32_preserves_bit_pattern() {
        for value in [0.0f32, -0.0, 440.0, f32::MIN_POSITIVE, f32::INFINITY, f32::NAN] {
            let bytes = encode(&Atomic::Float32(value));
            assert_eq!(bytes.len(), 4);
            assert_eq!(
                u32::from_be_bytes(bytes.try_into().unwrap()),
                value.to_bits()
            );
        }
        assert_eq!(encode(&Atomic::Float32(440.0)), vec![0x43, 0xDC, 0x00, 0x00]);
    }

    #[test]
    fn string_without_padding_bytes() {
        // 23 characters plus one terminator is exactly 24 bytes.
        let value = Atomic::from("/oscillator/4/frequency");
        assert_eq!(value.size(), 24);
        assert_eq!(*encode(&value).last().unwrap(), 0);
    }

    #[test]
    fn string_padding_lengths() {
        let full = "/oscillator/4/frequency";
        for cut in 0..4 {
            let text = &full[..full.len() - cut];
            let bytes = encode(&Atomic::from(text));

            let mut expected = vec![0u8; 24];
            expected[..text.len()].copy_from_slice(text.as_bytes());
            assert_eq!(bytes, expected, "cut {cut}");
        }
    }

    #[test]
    fn string_length_rules() {
        for len in 0..=17 {
            let text = "x".repeat(len);
            let bytes = encode(&Atomic::String(text.clone()));
            assert_eq!(bytes.len() % 4, 0);
            assert!(bytes.len() > len);
            assert!(bytes.len() <= len + 4);
            let stripped: Vec<u8> = bytes.into_iter().take_while(|&b| b != 0).collect();
            assert_eq!(stripped, text.as_bytes());
        }
    }

    #[test]
    fn aligned_string_gets_full_zero_word() {
        assert_eq!(encode(&Atomic::from("")), vec![0, 0, 0, 0]);
        assert_eq!(
            encode(&Atomic::from("abcd")),
            vec![b'a', b'b', b'c', b'd', 0, 0, 0, 0]
        );
    }

    #[test]
    fn non_ascii_characters_become_question_marks() {
        let value = Atomic::from("né");
        assert_eq!(value.size(), 4);
        assert_eq!(encode(&value), vec![b'n', b'?', 0, 0]);
    }

    #[test]
    fn blob_examples() {
        let cases: [(&[u8], &[u8]); 7] = [
            (
                &[1, 2, 3, 4, 5, 6, 7, 8],
                &[0, 0, 0, 8, 1, 2, 3, 4, 5, 6, 7, 8],
            ),
            (&[], &[0, 0, 0, 0]),
            (&[0x2a], &[0, 0, 0, 1, 0x2a, 0, 0, 0]),
            (&[0x2a, 0x2b], &[0, 0, 0, 2, 0x2a, 0x2b, 0, 0]),
            (&[0x2a, 0x2b, 0x2c], &[0, 0, 0, 3, 0x2a, 0x2b, 0x2c, 0]),
            (&[0x2a, 0x2b, 0x2c, 0x2d], &[0, 0, 0, 4, 0x2a, 0x2b, 0x2c, 0x2d]),
            (
                &[0x2a, 0x2b, 0x2c, 0x2d, 0x2e],
                &[0, 0, 0, 5, 0x2a, 0x2b, 0x2c, 0x2d, 0x2e, 0, 0, 0],
            ),
        ];

        for (input, expected) in cases {
            assert_eq!(encode(&Atomic::from(input)), expected);
        }
    }

    #[test]
    fn blob_prefix_and_padding_strip_back() {
        for size in 0..=5usize {
            let data: Vec<u8> = (0..size).map(|i| 0xF0 | i as u8).collect();
            let bytes = encode(&Atomic::from(data.clone()));
            assert_eq!(bytes.len(), 4 + size + (4 - size % 4) % 4);

            let prefix = i32::from_be_bytes(bytes[..4].try_into().unwrap());
            assert_eq!(prefix as usize, size);
            assert_eq!(&bytes[4..4 + size], data.as_slice());
            assert!(bytes[4 + size..].iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn tag_only_values_have_no_payload() {
        for (value, tag) in [
            (Atomic::True, 'T'),
            (Atomic::False, 'F'),
            (Atomic::Nil, 'N'),
            (Atomic::Impulse, 'I'),
        ] {
            assert_eq!(value.type_tag(), tag);
            assert!(encode(&value).is_empty());
        }
    }

    #[test]
    fn time_tag_atomic() {
        let value = Atomic::from(TimeTag::Immediate);
        assert_eq!(value.type_tag(), 't');
        assert_eq!(encode(&value), vec![0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn type_tags() {
        assert_eq!(Atomic::from(1i32).type_tag(), 'i');
        assert_eq!(Atomic::from(1.0f32).type_tag(), 'f');
        assert_eq!(Atomic::from("s").type_tag(), 's');
        assert_eq!(Atomic::from(vec![1u8]).type_tag(), 'b');
        assert_eq!(Atomic::from(SystemTime::now()).type_tag(), 't');
    }

    #[test]
    fn conversions() {
        assert_eq!(Atomic::from(true), Atomic::True);
        assert_eq!(Atomic::from(false), Atomic::False);
        assert_eq!(Atomic::from(None::<i32>), Atomic::Nil);
        assert_eq!(Atomic::from(Some(7i32)), Atomic::Int32(7));
        assert_eq!(
            Atomic::from(String::from("x")),
            Atomic::String("x".to_string())
        );
    }

    #[test]
    fn padding_helpers() {
        assert_eq!(blob_padding(0), 0);
        assert_eq!(blob_padding(1), 3);
        assert_eq!(blob_padding(4), 0);
        assert_eq!(padded_string_len(0), 4);
        assert_eq!(padded_string_len(3), 4);
        assert_eq!(padded_string_len(4), 8);
        assert_eq!(padded_string_len(7), 8);
    }

    #[test]
    fn oversized_prefix_is_rejected() {
        let err = write_size(&mut Vec::<u8>::new(), i32::MAX as usize + 1).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
