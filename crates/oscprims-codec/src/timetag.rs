//! OSC time tags: NTP fixed-point timestamps and the immediate sentinel.

use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

/// Encoded size of every time tag.
pub const TIME_TAG_SIZE: usize = 8;

/// Seconds between the NTP epoch (1900-01-01) and the Unix epoch (1970-01-01).
pub const NTP_UNIX_OFFSET: i64 = 2_208_988_800;

/// NTP value reserved for "execute immediately".
pub const IMMEDIATE: u64 = 1;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// An OSC time tag: a 64-bit NTP timestamp or the immediate sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeTag {
    /// Execute as soon as received.
    #[default]
    Immediate,
    /// Execute at the given instant.
    Specified(SystemTime),
}

impl TimeTag {
    /// The "execute immediately" time tag.
    pub fn immediately() -> Self {
        TimeTag::Immediate
    }

    /// A time tag for the given instant.
    pub fn at(instant: SystemTime) -> Self {
        TimeTag::Specified(instant)
    }

    /// A time tag for the current system time.
    pub fn now() -> Self {
        TimeTag::Specified(SystemTime::now())
    }

    /// Encoded size in bytes (always 8).
    pub fn size(&self) -> usize {
        TIME_TAG_SIZE
    }

    /// The 64-bit NTP fixed-point value written on the wire.
    ///
    /// Upper 32 bits are seconds since 1900 (wrapping into the next NTP era
    /// after 2036), lower 32 bits are the rounded binary fraction of a second.
    pub fn to_ntp(&self) -> u64 {
        match self {
            TimeTag::Immediate => IMMEDIATE,
            TimeTag::Specified(instant) => {
                let (unix_seconds, nanos) = unix_parts(*instant);
                let seconds = unix_seconds.wrapping_add(NTP_UNIX_OFFSET) as u32;
                let fraction =
                    ((u64::from(nanos) << 32) + NANOS_PER_SECOND / 2) / NANOS_PER_SECOND;
                (u64::from(seconds) << 32) | fraction
            }
        }
    }

    /// Write the 8 big-endian bytes of this time tag.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> std::io::Result<()> {
        out.write_all(&self.to_ntp().to_be_bytes())
    }
}

impl From<SystemTime> for TimeTag {
    fn from(instant: SystemTime) -> Self {
        TimeTag::Specified(instant)
    }
}

/// Split an instant into whole Unix seconds (floored) and nanoseconds.
fn unix_parts(instant: SystemTime) -> (i64, u32) {
    match instant.duration_since(UNIX_EPOCH) {
        Ok(after) => (after.as_secs() as i64, after.subsec_nanos()),
        Err(err) => {
            let before = err.duration();
            // wraps only where the NTP era cast would discard the bits anyway
            let seconds = 0i64.wrapping_sub_unsigned(before.as_secs());
            match before.subsec_nanos() {
                0 => (seconds, 0),
                nanos => (seconds.wrapping_sub(1), NANOS_PER_SECOND as u32 - nanos),
            }
        }
    }
}
