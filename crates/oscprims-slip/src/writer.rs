use std::fmt;
use std::io::Write;

use tracing::trace;

use crate::error::{Result, SlipError};
use crate::{END, ESC, ESC_END, ESC_ESC};

/// Whether a [`SlipWriter`] currently has an open frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// Between frames. Only `begin_frame` and `close` are allowed.
    Idle,
    /// A frame is open. Data may be written until `end_frame`.
    InFrame,
}

impl fmt::Display for FrameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameState::Idle => f.write_str("no frame is open"),
            FrameState::InFrame => f.write_str("a frame is open"),
        }
    }
}

/// Configuration for the SLIP escaper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlipConfig {
    /// Emit an END byte when a frame begins as well as when it ends.
    ///
    /// Double-ended framing is what OSC 1.1 requires. Default: `true`.
    pub double_ended: bool,
}

impl Default for SlipConfig {
    fn default() -> Self {
        Self { double_ended: true }
    }
}

/// Escapes bytes into SLIP frames on any `Write` sink.
///
/// Bytes go straight to the sink; nothing is buffered here. The writer is a
/// two-state machine ([`FrameState`]) and rejects calls that are out of
/// order with [`SlipError::InvalidState`].
///
/// `Write` is implemented too, so encoders that only know about
/// `std::io::Write` can stream a payload into an open frame. Writing through
/// it outside a frame fails with an `io::Error` wrapping the state error.
pub struct SlipWriter<W> {
    inner: W,
    state: FrameState,
    config: SlipConfig,
}

impl<W: Write> SlipWriter<W> {
    /// Create a double-ended SLIP writer.
    pub fn new(inner: W) -> Self {
        Self::with_config(inner, SlipConfig::default())
    }

    /// Create a writer that only emits END after each frame.
    pub fn single_ended(inner: W) -> Self {
        Self::with_config(
            inner,
            SlipConfig {
                double_ended: false,
            },
        )
    }

    /// Create a SLIP writer with explicit configuration.
    pub fn with_config(inner: W, config: SlipConfig) -> Self {
        Self {
            inner,
            state: FrameState::Idle,
            config,
        }
    }

    /// Open a new frame.
    pub fn begin_frame(&mut self) -> Result<()> {
        if self.state == FrameState::InFrame {
            return Err(SlipError::InvalidState {
                op: "begin a frame",
                state: self.state,
            });
        }
        if self.config.double_ended {
            self.inner.write_all(&[END])?;
        }
        self.state = FrameState::InFrame;
        trace!(double_ended = self.config.double_ended, "slip frame opened");
        Ok(())
    }

    /// Escape and write a single byte into the open frame.
    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.write_escaped(&[byte])
    }

    /// Escape and write a run of bytes into the open frame.
    pub fn write_escaped(&mut self, buf: &[u8]) -> Result<()> {
        self.expect_in_frame("write data")?;

        let mut start = 0;
        for (i, &byte) in buf.iter().enumerate() {
            let escaped = match byte {
                END => &[ESC, ESC_END],
                ESC => &[ESC, ESC_ESC],
                _ => continue,
            };
            self.inner.write_all(&buf[start..i])?;
            self.inner.write_all(escaped)?;
            start = i + 1;
        }
        self.inner.write_all(&buf[start..])?;
        Ok(())
    }

    /// Close the open frame.
    pub fn end_frame(&mut self) -> Result<()> {
        self.expect_in_frame("end a frame")?;
        self.inner.write_all(&[END])?;
        self.state = FrameState::Idle;
        trace!("slip frame closed");
        Ok(())
    }

    /// Abandon an open frame without writing anything.
    ///
    /// Used after a sink error left a frame half written. The partial frame is
    /// lost; with double-ended framing the next frame's leading END lets the
    /// receiver resynchronise.
    pub fn reset(&mut self) {
        self.state = FrameState::Idle;
    }

    /// Flush the sink and hand it back. Fails while a frame is open.
    pub fn close(mut self) -> Result<W> {
        if self.state == FrameState::InFrame {
            return Err(SlipError::InvalidState {
                op: "close the stream",
                state: self.state,
            });
        }
        self.inner.flush()?;
        Ok(self.inner)
    }

    /// Current frame state.
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Returns true if a frame is open.
    pub fn is_in_frame(&self) -> bool {
        self.state == FrameState::InFrame
    }

    /// Current escaper configuration.
    pub fn config(&self) -> &SlipConfig {
        &self.config
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutably borrow the underlying sink.
    ///
    /// Bytes written here bypass escaping.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    fn expect_in_frame(&self, op: &'static str) -> Result<()> {
        match self.state {
            FrameState::InFrame => Ok(()),
            FrameState::Idle => Err(SlipError::InvalidState {
                op,
                state: self.state,
            }),
        }
    }
}

impl<W: Write> Write for SlipWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.write_escaped(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl<W> fmt::Debug for SlipWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlipWriter")
            .field("state", &self.state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;

    fn slip_encode(frames: &[&[u8]], double_ended: bool) -> Vec<u8> {
        let mut slip = SlipWriter::with_config(Vec::new(), SlipConfig { double_ended });
        for frame in frames {
            slip.begin_frame().unwrap();
            slip.write_escaped(frame).unwrap();
            slip.end_frame().unwrap();
        }
        slip.close().unwrap()
    }

    /// Reverse of the escaping above, for checking round trips.
    fn slip_decode(wire: &[u8]) -> Vec<Vec<u8>> {
        let mut frames = Vec::new();
        let mut current = Vec::new();
        let mut escaped = false;
        for &byte in wire {
            if escaped {
                current.push(match byte {
                    ESC_END => END,
                    ESC_ESC => ESC,
                    other => panic!("invalid escape sequence 0xDB 0x{other:02X}"),
                });
                escaped = false;
                continue;
            }
            match byte {
                END if current.is_empty() => {}
                END => frames.push(std::mem::take(&mut current)),
                ESC => escaped = true,
                other => current.push(other),
            }
        }
        assert!(!escaped, "dangling escape byte");
        frames
    }

    #[test]
    fn double_ended_single_byte() {
        assert_eq!(slip_encode(&[b"A"], true), vec![0xC0, b'A', 0xC0]);
    }

    #[test]
    fn double_ended_two_bytes() {
        assert_eq!(slip_encode(&[b"Hi"], true), vec![0xC0, b'H', b'i', 0xC0]);
    }

    #[test]
    fn double_ended_empty_frame() {
        assert_eq!(slip_encode(&[b""], true), vec![0xC0, 0xC0]);
    }

    #[test]
    fn single_ended_frames() {
        assert_eq!(slip_encode(&[b"A"], false), vec![b'A', 0xC0]);
        assert_eq!(slip_encode(&[b"Hi"], false), vec![b'H', b'i', 0xC0]);
        assert_eq!(slip_encode(&[b""], false), vec![0xC0]);
    }

    #[test]
    fn multiple_frames_are_concatenated() {
        assert_eq!(
            slip_encode(&[b"A", b"B"], true),
            vec![0xC0, b'A', 0xC0, 0xC0, b'B', 0xC0]
        );
        assert_eq!(
            slip_encode(&[b"Hi", b"Hi", b"Hi"], false),
            b"Hi\xC0Hi\xC0Hi\xC0".to_vec()
        );
    }

    #[test]
    fn escapes_special_bytes() {
        assert_eq!(
            slip_encode(&[&[0xC0, 0xDB]], true),
            vec![0xC0, 0xDB, 0xDC, 0xDB, 0xDD, 0xC0]
        );
    }

    #[test]
    fn escapes_between_plain_runs() {
        assert_eq!(
            slip_encode(&[&[0x01, 0xC0, 0x02, 0x03, 0xDB]], true),
            vec![0xC0, 0x01, 0xDB, 0xDC, 0x02, 0x03, 0xDB, 0xDD, 0xC0]
        );
    }

    #[test]
    fn write_byte_escapes() {
        let mut slip = SlipWriter::new(Vec::new());
        slip.begin_frame().unwrap();
        slip.write_byte(0xDB).unwrap();
        slip.write_byte(b'x').unwrap();
        slip.end_frame().unwrap();
        assert_eq!(slip.close().unwrap(), vec![0xC0, 0xDB, 0xDD, b'x', 0xC0]);
    }

    #[test]
    fn roundtrip_with_special_bytes() {
        let inputs: Vec<Vec<u8>> = vec![
            vec![0xC0],
            vec![0xDB],
            vec![0xDB, 0xDC],
            vec![0xC0, 0xC0, 0xDB, 0xDB],
            (0..=255u8).collect(),
            b"/plain/ascii".to_vec(),
        ];

        for input in inputs {
            let wire = slip_encode(&[&input], true);
            let markers = wire.iter().filter(|&&b| b == END).count();
            assert_eq!(markers, 2, "frame must have exactly two END markers");
            assert_eq!(wire.first(), Some(&END));
            assert_eq!(wire.last(), Some(&END));
            assert_eq!(slip_decode(&wire), vec![input]);
        }
    }

    #[test]
    fn write_before_begin_is_invalid() {
        let mut slip = SlipWriter::new(Vec::new());
        let err = slip.write_byte(1).unwrap_err();
        assert!(matches!(
            err,
            SlipError::InvalidState {
                state: FrameState::Idle,
                ..
            }
        ));
        assert!(slip.get_ref().is_empty());
    }

    #[test]
    fn double_begin_is_invalid() {
        let mut slip = SlipWriter::new(Vec::new());
        slip.begin_frame().unwrap();
        let err = slip.begin_frame().unwrap_err();
        assert!(matches!(
            err,
            SlipError::InvalidState {
                state: FrameState::InFrame,
                ..
            }
        ));
        assert_eq!(slip.get_ref(), &vec![0xC0]);
    }

    #[test]
    fn end_without_begin_is_invalid() {
        let mut slip = SlipWriter::new(Vec::new());
        assert!(matches!(
            slip.end_frame(),
            Err(SlipError::InvalidState { .. })
        ));
    }

    #[test]
    fn close_while_in_frame_is_invalid() {
        let mut slip = SlipWriter::new(Vec::new());
        slip.begin_frame().unwrap();
        assert!(matches!(
            slip.close(),
            Err(SlipError::InvalidState {
                state: FrameState::InFrame,
                ..
            })
        ));
    }

    #[test]
    fn single_ended_has_same_state_rules() {
        let mut slip = SlipWriter::single_ended(Vec::new());
        assert!(slip.write_byte(1).is_err());
        slip.begin_frame().unwrap();
        assert!(slip.begin_frame().is_err());
        assert!(slip.get_ref().is_empty());
    }

    #[test]
    fn io_write_outside_frame_errors() {
        let mut slip = SlipWriter::new(Vec::new());
        let err = slip.write_all(b"x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert!(err.to_string().contains("no frame is open"));
    }

    #[test]
    fn io_write_inside_frame_escapes() {
        let mut slip = SlipWriter::new(Vec::new());
        slip.begin_frame().unwrap();
        slip.write_all(&[0xC0, 0x01]).unwrap();
        slip.end_frame().unwrap();
        assert_eq!(slip.close().unwrap(), vec![0xC0, 0xDB, 0xDC, 0x01, 0xC0]);
    }

    #[test]
    fn state_tracking() {
        let mut slip = SlipWriter::new(Vec::new());
        assert_eq!(slip.state(), FrameState::Idle);
        slip.begin_frame().unwrap();
        assert!(slip.is_in_frame());
        slip.reset();
        assert_eq!(slip.state(), FrameState::Idle);
        slip.begin_frame().unwrap();
        assert_eq!(slip.get_ref(), &vec![0xC0, 0xC0]);
    }

    #[test]
    fn sink_errors_propagate() {
        let mut slip = SlipWriter::new(FailingWriter);
        let err = slip.begin_frame().unwrap_err();
        assert!(matches!(err, SlipError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
        assert_eq!(slip.state(), FrameState::Idle);
    }

    #[test]
    fn close_flushes_sink() {
        let sink = FlushTrackingWriter::default();
        let flag = Arc::clone(&sink.flushed);
        let slip = SlipWriter::new(sink);

        let inner = slip.close().unwrap();

        assert!(flag.load(Ordering::SeqCst));
        assert!(inner.data.is_empty());
    }

    #[test]
    fn invalid_state_converts_to_io_error() {
        let err = SlipError::InvalidState {
            op: "end a frame",
            state: FrameState::Idle,
        };
        let io: std::io::Error = err.into();
        assert_eq!(io.to_string(), "cannot end a frame while no frame is open");
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct FlushTrackingWriter {
        flushed: Arc<AtomicBool>,
        data: Vec<u8>,
    }

    impl Write for FlushTrackingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }
}
