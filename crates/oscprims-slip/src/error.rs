use crate::writer::FrameState;

/// Errors that can occur while writing SLIP frames.
#[derive(Debug, thiserror::Error)]
pub enum SlipError {
    /// A frame operation was called in a state that does not allow it.
    #[error("cannot {op} while {state}")]
    InvalidState {
        op: &'static str,
        state: FrameState,
    },

    /// An I/O error occurred on the underlying sink.
    #[error("SLIP I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SlipError> for std::io::Error {
    fn from(err: SlipError) -> Self {
        match err {
            SlipError::Io(io) => io,
            other => std::io::Error::other(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, SlipError>;
