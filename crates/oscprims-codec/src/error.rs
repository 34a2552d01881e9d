use oscprims_slip::SlipError;

/// Errors that can occur while writing OSC packets.
///
/// Encoding a well-formed value never fails on its own; everything here comes
/// from framing misuse or from the sink.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// SLIP framing calls were made out of order.
    #[error("invalid framing state: {0}")]
    InvalidState(String),

    /// An I/O error occurred on the underlying sink.
    #[error("encode I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SlipError> for EncodeError {
    fn from(err: SlipError) -> Self {
        match err {
            SlipError::Io(io) => EncodeError::Io(io),
            other @ SlipError::InvalidState { .. } => EncodeError::InvalidState(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, EncodeError>;
