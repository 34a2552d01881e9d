use std::fmt;
use std::io;

use oscprims_codec::EncodeError;
use oscprims_slip::SlipError;

// Exit code constants aligned with rsfulmen/DDR-0002 semantics.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound | io::ErrorKind::BrokenPipe => FAILURE,
        io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData => DATA_INVALID,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn encode_error(context: &str, err: EncodeError) -> CliError {
    match err {
        EncodeError::Io(source) => io_error(context, source),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn slip_error(context: &str, err: SlipError) -> CliError {
    match err {
        SlipError::Io(source) => io_error(context, source),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use oscprims_slip::FrameState;

    use super::*;

    #[test]
    fn io_kinds_map_to_exit_codes() {
        let denied = io_error("open", io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(denied.code, PERMISSION_DENIED);
        assert!(denied.message.starts_with("open: "));

        let oversized = io_error("encode", io::Error::from(io::ErrorKind::InvalidInput));
        assert_eq!(oversized.code, DATA_INVALID);

        let missing = io_error("read", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(missing.code, FAILURE);
    }

    #[test]
    fn state_errors_are_internal() {
        let err = slip_error(
            "frame",
            SlipError::InvalidState {
                op: "end a frame",
                state: FrameState::Idle,
            },
        );
        assert_eq!(err.code, INTERNAL);

        let err = encode_error("encode", EncodeError::InvalidState("stuck".into()));
        assert_eq!(err.code, INTERNAL);
    }
}
