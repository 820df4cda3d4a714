use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    result, io,
    time::Duration,
};

pub type Result<T> = result::Result<T, ErrorType>;

#[derive(Debug)]
/// Enum with all errors that can end a transfer.
///
/// Timeouts, simulated drops and rejected frames never show up here,
/// the engines recover from them on their own.
pub enum ErrorType {
    IOError(io::Error),
    /// the sender gave up on a chunk after this many attempts
    TransferAborted { attempts: u32 },
    InvalidFileName(String),
    /// the sentinel does not fit or the frame exceeds a datagram
    InvalidChunkSize(usize),
    InvalidProbability(f64),
    /// the acknowledgment timeout must not be zero
    InvalidAckTimeout(Duration),
}

impl Display for ErrorType {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ErrorType::IOError(e) => write!(
                fmt,
                "An IO Error occurred, Reason: {:?}.",
                e
            ),
            ErrorType::TransferAborted { attempts } => write!(
                fmt,
                "Transfer aborted, chunk not acknowledged after {} attempts",
                attempts
            ),
            ErrorType::InvalidFileName(name) => write!(
                fmt,
                "Invalid file name: {:?}",
                name
            ),
            ErrorType::InvalidChunkSize(size) => write!(
                fmt,
                "Chunk size {} is not supported",
                size
            ),
            ErrorType::InvalidProbability(p) => write!(
                fmt,
                "Probability {} is not in the range [0, 1]",
                p
            ),
            ErrorType::InvalidAckTimeout(timeout) => write!(
                fmt,
                "Acknowledgment timeout {:?} must be greater than zero",
                timeout
            ),
        }
    }
}

impl Error for ErrorType {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ErrorType::IOError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ErrorType {
    fn from(inner: io::Error) -> ErrorType {
        ErrorType::IOError(inner)
    }
}
