//! Error types produced while writing messages.

use std::io;

use crate::encoding::multipart::{BoundaryState, MultipartKind};

/// Result type alias for message writing.
pub type Result<T> = std::result::Result<T, Error>;

/// Error is returned by every fallible step of writing a message.
///
/// All of them are fatal for the message being written. Nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Writing to the output sink failed.
    #[error("failed to write message: {0}")]
    Write(#[source] io::Error),

    /// Reading the body source of a part failed.
    #[error("failed to read part body: {0}")]
    ReadSource(#[source] io::Error),

    /// Secure random source could not produce a boundary token.
    #[error("secure random source unavailable: {0}")]
    Entropy(#[from] rand::Error),

    /// Boundary was used out of order.
    #[error("can't {operation} multipart/{kind} boundary in state {state:?}")]
    Boundary {
        kind: MultipartKind,
        state: BoundaryState,
        operation: &'static str,
    },

    /// Closing the output sink failed.
    #[error("failed to close output: {0}")]
    Close(#[source] io::Error),
}

impl Error {
    /// write classifies failed write to the output.
    ///
    /// Boundary misuse detected inside nested `Write` impls travels as `io::Error`,
    /// it's recovered here so that caller sees `Error::Boundary`.
    pub fn write(e: io::Error) -> Self {
        match e.get_ref().and_then(|inner| inner.downcast_ref::<Error>()) {
            Some(Error::Boundary { kind, state, operation }) => Error::Boundary {
                kind: *kind,
                state: *state,
                operation: *operation,
            },
            _ => Error::Write(e),
        }
    }
}

#[cfg(test)]
mod test {
    use std::io::ErrorKind;

    use super::*;

    #[test]
    fn test_write_keeps_plain_io_errors() {
        let e = Error::write(io::Error::new(ErrorKind::BrokenPipe, "closed"));
        assert!(matches!(e, Error::Write(ref inner) if inner.kind() == ErrorKind::BrokenPipe));
    }

    #[test]
    fn test_write_recovers_boundary_misuse() {
        let misuse = Error::Boundary {
            kind: MultipartKind::Related,
            state: BoundaryState::Ended,
            operation: "mark",
        };
        let e = Error::write(io::Error::new(ErrorKind::Other, misuse));
        assert_eq!(e.to_string(), "can't mark multipart/related boundary in state Ended");
    }
}
