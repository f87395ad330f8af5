// Copyright (c) 2021, KTH Royal Institute of Technology.
// SPDX-License-Identifier: AGPL-3.0-only

/// A helper macro to indicate a reportable bug
#[macro_export]
macro_rules! reportable_error {
    ( $($arg:tt)* ) => ({
        $crate::error::WindowResult::Err($crate::error::Error::ReportableBug { msg: format!($($arg)*) })
    })
}

/// A helper macro for failing inside user-defined window functions
#[macro_export]
macro_rules! udf_error {
    ( $($arg:tt)* ) => ({
        $crate::error::WindowResult::Err($crate::error::Error::Udf { msg: format!($($arg)*) })
    })
}

use snafu::Snafu;
use std::io;

/// Top level Result type in timewin
pub type WindowResult<T> = std::result::Result<T, Error>;

/// Top level Error type
///
/// None of these are retried. Errors raised by user-supplied window
/// functions travel up to whoever dispatched the record or timer.
#[derive(Debug, Snafu)]
pub enum Error {
    /// The operator has been used or configured in an unsupported way.
    #[snafu(display("Unsupported operation {}", msg))]
    Unsupported { msg: String },
    /// An unexpected bug has happened.
    #[snafu(display("Unexpected bug {}", msg))]
    ReportableBug { msg: String },
    /// A read or write error has happened when interacting with the file system.
    #[snafu(display("An IO error occured {}", error))]
    Io { error: io::Error },
    /// Configuration could not be loaded or resolved.
    #[snafu(display("Failed to load configuration: {}", msg))]
    Config { msg: String },
    /// A window result could not be turned into bytes.
    #[snafu(display("Failed to serialise window result: {}", msg))]
    Serialization { msg: String },
    /// A user-defined reduction, callback or serializer failed.
    #[snafu(display("Window function failed: {}", msg))]
    Udf { msg: String },
}

impl From<io::Error> for Error {
    #[inline]
    fn from(io_error: io::Error) -> Self {
        Error::Io { error: io_error }
    }
}

impl From<prost::EncodeError> for Error {
    fn from(error: prost::EncodeError) -> Self {
        Error::Serialization {
            msg: error.to_string(),
        }
    }
}

impl From<Error> for io::Error {
    fn from(error: Error) -> io::Error {
        use std::io::ErrorKind;
        match error {
            Error::Io { error } => error,
            Error::Unsupported { ref msg } => io::Error::new(
                ErrorKind::InvalidInput,
                format!("operation not supported: {:?}", msg),
            ),
            Error::ReportableBug { ref msg } => {
                io::Error::new(ErrorKind::Other, format!("unexpected bug! {:?}", msg))
            }
            Error::Config { ref msg } => io::Error::new(
                ErrorKind::InvalidInput,
                format!("bad configuration: {:?}", msg),
            ),
            Error::Serialization { msg } | Error::Udf { msg } => {
                io::Error::new(ErrorKind::InvalidData, msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing_udf() -> WindowResult<u64> {
        crate::udf_error!("bad record {}", 7)
    }

    #[test]
    fn macros_build_the_right_variant() {
        match failing_udf() {
            Err(Error::Udf { msg }) => assert_eq!(msg, "bad record 7"),
            other => panic!("unexpected {:?}", other),
        }
        let bug: WindowResult<()> = crate::reportable_error!("lost {}", "timer");
        assert!(matches!(bug, Err(Error::ReportableBug { .. })));
    }

    #[test]
    fn io_conversion_keeps_kind() {
        let err: io::Error = Error::Unsupported {
            msg: "zero slide".into(),
        }
        .into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

        let err: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        let back: io::Error = err.into();
        assert_eq!(back.kind(), io::ErrorKind::NotFound);
    }
}
