use super::Error;

/// Error when a query destination cannot receive the result rows.
///
/// Raised when the row width does not match what the destination expects,
/// for example a two-column scan into a plain `Vec<i64>`.
#[derive(Debug)]
pub(super) struct InvalidTargetError {
    message: Box<str>,
}

impl std::error::Error for InvalidTargetError {}

impl core::fmt::Display for InvalidTargetError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid target: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid target error.
    pub fn invalid_target(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidTarget(InvalidTargetError {
            message: message.into().into_boxed_str(),
        }))
    }

    /// Returns `true` if the root cause of this error is an invalid target.
    pub fn is_invalid_target(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::InvalidTarget(_))
    }
}
