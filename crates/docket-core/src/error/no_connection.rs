use super::Error;

#[derive(Debug)]
pub(super) struct NoConnectionError;

impl std::error::Error for NoConnectionError {}

impl core::fmt::Display for NoConnectionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("no connection")
    }
}

impl Error {
    /// Creates an error for a model that has no driver attached, or a driver
    /// that has already been closed.
    pub fn no_connection() -> Error {
        Error::from(super::ErrorKind::NoConnection(NoConnectionError))
    }

    /// Returns `true` if the root cause of this error is a missing connection.
    pub fn is_no_connection(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::NoConnection(_))
    }
}
