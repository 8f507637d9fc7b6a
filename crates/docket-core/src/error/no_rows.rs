use super::Error;

/// Error when a single-row query returns nothing.
#[derive(Debug)]
pub(super) struct NoRowsError;

impl std::error::Error for NoRowsError {}

impl core::fmt::Display for NoRowsError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("no rows in result set")
    }
}

impl Error {
    /// Creates the error returned when a single-row query finds no row.
    pub fn no_rows() -> Error {
        Error::from(super::ErrorKind::NoRows(NoRowsError))
    }

    /// Returns `true` if the root cause of this error is an empty result.
    pub fn is_no_rows(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::NoRows(_))
    }
}
