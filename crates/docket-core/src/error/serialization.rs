use super::Error;

/// Error when encoding or decoding a JSON document fails.
#[derive(Debug)]
pub(super) struct SerializationError {
    pub(super) inner: serde_json::Error,
}

impl std::error::Error for SerializationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.inner)
    }
}

impl core::fmt::Display for SerializationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "serialization failed: {}", self.inner)
    }
}

impl From<serde_json::Error> for Error {
    fn from(inner: serde_json::Error) -> Error {
        Error::from(super::ErrorKind::Serialization(SerializationError { inner }))
    }
}

impl Error {
    /// Returns `true` if the root cause of this error is a JSON failure.
    pub fn is_serialization(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::Serialization(_))
    }
}
