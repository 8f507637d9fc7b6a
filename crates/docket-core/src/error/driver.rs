use super::Error;

/// Error from a database driver.
#[derive(Debug)]
pub(super) struct DriverError {
    pub(super) inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for DriverError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.inner, f)?;
        let mut source = self.inner.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

impl Error {
    /// Wraps an error raised by the underlying database client.
    ///
    /// Drivers convert every client failure through this constructor so that
    /// callers can recover the concrete error with [`Error::downcast_driver`].
    pub fn driver(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::Driver(DriverError {
            inner: Box::new(err),
        }))
    }

    /// Returns `true` if the root cause of this error is a driver error.
    pub fn is_driver(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::Driver(_))
    }

    /// Returns the driver's own error value if the root cause is a driver
    /// error of type `E`.
    pub fn downcast_driver<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self.root().kind() {
            super::ErrorKind::Driver(err) => err.inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}
