use super::Error;

/// Error when a driver operation fails.
///
/// This wraps errors raised by the storage backend:
/// - Constraint violations (foreign keys, uniqueness)
/// - Connection and I/O errors
/// - Statement execution errors
#[derive(Debug)]
pub(super) struct PersistenceFailure {
    pub(super) inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for PersistenceFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for PersistenceFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("persistence failure: ")?;
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
    /// Creates an error from a driver failure.
    ///
    /// This is the way driver-specific errors (rusqlite errors, constraint
    /// violations reported by the in-memory driver, ...) become tether errors.
    pub fn persistence_failure(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::PersistenceFailure(PersistenceFailure {
            inner: Box::new(err),
        }))
    }

    /// Returns `true` if this error is a persistence failure.
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::PersistenceFailure(_))
    }
}
