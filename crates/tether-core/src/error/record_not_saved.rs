use super::Error;

/// Error when an operation needs a persisted record but was given a new one.
///
/// This occurs when:
/// - A collection is mutated through an owner that has no primary key yet
/// - A new record is updated, reloaded or destroyed
#[derive(Debug)]
pub(super) struct RecordNotSaved {
    context: Box<str>,
}

impl std::error::Error for RecordNotSaved {}

impl core::fmt::Display for RecordNotSaved {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "record not saved: {}", self.context)
    }
}

impl Error {
    /// Creates a record not saved error.
    pub fn record_not_saved(context: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::RecordNotSaved(RecordNotSaved {
            context: context.into().into(),
        }))
    }

    /// Returns `true` if this error is a record not saved error.
    pub fn is_record_not_saved(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::RecordNotSaved(_))
    }
}
