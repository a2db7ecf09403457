use super::Error;

/// Error when an association accessor names an association the owner model
/// never declared.
#[derive(Debug)]
pub(super) struct UnknownAssociation {
    owner: Box<str>,
    name: Box<str>,
}

impl std::error::Error for UnknownAssociation {}

impl core::fmt::Display for UnknownAssociation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unknown association: `{}` has no association named `{}`",
            self.owner, self.name
        )
    }
}

impl Error {
    /// Creates an unknown association error.
    pub fn unknown_association(owner: impl Into<String>, name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownAssociation(UnknownAssociation {
            owner: owner.into().into(),
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown association error.
    pub fn is_unknown_association(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownAssociation(_))
    }
}
