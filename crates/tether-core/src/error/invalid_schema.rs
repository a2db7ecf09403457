use super::{Error, ErrorKind};
use std::fmt;

/// A declaration or storage layout that cannot be used as written.
///
/// Raised while the registry is populated (duplicate association names,
/// unregistered targets), when a slot is bound to an association of the wrong
/// shape, and by drivers that meet a table or column they were never told
/// about.
#[derive(Debug)]
pub(super) struct InvalidSchema(String);

impl std::error::Error for InvalidSchema {}

impl fmt::Display for InvalidSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid schema: ")?;
        f.write_str(&self.0)
    }
}

impl Error {
    pub fn invalid_schema(message: impl Into<String>) -> Error {
        ErrorKind::InvalidSchema(InvalidSchema(message.into())).into()
    }

    pub fn is_invalid_schema(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidSchema(..))
    }
}
