mod adhoc;
mod invalid_schema;
mod persistence_failure;
mod record_not_found;
mod record_not_saved;
mod type_conversion;
mod unknown_association;

use adhoc::AdhocError;
use invalid_schema::InvalidSchema;
use persistence_failure::PersistenceFailure;
use record_not_found::RecordNotFoundError;
use record_not_saved::RecordNotSaved;
use type_conversion::TypeConversionError;
use unknown_association::UnknownAssociation;

use std::{fmt, sync::Arc};

/// Return early with an ad-hoc error built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Build an ad-hoc error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// Error returned by every fallible Tether operation.
///
/// An error is a single pointer. Context added with [`Error::context`] wraps
/// the original error, which stays reachable through [`Error::root`].
#[derive(Clone)]
pub struct Error {
    repr: Arc<Repr>,
}

#[derive(Debug)]
struct Repr {
    kind: ErrorKind,

    /// The error this one adds context to
    cause: Option<Error>,
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    InvalidSchema(InvalidSchema),
    PersistenceFailure(PersistenceFailure),
    RecordNotFound(RecordNotFoundError),
    RecordNotSaved(RecordNotSaved),
    TypeConversion(TypeConversionError),
    UnknownAssociation(UnknownAssociation),
}

/// Walks from an error to its root cause.
struct Chain<'a> {
    next: Option<&'a Error>,
}

/// Conversion into an [`Error`], used by [`Error::context`].
pub trait IntoError {
    fn into_error(self) -> Error;
}

impl Error {
    /// Wraps `self` in `consequent`, which describes what was being done
    /// when `self` happened.
    ///
    /// Displayed outermost first: `"loading posts: record not found: .."`.
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.wrap(consequent.into_error())
    }

    #[cold]
    fn wrap(self, mut outer: Error) -> Error {
        if let Some(repr) = Arc::get_mut(&mut outer.repr).filter(|repr| repr.cause.is_none()) {
            repr.cause = Some(self);
            return outer;
        }

        // `outer` is shared or has its own cause; keep its message only.
        let mut flat = Error::from_args(format_args!("{outer}"));
        if let Some(repr) = Arc::get_mut(&mut flat.repr) {
            repr.cause = Some(self);
        }
        flat
    }

    /// The innermost error, i.e. the one no context was added to.
    pub fn root(&self) -> &Error {
        self.chain().last().unwrap_or(self)
    }

    /// Returns `true` if this error or any error beneath it satisfies `f`.
    pub fn any(&self, f: impl Fn(&Error) -> bool) -> bool {
        self.chain().any(|err| f(err))
    }

    fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    fn kind(&self) -> &ErrorKind {
        &self.repr.kind
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Error;

    fn next(&mut self) -> Option<&'a Error> {
        let err = self.next?;
        self.next = err.repr.cause.as_ref();
        Some(err)
    }
}

impl ErrorKind {
    fn as_std(&self) -> &(dyn std::error::Error + 'static) {
        match self {
            Self::Anyhow(err) => &**err,
            Self::Adhoc(err) => err,
            Self::InvalidSchema(err) => err,
            Self::PersistenceFailure(err) => err,
            Self::RecordNotFound(err) => err,
            Self::RecordNotSaved(err) => err,
            Self::TypeConversion(err) => err,
            Self::UnknownAssociation(err) => err,
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            repr: Arc::new(Repr { kind, cause: None }),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl IntoError for Error {
    fn into_error(self) -> Error {
        self
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Anyhow(_) | ErrorKind::PersistenceFailure(_) => Some(self.kind().as_std()),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, err) in self.chain().enumerate() {
            if depth > 0 {
                f.write_str(": ")?;
            }
            fmt::Display::fmt(err.kind().as_std(), f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Error {
    /// `{:?}` prints the message; `{:#?}` lists every kind in the chain.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.debug_list()
                .entries(self.chain().map(|err| err.kind()))
                .finish()
        } else {
            fmt::Display::fmt(self, f)
        }
    }
}
