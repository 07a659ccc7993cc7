//! Error types raised by the serializer and deserializer.
//!
//! Every failure carries an [`ErrorKind`] plus the [`JsonPath`] of the node
//! being processed when it was raised. Parse failures additionally carry the
//! line and column reported by the tokenizer.

// -----------------------------------------------------------------------------
// Modules

mod path;

// -----------------------------------------------------------------------------
// Exports

pub use path::{JsonPath, PathSegment};

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::fmt;

use thiserror::Error;

/// The reason a serialize or deserialize call failed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The type has a shape no contract can describe.
    #[error("cannot derive a contract for `{type_path}`: {reason}")]
    Contract {
        type_path: &'static str,
        reason: String,
    },
    /// No constructor is usable for the type under the active settings.
    #[error("unable to find a constructor to use for `{type_path}`: {reason}")]
    ConstructorResolution {
        type_path: &'static str,
        reason: String,
    },
    #[error("required member `{member}` was not found on `{type_path}`")]
    RequiredMemberMissing {
        type_path: &'static str,
        member: String,
    },
    #[error("required member `{member}` of `{type_path}` must not be null")]
    RequiredMemberNull {
        type_path: &'static str,
        member: String,
    },
    /// A `$type` name the binder could not locate or that does not fit the slot.
    #[error("could not resolve type `{name}`: {reason}")]
    TypeResolution { name: String, reason: String },
    #[error("self referencing loop detected for type `{type_path}`")]
    ReferenceLoop { type_path: &'static str },
    #[error("unresolved reference to id `{id}`")]
    DanglingReference { id: String },
    /// Identity cannot be preserved for this value or container.
    #[error("cannot preserve reference: {reason}")]
    UnsupportedReference { reason: String },
    #[error("reference id `{id}` has already been registered")]
    DuplicateReference { id: String },
    #[error("maximum nesting depth of {max} exceeded")]
    NestingDepthExceeded { max: usize },
    #[error("cannot access member `{member}` of `{type_path}`: {reason}")]
    MemberAccess {
        type_path: &'static str,
        member: String,
        reason: String,
    },
    #[error("could not find member `{member}` on `{type_path}`")]
    UnknownMember {
        type_path: &'static str,
        member: String,
    },
    /// The node does not have the shape or value range the target needs.
    #[error("invalid value for `{type_path}`: {reason}")]
    InvalidValue {
        type_path: &'static str,
        reason: String,
    },
    #[error("{0}")]
    Syntax(#[source] serde_json::Error),
    #[error("{0}")]
    Io(#[source] std::io::Error),
    /// Raised by user supplied processors.
    #[error("{0}")]
    Custom(String),
}

/// Line and column of a parse failure, both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug)]
struct ErrorImpl {
    kind: ErrorKind,
    path: JsonPath,
    location: Option<Location>,
}

/// The error type of this crate.
///
/// Boxed so `Result<T, Error>` stays one pointer wide on the error side.
pub struct Error {
    inner: Box<ErrorImpl>,
}

/// Alias of `Result` whose error defaults to [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

impl Error {
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            inner: Box::new(ErrorImpl {
                kind,
                path: JsonPath::new(),
                location: None,
            }),
        }
    }

    /// Creates an [`ErrorKind::Custom`] error, for processors.
    pub fn custom(message: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Custom(message.to_string()))
    }

    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.inner.kind
    }

    #[inline]
    pub fn into_kind(self) -> ErrorKind {
        self.inner.kind
    }

    /// Path of the node that failed. Empty for the root.
    #[inline]
    pub fn path(&self) -> &JsonPath {
        &self.inner.path
    }

    #[inline]
    pub fn location(&self) -> Option<Location> {
        self.inner.location
    }

    /// Attaches `path` unless a more precise one is already recorded.
    pub(crate) fn with_path(mut self, path: &JsonPath) -> Self {
        if self.inner.path.len() < path.len() {
            self.inner.path = path.clone();
        }
        self
    }
}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        let location = (error.line() > 0).then(|| Location {
            line: error.line(),
            column: error.column(),
        });
        let mut this = Self::new(if error.is_io() {
            ErrorKind::Io(std::io::Error::from(error))
        } else {
            ErrorKind::Syntax(error)
        });
        this.inner.location = location;
        this
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner.kind, f)?;
        if !self.inner.path.is_empty() {
            write!(f, " Path '{}'", self.inner.path)?;
        }
        if let Some(location) = self.inner.location
            && !matches!(self.inner.kind, ErrorKind::Syntax(_))
        {
            write!(f, ", line {}, position {}", location.line, location.column)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.inner.kind)
            .field("path", &self.inner.path.to_string())
            .field("location", &self.inner.location)
            .finish()
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        core::error::Error::source(&self.inner.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind, JsonPath};

    #[test]
    fn display_appends_path() {
        let mut path = JsonPath::new();
        path.push_property("children");
        path.push_index(0);

        let error = Error::new(ErrorKind::ReferenceLoop {
            type_path: "demo::Node",
        })
        .with_path(&path);

        assert_eq!(
            error.to_string(),
            "self referencing loop detected for type `demo::Node` Path 'children[0]'"
        );
    }

    #[test]
    fn innermost_path_is_kept() {
        let mut outer = JsonPath::new();
        outer.push_property("a");
        let mut inner = outer.clone();
        inner.push_property("b");

        let error = Error::custom("boom").with_path(&inner).with_path(&outer);
        assert_eq!(error.path().to_string(), "a.b");
    }

    #[test]
    fn parse_errors_carry_location() {
        let parse = serde_json::from_str::<serde_json::Value>("{\n  \"a\": ]").unwrap_err();
        let error = Error::from(parse);
        let location = error.location().unwrap();
        assert_eq!(location.line, 2);
        assert!(matches!(error.kind(), ErrorKind::Syntax(_)));
    }
}
