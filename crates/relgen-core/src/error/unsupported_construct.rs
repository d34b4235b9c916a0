use super::{Error, ErrorKind};
use crate::graph::Location;

/// Error when a declaration has a shape the generator cannot map.
///
/// This occurs when:
/// - A container holds another container
/// - A container is hidden behind a wrapper type
/// - A member points to a class that is not a persistent object
/// - An object has no id member, or more than one
///
/// The diagnostic carries the location of the offending declaration so the
/// user can fix the input and re-run generation.
#[derive(Debug)]
pub(super) struct UnsupportedConstruct {
    location: Option<Location>,
    message: Box<str>,
}

impl std::error::Error for UnsupportedConstruct {}

impl core::fmt::Display for UnsupportedConstruct {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{location}: error: {}", self.message),
            None => write!(f, "unsupported construct: {}", self.message),
        }
    }
}

impl Error {
    /// Creates an unsupported construct error tagged with a source location.
    pub fn unsupported_construct(location: &Location, message: impl Into<String>) -> Error {
        Error::from(ErrorKind::UnsupportedConstruct(UnsupportedConstruct {
            location: Some(location.clone()),
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an unsupported construct error.
    pub fn is_unsupported_construct(&self) -> bool {
        matches!(self.kind(), ErrorKind::UnsupportedConstruct(_))
    }
}
