use crate::Uuid;
use core::fmt;

/// Errors that can occur while deserializing a [`Uuid`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SerdeError {
    /// The decoded value does not carry the version 4 and RFC 4122 variant
    /// bits.
    NotVersion4 {
        /// The decoded ID value, which failed validation.
        id: Uuid,
    },
}

impl fmt::Display for SerdeError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NotVersion4 { id } => {
                write!(fmt, "{:#034x} is not a version 4 UUID", id.to_u128())
            }
        }
    }
}

impl core::error::Error for SerdeError {}
