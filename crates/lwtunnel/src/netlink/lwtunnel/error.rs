//! Errors from parsing `encap` arguments.

use super::EncapType;
use crate::netlink::error::Error;

/// Error returned by [`parse_encap`](super::parse_encap).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A required argument was missing.
    #[error("missing argument after encap")]
    EndOfTokens,

    /// The type name is not in the registry.
    #[error("invalid encap type: {0}")]
    InvalidEncapType(String),

    /// The address codec rejected a payload argument.
    #[error("invalid encap address: {0}")]
    InvalidAddress(String),

    /// A type reached payload encoding without an encoder.
    #[error("unsupported encap type: {0} ({tag})", tag = .0.tag())]
    UnsupportedEncapType(EncapType),

    /// The attribute buffer refused a write.
    #[error(transparent)]
    Buffer(#[from] Error),
}

impl ParseError {
    /// Check if the error was caused by the arguments given.
    pub fn is_bad_input(&self) -> bool {
        matches!(
            self,
            Self::EndOfTokens | Self::InvalidEncapType(_) | Self::InvalidAddress(_)
        )
    }

    /// Check if the error points at a missing encoder or buffer failure.
    pub fn is_internal(&self) -> bool {
        !self.is_bad_input()
    }

    /// Check if the buffer ran out of room.
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, Self::Buffer(e) if e.is_capacity_exceeded())
    }
}
