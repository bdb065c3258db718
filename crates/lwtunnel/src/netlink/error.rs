//! Error types for attribute buffer operations.

/// Result type for attribute buffer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or decoding attribute buffers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A write would grow the buffer past its configured bound.
    ///
    /// Once returned, the builder that produced it refuses every further
    /// write and its contents must be discarded.
    #[error("message exceeded bound of {max} bytes (needed {needed})")]
    CapacityExceeded {
        /// Buffer length the write would have produced.
        needed: usize,
        /// Configured maximum length.
        max: usize,
    },

    /// A record is longer than its 16-bit length field can express.
    #[error("attribute too large: {len} bytes")]
    AttributeTooLarge {
        /// Length that did not fit.
        len: usize,
    },

    /// A nest was closed while a nest opened after it was still open.
    #[error("nested attribute at offset {offset} closed out of order")]
    NestMismatch {
        /// Header offset carried by the offending token.
        offset: usize,
    },

    /// A buffer was finished while a nest was still open.
    #[error("nested attribute at offset {offset} was never closed")]
    UnterminatedNest {
        /// Header offset of the innermost open nest.
        offset: usize,
    },

    /// Data was shorter than the structure being read.
    #[error("message truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Expected length.
        expected: usize,
        /// Actual bytes available.
        actual: usize,
    },

    /// Invalid attribute format.
    #[error("invalid attribute: {0}")]
    InvalidAttribute(String),
}

impl Error {
    /// Check if this error came from the capacity bound.
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::CapacityExceeded {
            needed: 1028,
            max: 1024,
        };
        assert_eq!(
            err.to_string(),
            "message exceeded bound of 1024 bytes (needed 1028)"
        );
        assert!(err.is_capacity_exceeded());

        let err = Error::Truncated {
            expected: 4,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "message truncated: expected 4 bytes, got 2"
        );
        assert!(!err.is_capacity_exceeded());
    }

    #[test]
    fn test_nest_mismatch_message() {
        let err = Error::NestMismatch { offset: 20 };
        assert!(err.to_string().contains("offset 20"));
    }
}
