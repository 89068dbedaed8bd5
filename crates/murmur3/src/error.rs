//! Error types.

use thiserror::Error;

/// Errors raised when a 16-way batch input violates the structure-of-arrays
/// contract.
///
/// The scalar digests never fail; only the batch entry points validate their
/// inputs, so that a malformed layout is reported instead of silently hashing
/// the wrong bytes.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum BatchError {
    /// A key's length differs from the length of the first key in the batch.
    #[error("batch key {lane} is {found} bytes long, expected {expected}")]
    LengthMismatch {
        /// Position of the offending key in the batch.
        lane: usize,
        /// Length shared by the preceding keys.
        expected: usize,
        /// Length of the offending key.
        found: usize,
    },
    /// The pending length does not signal a partial block exactly when the
    /// nominal length has trailing bytes.
    #[error("pending length {pending} is inconsistent with a {len}-byte key")]
    PendingLength {
        /// Pending length supplied by the caller.
        pending: usize,
        /// Nominal key length supplied by the caller.
        len: usize,
    },
    /// A lane-group buffer holds fewer word slots than the length requires.
    #[error("lane group {group} holds {found} word slots, {required} required")]
    ShortBuffer {
        /// Index of the lane group (0 for `vkey1`, 1 for `vkey2`).
        group: usize,
        /// Number of word slots the length requires.
        required: usize,
        /// Number of word slots supplied.
        found: usize,
    },
    /// Bytes beyond the key length inside the partial block are not zero.
    #[error("lane {lane} of group {group} has non-zero bytes past the key length")]
    NonZeroPadding {
        /// Index of the lane group.
        group: usize,
        /// Lane within the group.
        lane: usize,
    },
}

/// Error returned when a caller-supplied digest buffer has the wrong size.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("digest buffer holds {found} bytes, {expected} required")]
pub struct DigestLenError {
    /// Digest width of the selected algorithm.
    pub expected: usize,
    /// Length of the supplied buffer.
    pub found: usize,
}

/// Error returned when an algorithm name is not recognised.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unknown MurmurHash3 variant {0:?}; expected x86_32, x86_128 or x64_128")]
pub struct ParseAlgorithmError(pub(crate) String);

/// Error returned when a batch backend name is not recognised.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unknown batch backend {0:?}; expected auto, avx512 or scalar")]
pub struct ParseBackendError(pub(crate) String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_field_values() {
        let err = BatchError::LengthMismatch {
            lane: 3,
            expected: 32,
            found: 31,
        };
        assert_eq!(err.to_string(), "batch key 3 is 31 bytes long, expected 32");

        let err = DigestLenError {
            expected: 16,
            found: 4,
        };
        assert_eq!(err.to_string(), "digest buffer holds 4 bytes, 16 required");
    }

    #[test]
    fn parse_errors_quote_the_input() {
        let err = ParseBackendError("sse9".to_owned());
        assert!(err.to_string().contains("\"sse9\""));
    }
}
