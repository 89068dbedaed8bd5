//! Runtime selection of a scalar variant.

use std::fmt;
use std::str::FromStr;

use crate::error::{DigestLenError, ParseAlgorithmError};
use crate::{murmur3_x64_128, murmur3_x86_32, murmur3_x86_128};

/// The three scalar MurmurHash3 variants.
///
/// Useful when the variant is chosen at runtime, for example from
/// configuration. The x86 and x64 128-bit variants are distinct functions and
/// do not produce the same digests.
///
/// # Examples
///
/// ```
/// use murmur3::Algorithm;
///
/// let algorithm: Algorithm = "x64_128".parse().unwrap();
/// let mut out = [0u8; 16];
/// let written = algorithm.digest_into(b"hello", 0, &mut out).unwrap();
/// assert_eq!(written, 16);
/// assert_eq!(out, murmur3::murmur3_x64_128(b"hello", 0));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Algorithm {
    /// 32-bit digest over 4-byte blocks.
    X86_32,
    /// 128-bit digest over four interleaved 32-bit states.
    X86_128,
    /// 128-bit digest over two interleaved 64-bit states.
    X64_128,
}

impl Algorithm {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 3] = [Self::X86_32, Self::X86_128, Self::X64_128];

    /// Width of the digest in bytes.
    #[must_use]
    pub const fn digest_len(self) -> usize {
        match self {
            Self::X86_32 => 4,
            Self::X86_128 | Self::X64_128 => 16,
        }
    }

    /// Canonical lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::X86_32 => "x86_32",
            Self::X86_128 => "x86_128",
            Self::X64_128 => "x64_128",
        }
    }

    /// Hashes `data` and writes the little-endian digest into `out`.
    ///
    /// `out` must be exactly [`digest_len`](Self::digest_len) bytes long.
    /// Returns the number of bytes written.
    pub fn digest_into(
        self,
        data: &[u8],
        seed: u32,
        out: &mut [u8],
    ) -> Result<usize, DigestLenError> {
        let expected = self.digest_len();
        if out.len() != expected {
            return Err(DigestLenError {
                expected,
                found: out.len(),
            });
        }

        match self {
            Self::X86_32 => out.copy_from_slice(&murmur3_x86_32(data, seed)),
            Self::X86_128 => out.copy_from_slice(&murmur3_x86_128(data, seed)),
            Self::X64_128 => out.copy_from_slice(&murmur3_x64_128(data, seed)),
        }
        Ok(expected)
    }

    /// Hashes `data` into a freshly allocated digest.
    #[must_use]
    pub fn digest(self, data: &[u8], seed: u32) -> Vec<u8> {
        match self {
            Self::X86_32 => murmur3_x86_32(data, seed).to_vec(),
            Self::X86_128 => murmur3_x86_128(data, seed).to_vec(),
            Self::X64_128 => murmur3_x64_128(data, seed).to_vec(),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == normalized)
            .ok_or_else(|| ParseAlgorithmError(s.to_owned()))
    }
}
