#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod algorithm;
pub mod batch;
pub mod dispatcher;
mod error;
pub mod primitives;
pub mod scalar;

#[cfg(feature = "parallel")]
#[cfg_attr(docsrs, doc(cfg(feature = "parallel")))]
mod parallel;

pub use algorithm::Algorithm;
pub use dispatcher::{BACKEND_ENV, Backend, Dispatcher};
pub use error::{BatchError, DigestLenError, ParseAlgorithmError, ParseBackendError};
#[cfg(feature = "parallel")]
#[cfg_attr(docsrs, doc(cfg(feature = "parallel")))]
pub use parallel::{ParallelMurmur3, par_digest_batch};

/// 32-bit digest (4 bytes, little-endian).
pub type Digest32 = [u8; 4];

/// 128-bit digest (16 bytes, little-endian state words in order).
pub type Digest128 = [u8; 16];

/// Computes the x86_32 digest of `data`.
///
/// # Examples
///
/// ```
/// assert_eq!(murmur3::murmur3_x86_32(b"", 0), [0, 0, 0, 0]);
/// assert_eq!(murmur3::murmur3_x86_32(b"Hello, world!", 1234), 0xfaf6cdb3u32.to_le_bytes());
/// ```
#[must_use]
pub fn murmur3_x86_32(data: &[u8], seed: u32) -> Digest32 {
    scalar::x86_32(data, seed).to_le_bytes()
}

/// Computes the x86_128 digest of `data`.
#[must_use]
pub fn murmur3_x86_128(data: &[u8], seed: u32) -> Digest128 {
    let mut out = [0u8; 16];
    for (chunk, h) in out.chunks_exact_mut(4).zip(scalar::x86_128(data, seed)) {
        chunk.copy_from_slice(&h.to_le_bytes());
    }
    out
}

/// Computes the x64_128 digest of `data`.
///
/// This is the function the batch path reproduces for every key.
#[must_use]
pub fn murmur3_x64_128(data: &[u8], seed: u32) -> Digest128 {
    digest128_from_words(scalar::x64_128(data, seed))
}

/// Serialises `[h1, h2]` as a 16-byte little-endian digest.
pub(crate) fn digest128_from_words(words: [u64; 2]) -> Digest128 {
    let mut out = [0u8; 16];
    out[..8].copy_from_slice(&words[0].to_le_bytes());
    out[8..].copy_from_slice(&words[1].to_le_bytes());
    out
}

/// Computes x64_128 digests for many keys, in input order.
///
/// Uses the 16-way batch kernel for groups of equal-length keys when the
/// process-wide backend supports it.
pub fn digest_batch<T: AsRef<[u8]>>(keys: &[T], seed: u32) -> Vec<Digest128> {
    dispatcher::global().digest_batch(keys, seed)
}

/// Get the currently active batch backend.
///
/// Useful for logging or diagnostics.
pub fn active_backend() -> Backend {
    dispatcher::global().backend()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digests_are_little_endian_state_words() {
        let words = scalar::x86_128(b"hello", 0);
        let digest = murmur3_x86_128(b"hello", 0);
        assert_eq!(&digest[4..8], &words[1].to_le_bytes());

        let [h1, h2] = scalar::x64_128(b"hello", 0);
        let digest = murmur3_x64_128(b"hello", 0);
        assert_eq!(digest[..8], h1.to_le_bytes());
        assert_eq!(digest[8..], h2.to_le_bytes());
    }

    #[test]
    fn empty_key_with_zero_seed_is_all_zero() {
        assert_eq!(murmur3_x86_32(b"", 0), [0; 4]);
        assert_eq!(murmur3_x86_128(b"", 0), [0; 16]);
        assert_eq!(murmur3_x64_128(b"", 0), [0; 16]);
    }

    #[test]
    fn batch_matches_single_calls() {
        let keys: Vec<String> = (0..40).map(|i| format!("key-{}", i % 13)).collect();
        let digests = digest_batch(&keys, 17);
        for (key, digest) in keys.iter().zip(digests) {
            assert_eq!(digest, murmur3_x64_128(key.as_bytes(), 17));
        }
    }

    #[test]
    fn active_backend_matches_global() {
        assert_eq!(active_backend(), dispatcher::global().backend());
    }
}
