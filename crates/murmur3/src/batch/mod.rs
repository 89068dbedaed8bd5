//! 16-way batched MurmurHash3 x64_128.
//!
//! The batch path hashes sixteen equal-length keys per call. Keys are held in
//! a structure-of-arrays layout: two lane groups of eight keys, where each
//! [`LaneWord`] carries the same 64-bit word position of all eight keys in a
//! group. Word slot `2 * i` holds the first word of block `i`, slot `2 * i + 1`
//! the second. With this layout one 512-bit register load fetches one word of
//! eight keys and the scalar recurrence runs unchanged in every lane.
//!
//! # Length contract
//!
//! - `len` is the true length of every key; `len / 16` full blocks are mixed.
//! - `pend_len > len` signals one trailing partial block and must hold exactly
//!   when `len % 16 != 0`. [`SoaBatch`] always passes `len` rounded up to a
//!   multiple of 16.
//! - Bytes past `len` inside that partial block must be zero. Zero words mix
//!   to zero, so a zero-padded block folds exactly like the scalar tail
//!   cascade, whichever of its two words the tail reaches.
//!
//! Inputs violating the contract are rejected with [`BatchError`] before any
//! backend runs, so every backend sees the same well-formed input and returns
//! the same bytes.

#[cfg(all(target_arch = "x86_64", feature = "simd-batch"))]
pub(crate) mod avx512;
pub(crate) mod portable;
pub(crate) mod schedule;
mod soa;

pub use soa::SoaBatch;

use crate::Digest128;
use crate::dispatcher;
use crate::error::BatchError;

/// Number of keys carried by one lane group (one 512-bit register of `u64`).
pub const LANES: usize = 8;

/// Number of lane groups hashed side by side.
pub const GROUPS: usize = 2;

/// Number of keys hashed per batch call.
pub const BATCH_KEYS: usize = LANES * GROUPS;

/// Bytes per x64_128 block.
pub(crate) const BLOCK_LEN: usize = 16;

/// One word slot across the eight lanes of a group.
///
/// Aligned to the 512-bit register width so the vector kernel can use aligned
/// loads.
#[repr(C, align(64))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct LaneWord(pub [u64; LANES]);

/// Sixteen x64_128 digests indexed by key position (256 bytes).
pub type BatchDigests = [Digest128; BATCH_KEYS];

/// Block geometry of a validated batch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct BatchShape {
    pub(crate) len: usize,
    pub(crate) nblocks: usize,
    pub(crate) has_tail: bool,
}

impl BatchShape {
    pub(crate) fn new(pend_len: usize, len: usize) -> Result<Self, BatchError> {
        let has_tail = pend_len > len;
        if has_tail != (len % BLOCK_LEN != 0) {
            return Err(BatchError::PendingLength {
                pending: pend_len,
                len,
            });
        }

        Ok(Self {
            len,
            nblocks: len / BLOCK_LEN,
            has_tail,
        })
    }

    /// Shape of keys packed by [`SoaBatch`].
    pub(crate) const fn for_len(len: usize) -> Self {
        Self {
            len,
            nblocks: len / BLOCK_LEN,
            has_tail: len % BLOCK_LEN != 0,
        }
    }

    /// Word slots each lane group must provide.
    pub(crate) fn slots(self) -> usize {
        2 * (self.nblocks + usize::from(self.has_tail))
    }

    fn check_group(self, group: usize, words: &[LaneWord]) -> Result<(), BatchError> {
        let required = self.slots();
        if words.len() < required {
            return Err(BatchError::ShortBuffer {
                group,
                required,
                found: words.len(),
            });
        }

        if self.has_tail {
            let tail_bits = 8 * (self.len % BLOCK_LEN) as u32;
            let first = &words[2 * self.nblocks].0;
            let second = &words[2 * self.nblocks + 1].0;
            for lane in 0..LANES {
                let block = u128::from(first[lane]) | (u128::from(second[lane]) << 64);
                if block >> tail_bits != 0 {
                    return Err(BatchError::NonZeroPadding { group, lane });
                }
            }
        }

        Ok(())
    }
}

/// Hashes sixteen keys laid out in structure-of-arrays form.
///
/// `vkey1` carries keys `0..8` and `vkey2` keys `8..16`, lane `i` of each
/// [`LaneWord`] belonging to key `i` of the group. See the
/// [module documentation](self) for the length contract. Digest `k` of the
/// result equals [`murmur3_x64_128`](crate::murmur3_x64_128) of key `k`.
///
/// The backend is chosen once per process by [`dispatcher::global`].
///
/// # Examples
///
/// ```
/// use murmur3::batch::{LaneWord, digest_x64_128_x16};
///
/// // Sixteen 3-byte keys "abc", one partial block each.
/// let word = u64::from_le_bytes(*b"abc\0\0\0\0\0");
/// let group = [LaneWord([word; 8]), LaneWord::default()];
///
/// let digests = digest_x64_128_x16(&group, &group, 16, 3, 0).unwrap();
/// assert!(digests.iter().all(|d| *d == murmur3::murmur3_x64_128(b"abc", 0)));
/// ```
pub fn digest_x64_128_x16(
    vkey1: &[LaneWord],
    vkey2: &[LaneWord],
    pend_len: usize,
    len: usize,
    seed: u32,
) -> Result<BatchDigests, BatchError> {
    let shape = BatchShape::new(pend_len, len)?;
    shape.check_group(0, vkey1)?;
    shape.check_group(1, vkey2)?;
    Ok(dispatcher::global().digest_soa(vkey1, vkey2, shape, seed))
}

/// Reassembles per-key digests from `[h1, h2]` word pairs in key order.
pub(crate) fn digests_from_words(words: &[u64; 2 * BATCH_KEYS]) -> BatchDigests {
    std::array::from_fn(|key| crate::digest128_from_words([words[2 * key], words[2 * key + 1]]))
}
