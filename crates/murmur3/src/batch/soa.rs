use super::{BATCH_KEYS, BLOCK_LEN, BatchDigests, BatchShape, LANES, LaneWord};
use crate::dispatcher::{self, Dispatcher};
use crate::error::BatchError;
use crate::primitives::fold_tail_le;

/// Sixteen equal-length keys packed into the lane-interleaved layout.
///
/// Packing copies each key's 64-bit words into its lane and zero-fills the
/// partial block, which is the only layout the batch kernels accept.
///
/// # Examples
///
/// ```
/// use murmur3::batch::SoaBatch;
///
/// let keys: [&[u8]; 16] = std::array::from_fn(|_| b"sixteen key bytes".as_slice());
/// let batch = SoaBatch::pack(&keys).unwrap();
/// assert_eq!(batch.len(), 17);
/// assert_eq!(batch.pending_len(), 32);
///
/// let digests = batch.digest(7);
/// assert_eq!(digests[15], murmur3::murmur3_x64_128(b"sixteen key bytes", 7));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SoaBatch {
    groups: [Vec<LaneWord>; 2],
    len: usize,
}

impl SoaBatch {
    /// Packs sixteen keys that all share one length.
    pub fn pack<T: AsRef<[u8]>>(keys: &[T; BATCH_KEYS]) -> Result<Self, BatchError> {
        let expected = keys[0].as_ref().len();
        if let Some((lane, key)) = keys
            .iter()
            .enumerate()
            .find(|(_, key)| key.as_ref().len() != expected)
        {
            return Err(BatchError::LengthMismatch {
                lane,
                expected,
                found: key.as_ref().len(),
            });
        }

        Ok(Self::pack_uniform(keys, expected))
    }

    /// Packs keys already known to be `len` bytes long.
    pub(crate) fn pack_uniform<T: AsRef<[u8]>>(keys: &[T; BATCH_KEYS], len: usize) -> Self {
        let slots = BatchShape::for_len(len).slots();
        let mut groups = [vec![LaneWord::default(); slots], vec![LaneWord::default(); slots]];

        for (index, key) in keys.iter().enumerate() {
            let key = key.as_ref();
            debug_assert_eq!(key.len(), len);
            let words = &mut groups[index / LANES];
            let lane = index % LANES;
            for (slot, chunk) in key.chunks(8).enumerate() {
                words[slot].0[lane] = fold_tail_le(chunk);
            }
        }

        Self { groups, len }
    }

    /// Shared key length in bytes.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Reports whether the keys are empty.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Key length rounded up to whole blocks.
    pub const fn pending_len(&self) -> usize {
        self.len.next_multiple_of(BLOCK_LEN)
    }

    /// Word slots of keys `0..8` and keys `8..16`.
    pub fn groups(&self) -> (&[LaneWord], &[LaneWord]) {
        (&self.groups[0], &self.groups[1])
    }

    /// Recovers the bytes of key `index` from its lane.
    pub fn key(&self, index: usize) -> Vec<u8> {
        let mut key = Vec::with_capacity(self.pending_len());
        unpack_lane(&self.groups[index / LANES], index % LANES, self.len, &mut key);
        key
    }

    /// Hashes the sixteen keys with the process-wide backend.
    pub fn digest(&self, seed: u32) -> BatchDigests {
        self.digest_with(dispatcher::global(), seed)
    }

    /// Hashes the sixteen keys with an explicit dispatcher.
    pub fn digest_with(&self, dispatcher: &Dispatcher, seed: u32) -> BatchDigests {
        dispatcher.digest_soa(
            &self.groups[0],
            &self.groups[1],
            BatchShape::for_len(self.len),
            seed,
        )
    }
}

/// Writes the first `len` bytes carried by `lane` into `out`, replacing its
/// contents.
pub(crate) fn unpack_lane(words: &[LaneWord], lane: usize, len: usize, out: &mut Vec<u8>) {
    out.clear();
    for word in words {
        if out.len() >= len {
            break;
        }
        out.extend_from_slice(&word.0[lane].to_le_bytes());
    }
    out.truncate(len);
}
