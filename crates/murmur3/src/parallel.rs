//! Rayon integration for parallel MurmurHash3 hashing.
//!
//! The scheduled jobs of a batch (16-key batches and single keys) run on
//! rayon's thread pool, so large key sets use every core as well as the
//! vector lanes.

use rayon::prelude::*;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::batch::schedule;
use crate::dispatcher::{self, Backend};
use crate::{Digest128, digest_batch, murmur3_x64_128};

/// Extension trait for parallel x64_128 hashing.
///
/// # Example
///
/// ```
/// use rayon::prelude::*;
/// use murmur3::ParallelMurmur3;
///
/// let data: Vec<Vec<u8>> = vec![b"hello".to_vec(), b"world".to_vec(), b"test".to_vec()];
///
/// let digests = data.par_iter().murmur3_x64_128(0);
/// assert_eq!(digests.len(), 3);
/// assert_eq!(digests[0], murmur3::murmur3_x64_128(b"hello", 0));
/// ```
pub trait ParallelMurmur3<T> {
    /// Computes x64_128 digests in iterator order, batching equal-length keys.
    fn murmur3_x64_128(self, seed: u32) -> Vec<Digest128>;
}

impl<I, T> ParallelMurmur3<T> for I
where
    I: ParallelIterator<Item = T>,
    T: AsRef<[u8]> + Send,
{
    fn murmur3_x64_128(self, seed: u32) -> Vec<Digest128> {
        let items: Vec<T> = self.collect();
        digest_batch(&items, seed)
    }
}

/// Same digests as [`digest_batch`], with jobs spread over the rayon pool.
#[cfg_attr(feature = "tracing", instrument(skip(keys), fields(keys = keys.len()), name = "par_digest_batch"))]
pub fn par_digest_batch<T: AsRef<[u8]> + Sync>(keys: &[T], seed: u32) -> Vec<Digest128> {
    let dispatcher = dispatcher::global();
    if dispatcher.backend() == Backend::Scalar {
        return keys
            .par_iter()
            .map(|key| murmur3_x64_128(key.as_ref(), seed))
            .collect();
    }

    let results: Vec<(usize, Digest128)> = schedule::plan(keys)
        .par_iter()
        .flat_map_iter(|job| {
            let mut done = Vec::new();
            job.execute(dispatcher, keys, seed, |index, digest| done.push((index, digest)));
            done
        })
        .collect();

    let mut out = vec![[0u8; 16]; keys.len()];
    for (index, digest) in results {
        out[index] = digest;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed_keys() -> Vec<Vec<u8>> {
        (0..300u32)
            .map(|i| {
                let len = (i % 5) as usize * 7;
                (0..len).map(|b| (b as u32 ^ i) as u8).collect()
            })
            .collect()
    }

    #[test]
    fn parallel_matches_sequential() {
        let keys = mixed_keys();
        let parallel = par_digest_batch(&keys, 99);
        let sequential: Vec<Digest128> = keys.iter().map(|k| murmur3_x64_128(k, 99)).collect();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn extension_trait_keeps_order() {
        let keys = mixed_keys();
        let digests = keys.par_iter().murmur3_x64_128(5);
        assert_eq!(digests, digest_batch(&keys, 5));
    }

    #[test]
    fn empty_input_is_empty() {
        let keys: Vec<Vec<u8>> = Vec::new();
        assert!(par_digest_batch(&keys, 0).is_empty());
    }
}
