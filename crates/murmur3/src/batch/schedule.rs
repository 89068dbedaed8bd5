//! Grouping of arbitrary key slices into 16-way batches.
//!
//! Keys are bucketed by length. Every full bucket chunk of sixteen keys
//! becomes one batch job; the remainder of each bucket is hashed one key at
//! a time. Jobs carry input indices so results can be scattered back into
//! input order, regardless of the order in which jobs complete.

use std::collections::BTreeMap;

#[cfg(feature = "tracing")]
use tracing::trace;

use super::{BATCH_KEYS, SoaBatch};
use crate::dispatcher::Dispatcher;
use crate::{Digest128, murmur3_x64_128};

/// One unit of work produced by [`plan`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Job {
    /// Sixteen keys of length `len`, by input index.
    Batch { len: usize, indices: [usize; BATCH_KEYS] },
    /// A key hashed on its own.
    Single(usize),
}

impl Job {
    /// Hashes the keys of this job, reporting `(input index, digest)` pairs.
    pub(crate) fn execute<T, F>(&self, dispatcher: &Dispatcher, keys: &[T], seed: u32, mut sink: F)
    where
        T: AsRef<[u8]>,
        F: FnMut(usize, Digest128),
    {
        match *self {
            Self::Batch { len, indices } => {
                let batch = indices.map(|index| keys[index].as_ref());
                let digests = SoaBatch::pack_uniform(&batch, len).digest_with(dispatcher, seed);
                for (index, digest) in indices.into_iter().zip(digests) {
                    sink(index, digest);
                }
            }
            Self::Single(index) => sink(index, murmur3_x64_128(keys[index].as_ref(), seed)),
        }
    }
}

/// Splits `keys` into batch and single-key jobs.
///
/// Batch jobs come first, ordered by key length; singles follow.
pub(crate) fn plan<T: AsRef<[u8]>>(keys: &[T]) -> Vec<Job> {
    let mut buckets: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (index, key) in keys.iter().enumerate() {
        buckets.entry(key.as_ref().len()).or_default().push(index);
    }

    let mut jobs = Vec::with_capacity(keys.len() / BATCH_KEYS + buckets.len());
    let mut singles = Vec::new();
    for (len, indices) in buckets {
        let chunks = indices.chunks_exact(BATCH_KEYS);
        singles.extend_from_slice(chunks.remainder());
        for chunk in chunks {
            let mut batch = [0usize; BATCH_KEYS];
            batch.copy_from_slice(chunk);
            jobs.push(Job::Batch {
                len,
                indices: batch,
            });
        }
    }

    #[cfg(feature = "tracing")]
    trace!(
        keys = keys.len(),
        batches = jobs.len(),
        singles = singles.len(),
        "planned batch digest"
    );

    jobs.extend(singles.into_iter().map(Job::Single));
    jobs
}

/// Runs every job on the calling thread and returns digests in input order.
pub(crate) fn run<T: AsRef<[u8]>>(dispatcher: &Dispatcher, keys: &[T], seed: u32) -> Vec<Digest128> {
    let mut out = vec![[0u8; 16]; keys.len()];
    for job in plan(keys) {
        job.execute(dispatcher, keys, seed, |index, digest| out[index] = digest);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Backend;

    fn count(jobs: &[Job]) -> (usize, usize) {
        let batches = jobs
            .iter()
            .filter(|job| matches!(job, Job::Batch { .. }))
            .count();
        (batches, jobs.len() - batches)
    }

    #[test]
    fn empty_input_plans_nothing() {
        let keys: [&[u8]; 0] = [];
        assert!(plan(&keys).is_empty());
    }

    #[test]
    fn full_buckets_become_batches() {
        let mut keys = vec![vec![1u8; 10]; 35];
        keys.extend(vec![vec![2u8; 3]; 16]);
        keys.push(vec![3u8; 40]);

        let jobs = plan(&keys);
        // 35 ten-byte keys: two batches and three singles.
        assert_eq!(count(&jobs), (3, 4));
        assert!(matches!(jobs[0], Job::Batch { len: 3, .. }));
        assert!(matches!(jobs.last(), Some(Job::Single(_))));
    }

    #[test]
    fn every_index_is_scheduled_exactly_once() {
        let keys: Vec<Vec<u8>> = (0..100).map(|i| vec![0u8; i % 7]).collect();
        let mut seen = vec![0u32; keys.len()];
        for job in plan(&keys) {
            match job {
                Job::Batch { len, indices } => {
                    for index in indices {
                        assert_eq!(keys[index].len(), len);
                        seen[index] += 1;
                    }
                }
                Job::Single(index) => seen[index] += 1,
            }
        }
        assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn run_preserves_input_order() {
        let keys: Vec<Vec<u8>> = (0..70u8)
            .map(|i| (0..(i % 3) * 9).map(|b| b ^ i).collect())
            .collect();
        let dispatcher = Dispatcher::with_backend(Backend::Scalar);
        let digests = run(&dispatcher, &keys, 11);
        for (key, digest) in keys.iter().zip(&digests) {
            assert_eq!(*digest, murmur3_x64_128(key, 11));
        }
    }
}
