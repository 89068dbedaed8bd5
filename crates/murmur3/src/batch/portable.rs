//! Portable 16-way fallback: one scalar x64_128 call per lane.
//!
//! Used whenever the AVX-512 kernel is unavailable or the scalar backend is
//! forced. Each lane is unpacked back into its key bytes first.

use super::soa::unpack_lane;
use super::{BatchDigests, BatchShape, LANES, LaneWord};
use crate::murmur3_x64_128;

pub(crate) fn digest_x16(
    vkey1: &[LaneWord],
    vkey2: &[LaneWord],
    shape: BatchShape,
    seed: u32,
) -> BatchDigests {
    let groups = [vkey1, vkey2];
    let mut key = Vec::with_capacity(shape.slots() * 8);

    std::array::from_fn(|index| {
        unpack_lane(groups[index / LANES], index % LANES, shape.len, &mut key);
        murmur3_x64_128(&key, seed)
    })
}
