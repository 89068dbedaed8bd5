//! MurmurHash3 x86_32: one 32-bit state over 4-byte blocks.

use crate::primitives::{X86_32_C1, X86_32_C2, fmix32, fold_tail_le, read_u32_le_at, rotl32};

const BLOCK_LEN: usize = 4;

#[inline(always)]
fn mix_k1(k1: u32) -> u32 {
    rotl32(k1.wrapping_mul(X86_32_C1), 15).wrapping_mul(X86_32_C2)
}

/// MurmurHash3 x86_32 of `data` under `seed`.
///
/// The tail bytes are mixed into the state without the rotate/multiply/add
/// step that full blocks receive.
///
/// # Examples
///
/// ```
/// assert_eq!(murmur3::scalar::x86_32(b"", 0), 0);
/// assert_eq!(murmur3::scalar::x86_32(b"Hello, world!", 1234), 0xfaf6cdb3);
/// ```
#[must_use]
pub fn x86_32(data: &[u8], seed: u32) -> u32 {
    let nblocks = data.len() / BLOCK_LEN;
    let mut h1 = seed;

    for block in 0..nblocks {
        h1 ^= mix_k1(read_u32_le_at(data, block * BLOCK_LEN));
        h1 = rotl32(h1, 13);
        h1 = h1.wrapping_mul(5).wrapping_add(0xe6546b64);
    }

    let tail = &data[nblocks * BLOCK_LEN..];
    if !tail.is_empty() {
        h1 ^= mix_k1(fold_tail_le(tail) as u32);
    }

    // Only the low 32 bits of the length are mixed.
    h1 ^= data.len() as u32;
    fmix32(h1)
}
