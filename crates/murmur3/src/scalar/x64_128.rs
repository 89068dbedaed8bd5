//! MurmurHash3 x64_128: two 64-bit states over 16-byte blocks.

use crate::primitives::{
    X64_128_C1, X64_128_C2, X64_128_N1, X64_128_N2, fmix64, fold_tail_le, read_u64_le_at, rotl64,
};

const BLOCK_LEN: usize = 16;

/// Mixes the first word of a block before it is xored into `h1`.
#[inline(always)]
fn mix_k1(k1: u64) -> u64 {
    rotl64(k1.wrapping_mul(X64_128_C1), 31).wrapping_mul(X64_128_C2)
}

/// Mixes the second word of a block before it is xored into `h2`.
#[inline(always)]
fn mix_k2(k2: u64) -> u64 {
    rotl64(k2.wrapping_mul(X64_128_C2), 33).wrapping_mul(X64_128_C1)
}

/// MurmurHash3 x64_128 of `data` under `seed`, as `[h1, h2]`.
///
/// The seed is zero-extended into both 64-bit states. `h2` absorbs the `h1`
/// produced earlier in the same block.
///
/// # Examples
///
/// ```
/// let [h1, h2] = murmur3::scalar::x64_128(b"The quick brown fox jumps over the lazy dog", 0);
/// assert_eq!(h1, 0xe34bbc7bbc071b6c);
/// assert_eq!(h2, 0x7a433ca9c49a9347);
/// ```
#[must_use]
pub fn x64_128(data: &[u8], seed: u32) -> [u64; 2] {
    let nblocks = data.len() / BLOCK_LEN;
    let mut h1 = u64::from(seed);
    let mut h2 = u64::from(seed);

    for block in 0..nblocks {
        let base = block * BLOCK_LEN;

        h1 ^= mix_k1(read_u64_le_at(data, base));
        h1 = rotl64(h1, 27).wrapping_add(h2);
        h1 = h1.wrapping_mul(5).wrapping_add(X64_128_N1);

        h2 ^= mix_k2(read_u64_le_at(data, base + 8));
        h2 = rotl64(h2, 31).wrapping_add(h1);
        h2 = h2.wrapping_mul(5).wrapping_add(X64_128_N2);
    }

    // 9..=15 tail bytes fold k2 first, then every non-empty tail folds k1.
    let tail = &data[nblocks * BLOCK_LEN..];
    if tail.len() > 8 {
        h2 ^= mix_k2(fold_tail_le(&tail[8..]));
    }
    if !tail.is_empty() {
        h1 ^= mix_k1(fold_tail_le(&tail[..tail.len().min(8)]));
    }

    finalize(h1, h2, data.len() as u64)
}

/// Length fold, cross-add, avalanche, cross-add.
#[inline(always)]
fn finalize(mut h1: u64, mut h2: u64, len: u64) -> [u64; 2] {
    h1 ^= len;
    h2 ^= len;

    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);

    h1 = fmix64(h1);
    h2 = fmix64(h2);

    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);

    [h1, h2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_with_zero_seed_is_zero() {
        assert_eq!(x64_128(b"", 0), [0, 0]);
    }

    #[test]
    fn mixing_zero_words_is_a_no_op() {
        assert_eq!(mix_k1(0), 0);
        assert_eq!(mix_k2(0), 0);
    }

    #[test]
    fn foo_matches_published_value() {
        let [h1, h2] = x64_128(b"foo", 0);
        assert_eq!(h1 as i64, -2129773440516405919);
        assert_eq!(h2 as i64, 9128664383759220103);
    }

    #[test]
    fn hello_matches_published_value() {
        assert_eq!(x64_128(b"hello", 0), [0xcbd8a7b341bd9b02, 0x5b1e906a48ae1d19]);
    }

    #[test]
    fn tails_either_side_of_the_word_boundary() {
        let data: Vec<u8> = (0..25).collect();
        let digest = |len: usize| {
            let [h1, h2] = x64_128(&data[..len], 0x9747b28c);
            let mut out = h1.to_le_bytes().to_vec();
            out.extend_from_slice(&h2.to_le_bytes());
            out.iter().map(|b| format!("{b:02x}")).collect::<String>()
        };
        assert_eq!(digest(24), "e27edaa2c2fce95df5e63fa390521d34");
        assert_eq!(digest(25), "308ad9737806eec995e92f40313bb2ff");
    }
}
