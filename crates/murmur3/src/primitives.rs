//! Leaf primitives shared by every MurmurHash3 variant.
//!
//! The rotate helpers wrap the native `rotate_left` so that each width has a
//! single stable entry point; LLVM lowers them to `rol`/`ror` on x86 and
//! `ror` with a negated amount on aarch64, so no per-platform selection is
//! needed here.
//!
//! Word reads are explicit little-endian decodes, so a key hashes to the same
//! digest on big-endian hosts as on x86.

/// Block multiplier for the x86_32 variant.
pub(crate) const X86_32_C1: u32 = 0xcc9e2d51;
/// Second block multiplier for the x86_32 variant.
pub(crate) const X86_32_C2: u32 = 0x1b873593;

/// Per-lane multipliers for x86_128, assigned cyclically: lane `i` uses
/// `C[i]` then `C[(i + 1) % 4]`.
pub(crate) const X86_128_C: [u32; 4] = [0x239b961b, 0xab0e9789, 0x38b34ae5, 0xa1e38b93];

/// Block multipliers for x64_128.
pub(crate) const X64_128_C1: u64 = 0x87c37b91114253d5;
pub(crate) const X64_128_C2: u64 = 0x4cf5ad432745937f;

/// Additive round constants of the x64_128 state update.
pub(crate) const X64_128_N1: u64 = 0x52dce729;
pub(crate) const X64_128_N2: u64 = 0x38495ab5;

const FMIX32_M1: u32 = 0x85ebca6b;
const FMIX32_M2: u32 = 0xc2b2ae35;

/// Multipliers of the 64-bit finalization mix. The vector kernel broadcasts
/// the same values.
pub(crate) const FMIX64_M1: u64 = 0xff51afd7ed558ccd;
pub(crate) const FMIX64_M2: u64 = 0xc4ceb9fe1a85ec53;

/// Rotates a 32-bit word left by `r` bits.
#[inline(always)]
#[must_use]
pub const fn rotl32(x: u32, r: u32) -> u32 {
    x.rotate_left(r)
}

/// Rotates a 64-bit word left by `r` bits.
#[inline(always)]
#[must_use]
pub const fn rotl64(x: u64, r: u32) -> u64 {
    x.rotate_left(r)
}

/// 32-bit finalization mix.
///
/// Three xor-shift rounds separated by two odd multiplies. The function is a
/// bijection on `u32`; in particular `fmix32(0) == 0`.
#[inline(always)]
#[must_use]
pub const fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(FMIX32_M1);
    h ^= h >> 13;
    h = h.wrapping_mul(FMIX32_M2);
    h ^= h >> 16;
    h
}

/// 64-bit finalization mix. A bijection on `u64` with `fmix64(0) == 0`.
#[inline(always)]
#[must_use]
pub const fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(FMIX64_M1);
    k ^= k >> 33;
    k = k.wrapping_mul(FMIX64_M2);
    k ^= k >> 33;
    k
}

/// Decodes the little-endian `u32` starting at `offset`.
///
/// Callers index whole blocks, so `offset + 4 <= data.len()` always holds.
#[inline(always)]
pub(crate) fn read_u32_le_at(data: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(word)
}

/// Decodes the little-endian `u64` starting at `offset`.
#[inline(always)]
pub(crate) fn read_u64_le_at(data: &[u8], offset: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&data[offset..offset + 8]);
    u64::from_le_bytes(word)
}

/// Folds up to eight trailing bytes into a word, byte 0 least significant.
///
/// Bytes are folded from the highest offset down, in tail cascade order.
#[inline(always)]
pub(crate) fn fold_tail_le(bytes: &[u8]) -> u64 {
    debug_assert!(bytes.len() <= 8);
    bytes
        .iter()
        .enumerate()
        .rev()
        .fold(0u64, |k, (i, &b)| k ^ (u64::from(b) << (8 * i)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotations_wrap_around() {
        assert_eq!(rotl32(0x8000_0001, 1), 0x0000_0003);
        assert_eq!(rotl32(0x1234_5678, 16), 0x5678_1234);
        assert_eq!(rotl64(0x8000_0000_0000_0001, 1), 0x3);
        assert_eq!(rotl64(0x0123_4567_89ab_cdef, 32), 0x89ab_cdef_0123_4567);
    }

    #[test]
    fn rotations_are_not_shifts() {
        let x = u32::MAX;
        assert_eq!(rotl32(x, 13), x);
        assert_eq!(rotl64(u64::MAX, 31), u64::MAX);
    }

    #[test]
    fn fmix_fixes_zero_only() {
        assert_eq!(fmix32(0), 0);
        assert_eq!(fmix64(0), 0);
        assert_ne!(fmix32(1), 1);
        assert_ne!(fmix64(1), 1);
    }

    #[test]
    fn fmix_is_injective_on_a_sample() {
        let mut seen32 = std::collections::HashSet::new();
        let mut seen64 = std::collections::HashSet::new();
        for i in 0..4096u32 {
            assert!(seen32.insert(fmix32(i)));
            assert!(seen64.insert(fmix64(u64::from(i) << 20)));
        }
    }

    #[test]
    fn word_reads_are_little_endian() {
        let bytes = [0x21, 0x43, 0x65, 0x87, 0xa9, 0xcb, 0xed, 0x0f, 0xff];
        assert_eq!(read_u32_le_at(&bytes, 0), 0x8765_4321);
        assert_eq!(read_u32_le_at(&bytes, 1), 0xa987_6543);
        assert_eq!(read_u64_le_at(&bytes, 0), 0x0fed_cba9_8765_4321);
        assert_eq!(read_u64_le_at(&bytes, 1), 0xff0f_edcb_a987_6543);
    }

    #[test]
    fn tail_fold_places_bytes_by_offset() {
        assert_eq!(fold_tail_le(&[]), 0);
        assert_eq!(fold_tail_le(&[0x21]), 0x21);
        assert_eq!(fold_tail_le(&[0x21, 0x43, 0x65]), 0x65_4321);
        assert_eq!(
            fold_tail_le(&[1, 2, 3, 4, 5, 6, 7, 8]),
            read_u64_le_at(&[1, 2, 3, 4, 5, 6, 7, 8], 0)
        );
    }
}
