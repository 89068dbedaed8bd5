//! AVX-512 16-way x64_128 kernel.
//!
//! Each `__m512i` holds one 64-bit state or key word for eight keys. Two
//! independent accumulator pairs hash the two lane groups side by side, which
//! hides most of the `vpmullq` latency behind the other group's work.
//!
//! # CPU Feature Requirements
//!
//! - **AVX-512F**: 512-bit integer arithmetic, `vprolq`, permutes
//! - **AVX-512DQ**: `vpmullq`, the 64-bit lane multiply
//!
//! Both are checked at runtime by the dispatcher before this kernel is
//! selected.
//!
//! # Output order
//!
//! After finalization the registers are lane-major: `h1` of keys 0..8 in one
//! register and `h2` of keys 0..8 in another. A two-operand lane gather
//! followed by a 128-bit granule shuffle turns them into `[h1, h2]` pairs in
//! key order, the layout sixteen scalar calls would produce.

#![allow(unsafe_code)]

use std::arch::x86_64::{
    __m512i, _mm512_add_epi64, _mm512_load_epi64, _mm512_mullo_epi64,
    _mm512_permutex2var_epi64, _mm512_rol_epi64, _mm512_set_epi64, _mm512_set1_epi64,
    _mm512_shuffle_i64x2, _mm512_srli_epi64, _mm512_storeu_epi64, _mm512_xor_epi64,
};

use super::{BATCH_KEYS, BatchDigests, BatchShape, LANES, LaneWord, digests_from_words};
use crate::primitives::{
    FMIX64_M1, FMIX64_M2, X64_128_C1, X64_128_C2, X64_128_N1, X64_128_N2,
};

/// Broadcast constants, built once per call.
#[derive(Clone, Copy)]
struct Constants {
    c1: __m512i,
    c2: __m512i,
    n1: __m512i,
    n2: __m512i,
    five: __m512i,
    m1: __m512i,
    m2: __m512i,
}

impl Constants {
    #[inline]
    #[target_feature(enable = "avx512f")]
    fn new() -> Self {
        Self {
            c1: _mm512_set1_epi64(X64_128_C1 as i64),
            c2: _mm512_set1_epi64(X64_128_C2 as i64),
            n1: _mm512_set1_epi64(X64_128_N1 as i64),
            n2: _mm512_set1_epi64(X64_128_N2 as i64),
            five: _mm512_set1_epi64(5),
            m1: _mm512_set1_epi64(FMIX64_M1 as i64),
            m2: _mm512_set1_epi64(FMIX64_M2 as i64),
        }
    }
}

/// `h1`/`h2` accumulators of one lane group.
#[derive(Clone, Copy)]
struct Group {
    h1: __m512i,
    h2: __m512i,
}

impl Group {
    #[inline]
    #[target_feature(enable = "avx512f,avx512dq")]
    fn mix_k1(k1: __m512i, c: &Constants) -> __m512i {
        let k1 = _mm512_mullo_epi64(k1, c.c1);
        _mm512_mullo_epi64(_mm512_rol_epi64::<31>(k1), c.c2)
    }

    #[inline]
    #[target_feature(enable = "avx512f,avx512dq")]
    fn mix_k2(k2: __m512i, c: &Constants) -> __m512i {
        let k2 = _mm512_mullo_epi64(k2, c.c2);
        _mm512_mullo_epi64(_mm512_rol_epi64::<33>(k2), c.c1)
    }

    #[inline]
    #[target_feature(enable = "avx512f,avx512dq")]
    fn block(&mut self, k1: __m512i, k2: __m512i, c: &Constants) {
        self.h1 = _mm512_xor_epi64(self.h1, Self::mix_k1(k1, c));
        self.h1 = _mm512_add_epi64(_mm512_rol_epi64::<27>(self.h1), self.h2);
        self.h1 = _mm512_add_epi64(_mm512_mullo_epi64(self.h1, c.five), c.n1);

        self.h2 = _mm512_xor_epi64(self.h2, Self::mix_k2(k2, c));
        self.h2 = _mm512_add_epi64(_mm512_rol_epi64::<31>(self.h2), self.h1);
        self.h2 = _mm512_add_epi64(_mm512_mullo_epi64(self.h2, c.five), c.n2);
    }

    /// Folds the zero-padded partial block without the state update.
    #[inline]
    #[target_feature(enable = "avx512f,avx512dq")]
    fn tail(&mut self, k1: __m512i, k2: __m512i, c: &Constants) {
        self.h2 = _mm512_xor_epi64(self.h2, Self::mix_k2(k2, c));
        self.h1 = _mm512_xor_epi64(self.h1, Self::mix_k1(k1, c));
    }

    #[inline]
    #[target_feature(enable = "avx512f,avx512dq")]
    fn fmix(h: __m512i, c: &Constants) -> __m512i {
        let h = _mm512_xor_epi64(h, _mm512_srli_epi64::<33>(h));
        let h = _mm512_mullo_epi64(h, c.m1);
        let h = _mm512_xor_epi64(h, _mm512_srli_epi64::<33>(h));
        let h = _mm512_mullo_epi64(h, c.m2);
        _mm512_xor_epi64(h, _mm512_srli_epi64::<33>(h))
    }

    #[inline]
    #[target_feature(enable = "avx512f,avx512dq")]
    fn finalize(&mut self, len: __m512i, c: &Constants) {
        self.h1 = _mm512_xor_epi64(self.h1, len);
        self.h2 = _mm512_xor_epi64(self.h2, len);

        self.h1 = _mm512_add_epi64(self.h1, self.h2);
        self.h2 = _mm512_add_epi64(self.h2, self.h1);

        self.h1 = Self::fmix(self.h1, c);
        self.h2 = Self::fmix(self.h2, c);

        self.h1 = _mm512_add_epi64(self.h1, self.h2);
        self.h2 = _mm512_add_epi64(self.h2, self.h1);
    }

    /// Returns `[h1, h2]` pairs for keys 0..4 and keys 4..8 of the group.
    #[inline]
    #[target_feature(enable = "avx512f")]
    fn interleave(self) -> (__m512i, __m512i) {
        // Index bit 3 selects the second operand (h2).
        let gather_even = _mm512_set_epi64(0xD, 0x5, 0xC, 0x4, 0x9, 0x1, 0x8, 0x0);
        let gather_odd = _mm512_set_epi64(0xF, 0x7, 0xE, 0x6, 0xB, 0x3, 0xA, 0x2);

        // keys 0, 1, 4, 5 and keys 2, 3, 6, 7
        let even = _mm512_permutex2var_epi64(self.h1, gather_even, self.h2);
        let odd = _mm512_permutex2var_epi64(self.h1, gather_odd, self.h2);

        (
            _mm512_shuffle_i64x2::<0x44>(even, odd),
            _mm512_shuffle_i64x2::<0xEE>(even, odd),
        )
    }
}

#[inline]
#[target_feature(enable = "avx512f")]
fn load(word: &LaneWord) -> __m512i {
    // SAFETY: `LaneWord` is 64 bytes long and 64-byte aligned.
    unsafe { _mm512_load_epi64(word.0.as_ptr().cast()) }
}

/// Hashes sixteen keys in structure-of-arrays form.
///
/// # Safety
///
/// The CPU must support AVX-512F and AVX-512DQ, and both groups must hold at
/// least `shape.slots()` word slots with a zero-padded partial block. The
/// batch entry points validate the layout and the dispatcher verifies the
/// CPU features before calling.
#[target_feature(enable = "avx512f,avx512dq")]
pub(crate) unsafe fn digest_x16(
    vkey1: &[LaneWord],
    vkey2: &[LaneWord],
    shape: BatchShape,
    seed: u32,
) -> BatchDigests {
    let c = Constants::new();
    let seed = _mm512_set1_epi64(i64::from(seed));
    let mut g1 = Group { h1: seed, h2: seed };
    let mut g2 = g1;

    for block in 0..shape.nblocks {
        let (w1, w2) = (2 * block, 2 * block + 1);
        g1.block(load(&vkey1[w1]), load(&vkey1[w2]), &c);
        g2.block(load(&vkey2[w1]), load(&vkey2[w2]), &c);
    }

    if shape.has_tail {
        let (w1, w2) = (2 * shape.nblocks, 2 * shape.nblocks + 1);
        g1.tail(load(&vkey1[w1]), load(&vkey1[w2]), &c);
        g2.tail(load(&vkey2[w1]), load(&vkey2[w2]), &c);
    }

    let len = _mm512_set1_epi64(shape.len as i64);
    g1.finalize(len, &c);
    g2.finalize(len, &c);

    let (g1_lo, g1_hi) = g1.interleave();
    let (g2_lo, g2_hi) = g2.interleave();

    let mut words = [0u64; 2 * BATCH_KEYS];
    for (chunk, pairs) in words.chunks_exact_mut(LANES).zip([g1_lo, g1_hi, g2_lo, g2_hi]) {
        // SAFETY: each chunk is exactly eight u64 words.
        unsafe { _mm512_storeu_epi64(chunk.as_mut_ptr().cast(), pairs) };
    }

    digests_from_words(&words)
}
