//! MurmurHash3 x86_128: four 32-bit states over 16-byte blocks.

use crate::primitives::{X86_128_C, fmix32, fold_tail_le, read_u32_le_at, rotl32};

const BLOCK_LEN: usize = 16;

/// Rotation applied to `k_i` between its two multiplies.
const K_ROT: [u32; 4] = [15, 16, 17, 18];
/// Rotation applied to `h_i` before it absorbs the next state.
const H_ROT: [u32; 4] = [19, 17, 15, 13];
/// Additive round constant for `h_i`.
const H_ADD: [u32; 4] = [0x561ccd1b, 0x0bcaa747, 0x96cd1c35, 0x32ac3b17];

#[inline(always)]
fn mix_k(lane: usize, k: u32) -> u32 {
    let k = k.wrapping_mul(X86_128_C[lane]);
    rotl32(k, K_ROT[lane]).wrapping_mul(X86_128_C[(lane + 1) % 4])
}

#[inline(always)]
fn add_all(h: &mut [u32; 4]) {
    h[0] = h[0].wrapping_add(h[1]).wrapping_add(h[2]).wrapping_add(h[3]);
    h[1] = h[1].wrapping_add(h[0]);
    h[2] = h[2].wrapping_add(h[0]);
    h[3] = h[3].wrapping_add(h[0]);
}

/// MurmurHash3 x86_128 of `data` under `seed`, as `[h1, h2, h3, h4]`.
///
/// Within a block `h1..h3` absorb their successor before it is updated,
/// while `h4` absorbs the `h1` produced earlier in the same block.
///
/// # Examples
///
/// ```
/// assert_eq!(murmur3::scalar::x86_128(b"", 0), [0; 4]);
/// ```
#[must_use]
pub fn x86_128(data: &[u8], seed: u32) -> [u32; 4] {
    let nblocks = data.len() / BLOCK_LEN;
    let mut h = [seed; 4];

    for block in 0..nblocks {
        let base = block * BLOCK_LEN;
        for lane in 0..4 {
            h[lane] ^= mix_k(lane, read_u32_le_at(data, base + lane * 4));
            h[lane] = rotl32(h[lane], H_ROT[lane]);
            h[lane] = h[lane].wrapping_add(h[(lane + 1) % 4]);
            h[lane] = h[lane].wrapping_mul(5).wrapping_add(H_ADD[lane]);
        }
    }

    // Cascade from the highest tail word down: 13..=15 bytes fold k4 first,
    // then fall through to k3, k2 and k1.
    let tail = &data[nblocks * BLOCK_LEN..];
    for lane in (0..4).rev() {
        let start = lane * 4;
        if tail.len() > start {
            let end = tail.len().min(start + 4);
            h[lane] ^= mix_k(lane, fold_tail_le(&tail[start..end]) as u32);
        }
    }

    let len = data.len() as u32;
    for state in &mut h {
        *state ^= len;
    }

    add_all(&mut h);
    for state in &mut h {
        *state = fmix32(*state);
    }
    add_all(&mut h);

    h
}
