//! Statistical avalanche checks: flipping one input bit should flip about half
//! of the output bits, for every variant.

use murmur3::primitives::{fmix32, fmix64};
use murmur3::{Algorithm, murmur3_x64_128};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn popcount(a: &[u8], b: &[u8]) -> u32 {
    a.iter().zip(b).map(|(x, y)| (x ^ y).count_ones()).sum()
}

/// Average fraction of output bits flipped by single-bit input flips.
fn mean_flip_ratio(algorithm: Algorithm, key_len: usize, samples: usize) -> f64 {
    let mut rng = StdRng::seed_from_u64(key_len as u64 ^ 0xa5a5);
    let out_bits = (algorithm.digest_len() * 8) as f64;
    let mut total = 0.0;
    let mut count = 0usize;

    for _ in 0..samples {
        let mut key = vec![0u8; key_len];
        rng.fill(&mut key[..]);
        let seed = rng.r#gen::<u32>();
        let base = algorithm.digest(&key, seed);

        for bit in 0..key_len * 8 {
            key[bit / 8] ^= 1 << (bit % 8);
            let flipped = algorithm.digest(&key, seed);
            key[bit / 8] ^= 1 << (bit % 8);

            total += f64::from(popcount(&base, &flipped)) / out_bits;
            count += 1;
        }
    }

    total / count as f64
}

#[test]
fn every_variant_avalanches() {
    for algorithm in Algorithm::ALL {
        for key_len in [3, 16, 31] {
            let ratio = mean_flip_ratio(algorithm, key_len, 64);
            assert!(
                (0.47..0.53).contains(&ratio),
                "{algorithm} with {key_len}-byte keys flips {ratio:.3} of output bits"
            );
        }
    }
}

#[test]
fn seed_changes_the_digest() {
    let key = b"seed sensitivity";
    let base = murmur3_x64_128(key, 0);
    for shift in 0..32 {
        let other = murmur3_x64_128(key, 1 << shift);
        let flipped = popcount(&base, &other);
        assert!(flipped > 20, "seed bit {shift} flipped only {flipped} bits");
    }
}

#[test]
fn finalizers_avalanche() {
    let mut rng = StdRng::seed_from_u64(0xf1);
    let mut flips32 = 0u64;
    let mut flips64 = 0u64;
    let rounds = 512u64;

    for _ in 0..rounds {
        let x32 = rng.r#gen::<u32>();
        let x64 = rng.r#gen::<u64>();
        for bit in 0..32 {
            flips32 += u64::from((fmix32(x32) ^ fmix32(x32 ^ (1 << bit))).count_ones());
        }
        for bit in 0..64 {
            flips64 += u64::from((fmix64(x64) ^ fmix64(x64 ^ (1 << bit))).count_ones());
        }
    }

    let ratio32 = flips32 as f64 / (rounds * 32 * 32) as f64;
    let ratio64 = flips64 as f64 / (rounds * 64 * 64) as f64;
    assert!((0.48..0.52).contains(&ratio32), "fmix32 ratio {ratio32:.3}");
    assert!((0.48..0.52).contains(&ratio64), "fmix64 ratio {ratio64:.3}");
}
