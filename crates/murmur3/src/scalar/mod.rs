//! Scalar MurmurHash3 digests.
//!
//! Each function consumes the key in fixed-size blocks, folds the trailing
//! `len % block` bytes into zero-initialised words and finishes with the
//! length xor plus the finalization mix. All three are total: any slice,
//! including an empty one, and any seed are valid.
//!
//! The numeric results are returned in state order. The crate-level
//! `murmur3_*` helpers serialise them little-endian into byte digests.

mod x64_128;
mod x86_128;
mod x86_32;

pub use x64_128::x64_128;
pub use x86_128::x86_128;
pub use x86_32::x86_32;
