//! Runtime CPU detection and batch backend dispatch.
//!
//! The backend is resolved in order: an explicit [`Dispatcher::with_backend`]
//! request, then the [`BACKEND_ENV`] environment variable, then CPU feature
//! detection. Requests for a backend the CPU cannot run fall back to the
//! detected one.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

#[cfg(feature = "tracing")]
use tracing::{debug, instrument, warn};

use crate::Digest128;
use crate::batch::{BatchDigests, BatchShape, LaneWord, portable, schedule};
use crate::error::ParseBackendError;

/// Environment variable that overrides backend detection.
///
/// Accepts `auto`, `avx512` or `scalar`, case-insensitively.
pub const BACKEND_ENV: &str = "MURMUR3_BATCH_BACKEND";

/// Available batch backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// AVX-512F/DQ with 16 keys in two 8-lane groups.
    Avx512,
    /// Scalar fallback (1 key at a time).
    Scalar,
}

impl Backend {
    /// Number of keys hashed side by side.
    pub const fn lanes(self) -> usize {
        match self {
            Backend::Avx512 => 16,
            Backend::Scalar => 1,
        }
    }

    /// Lowercase name, as accepted by [`BACKEND_ENV`].
    pub const fn name(self) -> &'static str {
        match self {
            Backend::Avx512 => "avx512",
            Backend::Scalar => "scalar",
        }
    }

    /// Reports whether this build and CPU can run the backend.
    pub fn is_available(self) -> bool {
        match self {
            Backend::Avx512 => avx512_available(),
            Backend::Scalar => true,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "avx512" => Ok(Backend::Avx512),
            "scalar" => Ok(Backend::Scalar),
            _ => Err(ParseBackendError(s.to_owned())),
        }
    }
}

#[cfg(all(target_arch = "x86_64", feature = "simd-batch"))]
fn avx512_available() -> bool {
    is_x86_feature_detected!("avx512f") && is_x86_feature_detected!("avx512dq")
}

#[cfg(not(all(target_arch = "x86_64", feature = "simd-batch")))]
fn avx512_available() -> bool {
    false
}

/// Parses a [`BACKEND_ENV`] value; `auto` yields `None`.
fn parse_override(value: &str) -> Result<Option<Backend>, ParseBackendError> {
    if value.trim().eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    value.parse().map(Some)
}

/// Dispatcher that routes batch digests to the selected backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatcher {
    backend: Backend,
}

impl Dispatcher {
    /// Honors [`BACKEND_ENV`], then selects the best backend the CPU supports.
    pub fn detect() -> Self {
        let requested = match std::env::var(BACKEND_ENV) {
            Ok(value) => match parse_override(&value) {
                Ok(requested) => requested,
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    warn!(error = %_err, "ignoring {BACKEND_ENV}");
                    None
                }
            },
            Err(_) => None,
        };

        let backend = match requested {
            Some(backend) => Self::resolve(backend),
            None => Self::detect_backend(),
        };

        #[cfg(feature = "tracing")]
        debug!(backend = %backend, lanes = backend.lanes(), "selected murmur3 batch backend");

        Self { backend }
    }

    /// Uses `backend` when the CPU supports it, otherwise the detected one.
    pub fn with_backend(backend: Backend) -> Self {
        Self {
            backend: Self::resolve(backend),
        }
    }

    fn resolve(requested: Backend) -> Backend {
        if requested.is_available() {
            return requested;
        }

        #[cfg(feature = "tracing")]
        warn!(requested = %requested, "batch backend unavailable on this CPU, falling back");

        Self::detect_backend()
    }

    fn detect_backend() -> Backend {
        if Backend::Avx512.is_available() {
            return Backend::Avx512;
        }
        Backend::Scalar
    }

    /// Get the selected backend.
    pub const fn backend(&self) -> Backend {
        self.backend
    }

    /// Computes x64_128 digests for keys of any lengths, in input order.
    ///
    /// Keys sharing a length are hashed sixteen at a time on the vector
    /// backend; the rest go through the scalar function.
    #[cfg_attr(feature = "tracing", instrument(skip(self, keys), fields(backend = %self.backend, keys = keys.len()), name = "digest_batch"))]
    pub fn digest_batch<T: AsRef<[u8]>>(&self, keys: &[T], seed: u32) -> Vec<Digest128> {
        if keys.is_empty() {
            return Vec::new();
        }

        match self.backend {
            Backend::Avx512 => schedule::run(self, keys, seed),
            Backend::Scalar => keys
                .iter()
                .map(|key| crate::murmur3_x64_128(key.as_ref(), seed))
                .collect(),
        }
    }

    /// Runs a validated 16-way batch on the selected backend.
    #[allow(unsafe_code)]
    pub(crate) fn digest_soa(
        &self,
        vkey1: &[LaneWord],
        vkey2: &[LaneWord],
        shape: BatchShape,
        seed: u32,
    ) -> BatchDigests {
        match self.backend {
            #[cfg(all(target_arch = "x86_64", feature = "simd-batch"))]
            Backend::Avx512 => {
                // SAFETY: `Avx512` is only selected after runtime detection of
                // AVX-512F and AVX-512DQ, and callers validate `shape` against
                // both groups.
                unsafe {
                    crate::batch::avx512::digest_x16(vkey1, vkey2, shape, seed)
                }
            }
            _ => portable::digest_x16(vkey1, vkey2, shape, seed),
        }
    }
}

/// Global dispatcher instance, initialized on first use.
pub fn global() -> &'static Dispatcher {
    static DISPATCHER: OnceLock<Dispatcher> = OnceLock::new();
    DISPATCHER.get_or_init(Dispatcher::detect)
}
