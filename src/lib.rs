//! xxhash-core — deterministic, seeded non-cryptographic hashing.
//!
//! Implements XXH32 ([`hash32`]), XXH64 ([`hash64`]), and the XXH3 family
//! (64-bit via [`hash3_64`] and friends, 128-bit via [`hash3_128`] and
//! friends), plus the streaming XXH3 state machine ([`Xxh3State`]) for
//! input arriving in chunks. No networking, no async, no global mutable
//! state beyond the one-time backend capability probe in [`backend`].
//!
//! INVARIANTS:
//! 1. Every algorithmic function is total and pure over well-formed input;
//!    the only fallible operations are secret-length validation, forcing
//!    an unsupported backend, and aligned allocation (see [`error`]).
//! 2. Every vector backend in [`backend`] must be bit-identical to the
//!    scalar reference in [`accumulator`] — see `DESIGN.md`.
//! 3. The streaming digest over any chunking of an input equals the
//!    one-shot digest over its concatenation (spec §4.5).

pub mod accumulator;
pub mod alloc_buf;
pub mod backend;
pub mod canonical;
pub mod error;
pub mod hash3;
pub mod primitives;
pub mod secret;
pub mod short;
pub mod stream;
pub mod xxh32;
pub mod xxh64;

pub use backend::{current_backend, force_backend, BackendId};
pub use canonical::{
    compare_128, equal_128, from_canonical128, from_canonical32, from_canonical64,
    to_canonical128, to_canonical32, to_canonical64, Digest128,
};
pub use error::{Result, XxError};
pub use hash3::{
    hash3_128, hash3_128_with_secret, hash3_128_with_seed, hash3_64, hash3_64_with_secret,
    hash3_64_with_seed,
};
pub use secret::{generate_secret, SECRET_DEFAULT_SIZE, SECRET_MIN};
pub use stream::Xxh3State;
pub use xxh32::hash32;
pub use xxh64::xxh64 as hash64;
