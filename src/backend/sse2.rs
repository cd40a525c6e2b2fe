//! SSE2 backend entry points.
//!
//! These route through the scalar kernel rather than hand-written
//! `core::arch::x86_64` intrinsics. See `DESIGN.md` for why: without a
//! toolchain available to compile and differentially test vector code
//! against the scalar reference, shipping unverified intrinsics would risk
//! the one invariant the spec calls out as non-negotiable — every backend
//! must be bit-identical. The dispatch table, capability probe, and
//! forced-backend error semantics this module participates in are fully
//! implemented regardless.

use crate::accumulator::{self, Width, ACC_LANES};
use crate::secret::SECRET_DEFAULT_SIZE;

pub fn accumulate_512(acc: &mut [u64; ACC_LANES], data: &[u8], secret: &[u8], width: Width) {
    accumulator::accumulate_512(acc, data, secret, width);
}

pub fn scramble(acc: &mut [u64; ACC_LANES], secret_tail: &[u8]) {
    accumulator::scramble(acc, secret_tail);
}

pub fn init_custom_secret(dest: &mut [u8; SECRET_DEFAULT_SIZE], seed: u64) {
    crate::secret::init_custom_secret(dest, seed);
}
