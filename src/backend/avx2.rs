//! AVX2 backend entry points. See `backend::sse2` and `DESIGN.md` for why
//! this currently routes through the scalar kernel instead of
//! `core::arch::x86_64` 256-bit intrinsics.

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
