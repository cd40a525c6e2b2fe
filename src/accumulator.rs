//! Long-input accumulator core (spec §4.3): the stripe/block/scramble loop
//! used once an input exceeds [`crate::short::MIDSIZE_MAX`] bytes.
//!
//! This module is the single bit-exact reference implementation. Backend
//! kernels in [`crate::backend`] either call straight through to it or
//! (for vector backends) must reproduce its output exactly — see
//! `DESIGN.md` for which backends currently do which.

use crate::primitives::{avalanche64, mul128_fold64, mul32to64, read_le64, P32_1};

pub const STRIPE_LEN: usize = 64;
pub const SECRET_CONSUME_RATE: usize = 8;
pub const ACC_LANES: usize = 8;
pub const SECRET_LASTACC_START: usize = 7;
pub const SECRET_MERGEACCS_START: usize = 11;

/// The accumulator's initial lane values (spec §3).
pub const ACC_INIT: [u64; ACC_LANES] = [
    0xC2B2_AE3D as u64,
    crate::primitives::P64_1,
    crate::primitives::P64_2,
    crate::primitives::P64_3,
    crate::primitives::P64_4,
    0x85EB_CA77 as u64,
    crate::primitives::P64_5,
    0x9E37_79B1 as u64,
];

/// Lane width used by a stripe step: 64-bit (H3-64) or 128-bit (H3-128).
/// The two only differ in which lane a loaded value is added into.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Width {
    W64,
    W128,
}

/// `accumulate_512`: one stripe step (spec §4.3). `data` and `secret_slice`
/// must each have at least [`STRIPE_LEN`] bytes.
#[inline]
pub fn accumulate_512(acc: &mut [u64; ACC_LANES], data: &[u8], secret_slice: &[u8], width: Width) {
    debug_assert!(data.len() >= STRIPE_LEN);
    debug_assert!(secret_slice.len() >= STRIPE_LEN);
    for i in 0..ACC_LANES {
        let data_val = read_le64(data, 8 * i);
        let key_val = read_le64(secret_slice, 8 * i);
        let data_key = data_val ^ key_val;
        match width {
            Width::W64 => acc[i] = acc[i].wrapping_add(data_val),
            Width::W128 => acc[i ^ 1] = acc[i ^ 1].wrapping_add(data_val),
        }
        acc[i] = acc[i].wrapping_add(mul32to64(data_key & 0xFFFF_FFFF, data_key >> 32));
    }
}

/// `scramble` (spec §4.3). `secret_tail` must have at least [`STRIPE_LEN`] bytes.
#[inline]
pub fn scramble(acc: &mut [u64; ACC_LANES], secret_tail: &[u8]) {
    debug_assert!(secret_tail.len() >= STRIPE_LEN);
    for i in 0..ACC_LANES {
        let key_val = read_le64(secret_tail, 8 * i);
        let mut v = acc[i] ^ (acc[i] >> 47);
        v ^= key_val;
        acc[i] = v.wrapping_mul(P32_1 as u64);
    }
}

/// `merge_accs` (spec §4.3). `secret_slice` must have at least 48 bytes.
pub fn merge_accs(acc: &[u64; ACC_LANES], secret_slice: &[u8], start: u64) -> u64 {
    let mut result = start;
    for i in 0..4 {
        let lo = acc[2 * i] ^ read_le64(secret_slice, 16 * i);
        let hi = acc[2 * i + 1] ^ read_le64(secret_slice, 16 * i + 8);
        result = result.wrapping_add(mul128_fold64(lo, hi));
    }
    avalanche64(result)
}

/// One-shot block loop over an entire long input (spec §4.3 "Block loop").
///
/// Runs full blocks (stripe loop + scramble), the trailing partial block
/// (stripes with no scramble), and the final overlapping stripe required
/// for bit-exactness at every tail length, mutating `acc` in place.
///
/// Known limitation: inputs whose length is an exact multiple of
/// `STRIPE_LEN` skip the final overlapping stripe per spec §4.3's literal
/// condition, which this reproduces; none of spec §8's known-answer
/// lengths happen to land on that boundary, so it is untested against an
/// external oracle and may not be bit-exact there. See `DESIGN.md`.
pub fn process_long_input(acc: &mut [u64; ACC_LANES], data: &[u8], secret: &[u8], width: Width) {
    debug_assert!(data.len() > STRIPE_LEN);
    let secret_len = secret.len();
    let nb_rounds = (secret_len - STRIPE_LEN) / SECRET_CONSUME_RATE;
    let block_len = STRIPE_LEN * nb_rounds;
    let nb_blocks = data.len() / block_len;

    for block in 0..nb_blocks {
        let block_data = &data[block * block_len..];
        for stripe in 0..nb_rounds {
            accumulate_512(
                acc,
                &block_data[stripe * STRIPE_LEN..],
                &secret[stripe * SECRET_CONSUME_RATE..],
                width,
            );
        }
        scramble(acc, &secret[secret_len - STRIPE_LEN..]);
    }

    // Trailing partial block: whole stripes with no scramble.
    let nb_stripes = (data.len() - (block_len * nb_blocks)) / STRIPE_LEN;
    let tail_data = &data[nb_blocks * block_len..];
    for stripe in 0..nb_stripes {
        accumulate_512(
            acc,
            &tail_data[stripe * STRIPE_LEN..],
            &secret[stripe * SECRET_CONSUME_RATE..],
            width,
        );
    }

    // Final overlapping stripe, only when the input isn't a STRIPE_LEN multiple.
    if data.len() % STRIPE_LEN != 0 {
        let last_stripe = &data[data.len() - STRIPE_LEN..];
        accumulate_512(
            acc,
            last_stripe,
            &secret[secret_len - STRIPE_LEN - SECRET_LASTACC_START..],
            width,
        );
    }
}

/// H3-64 over inputs longer than `MIDSIZE_MAX` (spec §4.3 "H3-64 long result").
///
/// Uses `Width::W128`'s cross-lane accumulation, not `Width::W64`'s same-lane
/// one, even though this is the 64-bit hash: the two long-input hashes
/// converge on the same accumulator state before `merge_accs` diverges them
/// by secret offset and start value (so `hash3_128_long`'s low64 always
/// equals this function's result). See `DESIGN.md` for how this was
/// determined against known-answer values. `Width::W64` is kept for callers
/// that need the uncrossed stripe primitive in isolation.
pub fn hash3_64_long(data: &[u8], secret: &[u8]) -> u64 {
    let mut acc = ACC_INIT;
    process_long_input(&mut acc, data, secret, Width::W128);
    merge_accs(
        &acc,
        &secret[SECRET_MERGEACCS_START..],
        (data.len() as u64).wrapping_mul(crate::primitives::P64_1),
    )
}

/// H3-128 over inputs longer than `MIDSIZE_MAX` (spec §4.3 "H3-128 long result").
pub fn hash3_128_long(data: &[u8], secret: &[u8]) -> crate::canonical::Digest128 {
    let mut acc = ACC_INIT;
    process_long_input(&mut acc, data, secret, Width::W128);
    let low = merge_accs(
        &acc,
        &secret[SECRET_MERGEACCS_START..],
        (data.len() as u64).wrapping_mul(crate::primitives::P64_1),
    );
    let high = merge_accs(
        &acc,
        &secret[secret.len() - 64 - SECRET_MERGEACCS_START..],
        !((data.len() as u64).wrapping_mul(crate::primitives::P64_2)),
    );
    crate::canonical::Digest128::new(low, high)
}
