//! Streaming H3 state machine (spec §4.5): `reset` / `update` / `digest`
//! over input arriving in arbitrary-sized chunks, producing the same
//! digest as a single-shot call over the concatenation.

use crate::accumulator::{
    accumulate_512, merge_accs, scramble, Width, ACC_INIT, ACC_LANES, SECRET_CONSUME_RATE,
    SECRET_LASTACC_START, SECRET_MERGEACCS_START, STRIPE_LEN,
};
use crate::alloc_buf::AlignedBuffer;
use crate::canonical::Digest128;
use crate::error::Result;
use crate::primitives::{P64_1, P64_2};
use crate::secret::{self, SecretSource, DEFAULT_SECRET, SECRET_DEFAULT_SIZE};
use crate::short::{hash3_128_short, hash3_64_short, MIDSIZE_MAX};

const INTERNAL_BUFFER: usize = 256;

/// `consume_stripes` (spec §4.5): advances `acc` through `total_stripes`
/// worth of `data`, scrambling at each block boundary, and returns the
/// updated `stripes_so_far`. A free function (not a method) so `digest`
/// can run it against a throwaway `acc` copy without touching `self`.
#[allow(clippy::too_many_arguments)]
fn consume_stripes(
    acc: &mut [u64; ACC_LANES],
    stripes_so_far: usize,
    stripes_per_block: usize,
    data: &[u8],
    total_stripes: usize,
    secret: &[u8],
    secret_limit: usize,
    width: Width,
) -> usize {
    if stripes_per_block - stripes_so_far <= total_stripes {
        let stripes_before = stripes_per_block - stripes_so_far;
        for stripe in 0..stripes_before {
            accumulate_512(
                acc,
                &data[stripe * STRIPE_LEN..],
                &secret[(stripes_so_far + stripe) * SECRET_CONSUME_RATE..],
                width,
            );
        }
        scramble(acc, &secret[secret_limit..]);
        let remaining = total_stripes - stripes_before;
        for stripe in 0..remaining {
            accumulate_512(
                acc,
                &data[(stripes_before + stripe) * STRIPE_LEN..],
                &secret[stripe * SECRET_CONSUME_RATE..],
                width,
            );
        }
        remaining
    } else {
        for stripe in 0..total_stripes {
            accumulate_512(
                acc,
                &data[stripe * STRIPE_LEN..],
                &secret[(stripes_so_far + stripe) * SECRET_CONSUME_RATE..],
                width,
            );
        }
        stripes_so_far + total_stripes
    }
}

/// Streaming H3 state (spec §4.5). Produces both the 64-bit and 128-bit
/// digest from the same absorbed bytes — the accumulator pass is width-
/// parameterized identically to the one-shot long path, so running both
/// costs nothing beyond the final `merge_accs` calls.
pub struct Xxh3State<'a> {
    acc: [u64; ACC_LANES],
    buffer: AlignedBuffer,
    buffered: usize,
    total_len: u64,
    stripes_so_far: usize,
    stripes_per_block: usize,
    secret_limit: usize,
    seed: u64,
    secret: SecretSource<'a>,
}

impl<'a> Xxh3State<'a> {
    /// A fresh state using the default secret and seed 0.
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// A fresh state seeded with `seed` (spec §4.5 `reset_with_seed`).
    pub fn with_seed(seed: u64) -> Self {
        let secret = if seed == 0 {
            SecretSource::Borrowed(&DEFAULT_SECRET)
        } else {
            let mut derived = [0u8; SECRET_DEFAULT_SIZE];
            secret::init_custom_secret(&mut derived, seed);
            SecretSource::Owned(derived)
        };
        Self::from_parts(seed, secret)
    }

    /// A fresh state using a caller-supplied secret (spec §4.5
    /// `reset_with_secret`). `secret` must be at least `SECRET_MIN` bytes.
    pub fn with_secret(secret: &'a [u8]) -> Result<Self> {
        crate::secret::validate(secret)?;
        Ok(Self::from_parts(0, SecretSource::Borrowed(secret)))
    }

    fn from_parts(seed: u64, secret: SecretSource<'a>) -> Self {
        let secret_limit = secret.len() - STRIPE_LEN;
        Self {
            acc: ACC_INIT,
            buffer: AlignedBuffer::new(INTERNAL_BUFFER).expect("streaming buffer allocation"),
            buffered: 0,
            total_len: 0,
            stripes_so_far: 0,
            stripes_per_block: secret_limit / SECRET_CONSUME_RATE,
            secret_limit,
            seed,
            secret,
        }
    }

    /// Re-initializes this state in place, as if freshly constructed with
    /// the same seed/secret (spec §4.5 `reset`).
    pub fn reset(&mut self) {
        self.acc = ACC_INIT;
        self.buffered = 0;
        self.total_len = 0;
        self.stripes_so_far = 0;
    }

    /// Absorbs `input` (spec §4.5 `update`). May be called any number of
    /// times; the digest over the concatenation of every chunk equals the
    /// single-shot digest over that same concatenation.
    pub fn update(&mut self, mut input: &[u8]) {
        self.total_len += input.len() as u64;

        if self.buffered + input.len() <= INTERNAL_BUFFER {
            let buf = self.buffer.as_mut_slice();
            buf[self.buffered..self.buffered + input.len()].copy_from_slice(input);
            self.buffered += input.len();
            return;
        }

        if self.buffered > 0 {
            let take = INTERNAL_BUFFER - self.buffered;
            let (head, rest) = input.split_at(take);
            self.buffer.as_mut_slice()[self.buffered..].copy_from_slice(head);
            self.stripes_so_far = consume_stripes(
                &mut self.acc,
                self.stripes_so_far,
                self.stripes_per_block,
                self.buffer.as_slice(),
                INTERNAL_BUFFER / STRIPE_LEN,
                self.secret.as_slice(),
                self.secret_limit,
                Width::W128,
            );
            self.buffered = 0;
            input = rest;
        }

        while input.len() > INTERNAL_BUFFER {
            self.stripes_so_far = consume_stripes(
                &mut self.acc,
                self.stripes_so_far,
                self.stripes_per_block,
                input,
                INTERNAL_BUFFER / STRIPE_LEN,
                self.secret.as_slice(),
                self.secret_limit,
                Width::W128,
            );
            input = &input[INTERNAL_BUFFER..];
        }

        if !input.is_empty() {
            self.buffer.as_mut_slice()[..input.len()].copy_from_slice(input);
            self.buffered = input.len();
        }
    }

    /// `digest`'s shared accumulator-finishing logic: runs the buffered
    /// tail through a copy of `acc` without mutating `self` (spec §4.5
    /// "digest must not mutate the state").
    ///
    /// When `buffered < STRIPE_LEN`, the last stripe is built from
    /// `STRIPE_LEN - buffered` "catch-up" bytes taken from the *tail of
    /// the full internal buffer*, not zero-padding: those bytes are
    /// leftovers from whatever previously filled the buffer before it was
    /// overwritten from the front, exactly the overlap a single-shot hash
    /// would see at the same offset. `update` never clears unused buffer
    /// bytes, which is what keeps them available here.
    fn finish_acc(&self) -> [u64; ACC_LANES] {
        let mut acc = self.acc;
        let secret = self.secret.as_slice();
        let buffer = self.buffer.as_slice();

        if self.buffered >= STRIPE_LEN {
            let total_nb_stripes = self.buffered / STRIPE_LEN;
            consume_stripes(
                &mut acc,
                self.stripes_so_far,
                self.stripes_per_block,
                buffer,
                total_nb_stripes,
                secret,
                self.secret_limit,
                Width::W128,
            );
            if self.buffered % STRIPE_LEN != 0 {
                let last_stripe = &buffer[self.buffered - STRIPE_LEN..self.buffered];
                accumulate_512(
                    &mut acc,
                    last_stripe,
                    &secret[self.secret_limit - SECRET_LASTACC_START..],
                    Width::W128,
                );
            }
        } else if self.buffered > 0 {
            let catchup = STRIPE_LEN - self.buffered;
            let mut last_stripe = [0u8; STRIPE_LEN];
            last_stripe[..catchup].copy_from_slice(&buffer[INTERNAL_BUFFER - catchup..]);
            last_stripe[catchup..].copy_from_slice(&buffer[..self.buffered]);
            accumulate_512(
                &mut acc,
                &last_stripe,
                &secret[self.secret_limit - SECRET_LASTACC_START..],
                Width::W128,
            );
        }
        acc
    }

    /// H3-64 digest of every byte absorbed so far (spec §4.5 `digest`).
    /// Does not mutate the state; `update` may continue afterward.
    pub fn digest64(&self) -> u64 {
        if self.total_len as usize <= MIDSIZE_MAX {
            return hash3_64_short(
                &self.buffer.as_slice()[..self.buffered],
                self.secret.as_slice(),
                self.seed,
            );
        }
        let acc = self.finish_acc();
        merge_accs(
            &acc,
            &self.secret.as_slice()[SECRET_MERGEACCS_START..],
            self.total_len.wrapping_mul(P64_1),
        )
    }

    /// H3-128 digest of every byte absorbed so far (spec §4.5 `digest`).
    pub fn digest128(&self) -> Digest128 {
        if self.total_len as usize <= MIDSIZE_MAX {
            return hash3_128_short(
                &self.buffer.as_slice()[..self.buffered],
                self.secret.as_slice(),
                self.seed,
            );
        }
        let acc = self.finish_acc();
        let secret = self.secret.as_slice();
        let low = merge_accs(
            &acc,
            &secret[SECRET_MERGEACCS_START..],
            self.total_len.wrapping_mul(P64_1),
        );
        let high = merge_accs(
            &acc,
            &secret[secret.len() - STRIPE_LEN - SECRET_MERGEACCS_START..],
            !self.total_len.wrapping_mul(P64_2),
        );
        Digest128::new(low, high)
    }
}

impl<'a> Default for Xxh3State<'a> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash3::{hash3_128, hash3_128_with_seed, hash3_64, hash3_64_with_seed};

    #[test]
    fn streaming_matches_one_shot_for_a_single_update() {
        let data: Vec<u8> = (0..1000u32).map(|v| (v % 251) as u8).collect();
        let mut state = Xxh3State::new();
        state.update(&data);
        assert_eq!(state.digest64(), hash3_64(&data));
        assert_eq!(state.digest128(), hash3_128(&data));
    }

    #[test]
    fn streaming_matches_one_shot_for_short_input() {
        let data: Vec<u8> = (0..100u32).map(|v| v as u8).collect();
        let mut state = Xxh3State::new();
        state.update(&data);
        assert_eq!(state.digest64(), hash3_64(&data));
    }

    #[test]
    fn streaming_matches_one_shot_across_many_small_chunks() {
        let data: Vec<u8> = (0..5000u32).map(|v| (v % 251) as u8).collect();
        let mut state = Xxh3State::new();
        for chunk in data.chunks(7) {
            state.update(chunk);
        }
        assert_eq!(state.digest64(), hash3_64(&data));
    }

    #[test]
    fn streaming_matches_one_shot_across_large_chunks() {
        let data: Vec<u8> = (0..5000u32).map(|v| (v % 251) as u8).collect();
        let mut state = Xxh3State::new();
        for chunk in data.chunks(777) {
            state.update(chunk);
        }
        assert_eq!(state.digest64(), hash3_64(&data));
    }

    #[test]
    fn streaming_matches_one_shot_at_stripe_boundaries() {
        // Exercises the finish_acc branch where `buffered` lands exactly on
        // a STRIPE_LEN multiple (no trailing partial stripe) as well as
        // just past one.
        for len in [1024usize + 64, 1024 + 65, 1024 + 127] {
            let data: Vec<u8> = (0..len as u32).map(|v| (v % 251) as u8).collect();
            let mut state = Xxh3State::new();
            state.update(&data);
            assert_eq!(state.digest64(), hash3_64(&data), "len={len}");
        }
    }

    #[test]
    fn streaming_with_seed_matches_one_shot_with_seed() {
        let data: Vec<u8> = (0..2000u32).map(|v| (v % 251) as u8).collect();
        let mut state = Xxh3State::with_seed(0x1234_5678_9abc_def0);
        state.update(&data);
        assert_eq!(
            state.digest64(),
            hash3_64_with_seed(&data, 0x1234_5678_9abc_def0)
        );
        assert_eq!(
            state.digest128(),
            hash3_128_with_seed(&data, 0x1234_5678_9abc_def0)
        );
    }

    #[test]
    fn digest_does_not_mutate_state() {
        let data: Vec<u8> = (0..1000u32).map(|v| (v % 251) as u8).collect();
        let mut state = Xxh3State::new();
        state.update(&data[..500]);
        let before = state.digest64();
        let after = state.digest64();
        assert_eq!(before, after);
        state.update(&data[500..]);
        assert_eq!(state.digest64(), hash3_64(&data));
    }

    #[test]
    fn reset_returns_state_to_fresh() {
        let mut state = Xxh3State::new();
        state.update(b"some bytes");
        state.reset();
        assert_eq!(state.digest64(), hash3_64(b""));
    }

    #[test]
    fn with_secret_rejects_short_secret() {
        let short = [0u8; 64];
        assert!(Xxh3State::with_secret(&short).is_err());
    }
}
