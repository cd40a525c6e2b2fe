//! Top-level H3 dispatch (spec §6 `hash3_64*`/`hash3_128*`): routes a call
//! to the length-bucketed short kernel ([`crate::short`]) or the long-input
//! accumulator ([`crate::accumulator`]) depending on [`MIDSIZE_MAX`], and
//! picks which secret the long path consumes depending on whether the
//! caller supplied a seed, a custom secret, or neither.

use crate::accumulator::{hash3_128_long, hash3_64_long};
use crate::canonical::Digest128;
use crate::error::Result;
use crate::secret::{self, SecretSource, DEFAULT_SECRET, SECRET_DEFAULT_SIZE};
use crate::short::{hash3_128_short, hash3_64_short, MIDSIZE_MAX};

/// Derives the secret a seeded long-input call should use: the default
/// secret unmodified when `seed == 0` (matching the reference's "avoid the
/// derivation whenever possible" fast path), otherwise a freshly derived
/// one (spec §4.4 `init_custom_secret`).
fn secret_for_seed(seed: u64) -> SecretSource<'static> {
    if seed == 0 {
        SecretSource::Borrowed(&DEFAULT_SECRET)
    } else {
        let mut derived = [0u8; SECRET_DEFAULT_SIZE];
        secret::init_custom_secret(&mut derived, seed);
        SecretSource::Owned(derived)
    }
}

/// H3-64 over `input` with the default secret and seed 0 (spec §6).
pub fn hash3_64(input: &[u8]) -> u64 {
    hash3_64_with_seed(input, 0)
}

/// H3-64 over `input` with a `u64` seed (spec §6).
pub fn hash3_64_with_seed(input: &[u8], seed: u64) -> u64 {
    if input.len() <= MIDSIZE_MAX {
        hash3_64_short(input, &DEFAULT_SECRET, seed)
    } else {
        let secret = secret_for_seed(seed);
        hash3_64_long(input, secret.as_slice())
    }
}

/// H3-64 over `input` with a caller-supplied secret (spec §6, §7).
///
/// `secret` must be at least [`crate::secret::SECRET_MIN`] bytes; shorter
/// secrets are rejected rather than silently padded.
pub fn hash3_64_with_secret(input: &[u8], secret: &[u8]) -> Result<u64> {
    secret::validate(secret)?;
    if input.len() <= MIDSIZE_MAX {
        Ok(hash3_64_short(input, secret, 0))
    } else {
        Ok(hash3_64_long(input, secret))
    }
}

/// H3-128 over `input` with the default secret and seed 0 (spec §6).
pub fn hash3_128(input: &[u8]) -> Digest128 {
    hash3_128_with_seed(input, 0)
}

/// H3-128 over `input` with a `u64` seed (spec §6).
pub fn hash3_128_with_seed(input: &[u8], seed: u64) -> Digest128 {
    if input.len() <= MIDSIZE_MAX {
        hash3_128_short(input, &DEFAULT_SECRET, seed)
    } else {
        let secret = secret_for_seed(seed);
        hash3_128_long(input, secret.as_slice())
    }
}

/// H3-128 over `input` with a caller-supplied secret (spec §6, §7).
pub fn hash3_128_with_secret(input: &[u8], secret: &[u8]) -> Result<Digest128> {
    secret::validate(secret)?;
    if input.len() <= MIDSIZE_MAX {
        Ok(hash3_128_short(input, secret, 0))
    } else {
        Ok(hash3_128_long(input, secret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash3_64_empty_matches_known_answer() {
        assert_eq!(hash3_64(b""), 0x2d06_8005_38d3_94c2);
    }

    #[test]
    fn hash3_128_empty_matches_known_answer() {
        let d = hash3_128(b"");
        assert_eq!(d.low64, 0x6001_c324_468d_497f);
        assert_eq!(d.high64, 0x99aa_06d3_0147_98d8);
    }

    #[test]
    fn hash3_64_is_continuous_across_the_midsize_boundary() {
        // Not a bit-exactness claim (short and long are different
        // algorithms); just confirms both paths run without panicking and
        // produce *some* stable, distinct-looking results at the seam.
        let a: Vec<u8> = (0..MIDSIZE_MAX as u32).map(|v| v as u8).collect();
        let b: Vec<u8> = (0..(MIDSIZE_MAX + 1) as u32).map(|v| v as u8).collect();
        let ha = hash3_64(&a);
        let hb = hash3_64(&b);
        assert_eq!(ha, hash3_64(&a));
        assert_eq!(hb, hash3_64(&b));
    }

    #[test]
    fn hash3_64_with_seed_zero_matches_default_path() {
        let data: Vec<u8> = (0..1000u32).map(|v| (v % 251) as u8).collect();
        assert_eq!(hash3_64(&data), hash3_64_with_seed(&data, 0));
    }

    #[test]
    fn hash3_64_seed_changes_long_input_output() {
        let data: Vec<u8> = (0..1000u32).map(|v| (v % 251) as u8).collect();
        assert_ne!(
            hash3_64_with_seed(&data, 0),
            hash3_64_with_seed(&data, 0x9E3779B185EBCA87)
        );
    }

    #[test]
    fn hash3_64_with_secret_rejects_short_secret() {
        let data = b"hello world";
        let short_secret = [0u8; 64];
        assert!(hash3_64_with_secret(data, &short_secret).is_err());
    }

    #[test]
    fn hash3_64_with_secret_matches_default_secret_path() {
        let data: Vec<u8> = (0..1000u32).map(|v| (v % 251) as u8).collect();
        assert_eq!(
            hash3_64_with_secret(&data, &DEFAULT_SECRET).unwrap(),
            hash3_64(&data)
        );
    }

    #[test]
    fn hash3_128_low64_matches_hash3_64_for_long_input() {
        let data: Vec<u8> = (0..1000u32).map(|v| (v % 251) as u8).collect();
        assert_eq!(hash3_128(&data).low64, hash3_64(&data));
    }

    #[test]
    fn hash3_64_with_secret_accepts_min_length_secret_for_short_input() {
        // Spec property 6: any secret with |s| >= SECRET_MIN succeeds, not
        // just full-size (192-byte) ones, and that includes the short-input
        // (<= MIDSIZE_MAX) path.
        let secret = [0u8; crate::secret::SECRET_MIN];
        assert!(hash3_64_with_secret(b"hello world", &secret).is_ok());
    }
}
