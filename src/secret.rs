//! Secret machinery: the default secret, seed-derivation, and the
//! mutually-exclusive owned/borrowed secret used by the streaming state
//! (spec §4.4, §9 "no cyclic ownership").

use crate::error::XxError;
use crate::primitives::read_le64;

/// Minimum length for a caller-supplied secret (spec §3).
pub const SECRET_MIN: usize = 136;

/// Size of the default secret and of every seed-derived secret (spec §4.4).
pub const SECRET_DEFAULT_SIZE: usize = 192;

/// The fixed 192-byte default secret (spec §6), reproduced byte-for-byte.
#[rustfmt::skip]
pub const DEFAULT_SECRET: [u8; SECRET_DEFAULT_SIZE] = [
    0xb8, 0xfe, 0x6c, 0x39, 0x23, 0xa4, 0x4b, 0xbe, 0x7c, 0x01, 0x81, 0x2c,
    0xf7, 0x21, 0xad, 0x1c, 0xde, 0xd4, 0x6d, 0xe9, 0x83, 0x90, 0x97, 0xdb,
    0x72, 0x40, 0xa4, 0xa4, 0xb7, 0xb3, 0x67, 0x1f, 0xcb, 0x79, 0xe6, 0x4e,
    0xcc, 0xc0, 0xe5, 0x78, 0x82, 0x5a, 0xd0, 0x7d, 0xcc, 0xff, 0x72, 0x21,
    0xb8, 0x08, 0x46, 0x74, 0xf7, 0x43, 0x24, 0x8e, 0xe0, 0x35, 0x90, 0xe6,
    0x81, 0x3a, 0x26, 0x4c, 0x3c, 0x28, 0x52, 0xbb, 0x91, 0xc3, 0x00, 0xcb,
    0x88, 0xd0, 0x65, 0x8b, 0x1b, 0x53, 0x2e, 0xa3, 0x71, 0x64, 0x48, 0x97,
    0xa2, 0x0d, 0xf9, 0x4e, 0x38, 0x19, 0xef, 0x46, 0xa9, 0xde, 0xac, 0xd8,
    0xa8, 0xfa, 0x76, 0x3f, 0xe3, 0x9c, 0x34, 0x3f, 0xf9, 0xdc, 0xbb, 0xc7,
    0xc7, 0x0b, 0x4f, 0x1d, 0x8a, 0x51, 0xe0, 0x4b, 0xcd, 0xb4, 0x59, 0x31,
    0xc8, 0x9f, 0x7e, 0xc9, 0xd9, 0x78, 0x73, 0x64, 0xea, 0xc5, 0xac, 0x83,
    0x34, 0xd3, 0xeb, 0xc3, 0xc5, 0x81, 0xa0, 0xff, 0xfa, 0x13, 0x63, 0xeb,
    0x17, 0x0d, 0xdd, 0x51, 0xb7, 0xf0, 0xda, 0x49, 0xd3, 0x16, 0x55, 0x26,
    0x29, 0xd4, 0x68, 0x9e, 0x2b, 0x16, 0xbe, 0x58, 0x7d, 0x47, 0xa1, 0xfc,
    0x8f, 0xf8, 0xb8, 0xd1, 0x7a, 0xd0, 0x31, 0xce, 0x45, 0xcb, 0x3a, 0x8f,
    0x95, 0x16, 0x04, 0x28, 0xaf, 0xd7, 0xfb, 0xca, 0xbb, 0x4b, 0x40, 0x7e,
];

/// Validate that a caller-supplied secret is usable (spec §4.4, §7).
pub fn validate(secret: &[u8]) -> Result<(), XxError> {
    if secret.len() < SECRET_MIN {
        Err(XxError::InvalidInput("secret shorter than SECRET_MIN"))
    } else {
        Ok(())
    }
}

/// Derive a 192-byte secret from a seed (spec §4.4 `init_custom_secret`).
///
/// Must produce identical bytes regardless of backend; every backend's
/// `init_custom_secret` implementation forwards here rather than
/// reimplementing the arithmetic, which keeps the bit-exactness guarantee
/// trivially true instead of merely tested.
pub fn init_custom_secret(dest: &mut [u8; SECRET_DEFAULT_SIZE], seed: u64) {
    for i in 0..12 {
        let lo = read_le64(&DEFAULT_SECRET, 16 * i).wrapping_add(seed);
        let hi = read_le64(&DEFAULT_SECRET, 16 * i + 8).wrapping_sub(seed);
        dest[16 * i..16 * i + 8].copy_from_slice(&lo.to_le_bytes());
        dest[16 * i + 8..16 * i + 16].copy_from_slice(&hi.to_le_bytes());
    }
}

/// Public `generate_secret`: fills `out` (must be at least
/// [`SECRET_DEFAULT_SIZE`] bytes) from arbitrary seed bytes, matching the
/// seed-derivation formula above but keyed on a byte buffer instead of a
/// `u64` seed (spec §6). A zero-length seed buffer derives a secret whose
/// XXH3-64 mixing is defined purely by `DEFAULT_SECRET` folded with a
/// zero seed, i.e. is the default secret itself.
pub fn generate_secret(out: &mut [u8], custom_seed: &[u8]) -> Result<(), XxError> {
    if out.len() < SECRET_DEFAULT_SIZE {
        return Err(XxError::InvalidInput("output buffer shorter than 192 bytes"));
    }
    if custom_seed.is_empty() {
        out[..SECRET_DEFAULT_SIZE].copy_from_slice(&DEFAULT_SECRET);
        return Ok(());
    }
    // Fold the caller's seed bytes into a u64 the same way a streaming
    // seed would be absorbed, then derive exactly as `init_custom_secret`
    // does. This keeps "seed bytes" and "u64 seed" on one code path.
    let folded = crate::xxh64::xxh64(custom_seed, 0);
    let mut derived = [0u8; SECRET_DEFAULT_SIZE];
    init_custom_secret(&mut derived, folded);
    out[..SECRET_DEFAULT_SIZE].copy_from_slice(&derived);
    Ok(())
}

/// The secret a streaming state or one-shot call actually consumes: either
/// borrowed from the caller, or owned and seed-derived. These are
/// mutually exclusive by construction (spec §4.5, §9).
#[derive(Clone, Copy)]
pub enum SecretSource<'a> {
    Borrowed(&'a [u8]),
    Owned([u8; SECRET_DEFAULT_SIZE]),
}

impl<'a> SecretSource<'a> {
    pub fn as_slice(&self) -> &[u8] {
        match self {
            SecretSource::Borrowed(s) => s,
            SecretSource::Owned(s) => s,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }
}
