//! H3 length-bucketed short-input kernels (spec §4.2 for 64-bit, §4.3 for
//! the 128-bit variant), covering every length from 0 up to and including
//! [`MIDSIZE_MAX`]. Lengths above that fall through to [`crate::accumulator`].
//!
//! The 64-bit buckets are transcribed directly from spec §4.2. The spec
//! defers the 128-bit buckets to "the source's 128-bit bucket formulas";
//! those are transcribed here from the reference C implementation, since
//! they are genuinely a distinct set of constants and lane layouts, not a
//! mechanical doubling of the 64-bit ones.

use crate::primitives::{
    avalanche64, avalanche64_strong, mul128_fold64, mul64to128, read_le32, read_le64, P32_2,
    P64_1, P64_2, P64_4,
};
use crate::secret::SECRET_MIN;
use crate::canonical::Digest128;

/// Above this length, callers must use the long-input accumulator path
/// instead (spec §4.2 `MIDSIZE_MAX`).
pub const MIDSIZE_MAX: usize = 240;

const MIDSIZE_STARTOFFSET: usize = 3;
const MIDSIZE_LASTOFFSET: usize = 17;

#[inline(always)]
fn mult32to64(x: u32, y: u32) -> u64 {
    (x as u64) * (y as u64)
}

// ---------------------------------------------------------------------
// 64-bit buckets
// ---------------------------------------------------------------------

fn len_1to3_64b(input: &[u8], secret: &[u8], seed: u64) -> u64 {
    let len = input.len() as u32;
    let c1 = input[0];
    let c2 = input[input.len() >> 1];
    let c3 = input[input.len() - 1];
    let combined = ((c1 as u32) << 16) | ((c2 as u32) << 24) | (c3 as u32) | (len << 8);
    let bitflip = ((read_le32(secret, 0) ^ read_le32(secret, 4)) as u64).wrapping_add(seed);
    let keyed = (combined as u64) ^ bitflip;
    avalanche64_strong(keyed)
}

fn len_4to8_64b(input: &[u8], secret: &[u8], seed: u64) -> u64 {
    let len = input.len();
    let seed = seed ^ (((seed as u32).swap_bytes() as u64) << 32);
    let input1 = read_le32(input, 0);
    let input2 = read_le32(input, len - 4);
    let bitflip = (read_le64(secret, 8) ^ read_le64(secret, 16)).wrapping_sub(seed);
    let input64 = (input2 as u64).wrapping_add((input1 as u64) << 32);
    let mut x = input64 ^ bitflip;
    x ^= x.rotate_left(49) ^ x.rotate_left(24);
    x = x.wrapping_mul(0x9FB2_1C65_1E98_DF25);
    x ^= (x >> 35).wrapping_add(len as u64);
    x = x.wrapping_mul(0x9FB2_1C65_1E98_DF25);
    x ^ (x >> 28)
}

fn len_9to16_64b(input: &[u8], secret: &[u8], seed: u64) -> u64 {
    let len = input.len();
    let bitflip1 = (read_le64(secret, 24) ^ read_le64(secret, 32)).wrapping_add(seed);
    let bitflip2 = (read_le64(secret, 40) ^ read_le64(secret, 48)).wrapping_sub(seed);
    let input_lo = read_le64(input, 0) ^ bitflip1;
    let input_hi = read_le64(input, len - 8) ^ bitflip2;
    let acc = (len as u64)
        .wrapping_add(input_lo.swap_bytes())
        .wrapping_add(input_hi)
        .wrapping_add(mul128_fold64(input_lo, input_hi));
    avalanche64(acc)
}

/// H3-64 over 0..=16 bytes (spec §4.2).
pub fn len_0to16_64b(input: &[u8], secret: &[u8], seed: u64) -> u64 {
    let len = input.len();
    if len > 8 {
        len_9to16_64b(input, secret, seed)
    } else if len >= 4 {
        len_4to8_64b(input, secret, seed)
    } else if len != 0 {
        len_1to3_64b(input, secret, seed)
    } else {
        avalanche64_strong(seed ^ (read_le64(secret, 56) ^ read_le64(secret, 64)))
    }
}

fn mix16b(input: &[u8], secret: &[u8], seed: u64) -> u64 {
    let input_lo = read_le64(input, 0);
    let input_hi = read_le64(input, 8);
    let (lo, hi) = mul64to128(
        input_lo ^ (read_le64(secret, 0).wrapping_add(seed)),
        input_hi ^ (read_le64(secret, 8).wrapping_sub(seed)),
    );
    lo ^ hi
}

/// H3-64 over 17..=128 bytes (spec §4.2).
pub fn len_17to128_64b(input: &[u8], secret: &[u8], seed: u64) -> u64 {
    let len = input.len();
    let mut acc = (len as u64).wrapping_mul(P64_1);
    if len > 32 {
        if len > 64 {
            if len > 96 {
                acc = acc.wrapping_add(mix16b(&input[48..], &secret[96..], seed));
                acc = acc.wrapping_add(mix16b(&input[len - 64..], &secret[112..], seed));
            }
            acc = acc.wrapping_add(mix16b(&input[32..], &secret[64..], seed));
            acc = acc.wrapping_add(mix16b(&input[len - 48..], &secret[80..], seed));
        }
        acc = acc.wrapping_add(mix16b(&input[16..], &secret[32..], seed));
        acc = acc.wrapping_add(mix16b(&input[len - 32..], &secret[48..], seed));
    }
    acc = acc.wrapping_add(mix16b(input, secret, seed));
    acc = acc.wrapping_add(mix16b(&input[len - 16..], &secret[16..], seed));
    avalanche64(acc)
}

/// H3-64 over 129..=[`MIDSIZE_MAX`] bytes (spec §4.2).
pub fn len_129to240_64b(input: &[u8], secret: &[u8], seed: u64) -> u64 {
    debug_assert!(secret.len() >= SECRET_MIN);
    let len = input.len();
    let mut acc = (len as u64).wrapping_mul(P64_1);
    let nb_rounds = len / 16;
    for i in 0..8 {
        acc = acc.wrapping_add(mix16b(&input[16 * i..], &secret[16 * i..], seed));
    }
    acc = avalanche64(acc);
    for i in 8..nb_rounds {
        acc = acc.wrapping_add(mix16b(
            &input[16 * i..],
            &secret[(16 * (i - 8)) + MIDSIZE_STARTOFFSET..],
            seed,
        ));
    }
    acc = acc.wrapping_add(mix16b(
        &input[len - 16..],
        &secret[SECRET_MIN - MIDSIZE_LASTOFFSET..],
        seed,
    ));
    avalanche64(acc)
}

/// H3-64 dispatch over the whole short-kernel range (spec §4.2).
pub fn hash3_64_short(input: &[u8], secret: &[u8], seed: u64) -> u64 {
    let len = input.len();
    if len <= 16 {
        len_0to16_64b(input, secret, seed)
    } else if len <= 128 {
        len_17to128_64b(input, secret, seed)
    } else {
        len_129to240_64b(input, secret, seed)
    }
}

// ---------------------------------------------------------------------
// 128-bit buckets
// ---------------------------------------------------------------------

fn len_1to3_128b(input: &[u8], secret: &[u8], seed: u64) -> Digest128 {
    let len = input.len() as u32;
    let c1 = input[0];
    let c2 = input[input.len() >> 1];
    let c3 = input[input.len() - 1];
    let combined_lo = ((c1 as u32) << 16) | ((c2 as u32) << 24) | (c3 as u32) | (len << 8);
    let combined_hi = combined_lo.swap_bytes().rotate_left(13);
    let bitflip_lo = ((read_le32(secret, 0) ^ read_le32(secret, 4)) as u64).wrapping_add(seed);
    let bitflip_hi = ((read_le32(secret, 8) ^ read_le32(secret, 12)) as u64).wrapping_sub(seed);
    let keyed_lo = (combined_lo as u64) ^ bitflip_lo;
    let keyed_hi = (combined_hi as u64) ^ bitflip_hi;
    Digest128::new(avalanche64_strong(keyed_lo), avalanche64_strong(keyed_hi))
}

fn len_4to8_128b(input: &[u8], secret: &[u8], seed: u64) -> Digest128 {
    let len = input.len();
    let seed = seed ^ (((seed as u32).swap_bytes() as u64) << 32);
    let input_lo = read_le32(input, 0);
    let input_hi = read_le32(input, len - 4);
    let input64 = (input_lo as u64).wrapping_add((input_hi as u64) << 32);
    let bitflip = (read_le64(secret, 16) ^ read_le64(secret, 24)).wrapping_add(seed);
    let keyed = input64 ^ bitflip;

    let (mut low64, mut high64) = mul64to128(keyed, P64_1.wrapping_add((len as u64) << 2));
    high64 = high64.wrapping_add(low64 << 1);
    low64 ^= high64 >> 3;
    low64 = low64 ^ (low64 >> 35);
    low64 = low64.wrapping_mul(0x9FB2_1C65_1E98_DF25);
    low64 ^= low64 >> 28;
    high64 = avalanche64(high64);
    Digest128::new(low64, high64)
}

fn len_9to16_128b(input: &[u8], secret: &[u8], seed: u64) -> Digest128 {
    let len = input.len();
    let bitflip_lo = (read_le64(secret, 32) ^ read_le64(secret, 40)).wrapping_sub(seed);
    let bitflip_hi = (read_le64(secret, 48) ^ read_le64(secret, 56)).wrapping_add(seed);
    let input_lo = read_le64(input, 0);
    let mut input_hi = read_le64(input, len - 8);

    let (mut m_lo, mut m_hi) = mul64to128(input_lo ^ input_hi ^ bitflip_lo, P64_1);
    m_lo = m_lo.wrapping_add(((len as u64) - 1) << 54);
    input_hi ^= bitflip_hi;
    m_hi = m_hi
        .wrapping_add(input_hi)
        .wrapping_add(mult32to64(input_hi as u32, P32_2 - 1));
    m_lo ^= m_hi.swap_bytes();

    let (h_lo, mut h_hi) = mul64to128(m_lo, P64_2);
    h_hi = h_hi.wrapping_add(m_hi.wrapping_mul(P64_2));
    Digest128::new(avalanche64(h_lo), avalanche64(h_hi))
}

/// H3-128 over 0..=16 bytes (source's 128-bit bucket formulas, referenced
/// from spec §4.3).
pub fn len_0to16_128b(input: &[u8], secret: &[u8], seed: u64) -> Digest128 {
    let len = input.len();
    if len > 8 {
        len_9to16_128b(input, secret, seed)
    } else if len >= 4 {
        len_4to8_128b(input, secret, seed)
    } else if len != 0 {
        len_1to3_128b(input, secret, seed)
    } else {
        let bitflip_lo = read_le64(secret, 64) ^ read_le64(secret, 72);
        let bitflip_hi = read_le64(secret, 80) ^ read_le64(secret, 88);
        Digest128::new(
            avalanche64_strong(seed ^ bitflip_lo),
            avalanche64_strong(seed ^ bitflip_hi),
        )
    }
}

fn mix32b(acc: Digest128, in1: &[u8], in2: &[u8], secret: &[u8], seed: u64) -> Digest128 {
    let low64 = acc
        .low64
        .wrapping_add(mix16b(in1, secret, seed))
        ^ read_le64(in2, 0).wrapping_add(read_le64(in2, 8));
    let high64 = acc
        .high64
        .wrapping_add(mix16b(in2, &secret[16..], seed))
        ^ read_le64(in1, 0).wrapping_add(read_le64(in1, 8));
    Digest128::new(low64, high64)
}

fn finish_mid(acc: Digest128, len: usize, seed: u64) -> Digest128 {
    let low64 = avalanche64(acc.low64.wrapping_add(acc.high64));
    let high64_pre = acc
        .low64
        .wrapping_mul(P64_1)
        .wrapping_add(acc.high64.wrapping_mul(P64_4))
        .wrapping_add(((len as u64).wrapping_sub(seed)).wrapping_mul(P64_2));
    Digest128::new(low64, 0u64.wrapping_sub(avalanche64(high64_pre)))
}

/// H3-128 over 17..=128 bytes (source's 128-bit bucket formulas).
pub fn len_17to128_128b(input: &[u8], secret: &[u8], seed: u64) -> Digest128 {
    let len = input.len();
    let mut acc = Digest128::new((len as u64).wrapping_mul(P64_1), 0);
    if len > 32 {
        if len > 64 {
            if len > 96 {
                acc = mix32b(acc, &input[48..], &input[len - 64..], &secret[96..], seed);
            }
            acc = mix32b(acc, &input[32..], &input[len - 48..], &secret[64..], seed);
        }
        acc = mix32b(acc, &input[16..], &input[len - 32..], &secret[32..], seed);
    }
    acc = mix32b(acc, input, &input[len - 16..], secret, seed);
    finish_mid(acc, len, seed)
}

/// H3-128 over 129..=[`MIDSIZE_MAX`] bytes (source's 128-bit bucket formulas).
pub fn len_129to240_128b(input: &[u8], secret: &[u8], seed: u64) -> Digest128 {
    let len = input.len();
    let nb_rounds = len / 32;
    let mut acc = Digest128::new((len as u64).wrapping_mul(P64_1), 0);
    for i in 0..4 {
        acc = mix32b(
            acc,
            &input[32 * i..],
            &input[32 * i + 16..],
            &secret[32 * i..],
            seed,
        );
    }
    acc = Digest128::new(avalanche64(acc.low64), avalanche64(acc.high64));
    for i in 4..nb_rounds {
        acc = mix32b(
            acc,
            &input[32 * i..],
            &input[32 * i + 16..],
            &secret[MIDSIZE_STARTOFFSET + 32 * (i - 4)..],
            seed,
        );
    }
    acc = mix32b(
        acc,
        &input[len - 16..],
        &input[len - 32..],
        &secret[SECRET_MIN - MIDSIZE_LASTOFFSET - 16..],
        0u64.wrapping_sub(seed),
    );
    finish_mid(acc, len, seed)
}

/// H3-128 dispatch over the whole short-kernel range (spec §4.3).
pub fn hash3_128_short(input: &[u8], secret: &[u8], seed: u64) -> Digest128 {
    let len = input.len();
    if len <= 16 {
        len_0to16_128b(input, secret, seed)
    } else if len <= 128 {
        len_17to128_128b(input, secret, seed)
    } else {
        len_129to240_128b(input, secret, seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secret::DEFAULT_SECRET;

    #[test]
    fn hash3_64_empty_matches_known_answer() {
        assert_eq!(
            hash3_64_short(b"", &DEFAULT_SECRET, 0),
            0x2d06_8005_38d3_94c2
        );
    }

    #[test]
    fn hash3_64_buckets_are_deterministic() {
        let buf: Vec<u8> = (0..200u32).map(|v| v as u8).collect();
        for len in [1usize, 3, 4, 8, 9, 16, 17, 100, 128, 129, 200, 240] {
            let a = hash3_64_short(&buf[..len], &DEFAULT_SECRET, 42);
            let b = hash3_64_short(&buf[..len], &DEFAULT_SECRET, 42);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn hash3_64_known_answers_per_bucket() {
        let buf: Vec<u8> = (0..200u32).map(|v| (v % 256) as u8).collect();
        let cases: [(usize, u64); 6] = [
            (1, 0x5cf1_0f10_bf2d_d245),
            (4, 0xd857_1bd6_d6d1_7e42),
            (9, 0xec60_d791_3c54_10f9),
            (17, 0x2668_e397_7d45_1c23),
            (129, 0x82b8_0bdd_4ac2_9db5),
            (150, 0xe150_df77_a1d5_f826),
        ];
        for (len, expected) in cases {
            assert_eq!(hash3_64_short(&buf[..len], &DEFAULT_SECRET, 42), expected);
        }
    }

    #[test]
    fn hash3_64_seed_changes_output_across_buckets() {
        let buf: Vec<u8> = (0..200u32).map(|v| v as u8).collect();
        for len in [1usize, 5, 12, 40, 150] {
            assert_ne!(
                hash3_64_short(&buf[..len], &DEFAULT_SECRET, 0),
                hash3_64_short(&buf[..len], &DEFAULT_SECRET, 1),
            );
        }
    }

    #[test]
    fn hash3_128_empty_matches_known_answer() {
        let d = hash3_128_short(b"", &DEFAULT_SECRET, 0);
        assert_eq!(d.low64, 0x6001_c324_468d_497f);
        assert_eq!(d.high64, 0x99aa_06d3_0147_98d8);
    }

    #[test]
    fn hash3_128_known_answers_per_bucket() {
        let buf: Vec<u8> = (0..200u32).map(|v| (v % 256) as u8).collect();
        let cases: [(usize, u64, u64); 6] = [
            (1, 0x5cf1_0f10_bf2d_d245, 0xea04_d3fd_8852_dd2a),
            (4, 0xd876_c6f1_307e_7b64, 0x48a2_4076_e64d_ae48),
            (9, 0x93f7_f6ff_021d_1475, 0x8fa4_4248_294e_1bc5),
            (17, 0xff17_59db_8e15_f1ad, 0xe218_637b_eef5_edb4),
            (129, 0x40b9_1a40_e618_88b9, 0x9e41_bfea_f492_d7e5),
            (150, 0xfb73_6885_40e9_b222, 0x49dd_9227_7f49_a9a3),
        ];
        for (len, low, high) in cases {
            let d = hash3_128_short(&buf[..len], &DEFAULT_SECRET, 42);
            assert_eq!(d.low64, low);
            assert_eq!(d.high64, high);
        }
    }

    #[test]
    fn hash3_128_low64_matches_hash3_64_for_same_input() {
        // Both the 64-bit and 128-bit short kernels reuse the same seed and
        // secret bytes for the 0-length and 1-3 byte buckets' low lane.
        let d = hash3_128_short(b"a", &DEFAULT_SECRET, 0);
        let h = hash3_64_short(b"a", &DEFAULT_SECRET, 0);
        assert_eq!(d.low64, h);
    }

    #[test]
    fn hash3_128_buckets_are_deterministic() {
        let buf: Vec<u8> = (0..200u32).map(|v| v as u8).collect();
        for len in [1usize, 3, 4, 8, 9, 16, 17, 100, 128, 129, 200, 240] {
            let a = hash3_128_short(&buf[..len], &DEFAULT_SECRET, 7);
            let b = hash3_128_short(&buf[..len], &DEFAULT_SECRET, 7);
            assert_eq!(a, b);
        }
    }
}
