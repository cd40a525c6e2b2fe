//! XXH64 (`H64`): the classic four-lane 64-bit hash (spec §4.2, §6 `hash64`).

use crate::primitives::{avalanche64_strong, P64_1, P64_2, P64_3, P64_4, P64_5};

const STRIPE_LEN: usize = 32;

#[inline(always)]
fn round(acc: u64, lane: u64) -> u64 {
    let acc = acc.wrapping_add(lane.wrapping_mul(P64_2));
    acc.rotate_left(31).wrapping_mul(P64_1)
}

#[inline(always)]
fn merge_round(mut acc: u64, val: u64) -> u64 {
    acc ^= round(0, val);
    acc.wrapping_mul(P64_1).wrapping_add(P64_4)
}

/// One-shot XXH64 over `bytes` with the given seed (spec §6 `hash64`).
///
/// This is also `crate::secret::generate_secret`'s folding function for
/// arbitrary-length seed byte buffers.
pub fn xxh64(bytes: &[u8], seed: u64) -> u64 {
    let mut data = bytes;
    let len = data.len();
    let mut acc: u64;

    if len >= STRIPE_LEN {
        let mut acc1 = seed.wrapping_add(P64_1).wrapping_add(P64_2);
        let mut acc2 = seed.wrapping_add(P64_2);
        let mut acc3 = seed;
        let mut acc4 = seed.wrapping_sub(P64_1);

        while data.len() >= STRIPE_LEN {
            acc1 = round(acc1, u64::from_le_bytes(data[0..8].try_into().unwrap()));
            acc2 = round(acc2, u64::from_le_bytes(data[8..16].try_into().unwrap()));
            acc3 = round(acc3, u64::from_le_bytes(data[16..24].try_into().unwrap()));
            acc4 = round(acc4, u64::from_le_bytes(data[24..32].try_into().unwrap()));
            data = &data[STRIPE_LEN..];
        }

        acc = acc1
            .rotate_left(1)
            .wrapping_add(acc2.rotate_left(7))
            .wrapping_add(acc3.rotate_left(12))
            .wrapping_add(acc4.rotate_left(18));
        acc = merge_round(acc, acc1);
        acc = merge_round(acc, acc2);
        acc = merge_round(acc, acc3);
        acc = merge_round(acc, acc4);
    } else {
        acc = seed.wrapping_add(P64_5);
    }

    acc = acc.wrapping_add(len as u64);

    while data.len() >= 8 {
        let lane = u64::from_le_bytes(data[0..8].try_into().unwrap());
        acc ^= round(0, lane);
        acc = acc.rotate_left(27).wrapping_mul(P64_1).wrapping_add(P64_4);
        data = &data[8..];
    }

    if data.len() >= 4 {
        let lane = u32::from_le_bytes(data[0..4].try_into().unwrap()) as u64;
        acc ^= lane.wrapping_mul(P64_1);
        acc = acc.rotate_left(23).wrapping_mul(P64_2).wrapping_add(P64_3);
        data = &data[4..];
    }

    for &byte in data {
        acc ^= (byte as u64).wrapping_mul(P64_5);
        acc = acc.rotate_left(11).wrapping_mul(P64_1);
    }

    avalanche64_strong(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_answer_empty() {
        assert_eq!(xxh64(b"", 0), 0xEF46DB3751D8E999);
    }

    #[test]
    fn determinism() {
        assert_eq!(xxh64(b"abc", 7), xxh64(b"abc", 7));
    }

    #[test]
    fn seed_changes_output() {
        assert_ne!(xxh64(b"abc", 0), xxh64(b"abc", 1));
    }
}
