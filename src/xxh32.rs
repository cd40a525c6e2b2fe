//! XXH32 (`H32`): the classic four-lane 32-bit hash (spec §4.2, §6 `hash32`).
//!
//! This is the small-input/four-lane kernel referenced by spec §2 component
//! 2, distinct from the H3 length-bucketed kernels in [`crate::short`].

use crate::primitives::{avalanche32, P32_1, P32_2, P32_3, P32_4, P32_5};

const STRIPE_LEN: usize = 16;

#[inline(always)]
fn round(acc: u32, lane: u32) -> u32 {
    let acc = acc.wrapping_add(lane.wrapping_mul(P32_2));
    acc.rotate_left(13).wrapping_mul(P32_1)
}

/// One-shot XXH32 over `bytes` with the given seed (spec §6 `hash32`).
pub fn hash32(bytes: &[u8], seed: u32) -> u32 {
    let mut data = bytes;
    let len = data.len();
    let mut acc: u32;

    if len >= 16 {
        let mut acc1 = seed.wrapping_add(P32_1).wrapping_add(P32_2);
        let mut acc2 = seed.wrapping_add(P32_2);
        let mut acc3 = seed;
        let mut acc4 = seed.wrapping_sub(P32_1);

        while data.len() >= STRIPE_LEN {
            acc1 = round(acc1, u32::from_le_bytes(data[0..4].try_into().unwrap()));
            acc2 = round(acc2, u32::from_le_bytes(data[4..8].try_into().unwrap()));
            acc3 = round(acc3, u32::from_le_bytes(data[8..12].try_into().unwrap()));
            acc4 = round(acc4, u32::from_le_bytes(data[12..16].try_into().unwrap()));
            data = &data[STRIPE_LEN..];
        }

        acc = acc1
            .rotate_left(1)
            .wrapping_add(acc2.rotate_left(7))
            .wrapping_add(acc3.rotate_left(12))
            .wrapping_add(acc4.rotate_left(18));
    } else {
        acc = seed.wrapping_add(P32_5);
    }

    acc = acc.wrapping_add(len as u32);

    while data.len() >= 4 {
        let lane = u32::from_le_bytes(data[0..4].try_into().unwrap());
        acc = acc.wrapping_add(lane.wrapping_mul(P32_3));
        acc = acc.rotate_left(17).wrapping_mul(P32_4);
        data = &data[4..];
    }

    for &byte in data {
        acc = acc.wrapping_add((byte as u32).wrapping_mul(P32_5));
        acc = acc.rotate_left(11).wrapping_mul(P32_1);
    }

    avalanche32(acc)
}
