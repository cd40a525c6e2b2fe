//! Bit-level primitives shared by every hash variant and every backend.
//!
//! This is the only module that acknowledges host byte order: everything
//! above it treats bytes as little-endian, per spec §4.1.

/// 32-bit primes (spec §3).
pub const P32_1: u32 = 0x9E3779B1;
pub const P32_2: u32 = 0x85EBCA77;
pub const P32_3: u32 = 0xC2B2AE3D;
pub const P32_4: u32 = 0x27D4EB2F;
pub const P32_5: u32 = 0x165667B1;

/// 64-bit primes (spec §3).
pub const P64_1: u64 = 0x9E3779B185EBCA87;
pub const P64_2: u64 = 0xC2B2AE3D27D4EB4F;
pub const P64_3: u64 = 0x165667B19E3779F9;
pub const P64_4: u64 = 0x85EBCA77C2B2AE63;
pub const P64_5: u64 = 0x27D4EB2F165667C5;

/// Unaligned little-endian 32-bit load.
///
/// `data` must have at least 4 bytes from `offset`; callers already know
/// this from the length bucket they are in, so this only asserts in debug
/// builds rather than returning a `Result` for a precondition the caller
/// has already established.
#[inline(always)]
pub fn read_le32(data: &[u8], offset: usize) -> u32 {
    debug_assert!(data.len() >= offset + 4);
    u32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
}

/// Unaligned little-endian 64-bit load.
#[inline(always)]
pub fn read_le64(data: &[u8], offset: usize) -> u64 {
    debug_assert!(data.len() >= offset + 8);
    u64::from_le_bytes(data[offset..offset + 8].try_into().unwrap())
}

/// `(x & 0xFFFFFFFF) * (y & 0xFFFFFFFF)` as a 64-bit product (spec §4.1).
#[inline(always)]
pub fn mul32to64(x: u64, y: u64) -> u64 {
    (x & 0xFFFF_FFFF) * (y & 0xFFFF_FFFF)
}

/// Full 128-bit product of two 64-bit values, returned as `(low, high)`.
///
/// `u128` gives us the spec's grade-school decomposition for free; the
/// decomposition itself (spec §4.1) is not reproduced here because Rust's
/// native widening multiply already is the "native wide multiply"
/// alternative the spec allows.
#[inline(always)]
pub fn mul64to128(a: u64, b: u64) -> (u64, u64) {
    let product = (a as u128) * (b as u128);
    (product as u64, (product >> 64) as u64)
}

/// `mul64to128(a, b).low ^ mul64to128(a, b).high` (spec §4.1).
#[inline(always)]
pub fn mul128_fold64(a: u64, b: u64) -> u64 {
    let (low, high) = mul64to128(a, b);
    low ^ high
}

/// `v ^ (v >> s)` (spec §4.1).
#[inline(always)]
pub fn xorshift64(v: u64, s: u32) -> u64 {
    v ^ (v >> s)
}

/// Final mixing applied to small hash outputs (spec §4.1).
#[inline(always)]
pub fn avalanche64(mut h: u64) -> u64 {
    h = xorshift64(h, 37);
    h = h.wrapping_mul(0x165667919E3779F9);
    xorshift64(h, 32)
}

/// Classic XXH64-style finalizer: two rounds of shift/multiply instead of
/// `avalanche64`'s one. Used by `H64` itself and by the length-0 and
/// length-1..=3 `H3` short kernels, which need the stronger mix since they
/// have so little input entropy to spread (spec §4.1, §4.3).
#[inline(always)]
pub fn avalanche64_strong(mut h: u64) -> u64 {
    h = xorshift64(h, 33);
    h = h.wrapping_mul(P64_2);
    h = xorshift64(h, 29);
    h = h.wrapping_mul(P64_3);
    xorshift64(h, 32)
}

/// XXH32's avalanche, used by the classic (non-H3) 32-bit hash.
#[inline(always)]
pub fn avalanche32(mut h: u32) -> u32 {
    h ^= h >> 15;
    h = h.wrapping_mul(P32_2);
    h ^= h >> 13;
    h = h.wrapping_mul(P32_3);
    h ^= h >> 16;
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul64to128_matches_u128_arithmetic() {
        let a = 0x9E3779B185EBCA87u64;
        let b = 0xC2B2AE3D27D4EB4Fu64;
        let (lo, hi) = mul64to128(a, b);
        let expected = (a as u128) * (b as u128);
        assert_eq!(lo as u128 | ((hi as u128) << 64), expected);
    }

    #[test]
    fn mul128_fold64_is_xor_of_halves() {
        let (lo, hi) = mul64to128(1234567, 89012345);
        assert_eq!(mul128_fold64(1234567, 89012345), lo ^ hi);
    }

    #[test]
    fn xorshift64_identity_at_zero_shift_equivalent() {
        // xorshift64(v, s) with large s should still terminate and be stable.
        assert_eq!(xorshift64(0, 37), 0);
        assert_eq!(xorshift64(u64::MAX, 63), u64::MAX ^ 1);
    }

    #[test]
    fn read_le_roundtrips_with_native_to_le_bytes() {
        let v: u64 = 0x0102030405060708;
        let mut buf = [0u8; 16];
        buf[4..12].copy_from_slice(&v.to_le_bytes());
        assert_eq!(read_le64(&buf, 4), v);
    }
}
