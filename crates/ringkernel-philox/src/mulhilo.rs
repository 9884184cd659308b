//! Wide multiplication and 64/32-bit splitting helpers.
//!
//! Every Philox round is built on `mulhilo32`: the full 64-bit product of two
//! 32-bit words, returned as its high and low halves.

/// High 32 bits of a 64-bit value.
#[inline(always)]
pub const fn high32(x: u64) -> u32 {
    (x >> 32) as u32
}

/// Low 32 bits of a 64-bit value.
#[inline(always)]
pub const fn low32(x: u64) -> u32 {
    (x & 0xFFFF_FFFF) as u32
}

/// Join two 32-bit words into one 64-bit value (`lo` is the least significant).
#[inline(always)]
pub const fn join32(lo: u32, hi: u32) -> u64 {
    ((hi as u64) << 32) | lo as u64
}

/// Multiply two 32-bit words and split the exact product into `(hi, lo)`.
///
/// The product of two 32-bit operands always fits in 64 bits, so this is
/// total and never overflows.
#[inline(always)]
pub const fn mul_wide(a: u32, b: u32) -> (u32, u32) {
    let product = a as u64 * b as u64;
    (high32(product), low32(product))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_helpers() {
        let x = 0x0123_4567_89AB_CDEFu64;
        assert_eq!(high32(x), 0x0123_4567);
        assert_eq!(low32(x), 0x89AB_CDEF);
        assert_eq!(join32(low32(x), high32(x)), x);
    }

    #[test]
    fn test_mul_wide_extremes() {
        assert_eq!(mul_wide(0, 0xFFFF_FFFF), (0, 0));
        assert_eq!(mul_wide(1, 0xD251_1F53), (0, 0xD251_1F53));
        // (2^32 - 1)^2 = 2^64 - 2^33 + 1
        assert_eq!(mul_wide(u32::MAX, u32::MAX), (0xFFFF_FFFE, 0x0000_0001));
    }

    #[test]
    fn test_mul_wide_matches_u64_product() {
        let pairs = [
            (0xD251_1F53u32, 0x1234_5678u32),
            (0xCD9E_8D57, 0x9ABC_DEF0),
            (0x8000_0000, 2),
        ];

        for (a, b) in pairs {
            let (hi, lo) = mul_wide(a, b);
            assert_eq!(join32(lo, hi), a as u64 * b as u64);
        }
    }
}
