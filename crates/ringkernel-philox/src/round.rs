//! Philox-4x32 round function, key schedule and counter arithmetic.
//!
//! All functions are generic over the storage backend and contain no
//! branches that depend on the data except the carry checks, so they compile
//! to the same handful of multiplies and xors for every backend.

use crate::backend::WordArray;
use crate::mulhilo::{high32, join32, low32, mul_wide};
use crate::params::PhiloxParams;

/// Round multiplier applied to counter word 0.
pub const PHILOX_M4X32_0: u32 = 0xD251_1F53;
/// Round multiplier applied to counter word 2.
pub const PHILOX_M4X32_1: u32 = 0xCD9E_8D57;

/// Golden ratio Weyl constant.
pub const PHILOX_W64_0: u64 = 0x9E37_79B9_7F4A_7C15;
/// sqrt(3) - 1 Weyl constant.
pub const PHILOX_W64_1: u64 = 0xBB67_AE85_84CA_A73B;

/// Key increment for key word 0.
pub const PHILOX_W32_0: u32 = high32(PHILOX_W64_0);
/// Key increment for key word 1.
pub const PHILOX_W32_1: u32 = high32(PHILOX_W64_1);

/// Single round of the Philox S-P network.
#[inline(always)]
pub fn single_round<C, K>(counter: &C, key: &K) -> C
where
    C: WordArray<4>,
    K: WordArray<2>,
{
    let (hi0, lo0) = mul_wide(counter[0], PHILOX_M4X32_0);
    let (hi1, lo1) = mul_wide(counter[2], PHILOX_M4X32_1);

    C::from_words([
        hi1 ^ counter[1] ^ key[0],
        lo1,
        hi0 ^ counter[3] ^ key[1],
        lo0,
    ])
}

/// Bump the key by the Weyl sequence step.
#[inline(always)]
pub fn bump_key<K: WordArray<2>>(key: &K) -> K {
    K::from_words([
        key[0].wrapping_add(PHILOX_W32_0),
        key[1].wrapping_add(PHILOX_W32_1),
    ])
}

/// Increment the counter by one with a 128-bit carry.
#[inline(always)]
pub fn advance_counter<C: WordArray<4>>(counter: &mut C) {
    for i in 0..4 {
        counter[i] = counter[i].wrapping_add(1);
        if counter[i] != 0 {
            break;
        }
    }
}

/// Add `offset` to counter words 0-1, carrying into words 2-3.
#[inline(always)]
pub fn skip4<C: WordArray<4>>(counter: &mut C, offset: u64) {
    let (low, carry) = join32(counter[0], counter[1]).overflowing_add(offset);
    counter[0] = low32(low);
    counter[1] = high32(low);

    if carry {
        let high = join32(counter[2], counter[3]).wrapping_add(1);
        counter[2] = low32(high);
        counter[3] = high32(high);
    }
}

/// Add `subsequence` to counter words 2-3; a carry out of word 3 is dropped.
#[inline(always)]
pub fn skip_subsequence<C: WordArray<4>>(counter: &mut C, subsequence: u64) {
    let high = join32(counter[2], counter[3]).wrapping_add(subsequence);
    counter[2] = low32(high);
    counter[3] = high32(high);
}

/// Run `P::ROUNDS` rounds: the first with the initial key, then bump + round.
#[inline]
pub fn n_rounds<P, C, K>(counter: &C, key: &K) -> C
where
    P: PhiloxParams,
    C: WordArray<4>,
    K: WordArray<2>,
{
    let mut key = *key;
    let mut counter = single_round(counter, &key);

    for _ in 1..P::ROUNDS {
        key = bump_key(&key);
        counter = single_round(&counter, &key);
    }

    counter
}
