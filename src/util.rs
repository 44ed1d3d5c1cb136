// SPDX-License-Identifier: Apache-2.0

use num_bigint::{BigInt, Sign};

pub fn is_pow2(x: u64) -> bool {
    x != 0 && (x & (x - 1)) == 0
}

/// Floor of log2(x); 0 for x <= 1.
pub fn log2_floor(x: u64) -> u32 {
    if x == 0 { 0 } else { 63 - x.leading_zeros() }
}

/// Ceiling of log2(x); 0 for x <= 1.
pub fn log2_ceil(x: u64) -> u32 {
    if x <= 1 {
        0
    } else {
        64 - (x - 1).leading_zeros()
    }
}

/// Number of bits needed to encode `x` distinct values, at least one.
pub fn log2_up(x: u64) -> u32 {
    log2_ceil(x).max(1)
}

pub fn big_is_zero(x: &BigInt) -> bool {
    x.sign() == Sign::NoSign
}

pub fn big_is_negative(x: &BigInt) -> bool {
    x.sign() == Sign::Minus
}

/// Ceiling of log2(x) for non-negative `x`; 0 for x <= 1.
pub fn big_log2_ceil(x: &BigInt) -> u64 {
    if *x <= BigInt::from(1u32) {
        0
    } else {
        (x - 1u32).bits()
    }
}

/// Isolates the lowest set bit of `x`. Zero has no set bits and yields zero.
pub fn big_lowest_bit(x: &BigInt) -> BigInt {
    x & &(-x)
}

pub(crate) fn big_hex(x: &BigInt) -> String {
    if big_is_negative(x) {
        format!("~{:#x}", !x)
    } else {
        format!("{x:#x}")
    }
}
