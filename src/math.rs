// 2.0 math.rs: full-precision 256-bit helpers. mulDiv keeps the 512-bit
// intermediate product so amount math never truncates before the division.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed-point resolution of sqrt prices (Q64.96).
pub const RESOLUTION: u8 = 96;

/// 2^96.
pub const Q96: U256 = U256::from_limbs([0, 4294967296, 0, 0]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum MathError {
    #[error("arithmetic overflow")]
    Overflow,
    #[error("arithmetic underflow")]
    Underflow,
    #[error("division by zero")]
    DivisionByZero,
}

/// Computes `a * b / denominator` with the intermediate product held in 512
/// bits. Errors on division by zero or when the quotient does not fit in a
/// `U256`.
pub fn mul_div(a: U256, b: U256, mut denominator: U256) -> Result<U256, MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }

    // 512-bit product as (hi, lo) via the mulmod trick.
    let mm = a.mul_mod(b, U256::MAX);
    let mut lo = a.wrapping_mul(b);
    let (mut hi, borrow) = mm.overflowing_sub(lo);
    if borrow {
        hi = hi.wrapping_sub(U256::ONE);
    }

    // Short path: product fits in 256 bits.
    if hi.is_zero() {
        return Ok(lo.wrapping_div(denominator));
    }

    if denominator <= hi {
        return Err(MathError::Overflow);
    }

    // Subtract the remainder so [hi, lo] is divisible by denominator.
    let remainder = a.mul_mod(b, denominator);
    let (lo_sub, borrow) = lo.overflowing_sub(remainder);
    lo = lo_sub;
    if borrow {
        hi = hi.wrapping_sub(U256::ONE);
    }

    // Factor powers of two out of the denominator.
    let twos = denominator & denominator.wrapping_neg();
    denominator = denominator.wrapping_div(twos);
    lo = lo.wrapping_div(twos);
    let shift = twos
        .wrapping_neg()
        .wrapping_div(twos)
        .wrapping_add(U256::ONE);
    lo |= hi.wrapping_mul(shift);

    // Modular inverse of the (now odd) denominator by Newton iteration;
    // six rounds is exact for 256 bits.
    let mut inv = U256::from_limbs([3, 0, 0, 0]).wrapping_mul(denominator)
        ^ U256::from_limbs([2, 0, 0, 0]);
    for _ in 0..6 {
        inv = inv.wrapping_mul(U256::from_limbs([2, 0, 0, 0]).wrapping_sub(denominator.wrapping_mul(inv)));
    }

    Ok(lo.wrapping_mul(inv))
}

/// Like [`mul_div`], rounding up when the division has a remainder.
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    let mut result = mul_div(a, b, denominator)?;
    if a.mul_mod(b, denominator) > U256::ZERO {
        if result == U256::MAX {
            return Err(MathError::Overflow);
        }
        result += U256::ONE;
    }
    Ok(result)
}

/// Divides `a` by `b`, rounding up. Errors on division by zero.
pub fn div_rounding_up(a: U256, b: U256) -> Result<U256, MathError> {
    if b.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let (quotient, remainder) = a.div_rem(b);
    if remainder.is_zero() {
        Ok(quotient)
    } else {
        Ok(quotient + U256::ONE)
    }
}

/// Applies a signed liquidity delta to an unsigned liquidity total.
pub fn add_liquidity_delta(x: u128, y: i128) -> Result<u128, MathError> {
    if y < 0 {
        x.checked_sub(y.unsigned_abs()).ok_or(MathError::Underflow)
    } else {
        x.checked_add(y as u128).ok_or(MathError::Overflow)
    }
}
