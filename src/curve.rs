// 2.2 curve.rs: the pricing curve seam. the registry and the coordinator only
// ever talk to the `PricingCurve` trait, so the exact fixed-point formulas can
// be swapped without touching pool bookkeeping.

use alloy_primitives::{I256, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::{self, MathError, Q96, RESOLUTION};
use crate::tick_math;
use crate::types::SqrtPriceX96;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum CurveError {
    #[error("tick {0} outside the representable tick range")]
    TickOutOfBounds(i32),

    #[error("sqrt price {0} outside the representable range")]
    SqrtPriceOutOfBounds(U256),

    #[error(transparent)]
    Math(#[from] MathError),
}

/// The sqrt-price <-> tick <-> amount relationship, pluggable per engine.
///
/// Implementations must keep `amount0_delta`/`amount1_delta` monotonic in
/// `liquidity` and must round charges (positive liquidity) up and credits
/// (negative liquidity) down, so equal-and-opposite deltas never favor the
/// caller.
pub trait PricingCurve {
    fn sqrt_price_at_tick(&self, tick: i32) -> Result<SqrtPriceX96, CurveError>;

    fn tick_at_sqrt_price(&self, sqrt_price: SqrtPriceX96) -> Result<i32, CurveError>;

    /// Signed currency0 amount for a signed liquidity change between two
    /// sqrt prices. Positive = required from the caller.
    fn amount0_delta(
        &self,
        a: SqrtPriceX96,
        b: SqrtPriceX96,
        liquidity: i128,
    ) -> Result<I256, CurveError>;

    /// Signed currency1 amount for a signed liquidity change between two
    /// sqrt prices. Positive = required from the caller.
    fn amount1_delta(
        &self,
        a: SqrtPriceX96,
        b: SqrtPriceX96,
        liquidity: i128,
    ) -> Result<I256, CurveError>;
}

/// The standard concentrated-liquidity curve:
/// `amount0 = L * (sqrtB - sqrtA) / (sqrtA * sqrtB)` and
/// `amount1 = L * (sqrtB - sqrtA)`, both in Q64.96.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangedCurve;

impl RangedCurve {
    fn amount0_unsigned(
        mut a: U256,
        mut b: U256,
        liquidity: u128,
        round_up: bool,
    ) -> Result<U256, CurveError> {
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        if a.is_zero() {
            return Err(CurveError::SqrtPriceOutOfBounds(a));
        }

        let numerator1 = U256::from(liquidity) << RESOLUTION;
        let numerator2 = b - a;

        if round_up {
            let scaled = math::mul_div_rounding_up(numerator1, numerator2, b)?;
            Ok(math::div_rounding_up(scaled, a)?)
        } else {
            Ok(math::mul_div(numerator1, numerator2, b)? / a)
        }
    }

    fn amount1_unsigned(
        mut a: U256,
        mut b: U256,
        liquidity: u128,
        round_up: bool,
    ) -> Result<U256, CurveError> {
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        let liquidity = U256::from(liquidity);

        if round_up {
            Ok(math::mul_div_rounding_up(liquidity, b - a, Q96)?)
        } else {
            Ok(math::mul_div(liquidity, b - a, Q96)?)
        }
    }
}

impl PricingCurve for RangedCurve {
    fn sqrt_price_at_tick(&self, tick: i32) -> Result<SqrtPriceX96, CurveError> {
        tick_math::sqrt_price_at_tick(tick).map(SqrtPriceX96::new)
    }

    fn tick_at_sqrt_price(&self, sqrt_price: SqrtPriceX96) -> Result<i32, CurveError> {
        tick_math::tick_at_sqrt_price(sqrt_price.value())
    }

    fn amount0_delta(
        &self,
        a: SqrtPriceX96,
        b: SqrtPriceX96,
        liquidity: i128,
    ) -> Result<I256, CurveError> {
        if liquidity < 0 {
            let amount =
                Self::amount0_unsigned(a.value(), b.value(), liquidity.unsigned_abs(), false)?;
            Ok(-I256::from_raw(amount))
        } else {
            let amount = Self::amount0_unsigned(a.value(), b.value(), liquidity as u128, true)?;
            Ok(I256::from_raw(amount))
        }
    }

    fn amount1_delta(
        &self,
        a: SqrtPriceX96,
        b: SqrtPriceX96,
        liquidity: i128,
    ) -> Result<I256, CurveError> {
        if liquidity < 0 {
            let amount =
                Self::amount1_unsigned(a.value(), b.value(), liquidity.unsigned_abs(), false)?;
            Ok(-I256::from_raw(amount))
        } else {
            let amount = Self::amount1_unsigned(a.value(), b.value(), liquidity as u128, true)?;
            Ok(I256::from_raw(amount))
        }
    }
}
