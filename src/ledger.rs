// 4.0 ledger.rs: applies signed liquidity deltas to a pool. validates the
// tick range, prices the change through the curve, and keeps the boundary
// entries and the active-liquidity total consistent.
//
// all checks run before any mutation, so a failed call leaves the pool
// exactly as it was.

use alloy_primitives::I256;
use thiserror::Error;

use crate::curve::{CurveError, PricingCurve};
use crate::math::{add_liquidity_delta, MathError};
use crate::pool::{Pool, TickEntry};
use crate::tick_math::{MAX_TICK, MIN_TICK};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("invalid tick range [{lower}, {upper}) for spacing {spacing}")]
    InvalidTickRange { lower: i32, upper: i32, spacing: i32 },

    #[error("removing {requested} liquidity exceeds the {available} available")]
    InsufficientLiquidity { requested: u128, available: u128 },

    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    Math(MathError),
}

/// Applies `liquidity_delta` over `[tick_lower, tick_upper)` and returns the
/// signed currency amounts the change requires (positive = owed by the
/// caller) or releases (negative = owed to the caller).
pub fn modify_liquidity(
    pool: &mut Pool,
    curve: &dyn PricingCurve,
    tick_lower: i32,
    tick_upper: i32,
    liquidity_delta: i128,
) -> Result<(I256, I256), LedgerError> {
    check_tick_range(tick_lower, tick_upper, pool.key.tick_spacing)?;

    if liquidity_delta == 0 {
        return Ok((I256::ZERO, I256::ZERO));
    }

    let lower_entry = pool.tick_entry(tick_lower);
    let upper_entry = pool.tick_entry(tick_upper);

    if liquidity_delta < 0 {
        let requested = liquidity_delta.unsigned_abs();
        for entry in [&lower_entry, &upper_entry] {
            if entry.liquidity_gross < requested {
                return Err(LedgerError::InsufficientLiquidity {
                    requested,
                    available: entry.liquidity_gross,
                });
            }
        }
    }

    let new_lower = shifted_entry(lower_entry, liquidity_delta, false)?;
    let new_upper = shifted_entry(upper_entry, liquidity_delta, true)?;

    let active = pool.range_is_active(tick_lower, tick_upper);
    let new_active_liquidity = if active {
        add_liquidity_delta(pool.liquidity, liquidity_delta).map_err(|e| match e {
            MathError::Underflow => LedgerError::InsufficientLiquidity {
                requested: liquidity_delta.unsigned_abs(),
                available: pool.liquidity,
            },
            other => LedgerError::Math(other),
        })?
    } else {
        pool.liquidity
    };

    let sqrt_lower = curve.sqrt_price_at_tick(tick_lower)?;
    let sqrt_upper = curve.sqrt_price_at_tick(tick_upper)?;

    let (amount0, amount1) = if pool.tick < tick_lower {
        // Entirely above the current price: only currency0.
        (
            curve.amount0_delta(sqrt_lower, sqrt_upper, liquidity_delta)?,
            I256::ZERO,
        )
    } else if pool.tick >= tick_upper {
        // Entirely below the current price: only currency1.
        (
            I256::ZERO,
            curve.amount1_delta(sqrt_lower, sqrt_upper, liquidity_delta)?,
        )
    } else {
        (
            curve.amount0_delta(pool.sqrt_price, sqrt_upper, liquidity_delta)?,
            curve.amount1_delta(sqrt_lower, pool.sqrt_price, liquidity_delta)?,
        )
    };

    store_entry(pool, tick_lower, new_lower);
    store_entry(pool, tick_upper, new_upper);
    pool.liquidity = new_active_liquidity;

    Ok((amount0, amount1))
}

fn check_tick_range(lower: i32, upper: i32, spacing: i32) -> Result<(), LedgerError> {
    let invalid = lower >= upper
        || lower < MIN_TICK
        || upper > MAX_TICK
        || lower % spacing != 0
        || upper % spacing != 0;
    if invalid {
        return Err(LedgerError::InvalidTickRange {
            lower,
            upper,
            spacing,
        });
    }
    Ok(())
}

// Gross moves with the magnitude of the change at both boundaries; net gets
// the delta at the lower boundary and its negation at the upper one.
fn shifted_entry(
    entry: TickEntry,
    liquidity_delta: i128,
    is_upper: bool,
) -> Result<TickEntry, LedgerError> {
    let liquidity_gross =
        add_liquidity_delta(entry.liquidity_gross, liquidity_delta).map_err(LedgerError::Math)?;
    let liquidity_net = if is_upper {
        entry.liquidity_net.checked_sub(liquidity_delta)
    } else {
        entry.liquidity_net.checked_add(liquidity_delta)
    }
    .ok_or(LedgerError::Math(MathError::Overflow))?;
    Ok(TickEntry {
        liquidity_gross,
        liquidity_net,
    })
}

fn store_entry(pool: &mut Pool, tick: i32, entry: TickEntry) {
    if entry.is_empty() {
        pool.ticks.remove(&tick);
    } else {
        pool.ticks.insert(tick, entry);
    }
}
