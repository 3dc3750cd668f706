// 1.0: all the primitives live here. nothing in the engine works without these types.
// currencies, pool ids, fees, sqrt prices, timestamps. each is a newtype so the
// compiler catches type mixups.

use alloy_primitives::{Address, B256, I256, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::math;
use crate::tick_math::{MAX_SQRT_PRICE, MIN_SQRT_PRICE};

// 1.1: a currency is identified by its 20-byte address. the total order on
// addresses is what pool key normalization relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Currency(pub Address);

impl Currency {
    pub fn address(&self) -> Address {
        self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// 1.2: pool identity, derived deterministically from the normalized pool key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolId(pub B256);

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// 1.3: fee in hundredths of a basis point. 1 pip = 0.0001%, so 3000 pips = 0.3%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeePips(pub u32);

impl FeePips {
    pub const ZERO: FeePips = FeePips(0);

    pub fn new(pips: u32) -> Self {
        Self(pips)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    // 3000 pips -> 0.003
    pub fn as_fraction(&self) -> Decimal {
        Decimal::new(self.0 as i64, 6)
    }

    // 3000 pips -> 0.3 (percent)
    pub fn as_percent(&self) -> Decimal {
        Decimal::new(self.0 as i64, 4)
    }
}

impl fmt::Display for FeePips {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}

// 1.4: price as its square root in Q64.96 fixed point. a price of 1.0 is 2^96.
// Decimal cannot hold 2^96, hence the 256-bit representation throughout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SqrtPriceX96(U256);

impl SqrtPriceX96 {
    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    /// A price of exactly 1.0 (2^96).
    pub const ONE: SqrtPriceX96 = SqrtPriceX96(math::Q96);

    pub fn value(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Whether the value lies in the representable range [MIN_SQRT_PRICE, MAX_SQRT_PRICE).
    pub fn is_valid(&self) -> bool {
        self.0 >= MIN_SQRT_PRICE && self.0 < MAX_SQRT_PRICE
    }

    /// Approximate price (currency1 per currency0) with six decimal places,
    /// for reporting only. `None` when the price is too large to represent.
    pub fn to_price(&self) -> Option<Decimal> {
        let ratio_x96 = math::mul_div(self.0, self.0, math::Q96).ok()?;
        let scaled = math::mul_div(ratio_x96, U256::from(1_000_000u64), math::Q96).ok()?;
        let scaled = u64::try_from(scaled).ok()?;
        if scaled > i64::MAX as u64 {
            return None;
        }
        Some(Decimal::new(scaled as i64, 6))
    }
}

impl fmt::Display for SqrtPriceX96 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// 1.5: which side of the pool a settlement operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrencySlot {
    Currency0,
    Currency1,
}

impl CurrencySlot {
    pub fn index(&self) -> usize {
        match self {
            CurrencySlot::Currency0 => 0,
            CurrencySlot::Currency1 => 1,
        }
    }
}

// 1.6: signed per-currency amounts accrued by a session. positive = owed by
// the caller to the pool, negative = owed by the pool to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceDelta {
    pub amount0: I256,
    pub amount1: I256,
}

impl BalanceDelta {
    pub const ZERO: BalanceDelta = BalanceDelta {
        amount0: I256::ZERO,
        amount1: I256::ZERO,
    };

    pub fn new(amount0: I256, amount1: I256) -> Self {
        Self { amount0, amount1 }
    }

    pub fn is_zero(&self) -> bool {
        self.amount0.is_zero() && self.amount1.is_zero()
    }

    pub fn get(&self, slot: CurrencySlot) -> I256 {
        match slot {
            CurrencySlot::Currency0 => self.amount0,
            CurrencySlot::Currency1 => self.amount1,
        }
    }

    pub fn set(&mut self, slot: CurrencySlot, value: I256) {
        match slot {
            CurrencySlot::Currency0 => self.amount0 = value,
            CurrencySlot::Currency1 => self.amount1 = value,
        }
    }

    pub fn accrue(&mut self, amount0: I256, amount1: I256) {
        self.amount0 += amount0;
        self.amount1 += amount1;
    }
}

impl fmt::Display for BalanceDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.amount0, self.amount1)
    }
}

// 1.7: millisecond timestamp. sessions compare their deadline against the
// engine clock exactly once, at entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    pub fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn fee_pips_fractions() {
        let fee = FeePips::new(3000);
        assert_eq!(fee.as_fraction(), dec!(0.003));
        assert_eq!(fee.as_percent(), dec!(0.3));

        let fee = FeePips::new(100);
        assert_eq!(fee.as_fraction(), dec!(0.0001)); // 0.01%
    }

    #[test]
    fn sqrt_price_one_reports_unit_price() {
        let price = SqrtPriceX96::ONE;
        assert!(price.is_valid());
        assert_eq!(price.to_price(), Some(dec!(1)));
    }

    #[test]
    fn sqrt_price_zero_is_invalid() {
        let price = SqrtPriceX96::new(U256::ZERO);
        assert!(price.is_zero());
        assert!(!price.is_valid());
    }

    #[test]
    fn balance_delta_accrual() {
        let mut delta = BalanceDelta::ZERO;
        assert!(delta.is_zero());

        delta.accrue(I256::try_from(5i64).unwrap(), I256::try_from(-3i64).unwrap());
        assert_eq!(delta.get(CurrencySlot::Currency0), I256::try_from(5i64).unwrap());
        assert_eq!(delta.get(CurrencySlot::Currency1), I256::try_from(-3i64).unwrap());

        delta.set(CurrencySlot::Currency1, I256::ZERO);
        assert!(!delta.is_zero());
    }

    #[test]
    fn currency_ordering_follows_addresses() {
        let a = Currency(Address::with_last_byte(0x01));
        let b = Currency(Address::with_last_byte(0x02));
        assert!(a < b);
    }
}
