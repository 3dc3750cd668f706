// 3.0 pool.rs: pool identity and per-pool state. a pool is created exactly
// once per distinct key and never destroyed; all mutation goes through the
// liquidity ledger inside an unlock session.

use alloy_primitives::keccak256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{Currency, FeePips, PoolId, SqrtPriceX96, Timestamp};

/// The four fields that identify a pool. Construction normalizes the
/// currency order, so callers can pass currencies either way around and
/// still land on the same pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolKey {
    pub currency0: Currency,
    pub currency1: Currency,
    pub fee: FeePips,
    pub tick_spacing: i32,
}

impl PoolKey {
    pub fn new(currency_a: Currency, currency_b: Currency, fee: FeePips, tick_spacing: i32) -> Self {
        let (currency0, currency1) = if currency_a <= currency_b {
            (currency_a, currency_b)
        } else {
            (currency_b, currency_a)
        };
        Self {
            currency0,
            currency1,
            fee,
            tick_spacing,
        }
    }

    /// Deterministic id: keccak-256 over the packed normalized fields.
    /// Identical fields always hash to the same id, whatever the call-site
    /// currency order was.
    pub fn id(&self) -> PoolId {
        let mut packed = [0u8; 48];
        packed[..20].copy_from_slice(self.currency0.address().as_slice());
        packed[20..40].copy_from_slice(self.currency1.address().as_slice());
        packed[40..44].copy_from_slice(&self.fee.value().to_be_bytes());
        packed[44..48].copy_from_slice(&self.tick_spacing.to_be_bytes());
        PoolId(keccak256(packed))
    }

    pub fn currency(&self, index: usize) -> Currency {
        if index == 0 {
            self.currency0
        } else {
            self.currency1
        }
    }
}

/// Net and gross liquidity referenced at one tick boundary. Gross tracks how
/// much liquidity uses the boundary at all; net is what crossing it applies
/// to the pool's active liquidity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickEntry {
    pub liquidity_gross: u128,
    pub liquidity_net: i128,
}

impl TickEntry {
    pub fn is_empty(&self) -> bool {
        self.liquidity_gross == 0
    }
}

/// Read-only view returned by the state accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub sqrt_price: SqrtPriceX96,
    pub tick: i32,
    pub protocol_fee: FeePips,
    pub lp_fee: FeePips,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub id: PoolId,
    pub key: PoolKey,
    pub sqrt_price: SqrtPriceX96,
    pub tick: i32,
    /// Fee taken by the protocol, in pips. Fixed at zero; fee governance is
    /// outside this engine.
    pub protocol_fee: FeePips,
    pub lp_fee: FeePips,
    /// Liquidity active at the current tick.
    pub liquidity: u128,
    pub ticks: BTreeMap<i32, TickEntry>,
    pub created_at: Timestamp,
}

impl Pool {
    pub fn new(key: PoolKey, sqrt_price: SqrtPriceX96, tick: i32, created_at: Timestamp) -> Self {
        Self {
            id: key.id(),
            key,
            sqrt_price,
            tick,
            protocol_fee: FeePips::ZERO,
            lp_fee: key.fee,
            liquidity: 0,
            ticks: BTreeMap::new(),
            created_at,
        }
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            sqrt_price: self.sqrt_price,
            tick: self.tick,
            protocol_fee: self.protocol_fee,
            lp_fee: self.lp_fee,
        }
    }

    pub fn tick_entry(&self, tick: i32) -> TickEntry {
        self.ticks.get(&tick).copied().unwrap_or_default()
    }

    /// Whether the current tick lies inside [lower, upper), i.e. liquidity
    /// over that range counts toward the active total.
    pub fn range_is_active(&self, tick_lower: i32, tick_upper: i32) -> bool {
        self.tick >= tick_lower && self.tick < tick_upper
    }
}
