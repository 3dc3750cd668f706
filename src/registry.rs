// 3.1 registry.rs: owns every pool. enforces currency ordering, key
// uniqueness, and creation-time validation; reads are pure and never block
// on an in-flight session.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::config::EngineConfig;
use crate::curve::PricingCurve;
use crate::pool::{Pool, PoolKey, PoolSnapshot};
use crate::types::{Currency, FeePips, PoolId, SqrtPriceX96, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("pool {0} already exists")]
    DuplicatePool(PoolId),

    #[error("pool {0} not found")]
    PoolNotFound(PoolId),

    #[error("fee tier {0} is not supported")]
    InvalidFee(FeePips),

    #[error("tick spacing {0} is invalid")]
    InvalidTickSpacing(i32),

    #[error("starting sqrt price {0} is invalid")]
    InvalidStartingPrice(SqrtPriceX96),

    #[error("currency {0} paired with itself")]
    IdenticalCurrencies(Currency),
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PoolRegistry {
    pools: HashMap<PoolId, Pool>,
}

impl PoolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pool for the normalized (currency_a, currency_b, fee,
    /// tick_spacing) key. Currency order at the call site does not matter;
    /// the registry normalizes before deriving the id.
    #[allow(clippy::too_many_arguments)]
    pub fn create_pool(
        &mut self,
        config: &EngineConfig,
        curve: &dyn PricingCurve,
        currency_a: Currency,
        currency_b: Currency,
        fee: FeePips,
        tick_spacing: i32,
        starting_price: SqrtPriceX96,
        now: Timestamp,
    ) -> Result<PoolId, RegistryError> {
        if currency_a == currency_b {
            return Err(RegistryError::IdenticalCurrencies(currency_a));
        }
        if !config.supports_fee(fee) {
            return Err(RegistryError::InvalidFee(fee));
        }
        if tick_spacing <= 0
            || tick_spacing > config.max_tick_spacing
            || tick_spacing % config.tick_spacing_granularity != 0
        {
            return Err(RegistryError::InvalidTickSpacing(tick_spacing));
        }
        if starting_price.is_zero() || !starting_price.is_valid() {
            return Err(RegistryError::InvalidStartingPrice(starting_price));
        }

        let tick = curve
            .tick_at_sqrt_price(starting_price)
            .map_err(|_| RegistryError::InvalidStartingPrice(starting_price))?;

        let key = PoolKey::new(currency_a, currency_b, fee, tick_spacing);
        let id = key.id();
        if self.pools.contains_key(&id) {
            return Err(RegistryError::DuplicatePool(id));
        }

        self.pools.insert(id, Pool::new(key, starting_price, tick, now));
        Ok(id)
    }

    pub fn get(&self, id: PoolId) -> Result<&Pool, RegistryError> {
        self.pools.get(&id).ok_or(RegistryError::PoolNotFound(id))
    }

    pub fn contains(&self, id: PoolId) -> bool {
        self.pools.contains_key(&id)
    }

    /// Price, tick and fee view of a pool. Pure read.
    pub fn get_pool_state(&self, id: PoolId) -> Result<PoolSnapshot, RegistryError> {
        Ok(self.get(id)?.snapshot())
    }

    /// Aggregate liquidity active at the pool's current tick. Pure read.
    pub fn get_pool_liquidity(&self, id: PoolId) -> Result<u128, RegistryError> {
        Ok(self.get(id)?.liquidity)
    }

    /// Atomically replaces a pool's state with a committed session result.
    pub(crate) fn publish(&mut self, pool: Pool) {
        self.pools.insert(pool.id, pool);
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    pub fn pools(&self) -> impl Iterator<Item = &Pool> {
        self.pools.values()
    }
}
