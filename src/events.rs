// 6.0 events.rs: every committed state change and every rejected session
// produces an event. used for audit trails and for reconstructing what a
// session actually settled.

use alloy_primitives::{Address, I256, U256};
use serde::{Deserialize, Serialize};

use crate::types::{Currency, FeePips, PoolId, SqrtPriceX96, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: Timestamp,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(id: EventId, timestamp: Timestamp, payload: EventPayload) -> Self {
        Self {
            id,
            timestamp,
            payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPayload {
    // Registry events
    PoolCreated(PoolCreatedEvent),

    // Session events
    LiquidityModified(LiquidityModifiedEvent),
    SessionCommitted(SessionCommittedEvent),
    SessionRolledBack(SessionRolledBackEvent),

    // Settlement events
    TransferSettled(TransferSettledEvent),
    Swept(SweptEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolCreatedEvent {
    pub pool_id: PoolId,
    pub currency0: Currency,
    pub currency1: Currency,
    pub fee: FeePips,
    pub tick_spacing: i32,
    pub sqrt_price: SqrtPriceX96,
    pub tick: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityModifiedEvent {
    pub pool_id: PoolId,
    pub sender: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity_delta: i128,
    pub amount0: I256,
    pub amount1: I256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCommittedEvent {
    pub pool_id: PoolId,
    pub sender: Address,
    /// Net per-currency transfer from the caller's perspective
    /// (positive = paid to the caller).
    pub amount0: I256,
    pub amount1: I256,
    pub operations: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRolledBackEvent {
    pub pool_id: PoolId,
    pub sender: Address,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSettledEvent {
    pub pool_id: PoolId,
    pub currency: Currency,
    pub account: Address,
    /// Positive = credited to the account, negative = debited from it.
    pub amount: I256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweptEvent {
    pub pool_id: PoolId,
    pub currency: Currency,
    pub recipient: Address,
    pub amount: U256,
}
