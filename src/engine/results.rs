// 8.0.2: result types and errors for engine operations.

use alloy_primitives::I256;

use crate::custody::{AuthorizationError, CustodyError, Transfer};
use crate::ledger::LedgerError;
use crate::registry::RegistryError;
use crate::types::{Currency, PoolId, Timestamp};

/// What a committed session settled. Amounts are from the caller's
/// perspective: positive = paid to the caller, negative = paid by them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReceipt {
    pub pool_id: PoolId,
    pub transfers: Vec<Transfer>,
    pub amount0: I256,
    pub amount1: I256,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("deadline {deadline} already passed at {now}")]
    DeadlineExpired { deadline: Timestamp, now: Timestamp },

    #[error("pool {0} already has a session in flight")]
    AlreadyUnlocked(PoolId),

    #[error("session left {amount} of {currency} unsettled")]
    UnsettledBalance { currency: Currency, amount: I256 },

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("custody error: {0}")]
    Custody(#[from] CustodyError),

    #[error("authorization error: {0}")]
    Authorization(#[from] AuthorizationError),
}
