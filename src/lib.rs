// pool-core: concentrated-liquidity pool registry engine.
// settlement-first architecture: every session balances to zero or rolls back.
// all computation is deterministic with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: Currency, PoolId, FeePips, SqrtPriceX96
//   2.x  math.rs: 256-bit mul-div with full-width intermediates
//   2.1  tick_math.rs: tick <-> Q64.96 sqrt price conversion
//   2.2  curve.rs: pricing curve trait + ranged reserve deltas
//   3.x  pool.rs: pool key, id derivation, per-pool state
//   3.1  registry.rs: pool creation, validation, pure reads
//   4.x  ledger.rs: signed liquidity deltas over tick ranges
//   5.x  custody.rs: transfer batches, funded and unbounded custody
//   6.x  events.rs: state transition events for audit
//   7.x  config.rs: fee tiers, tick spacing limits, event bounds
//   8.x  engine/: core engine: sessions, settlement, unlock locks

// core pool modules
pub mod curve;
pub mod engine;
pub mod events;
pub mod ledger;
pub mod math;
pub mod pool;
pub mod registry;
pub mod tick_math;
pub mod types;

// integration modules
pub mod config;
pub mod custody;

// re exports for convenience
pub use config::{ConfigError, EngineConfig, MAX_TICK_SPACING};
pub use curve::{CurveError, PricingCurve, RangedCurve};
pub use custody::{
    AllowAll, AllowList, AuthorizationError, CustodyError, TokenCustody, Transfer,
    TransferAuthorizer, UnboundedCustody, VaultCustody,
};
pub use engine::{Engine, EngineError, SessionOp, SessionReceipt};
pub use events::*;
pub use ledger::{modify_liquidity, LedgerError};
pub use pool::{Pool, PoolKey, PoolSnapshot, TickEntry};
pub use registry::{PoolRegistry, RegistryError};
pub use tick_math::{MAX_SQRT_PRICE, MAX_TICK, MIN_SQRT_PRICE, MIN_TICK};
pub use types::*;
