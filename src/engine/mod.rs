// 8.0: pool engine. coordinates pool creation, unlock sessions, liquidity
// settlement, and custody behind a deterministic clock and event log.
// no external I/O.

mod core;
mod results;
mod session;

pub use self::core::Engine;
pub use results::{EngineError, SessionReceipt};
pub use session::SessionOp;
