// 8.2 engine/session.rs: the unlock session state machine. a session stages
// a copy of the pool, applies its operations in order, and publishes the
// copy only if every balance settles to zero. a failed session drops the
// copy, so the registry never sees partial state.

use alloy_primitives::{Address, I256};

use super::core::Engine;
use super::results::{EngineError, SessionReceipt};
use crate::custody::Transfer;
use crate::events::{
    EventPayload, LiquidityModifiedEvent, SessionCommittedEvent, SessionRolledBackEvent,
    SweptEvent, TransferSettledEvent,
};
use crate::ledger;
use crate::pool::Pool;
use crate::types::{BalanceDelta, CurrencySlot, PoolId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOp {
    /// Change liquidity over `[tick_lower, tick_upper)` by `liquidity_delta`.
    Modify {
        tick_lower: i32,
        tick_upper: i32,
        liquidity_delta: i128,
    },
    /// Pay off what the session owes in one currency.
    Settle { currency: CurrencySlot },
    /// Collect what the session is owed in one currency.
    Take { currency: CurrencySlot },
    /// Send any residual owed to the caller to `recipient` at commit.
    Sweep { recipient: Address },
}

impl Engine {
    /// Runs one unlock session against a pool. Operations apply in order to
    /// a staged copy; the deadline is checked once, at entry, against the
    /// engine clock. On any failure the pool is left exactly as it was.
    pub fn execute(
        &mut self,
        sender: Address,
        pool_id: PoolId,
        ops: &[SessionOp],
        deadline: Timestamp,
    ) -> Result<SessionReceipt, EngineError> {
        if self.current_time > deadline {
            return Err(EngineError::DeadlineExpired {
                deadline,
                now: self.current_time,
            });
        }

        let staged = self.registry.get(pool_id)?.clone();
        self.begin_unlock(pool_id)?;
        let result = self.run_session(sender, staged, ops);
        self.release_unlock(pool_id);

        if let Err(e) = &result {
            self.emit_event(EventPayload::SessionRolledBack(SessionRolledBackEvent {
                pool_id,
                sender,
                reason: e.to_string(),
            }));
        }
        result
    }

    fn run_session(
        &mut self,
        sender: Address,
        mut staged: Pool,
        ops: &[SessionOp],
    ) -> Result<SessionReceipt, EngineError> {
        let pool_id = staged.id;
        // Running balance: positive = owed by the caller to the pool.
        let mut balance = BalanceDelta::ZERO;
        // Gross modify accruals, kept separate for the receipt.
        let mut gross = BalanceDelta::ZERO;
        let mut transfers: Vec<Transfer> = Vec::new();
        let mut sweep_recipient: Option<Address> = None;
        let mut pending: Vec<EventPayload> = Vec::new();

        for op in ops {
            match *op {
                SessionOp::Modify {
                    tick_lower,
                    tick_upper,
                    liquidity_delta,
                } => {
                    let (amount0, amount1) = ledger::modify_liquidity(
                        &mut staged,
                        self.curve.as_ref(),
                        tick_lower,
                        tick_upper,
                        liquidity_delta,
                    )?;
                    balance.accrue(amount0, amount1);
                    gross.accrue(amount0, amount1);
                    pending.push(EventPayload::LiquidityModified(LiquidityModifiedEvent {
                        pool_id,
                        sender,
                        tick_lower,
                        tick_upper,
                        liquidity_delta,
                        amount0,
                        amount1,
                    }));
                }
                SessionOp::Settle { currency } => {
                    let owed = balance.get(currency);
                    if owed > I256::ZERO {
                        transfers.push(Transfer {
                            currency: staged.key.currency(currency.index()),
                            account: sender,
                            amount: -owed,
                        });
                        balance.set(currency, I256::ZERO);
                    }
                }
                SessionOp::Take { currency } => {
                    let owed = balance.get(currency);
                    if owed < I256::ZERO {
                        transfers.push(Transfer {
                            currency: staged.key.currency(currency.index()),
                            account: sender,
                            amount: -owed,
                        });
                        balance.set(currency, I256::ZERO);
                    }
                }
                SessionOp::Sweep { recipient } => {
                    sweep_recipient = Some(recipient);
                }
            }
        }

        // Settlement invariant: debts always fail; credits fail unless a
        // sweep recipient was named.
        for slot in [CurrencySlot::Currency0, CurrencySlot::Currency1] {
            let residual = balance.get(slot);
            if residual.is_zero() {
                continue;
            }
            let currency = staged.key.currency(slot.index());
            if residual > I256::ZERO {
                return Err(EngineError::UnsettledBalance {
                    currency,
                    amount: residual,
                });
            }
            match sweep_recipient {
                Some(recipient) => {
                    let amount = -residual;
                    transfers.push(Transfer {
                        currency,
                        account: recipient,
                        amount,
                    });
                    pending.push(EventPayload::Swept(SweptEvent {
                        pool_id,
                        currency,
                        recipient,
                        amount: amount.unsigned_abs(),
                    }));
                }
                None => {
                    return Err(EngineError::UnsettledBalance {
                        currency,
                        amount: residual,
                    });
                }
            }
        }

        for transfer in &transfers {
            self.authorizer.authorize(sender, transfer)?;
        }
        self.custody.settle(&transfers)?;

        // Point of no return: publish the staged pool, then log.
        self.registry.publish(staged);

        for payload in pending {
            self.emit_event(payload);
        }
        for transfer in &transfers {
            self.emit_event(EventPayload::TransferSettled(TransferSettledEvent {
                pool_id,
                currency: transfer.currency,
                account: transfer.account,
                amount: transfer.amount,
            }));
        }
        let amount0 = -gross.amount0;
        let amount1 = -gross.amount1;
        self.emit_event(EventPayload::SessionCommitted(SessionCommittedEvent {
            pool_id,
            sender,
            amount0,
            amount1,
            operations: ops.len(),
        }));

        Ok(SessionReceipt {
            pool_id,
            transfers,
            amount0,
            amount1,
        })
    }

    pub(crate) fn begin_unlock(&mut self, pool_id: PoolId) -> Result<(), EngineError> {
        if !self.unlocking.insert(pool_id) {
            return Err(EngineError::AlreadyUnlocked(pool_id));
        }
        Ok(())
    }

    pub(crate) fn release_unlock(&mut self, pool_id: PoolId) {
        self.unlocking.remove(&pool_id);
    }
}
