// 5.0 custody.rs: where settled value actually lands. the engine computes
// transfers; custody applies them as one atomic batch. authorization runs
// per transfer before custody sees the batch.

use alloy_primitives::{Address, I256, U256};
use std::collections::HashMap;
use thiserror::Error;

use crate::types::Currency;

/// One settled movement of value. Positive amounts credit the account,
/// negative amounts debit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub currency: Currency,
    pub account: Address,
    pub amount: I256,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustodyError {
    #[error("account {account} holds {available} of {currency}, needs {required}")]
    InsufficientFunds {
        currency: Currency,
        account: Address,
        required: U256,
        available: U256,
    },

    #[error("custody rejected the batch: {reason}")]
    Rejected { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    #[error("sender {0} is not authorized to move funds")]
    SenderDenied(Address),
}

/// Applies a settled batch. Either every transfer lands or none do.
pub trait TokenCustody {
    fn settle(&mut self, transfers: &[Transfer]) -> Result<(), CustodyError>;
}

/// Decides whether `sender` may cause `transfer`. Runs once per transfer,
/// before custody sees the batch.
pub trait TransferAuthorizer {
    fn authorize(&self, sender: Address, transfer: &Transfer) -> Result<(), AuthorizationError>;
}

/// Custody that accepts everything and keeps running balances. The engine
/// default; external funding is out of scope for the core, so debits are
/// allowed to drive a balance negative.
#[derive(Debug, Default)]
pub struct UnboundedCustody {
    balances: HashMap<(Currency, Address), I256>,
    settled: Vec<Transfer>,
}

impl UnboundedCustody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, currency: Currency, account: Address) -> I256 {
        self.balances
            .get(&(currency, account))
            .copied()
            .unwrap_or(I256::ZERO)
    }

    /// Every transfer ever settled, in order.
    pub fn settled(&self) -> &[Transfer] {
        &self.settled
    }
}

impl TokenCustody for UnboundedCustody {
    fn settle(&mut self, transfers: &[Transfer]) -> Result<(), CustodyError> {
        for transfer in transfers {
            let entry = self
                .balances
                .entry((transfer.currency, transfer.account))
                .or_insert(I256::ZERO);
            *entry += transfer.amount;
        }
        self.settled.extend_from_slice(transfers);
        Ok(())
    }
}

/// Custody backed by funded balances. Debits beyond what an account holds
/// fail, and a failed batch leaves every balance untouched.
#[derive(Debug, Default)]
pub struct VaultCustody {
    balances: HashMap<(Currency, Address), U256>,
}

impl VaultCustody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fund(&mut self, currency: Currency, account: Address, amount: U256) {
        let entry = self.balances.entry((currency, account)).or_default();
        *entry += amount;
    }

    pub fn balance(&self, currency: Currency, account: Address) -> U256 {
        self.balances
            .get(&(currency, account))
            .copied()
            .unwrap_or(U256::ZERO)
    }
}

impl TokenCustody for VaultCustody {
    fn settle(&mut self, transfers: &[Transfer]) -> Result<(), CustodyError> {
        // Stage the whole batch before touching real balances.
        let mut staged = self.balances.clone();
        for transfer in transfers {
            let key = (transfer.currency, transfer.account);
            let entry = staged.entry(key).or_default();
            let magnitude = transfer.amount.unsigned_abs();
            if transfer.amount.is_negative() {
                if *entry < magnitude {
                    return Err(CustodyError::InsufficientFunds {
                        currency: transfer.currency,
                        account: transfer.account,
                        required: magnitude,
                        available: *entry,
                    });
                }
                *entry -= magnitude;
            } else {
                *entry += magnitude;
            }
        }
        self.balances = staged;
        Ok(())
    }
}

/// Authorizer that lets any sender through.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl TransferAuthorizer for AllowAll {
    fn authorize(&self, _sender: Address, _transfer: &Transfer) -> Result<(), AuthorizationError> {
        Ok(())
    }
}

/// Authorizer with an explicit sender allow-list.
#[derive(Debug, Default)]
pub struct AllowList {
    senders: Vec<Address>,
}

impl AllowList {
    pub fn new(senders: Vec<Address>) -> Self {
        Self { senders }
    }

    pub fn permit(&mut self, sender: Address) {
        if !self.senders.contains(&sender) {
            self.senders.push(sender);
        }
    }
}

impl TransferAuthorizer for AllowList {
    fn authorize(&self, sender: Address, _transfer: &Transfer) -> Result<(), AuthorizationError> {
        if self.senders.contains(&sender) {
            Ok(())
        } else {
            Err(AuthorizationError::SenderDenied(sender))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn currency(byte: u8) -> Currency {
        Currency(Address::with_last_byte(byte))
    }

    fn account(byte: u8) -> Address {
        Address::with_last_byte(byte)
    }

    fn credit(c: u8, a: u8, amount: i64) -> Transfer {
        Transfer {
            currency: currency(c),
            account: account(a),
            amount: I256::try_from(amount).unwrap(),
        }
    }

    #[test]
    fn unbounded_custody_tracks_running_balances() {
        let mut custody = UnboundedCustody::new();
        custody
            .settle(&[credit(1, 10, 100), credit(1, 10, -30), credit(2, 10, 7)])
            .unwrap();

        assert_eq!(
            custody.balance(currency(1), account(10)),
            I256::try_from(70i64).unwrap()
        );
        assert_eq!(
            custody.balance(currency(2), account(10)),
            I256::try_from(7i64).unwrap()
        );
        assert_eq!(custody.settled().len(), 3);
    }

    #[test]
    fn unbounded_custody_allows_negative_balances() {
        let mut custody = UnboundedCustody::new();
        custody.settle(&[credit(1, 10, -50)]).unwrap();
        assert_eq!(
            custody.balance(currency(1), account(10)),
            I256::try_from(-50i64).unwrap()
        );
    }

    #[test]
    fn vault_custody_rejects_shortfalls_atomically() {
        let mut custody = VaultCustody::new();
        custody.fund(currency(1), account(10), U256::from(40u64));

        // Second transfer overdraws; the first must not land either.
        let result = custody.settle(&[credit(1, 10, 20), credit(1, 10, -100)]);
        assert!(matches!(
            result,
            Err(CustodyError::InsufficientFunds { .. })
        ));
        assert_eq!(custody.balance(currency(1), account(10)), U256::from(40u64));
    }

    #[test]
    fn vault_custody_applies_batches_in_order() {
        let mut custody = VaultCustody::new();
        custody.fund(currency(1), account(10), U256::from(10u64));

        // The credit lands before the debit draws on it.
        custody.settle(&[credit(1, 10, 50), credit(1, 10, -55)]).unwrap();
        assert_eq!(custody.balance(currency(1), account(10)), U256::from(5u64));
    }

    #[test]
    fn allow_list_gates_senders() {
        let mut list = AllowList::new(vec![account(1)]);
        let transfer = credit(1, 10, 5);

        assert!(list.authorize(account(1), &transfer).is_ok());
        assert!(matches!(
            list.authorize(account(2), &transfer),
            Err(AuthorizationError::SenderDenied(_))
        ));

        list.permit(account(2));
        assert!(list.authorize(account(2), &transfer).is_ok());
    }
}
