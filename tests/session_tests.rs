//! End-to-end unlock session tests.
//!
//! Each test drives the engine through a full create / fund / settle cycle
//! and checks that failed sessions leave no trace.

use alloy_primitives::{Address, I256, U256};
use pool_core::*;

const ALICE: Address = Address::with_last_byte(0xA1);
const BOB: Address = Address::with_last_byte(0xB2);

fn currency(byte: u8) -> Currency {
    Currency(Address::with_last_byte(byte))
}

fn deadline() -> Timestamp {
    Timestamp::from_millis(60_000)
}

fn engine_with_pool() -> (Engine, PoolId) {
    let mut engine = Engine::new(EngineConfig::default());
    let id = engine
        .create_pool(
            currency(1),
            currency(2),
            FeePips::new(3000),
            60,
            SqrtPriceX96::ONE,
        )
        .unwrap();
    (engine, id)
}

fn fund(engine: &mut Engine, id: PoolId, liquidity: i128) -> SessionReceipt {
    engine
        .execute(
            ALICE,
            id,
            &[
                SessionOp::Modify {
                    tick_lower: -600,
                    tick_upper: 600,
                    liquidity_delta: liquidity,
                },
                SessionOp::Settle {
                    currency: CurrencySlot::Currency0,
                },
                SessionOp::Settle {
                    currency: CurrencySlot::Currency1,
                },
            ],
            deadline(),
        )
        .unwrap()
}

#[test]
fn full_lifecycle_add_then_remove() {
    let (mut engine, id) = engine_with_pool();

    let funded = fund(&mut engine, id, 1_000_000_000);
    assert_eq!(engine.get_pool_liquidity(id).unwrap(), 1_000_000_000);
    // Caller paid into the pool, so the receipt amounts are negative.
    assert!(funded.amount0 < I256::ZERO);
    assert!(funded.amount1 < I256::ZERO);

    let removed = engine
        .execute(
            ALICE,
            id,
            &[
                SessionOp::Modify {
                    tick_lower: -600,
                    tick_upper: 600,
                    liquidity_delta: -1_000_000_000,
                },
                SessionOp::Take {
                    currency: CurrencySlot::Currency0,
                },
                SessionOp::Take {
                    currency: CurrencySlot::Currency1,
                },
            ],
            deadline(),
        )
        .unwrap();

    assert_eq!(engine.get_pool_liquidity(id).unwrap(), 0);
    assert!(engine.pool(id).unwrap().ticks.is_empty());

    // Rounding always favors the pool: paid in >= taken out, within one unit.
    let dust0 = -funded.amount0 - removed.amount0;
    let dust1 = -funded.amount1 - removed.amount1;
    assert!(dust0 >= I256::ZERO && dust0 <= I256::ONE);
    assert!(dust1 >= I256::ZERO && dust1 <= I256::ONE);
}

#[test]
fn balanced_add_and_remove_in_one_session_restores_the_pool() {
    let (mut engine, id) = engine_with_pool();
    let before = engine.pool(id).unwrap().clone();

    // Add and remove the same range in one session. Only rounding dust is
    // left owed, settled from the caller.
    let receipt = engine
        .execute(
            ALICE,
            id,
            &[
                SessionOp::Modify {
                    tick_lower: -600,
                    tick_upper: 600,
                    liquidity_delta: 1_000_000,
                },
                SessionOp::Modify {
                    tick_lower: -600,
                    tick_upper: 600,
                    liquidity_delta: -1_000_000,
                },
                SessionOp::Settle {
                    currency: CurrencySlot::Currency0,
                },
                SessionOp::Settle {
                    currency: CurrencySlot::Currency1,
                },
            ],
            deadline(),
        )
        .unwrap();

    assert_eq!(*engine.pool(id).unwrap(), before);
    assert!(receipt.amount0 >= -I256::ONE && receipt.amount0 <= I256::ZERO);
    assert!(receipt.amount1 >= -I256::ONE && receipt.amount1 <= I256::ZERO);
}

#[test]
fn partial_withdrawal_keeps_the_remainder_active() {
    let (mut engine, id) = engine_with_pool();
    fund(&mut engine, id, 1_000_000_000);

    engine
        .execute(
            ALICE,
            id,
            &[
                SessionOp::Modify {
                    tick_lower: -600,
                    tick_upper: 600,
                    liquidity_delta: -400_000_000,
                },
                SessionOp::Take {
                    currency: CurrencySlot::Currency0,
                },
                SessionOp::Take {
                    currency: CurrencySlot::Currency1,
                },
            ],
            deadline(),
        )
        .unwrap();

    assert_eq!(engine.get_pool_liquidity(id).unwrap(), 600_000_000);
    let pool = engine.pool(id).unwrap();
    assert_eq!(pool.tick_entry(-600).liquidity_net, 600_000_000);
    assert_eq!(pool.tick_entry(600).liquidity_net, -600_000_000);
}

#[test]
fn unsettled_session_leaves_the_pool_byte_identical() {
    let (mut engine, id) = engine_with_pool();
    fund(&mut engine, id, 1_000_000_000);
    let before = engine.pool(id).unwrap().clone();

    let result = engine.execute(
        ALICE,
        id,
        &[
            SessionOp::Modify {
                tick_lower: -120,
                tick_upper: 120,
                liquidity_delta: 500,
            },
            SessionOp::Settle {
                currency: CurrencySlot::Currency0,
            },
            // currency1 debt left unsettled
        ],
        deadline(),
    );

    assert!(matches!(result, Err(EngineError::UnsettledBalance { .. })));
    assert_eq!(*engine.pool(id).unwrap(), before);
    assert!(matches!(
        engine.events().last().unwrap().payload,
        EventPayload::SessionRolledBack(_)
    ));
}

#[test]
fn expired_deadline_rejects_the_whole_session() {
    let (mut engine, id) = engine_with_pool();
    engine.set_time(Timestamp::from_millis(100_000));

    let result = engine.execute(
        ALICE,
        id,
        &[SessionOp::Modify {
            tick_lower: -600,
            tick_upper: 600,
            liquidity_delta: 1_000,
        }],
        deadline(),
    );

    assert!(matches!(
        result,
        Err(EngineError::DeadlineExpired { deadline: d, now }) if now > d
    ));
    assert_eq!(engine.get_pool_liquidity(id).unwrap(), 0);
}

#[test]
fn unknown_pool_rejected() {
    let mut engine = Engine::new(EngineConfig::default());
    let missing = PoolId(alloy_primitives::B256::ZERO);

    let result = engine.execute(ALICE, missing, &[], deadline());
    assert!(matches!(
        result,
        Err(EngineError::Registry(RegistryError::PoolNotFound(_)))
    ));
}

#[test]
fn sweep_pays_the_named_recipient() {
    let (mut engine, id) = engine_with_pool();
    fund(&mut engine, id, 1_000_000_000);

    let treasury = Address::with_last_byte(0xFE);
    let receipt = engine
        .execute(
            ALICE,
            id,
            &[
                SessionOp::Modify {
                    tick_lower: -600,
                    tick_upper: 600,
                    liquidity_delta: -1_000_000_000,
                },
                SessionOp::Sweep { recipient: treasury },
            ],
            deadline(),
        )
        .unwrap();

    assert_eq!(receipt.transfers.len(), 2);
    for transfer in &receipt.transfers {
        assert_eq!(transfer.account, treasury);
        assert!(transfer.amount > I256::ZERO);
    }
    assert!(engine
        .events()
        .iter()
        .any(|e| matches!(e.payload, EventPayload::Swept(_))));
}

#[test]
fn unauthorized_sender_rolls_back() {
    let mut engine = Engine::new(EngineConfig::default())
        .with_authorizer(Box::new(AllowList::new(vec![ALICE])));
    let id = engine
        .create_pool(
            currency(1),
            currency(2),
            FeePips::new(3000),
            60,
            SqrtPriceX96::ONE,
        )
        .unwrap();

    let ops = [
        SessionOp::Modify {
            tick_lower: -600,
            tick_upper: 600,
            liquidity_delta: 1_000_000,
        },
        SessionOp::Settle {
            currency: CurrencySlot::Currency0,
        },
        SessionOp::Settle {
            currency: CurrencySlot::Currency1,
        },
    ];

    let result = engine.execute(BOB, id, &ops, deadline());
    assert!(matches!(result, Err(EngineError::Authorization(_))));
    assert_eq!(engine.get_pool_liquidity(id).unwrap(), 0);

    // The allow-listed sender succeeds with the identical session.
    engine.execute(ALICE, id, &ops, deadline()).unwrap();
    assert_eq!(engine.get_pool_liquidity(id).unwrap(), 1_000_000);
}

#[test]
fn unfunded_vault_custody_rolls_back() {
    let mut engine =
        Engine::new(EngineConfig::default()).with_custody(Box::new(VaultCustody::new()));
    let id = engine
        .create_pool(
            currency(1),
            currency(2),
            FeePips::new(3000),
            60,
            SqrtPriceX96::ONE,
        )
        .unwrap();

    // Settling a debt debits the sender, who holds nothing in the vault.
    let result = engine.execute(
        ALICE,
        id,
        &[
            SessionOp::Modify {
                tick_lower: -600,
                tick_upper: 600,
                liquidity_delta: 1_000_000,
            },
            SessionOp::Settle {
                currency: CurrencySlot::Currency0,
            },
            SessionOp::Settle {
                currency: CurrencySlot::Currency1,
            },
        ],
        deadline(),
    );

    assert!(matches!(
        result,
        Err(EngineError::Custody(CustodyError::InsufficientFunds { .. }))
    ));
    assert_eq!(engine.get_pool_liquidity(id).unwrap(), 0);
    assert!(matches!(
        engine.events().last().unwrap().payload,
        EventPayload::SessionRolledBack(_)
    ));
}

#[test]
fn sessions_on_different_pools_are_independent() {
    let mut engine = Engine::new(EngineConfig::default());
    let pool_a = engine
        .create_pool(
            currency(1),
            currency(2),
            FeePips::new(3000),
            60,
            SqrtPriceX96::ONE,
        )
        .unwrap();
    let pool_b = engine
        .create_pool(
            currency(1),
            currency(3),
            FeePips::new(3000),
            60,
            SqrtPriceX96::ONE,
        )
        .unwrap();

    fund(&mut engine, pool_a, 500_000);
    fund(&mut engine, pool_b, 700_000);

    assert_eq!(engine.get_pool_liquidity(pool_a).unwrap(), 500_000);
    assert_eq!(engine.get_pool_liquidity(pool_b).unwrap(), 700_000);
}

#[test]
fn committed_session_logs_transfers_and_commit() {
    let (mut engine, id) = engine_with_pool();
    fund(&mut engine, id, 1_000_000_000);

    let settled: Vec<_> = engine
        .events()
        .iter()
        .filter_map(|e| match &e.payload {
            EventPayload::TransferSettled(t) => Some(*t),
            _ => None,
        })
        .collect();
    assert_eq!(settled.len(), 2);
    for t in &settled {
        assert_eq!(t.account, ALICE);
        assert!(t.amount < I256::ZERO); // debits, the caller paid
    }

    let commit = engine
        .events()
        .iter()
        .find_map(|e| match &e.payload {
            EventPayload::SessionCommitted(c) => Some(*c),
            _ => None,
        })
        .unwrap();
    assert_eq!(commit.pool_id, id);
    assert_eq!(commit.sender, ALICE);
    assert_eq!(commit.operations, 3);
}

#[test]
fn out_of_range_positions_charge_one_currency() {
    let (mut engine, id) = engine_with_pool();

    // Entirely above the current price: currency0 only, so only one settle
    // is needed.
    let receipt = engine
        .execute(
            ALICE,
            id,
            &[
                SessionOp::Modify {
                    tick_lower: 600,
                    tick_upper: 1200,
                    liquidity_delta: 1_000_000,
                },
                SessionOp::Settle {
                    currency: CurrencySlot::Currency0,
                },
            ],
            deadline(),
        )
        .unwrap();

    assert!(receipt.amount0 < I256::ZERO);
    assert_eq!(receipt.amount1, I256::ZERO);
    // Out of range, so the active total is untouched.
    assert_eq!(engine.get_pool_liquidity(id).unwrap(), 0);
    assert_eq!(engine.pool(id).unwrap().tick_entry(600).liquidity_net, 1_000_000);
}

#[test]
fn pool_ids_are_deterministic_across_engines() {
    let (mut a, id_a) = engine_with_pool();
    let (mut b, id_b) = engine_with_pool();
    assert_eq!(id_a, id_b);

    fund(&mut a, id_a, 123_456);
    fund(&mut b, id_b, 123_456);
    assert_eq!(*a.pool(id_a).unwrap(), *b.pool(id_b).unwrap());
}

#[test]
fn vault_custody_settles_when_funded() {
    let mut vault = VaultCustody::new();
    vault.fund(currency(1), ALICE, U256::from(10_000_000u64));
    vault.fund(currency(2), ALICE, U256::from(10_000_000u64));

    let mut engine = Engine::new(EngineConfig::default()).with_custody(Box::new(vault));
    let id = engine
        .create_pool(
            currency(1),
            currency(2),
            FeePips::new(3000),
            60,
            SqrtPriceX96::ONE,
        )
        .unwrap();

    fund(&mut engine, id, 1_000_000);
    assert_eq!(engine.get_pool_liquidity(id).unwrap(), 1_000_000);
}
