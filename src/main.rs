//! Pool Registry Engine Simulation.
//!
//! Demonstrates the full pool lifecycle including pool creation, unlock
//! sessions, liquidity funding and withdrawal, settlement failures, and
//! residual sweeping.

use alloy_primitives::Address;
use pool_core::*;

fn main() {
    println!("Concentrated Liquidity Pool Engine Simulation");
    println!("In-Memory Registry, Unlock Sessions, Zero-Sum Settlement\n");

    scenario_1_pool_creation();
    scenario_2_fund_a_position();
    scenario_3_withdraw_and_take();
    scenario_4_unbalanced_session();
    scenario_5_sweep_residuals();
    scenario_6_multiple_fee_tiers();

    println!("\nAll simulations completed successfully.");
}

fn currency(byte: u8) -> Currency {
    Currency(Address::with_last_byte(byte))
}

fn deadline(engine: &Engine) -> Timestamp {
    Timestamp::from_millis(engine.time().as_millis() + 60_000)
}

/// Pool creation and read-only inspection.
fn scenario_1_pool_creation() {
    println!("Scenario 1: Pool Creation\n");

    let mut engine = Engine::new(EngineConfig::default());
    let id = engine
        .create_pool(currency(1), currency(2), FeePips::new(3000), 60, SqrtPriceX96::ONE)
        .unwrap();

    let state = engine.get_pool_state(id).unwrap();
    println!("  Created pool {id}");
    println!("  Fee tier: {}, tick: {}", state.lp_fee, state.tick);
    println!(
        "  Price: {}, active liquidity: {}\n",
        state.sqrt_price.to_price().unwrap(),
        engine.get_pool_liquidity(id).unwrap()
    );

    // Creating the same pair again, in either currency order, is rejected.
    let duplicate = engine.create_pool(currency(2), currency(1), FeePips::new(3000), 60, SqrtPriceX96::ONE);
    println!("  Duplicate creation: {}\n", duplicate.unwrap_err());
}

/// Add liquidity and settle both currencies in one session.
fn scenario_2_fund_a_position() {
    println!("Scenario 2: Funding a Position\n");

    let mut engine = Engine::new(EngineConfig::default());
    let id = engine
        .create_pool(currency(1), currency(2), FeePips::new(3000), 60, SqrtPriceX96::ONE)
        .unwrap();
    let alice = Address::with_last_byte(0xA1);

    let receipt = engine
        .execute(
            alice,
            id,
            &[
                SessionOp::Modify {
                    tick_lower: -600,
                    tick_upper: 600,
                    liquidity_delta: 1_000_000_000,
                },
                SessionOp::Settle { currency: CurrencySlot::Currency0 },
                SessionOp::Settle { currency: CurrencySlot::Currency1 },
            ],
            deadline(&engine),
        )
        .unwrap();

    println!("  Alice adds 1,000,000,000 liquidity over [-600, 600)");
    println!("  Paid: {} currency0, {} currency1", -receipt.amount0, -receipt.amount1);
    println!("  Active liquidity: {}\n", engine.get_pool_liquidity(id).unwrap());
}

/// Remove liquidity and collect the released amounts.
fn scenario_3_withdraw_and_take() {
    println!("Scenario 3: Withdrawal\n");

    let mut engine = Engine::new(EngineConfig::default());
    let id = engine
        .create_pool(currency(1), currency(2), FeePips::new(3000), 60, SqrtPriceX96::ONE)
        .unwrap();
    let alice = Address::with_last_byte(0xA1);

    engine
        .execute(
            alice,
            id,
            &[
                SessionOp::Modify { tick_lower: -600, tick_upper: 600, liquidity_delta: 1_000_000_000 },
                SessionOp::Settle { currency: CurrencySlot::Currency0 },
                SessionOp::Settle { currency: CurrencySlot::Currency1 },
            ],
            deadline(&engine),
        )
        .unwrap();
    println!("  Alice funds 1,000,000,000 liquidity");

    engine.advance_time(5_000);
    let receipt = engine
        .execute(
            alice,
            id,
            &[
                SessionOp::Modify { tick_lower: -600, tick_upper: 600, liquidity_delta: -400_000_000 },
                SessionOp::Take { currency: CurrencySlot::Currency0 },
                SessionOp::Take { currency: CurrencySlot::Currency1 },
            ],
            deadline(&engine),
        )
        .unwrap();

    println!("  Alice withdraws 400,000,000 liquidity");
    println!("  Collected: {} currency0, {} currency1", receipt.amount0, receipt.amount1);
    println!("  Remaining liquidity: {}\n", engine.get_pool_liquidity(id).unwrap());
}

/// A session that does not settle rolls back completely.
fn scenario_4_unbalanced_session() {
    println!("Scenario 4: Unbalanced Session Rollback\n");

    let mut engine = Engine::new(EngineConfig::default());
    let id = engine
        .create_pool(currency(1), currency(2), FeePips::new(3000), 60, SqrtPriceX96::ONE)
        .unwrap();
    let alice = Address::with_last_byte(0xA1);

    println!("  Alice adds liquidity but settles only currency0...");
    let result = engine.execute(
        alice,
        id,
        &[
            SessionOp::Modify { tick_lower: -600, tick_upper: 600, liquidity_delta: 1_000_000_000 },
            SessionOp::Settle { currency: CurrencySlot::Currency0 },
        ],
        deadline(&engine),
    );

    println!("  Session failed: {}", result.unwrap_err());
    println!(
        "  Pool untouched, active liquidity: {}\n",
        engine.get_pool_liquidity(id).unwrap()
    );
}

/// Residuals owed to the caller can be routed to another account.
fn scenario_5_sweep_residuals() {
    println!("Scenario 5: Sweeping Residuals\n");

    let mut engine = Engine::new(EngineConfig::default());
    let id = engine
        .create_pool(currency(1), currency(2), FeePips::new(3000), 60, SqrtPriceX96::ONE)
        .unwrap();
    let alice = Address::with_last_byte(0xA1);
    let treasury = Address::with_last_byte(0xFE);

    engine
        .execute(
            alice,
            id,
            &[
                SessionOp::Modify { tick_lower: -600, tick_upper: 600, liquidity_delta: 1_000_000_000 },
                SessionOp::Settle { currency: CurrencySlot::Currency0 },
                SessionOp::Settle { currency: CurrencySlot::Currency1 },
            ],
            deadline(&engine),
        )
        .unwrap();

    let receipt = engine
        .execute(
            alice,
            id,
            &[
                SessionOp::Modify { tick_lower: -600, tick_upper: 600, liquidity_delta: -1_000_000_000 },
                SessionOp::Sweep { recipient: treasury },
            ],
            deadline(&engine),
        )
        .unwrap();

    println!("  Alice removes all liquidity with a sweep to the treasury");
    for transfer in &receipt.transfers {
        println!("  Swept {} of {} to {}", transfer.amount, transfer.currency, transfer.account);
    }
    println!();
}

/// The same pair can trade under several fee tiers at once.
fn scenario_6_multiple_fee_tiers() {
    println!("Scenario 6: Multiple Fee Tiers\n");

    let mut engine = Engine::new(EngineConfig::default());
    for (fee, spacing) in [(100u32, 1i32), (500, 10), (3000, 60), (10000, 200)] {
        let id = engine
            .create_pool(currency(1), currency(2), FeePips::new(fee), spacing, SqrtPriceX96::ONE)
            .unwrap();
        let state = engine.get_pool_state(id).unwrap();
        println!("  {} pool at spacing {spacing}: {id}", state.lp_fee);
    }
    println!("  Registry holds {} pools", engine.registry().len());
    println!("  Events logged: {}", engine.events().len());
}
