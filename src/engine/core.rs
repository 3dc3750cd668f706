// 8.1 engine/core.rs: main engine. holds the pool registry, the pricing
// curve, custody, and the event log behind one deterministic clock.

use std::collections::HashSet;

use super::results::EngineError;
use crate::config::EngineConfig;
use crate::curve::{PricingCurve, RangedCurve};
use crate::custody::{AllowAll, TokenCustody, TransferAuthorizer, UnboundedCustody};
use crate::events::{Event, EventId, EventPayload, PoolCreatedEvent};
use crate::pool::{Pool, PoolSnapshot};
use crate::registry::PoolRegistry;
use crate::types::{Currency, FeePips, PoolId, SqrtPriceX96, Timestamp};

pub struct Engine {
    pub(super) config: EngineConfig,
    pub(super) registry: PoolRegistry,
    pub(super) curve: Box<dyn PricingCurve + Send + Sync>,
    pub(super) custody: Box<dyn TokenCustody + Send + Sync>,
    pub(super) authorizer: Box<dyn TransferAuthorizer + Send + Sync>,
    pub(super) events: Vec<Event>,
    pub(super) next_event_id: u64,
    pub(super) current_time: Timestamp,
    /// Pools with a session in flight. A pool id in here rejects a second
    /// unlock until the first session commits or rolls back.
    pub(super) unlocking: HashSet<PoolId>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            registry: PoolRegistry::new(),
            curve: Box::new(RangedCurve),
            custody: Box::new(UnboundedCustody::new()),
            authorizer: Box::new(AllowAll),
            events: Vec::new(),
            next_event_id: 1,
            current_time: Timestamp::from_millis(0),
            unlocking: HashSet::new(),
        }
    }

    pub fn with_custody(mut self, custody: Box<dyn TokenCustody + Send + Sync>) -> Self {
        self.custody = custody;
        self
    }

    pub fn with_authorizer(mut self, authorizer: Box<dyn TransferAuthorizer + Send + Sync>) -> Self {
        self.authorizer = authorizer;
        self
    }

    pub fn with_curve(mut self, curve: Box<dyn PricingCurve + Send + Sync>) -> Self {
        self.curve = curve;
        self
    }

    pub fn set_time(&mut self, timestamp: Timestamp) {
        self.current_time = timestamp;
    }

    pub fn time(&self) -> Timestamp {
        self.current_time
    }

    pub fn advance_time(&mut self, millis: i64) {
        self.current_time = Timestamp::from_millis(self.current_time.as_millis() + millis);
    }

    pub fn create_pool(
        &mut self,
        currency_a: Currency,
        currency_b: Currency,
        fee: FeePips,
        tick_spacing: i32,
        starting_price: SqrtPriceX96,
    ) -> Result<PoolId, EngineError> {
        let id = self.registry.create_pool(
            &self.config,
            self.curve.as_ref(),
            currency_a,
            currency_b,
            fee,
            tick_spacing,
            starting_price,
            self.current_time,
        )?;

        let pool = self.registry.get(id)?;
        let payload = EventPayload::PoolCreated(PoolCreatedEvent {
            pool_id: id,
            currency0: pool.key.currency0,
            currency1: pool.key.currency1,
            fee: pool.key.fee,
            tick_spacing: pool.key.tick_spacing,
            sqrt_price: pool.sqrt_price,
            tick: pool.tick,
        });
        self.emit_event(payload);

        Ok(id)
    }

    pub fn get_pool_state(&self, id: PoolId) -> Result<PoolSnapshot, EngineError> {
        Ok(self.registry.get_pool_state(id)?)
    }

    pub fn get_pool_liquidity(&self, id: PoolId) -> Result<u128, EngineError> {
        Ok(self.registry.get_pool_liquidity(id)?)
    }

    pub fn pool(&self, id: PoolId) -> Result<&Pool, EngineError> {
        Ok(self.registry.get(id)?)
    }

    pub fn registry(&self) -> &PoolRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn recent_events(&self, count: usize) -> &[Event] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    pub(super) fn emit_event(&mut self, payload: EventPayload) {
        let event = Event::new(EventId(self.next_event_id), self.current_time, payload);
        self.next_event_id += 1;

        if self.config.verbose {
            println!("[Event {}] {:?}", event.id.0, event.payload);
        }

        self.events.push(event);

        if self.events.len() > self.config.max_events {
            let drain_count = self.events.len() - self.config.max_events;
            self.events.drain(0..drain_count);
        }
    }
}
