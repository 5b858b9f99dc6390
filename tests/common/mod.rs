#![allow(dead_code)]

use settlement_orchestrator::application::orchestrator::Orchestrator;
use settlement_orchestrator::config::SimulationConfig;
use settlement_orchestrator::domain::pipeline::STEP_COUNT;
use settlement_orchestrator::domain::ports::{ClockRef, TransactionStoreRef};
use settlement_orchestrator::infrastructure::clock::{InstantClock, TokioClock};
use settlement_orchestrator::infrastructure::in_memory::InMemoryTransactionStore;
use settlement_orchestrator::infrastructure::notifier::OutboxNotifier;
use std::sync::Arc;
use std::time::Duration;

pub const ORIGIN: &str = "whatsapp:+5511999991234";

pub struct Harness {
    pub orchestrator: Orchestrator,
    pub store: TransactionStoreRef,
    pub outbox: OutboxNotifier,
}

pub fn harness_with(clock: ClockRef, outbox: OutboxNotifier, config: &SimulationConfig) -> Harness {
    let store: TransactionStoreRef = Arc::new(InMemoryTransactionStore::new());
    let orchestrator = Orchestrator::new(
        Arc::clone(&store),
        clock,
        Arc::new(outbox.clone()),
        config,
    );
    Harness {
        orchestrator,
        store,
        outbox,
    }
}

/// Orchestrator with a no-wait clock and a recording notifier.
pub fn fast_harness() -> Harness {
    harness_with(
        Arc::new(InstantClock),
        OutboxNotifier::new(),
        &SimulationConfig::default(),
    )
}

/// Orchestrator whose steps really wait `step` each, so readers can poll mid-run.
pub fn timed_harness(step: Duration) -> Harness {
    let config = SimulationConfig {
        step_delays: [step; STEP_COUNT],
        ..SimulationConfig::default()
    };
    harness_with(Arc::new(TokioClock), OutboxNotifier::new(), &config)
}
