//! Application layer containing the simulation orchestration.
//!
//! This module defines the `Orchestrator`, which starts one background worker
//! per simulated transaction, the `RunTable` holding each simulation's log and
//! result, and the `StatusService` used by polling readers.

pub mod orchestrator;
pub mod runs;
pub mod status;
