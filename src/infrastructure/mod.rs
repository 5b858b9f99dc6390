//! Adapters for the domain ports: storage, waiting and notification delivery.

pub mod clock;
pub mod in_memory;
pub mod notifier;
