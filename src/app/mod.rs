//! Application layer: the polling loop that ties source and sink together.

pub mod poller;

pub use poller::{CycleOutcome, Poller};
