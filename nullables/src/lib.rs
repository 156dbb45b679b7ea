//! Nullable infrastructure for deterministic testing.
//!
//! External inputs to the ledger (today only the clock) are abstracted behind
//! traits in `tally-types`. This crate provides controllable implementations
//! that return deterministic values and never touch the host system.
//!
//! Usage: swap real implementations for nullables in tests and script replay.

pub mod clock;

pub use clock::NullClock;
