//! Fundamental types for the tally voting ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, proposal ids, voting weights, timestamps, the clock abstraction and
//! ledger parameters.

pub mod address;
pub mod error;
pub mod id;
pub mod params;
pub mod time;
pub mod weight;

pub use address::Address;
pub use error::TypeError;
pub use id::ProposalId;
pub use params::LedgerParams;
pub use time::{Clock, Timestamp};
pub use weight::Weight;
