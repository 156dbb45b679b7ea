//! Voting ledger for tally.
//!
//! A deterministic, single-writer state machine: time-bounded proposals,
//! weighted votes with one-hop delegation, quorum-gated counting, and an
//! owner-controlled emergency pause.
//!
//! Key principle: one address = one vote of weight 1, unless the owner
//! assigns a different weight.
//! Caller identity and time are always explicit inputs: every operation takes
//! the caller's [`Address`](tally_types::Address) and the ledger reads time from
//! an injected [`Clock`](tally_types::Clock).

pub mod ballot;
pub mod config;
pub mod delegation;
pub mod error;
pub mod event;
pub mod ledger;
pub mod proposal;
pub mod weights;

pub use ballot::BallotBox;
pub use config::{ConfigError, LedgerConfig};
pub use delegation::DelegationRegistry;
pub use error::LedgerError;
pub use event::{EventBus, LedgerEvent};
pub use ledger::VotingLedger;
pub use proposal::{Proposal, ProposalStatus};
pub use weights::WeightRegistry;
