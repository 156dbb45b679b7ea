use tally_types::{Address, ProposalId, Timestamp, Weight};
use thiserror::Error;

/// Why a ledger operation was rejected.
///
/// Every operation checks all of its preconditions before touching state, so
/// receiving one of these means the ledger is exactly as it was before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("proposal {0} already exists")]
    AlreadyExists(ProposalId),

    #[error("proposal {0} not found")]
    NotFound(ProposalId),

    #[error("voting on proposal {id} closed at {ended_at}")]
    VotingClosed { id: ProposalId, ended_at: Timestamp },

    #[error("voting on proposal {id} has not ended yet (ends at {ends_at})")]
    VotingNotEnded { id: ProposalId, ends_at: Timestamp },

    #[error("{voter} has already voted on proposal {id}")]
    AlreadyVoted { id: ProposalId, voter: Address },

    #[error("{0} has no voting power")]
    NoVotingPower(Address),

    #[error("cannot delegate to self")]
    SelfDelegation,

    #[error("quorum not met: {have} < {need}")]
    QuorumNotMet { have: Weight, need: Weight },

    #[error("voting is paused")]
    Paused,

    #[error("{0} is not the ledger owner")]
    Unauthorized(Address),

    #[error("{addresses} addresses but {weights} weights")]
    LengthMismatch { addresses: usize, weights: usize },

    #[error("weight or time arithmetic overflowed")]
    Overflow,
}

impl LedgerError {
    /// Stable name of the failure condition, independent of its payload.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AlreadyExists(_) => "AlreadyExists",
            Self::NotFound(_) => "NotFound",
            Self::VotingClosed { .. } => "VotingClosed",
            Self::VotingNotEnded { .. } => "VotingNotEnded",
            Self::AlreadyVoted { .. } => "AlreadyVoted",
            Self::NoVotingPower(_) => "NoVotingPower",
            Self::SelfDelegation => "SelfDelegation",
            Self::QuorumNotMet { .. } => "QuorumNotMet",
            Self::Paused => "Paused",
            Self::Unauthorized(_) => "Unauthorized",
            Self::LengthMismatch { .. } => "LengthMismatch",
            Self::Overflow => "Overflow",
        }
    }
}
