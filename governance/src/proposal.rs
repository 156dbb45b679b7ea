//! Proposals and their lifecycle.

use serde::{Deserialize, Serialize};
use tally_types::{Address, ProposalId, Timestamp, Weight};

/// Where a proposal is in its lifecycle at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    /// `now <= end_time`: votes are accepted.
    Open,
    /// Window closed, not counted yet.
    Closed,
    /// Counted with more weight for than against.
    Passed,
    /// Counted without a strict majority for.
    Rejected,
}

/// A votable item with a bounded window and accumulated weighted tallies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub description: String,
    /// Who created it. Creating is not privileged.
    pub proposer: Address,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub for_votes: Weight,
    pub against_votes: Weight,
    /// Only meaningful once `counted` is set.
    pub passed: bool,
    pub counted: bool,
}

impl Proposal {
    pub(crate) fn new(
        id: ProposalId,
        description: String,
        proposer: Address,
        start_time: Timestamp,
        end_time: Timestamp,
    ) -> Self {
        Self {
            id,
            description,
            proposer,
            start_time,
            end_time,
            for_votes: Weight::ZERO,
            against_votes: Weight::ZERO,
            passed: false,
            counted: false,
        }
    }

    /// Whether votes are still accepted at `now` (the end second is inclusive).
    pub fn is_open(&self, now: Timestamp) -> bool {
        now <= self.end_time
    }

    /// Total weight cast, saturating.
    pub fn total_votes(&self) -> Weight {
        self.for_votes.saturating_add(self.against_votes)
    }

    pub fn status(&self, now: Timestamp) -> ProposalStatus {
        match (self.counted, self.passed) {
            (true, true) => ProposalStatus::Passed,
            (true, false) => ProposalStatus::Rejected,
            (false, _) if self.is_open(now) => ProposalStatus::Open,
            (false, _) => ProposalStatus::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal(end: u64) -> Proposal {
        Proposal::new(
            ProposalId::new(1),
            "Test Proposal".into(),
            Address::new("alice"),
            Timestamp::new(0),
            Timestamp::new(end),
        )
    }

    #[test]
    fn end_second_is_inclusive() {
        let p = proposal(10);
        assert!(p.is_open(Timestamp::new(10)));
        assert!(!p.is_open(Timestamp::new(11)));
    }

    #[test]
    fn status_transitions() {
        let mut p = proposal(10);
        assert_eq!(p.status(Timestamp::new(5)), ProposalStatus::Open);
        assert_eq!(p.status(Timestamp::new(11)), ProposalStatus::Closed);
        p.counted = true;
        assert_eq!(p.status(Timestamp::new(11)), ProposalStatus::Rejected);
        p.passed = true;
        assert_eq!(p.status(Timestamp::new(11)), ProposalStatus::Passed);
    }
}
