//! The voting ledger — a single-writer state machine over proposals, weights,
//! delegations and the pause switch.
//!
//! Every mutating operation takes `&mut self`, reads the clock once, checks all
//! of its preconditions and computes every new value before the first write.
//! A rejected call therefore leaves no trace, and no operation can be entered
//! again before the previous one has committed. Events go out only after the
//! commit.

use crate::ballot::BallotBox;
use crate::config::LedgerConfig;
use crate::delegation::DelegationRegistry;
use crate::error::LedgerError;
use crate::event::{EventBus, LedgerEvent};
use crate::proposal::{Proposal, ProposalStatus};
use crate::weights::WeightRegistry;
use std::collections::{BTreeMap, HashMap};
use tally_types::{Address, Clock, LedgerParams, ProposalId, Timestamp, Weight};
use tally_utils::format_window;

/// Weight a voter would cast right now, and where it comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Resolution {
    weight: Weight,
    /// Whether the voter's own weight is still uncast on this proposal.
    own: bool,
    /// Direct delegators whose weight is still uncast on this proposal.
    delegators: Vec<Address>,
}

pub struct VotingLedger<C: Clock> {
    owner: Address,
    params: LedgerParams,
    clock: C,
    proposals: BTreeMap<ProposalId, Proposal>,
    ballots: HashMap<ProposalId, BallotBox>,
    weights: WeightRegistry,
    delegations: DelegationRegistry,
    paused: bool,
    /// Weight cast across all proposals.
    total_votes_cast: Weight,
    events: EventBus,
}

fn rejected(op: &'static str, caller: &Address, err: LedgerError) -> LedgerError {
    tracing::debug!(op, caller = %caller, reason = err.name(), "{err}");
    err
}

impl<C: Clock> VotingLedger<C> {
    pub fn new(owner: Address, params: LedgerParams, clock: C) -> Self {
        tracing::info!(
            owner = %owner,
            quorum = %params.quorum_threshold,
            default_weight = %params.default_weight,
            "voting ledger instantiated"
        );
        Self {
            owner,
            weights: WeightRegistry::new(params.default_weight),
            params,
            clock,
            proposals: BTreeMap::new(),
            ballots: HashMap::new(),
            delegations: DelegationRegistry::new(),
            paused: false,
            total_votes_cast: Weight::ZERO,
            events: EventBus::new(),
        }
    }

    pub fn from_config(config: &LedgerConfig, clock: C) -> Self {
        Self::new(config.owner.clone(), config.params(), clock)
    }

    /// Register a listener for committed state changes.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&LedgerEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(listener);
    }

    // ── Operations ─────────────────────────────────────────────────────

    /// Open a proposal whose window runs from now to now + `duration_secs` inclusive.
    ///
    /// Any caller may create proposals, and pausing does not block it.
    pub fn create_proposal(
        &mut self,
        caller: &Address,
        id: ProposalId,
        description: impl Into<String>,
        duration_secs: u64,
    ) -> Result<(), LedgerError> {
        let now = self.clock.now();
        if self.proposals.contains_key(&id) {
            return Err(rejected(
                "create_proposal",
                caller,
                LedgerError::AlreadyExists(id),
            ));
        }
        let end_time = now
            .checked_add_secs(duration_secs)
            .ok_or_else(|| rejected("create_proposal", caller, LedgerError::Overflow))?;

        let proposal = Proposal::new(id, description.into(), caller.clone(), now, end_time);
        self.proposals.insert(id, proposal);

        tracing::info!(
            proposal = %id,
            proposer = %caller,
            window = %format_window(duration_secs),
            end = %end_time,
            "proposal created"
        );
        self.events.publish(&LedgerEvent::ProposalCreated {
            id,
            proposer: caller.clone(),
            end_time,
        });
        Ok(())
    }

    /// Cast `caller`'s effective weight for or against a proposal.
    ///
    /// Checks, in order: pause, existence, window, double vote, voting power.
    /// Returns the weight that was added to the tally.
    pub fn vote(
        &mut self,
        caller: &Address,
        id: ProposalId,
        support: bool,
    ) -> Result<Weight, LedgerError> {
        let now = self.clock.now();
        let (resolution, tally, total) = self
            .plan_vote(caller, id, support, now)
            .map_err(|e| rejected("vote", caller, e))?;

        let Some(proposal) = self.proposals.get_mut(&id) else {
            return Err(LedgerError::NotFound(id));
        };
        if support {
            proposal.for_votes = tally;
        } else {
            proposal.against_votes = tally;
        }
        self.total_votes_cast = total;

        let own = resolution.own.then(|| caller.clone());
        self.ballots.entry(id).or_default().record(
            caller.clone(),
            own.into_iter().chain(resolution.delegators.iter().cloned()),
        );

        tracing::info!(
            proposal = %id,
            voter = %caller,
            support,
            weight = %resolution.weight,
            delegators = resolution.delegators.len(),
            "vote cast"
        );
        self.events.publish(&LedgerEvent::VoteCast {
            id,
            voter: caller.clone(),
            support,
            weight: resolution.weight,
            carried: resolution.delegators,
        });
        Ok(resolution.weight)
    }

    fn plan_vote(
        &self,
        caller: &Address,
        id: ProposalId,
        support: bool,
        now: Timestamp,
    ) -> Result<(Resolution, Weight, Weight), LedgerError> {
        if self.paused {
            return Err(LedgerError::Paused);
        }
        let proposal = self.proposals.get(&id).ok_or(LedgerError::NotFound(id))?;
        if !proposal.is_open(now) {
            return Err(LedgerError::VotingClosed {
                id,
                ended_at: proposal.end_time,
            });
        }
        let ballot = self.ballots.get(&id);
        if ballot.is_some_and(|b| b.has_voted(caller)) {
            return Err(LedgerError::AlreadyVoted {
                id,
                voter: caller.clone(),
            });
        }
        let resolution = self.resolve(ballot, caller)?;
        if resolution.weight.is_zero() {
            return Err(LedgerError::NoVotingPower(caller.clone()));
        }

        let current = if support {
            proposal.for_votes
        } else {
            proposal.against_votes
        };
        let tally = current
            .checked_add(resolution.weight)
            .ok_or(LedgerError::Overflow)?;
        // Informational only, so it saturates rather than blocking a valid vote.
        let total = self.total_votes_cast.saturating_add(resolution.weight);
        Ok((resolution, tally, total))
    }

    /// Own weight plus every direct delegator's weight, skipping any weight
    /// already cast on this proposal.
    fn resolve(
        &self,
        ballot: Option<&BallotBox>,
        voter: &Address,
    ) -> Result<Resolution, LedgerError> {
        let uncast = |address: &Address| !ballot.is_some_and(|b| b.is_cast(address));

        let own = uncast(voter);
        let mut weight = if own {
            self.weights.weight_of(voter)
        } else {
            Weight::ZERO
        };
        let mut delegators = Vec::new();
        for delegator in self.delegations.delegators_of(voter) {
            if !uncast(delegator) {
                continue;
            }
            weight = weight
                .checked_add(self.weights.weight_of(delegator))
                .ok_or(LedgerError::Overflow)?;
            delegators.push(delegator.clone());
        }
        Ok(Resolution {
            weight,
            own,
            delegators,
        })
    }

    /// Point `caller`'s weight at `to`, replacing any previous delegation.
    pub fn delegate(&mut self, caller: &Address, to: &Address) -> Result<(), LedgerError> {
        let previous = self
            .delegations
            .delegate(caller, to)
            .map_err(|e| rejected("delegate", caller, e))?;

        match previous {
            Some(previous) => {
                tracing::info!(from = %caller, to = %to, previous = %previous, "delegation repointed")
            }
            None => tracing::info!(from = %caller, to = %to, "delegated"),
        }
        self.events.publish(&LedgerEvent::Delegated {
            from: caller.clone(),
            to: to.clone(),
        });
        Ok(())
    }

    /// Drop `caller`'s delegation. Returns whether there was one.
    pub fn undelegate(&mut self, caller: &Address) -> bool {
        let Some(previous) = self.delegations.undelegate(caller) else {
            return false;
        };
        tracing::info!(from = %caller, previous = %previous, "delegation removed");
        self.events.publish(&LedgerEvent::Undelegated {
            from: caller.clone(),
            previous,
        });
        true
    }

    /// Owner-only: set explicit weights, overriding the default from then on.
    ///
    /// Later entries win when an address appears more than once.
    pub fn assign_voting_weight(
        &mut self,
        caller: &Address,
        addresses: &[Address],
        weights: &[Weight],
    ) -> Result<(), LedgerError> {
        self.require_owner(caller)
            .map_err(|e| rejected("assign_voting_weight", caller, e))?;
        if addresses.len() != weights.len() {
            return Err(rejected(
                "assign_voting_weight",
                caller,
                LedgerError::LengthMismatch {
                    addresses: addresses.len(),
                    weights: weights.len(),
                },
            ));
        }

        for (address, &weight) in addresses.iter().zip(weights) {
            self.weights.assign(address.clone(), weight);
            tracing::info!(address = %address, weight = %weight, "voting weight assigned");
        }
        for (address, &weight) in addresses.iter().zip(weights) {
            self.events.publish(&LedgerEvent::WeightAssigned {
                address: address.clone(),
                weight,
            });
        }
        Ok(())
    }

    /// Finalise a closed proposal: `passed = for > against`.
    ///
    /// May be called again after success; it recomputes `passed` from the
    /// (by then frozen) tallies. Any caller may count, and pausing does not
    /// block it.
    pub fn count_votes(&mut self, caller: &Address, id: ProposalId) -> Result<bool, LedgerError> {
        let now = self.clock.now();
        let passed = self
            .plan_count(id, now)
            .map_err(|e| rejected("count_votes", caller, e))?;

        let Some(proposal) = self.proposals.get_mut(&id) else {
            return Err(LedgerError::NotFound(id));
        };
        proposal.passed = passed;
        proposal.counted = true;

        tracing::info!(
            proposal = %id,
            for_votes = %proposal.for_votes,
            against_votes = %proposal.against_votes,
            passed,
            "votes counted"
        );
        let event = LedgerEvent::VotesCounted {
            id,
            for_votes: proposal.for_votes,
            against_votes: proposal.against_votes,
            passed,
        };
        self.events.publish(&event);
        Ok(passed)
    }

    fn plan_count(&self, id: ProposalId, now: Timestamp) -> Result<bool, LedgerError> {
        let proposal = self.proposals.get(&id).ok_or(LedgerError::NotFound(id))?;
        if proposal.is_open(now) {
            return Err(LedgerError::VotingNotEnded {
                id,
                ends_at: proposal.end_time,
            });
        }
        let total = proposal
            .for_votes
            .checked_add(proposal.against_votes)
            .ok_or(LedgerError::Overflow)?;
        if total < self.params.quorum_threshold {
            return Err(LedgerError::QuorumNotMet {
                have: total,
                need: self.params.quorum_threshold,
            });
        }
        Ok(proposal.for_votes > proposal.against_votes)
    }

    /// Owner-only emergency stop for voting.
    pub fn pause(&mut self, caller: &Address) -> Result<(), LedgerError> {
        self.require_owner(caller)
            .map_err(|e| rejected("pause", caller, e))?;
        self.paused = true;
        tracing::warn!(by = %caller, "voting paused");
        self.events.publish(&LedgerEvent::Paused { by: caller.clone() });
        Ok(())
    }

    pub fn unpause(&mut self, caller: &Address) -> Result<(), LedgerError> {
        self.require_owner(caller)
            .map_err(|e| rejected("unpause", caller, e))?;
        self.paused = false;
        tracing::info!(by = %caller, "voting resumed");
        self.events.publish(&LedgerEvent::Unpaused { by: caller.clone() });
        Ok(())
    }

    fn require_owner(&self, caller: &Address) -> Result<(), LedgerError> {
        if caller != &self.owner {
            return Err(LedgerError::Unauthorized(caller.clone()));
        }
        Ok(())
    }

    // ── Read accessors ─────────────────────────────────────────────────

    pub fn proposal(&self, id: ProposalId) -> Result<&Proposal, LedgerError> {
        self.proposals.get(&id).ok_or(LedgerError::NotFound(id))
    }

    /// Like [`proposal`](Self::proposal), but an expired proposal reads as
    /// `NotFound`.
    pub fn active_proposal(&self, id: ProposalId) -> Result<&Proposal, LedgerError> {
        let now = self.clock.now();
        self.proposals
            .get(&id)
            .filter(|p| p.is_open(now))
            .ok_or(LedgerError::NotFound(id))
    }

    pub fn proposal_exists(&self, id: ProposalId) -> bool {
        self.proposals.contains_key(&id)
    }

    pub fn proposal_status(&self, id: ProposalId) -> Result<ProposalStatus, LedgerError> {
        Ok(self.proposal(id)?.status(self.clock.now()))
    }

    /// All proposals in id order.
    pub fn proposals(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.values()
    }

    /// Assigned weight, or the default.
    pub fn voter_weight(&self, address: &Address) -> Weight {
        self.weights.weight_of(address)
    }

    /// Own weight plus direct delegators' weight, outside any proposal.
    pub fn effective_weight(&self, address: &Address) -> Weight {
        self.delegations
            .delegators_of(address)
            .fold(self.weights.weight_of(address), |acc, d| {
                acc.saturating_add(self.weights.weight_of(d))
            })
    }

    /// What `address` would add to proposal `id` if it voted now.
    pub fn effective_weight_on(
        &self,
        id: ProposalId,
        address: &Address,
    ) -> Result<Weight, LedgerError> {
        if !self.proposals.contains_key(&id) {
            return Err(LedgerError::NotFound(id));
        }
        if self.has_voted(id, address) {
            return Ok(Weight::ZERO);
        }
        Ok(self.resolve(self.ballots.get(&id), address)?.weight)
    }

    pub fn has_voted(&self, id: ProposalId, address: &Address) -> bool {
        self.ballots
            .get(&id)
            .is_some_and(|b| b.has_voted(address))
    }

    pub fn voter_count(&self, id: ProposalId) -> usize {
        self.ballots.get(&id).map_or(0, BallotBox::voter_count)
    }

    pub fn delegate_of(&self, address: &Address) -> Option<&Address> {
        self.delegations.delegate_of(address)
    }

    pub fn delegators_of(&self, address: &Address) -> Vec<Address> {
        self.delegations.delegators_of(address).cloned().collect()
    }

    /// Weight cast across all proposals.
    pub fn total_votes_cast(&self) -> Weight {
        self.total_votes_cast
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn params(&self) -> &LedgerParams {
        &self.params
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }
}
