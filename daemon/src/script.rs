//! Operation scripts: an ordered list of ledger calls, each with its caller,
//! interleaved with clock advances.
//!
//! ```toml
//! start_time = 1700000000
//!
//! [[step]]
//! op = "create"
//! caller = "alice"
//! id = 1
//! description = "Fund the bridge"
//! duration_secs = 3600
//!
//! [[step]]
//! op = "advance"
//! secs = 3601
//!
//! [[step]]
//! op = "count"
//! caller = "alice"
//! id = 1
//! expect = "QuorumNotMet"
//! ```

use serde::{Deserialize, Serialize};
use tally_governance::{LedgerError, Proposal, ProposalStatus, VotingLedger};
use tally_nullables::NullClock;
use tally_types::{Address, ProposalId, Timestamp, Weight};

#[derive(Debug, Deserialize)]
pub struct Script {
    /// Initial ledger time; the CLI flag wins if both are given.
    #[serde(default)]
    pub start_time: Option<u64>,

    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

#[derive(Debug, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub action: Action,

    /// `"ok"` or the name of the expected failure, e.g. `"VotingClosed"`.
    #[serde(default)]
    pub expect: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Action {
    Create {
        caller: Address,
        id: ProposalId,
        description: String,
        duration_secs: u64,
    },
    Vote {
        caller: Address,
        id: ProposalId,
        support: bool,
    },
    Delegate {
        caller: Address,
        to: Address,
    },
    Undelegate {
        caller: Address,
    },
    AssignWeights {
        caller: Address,
        addresses: Vec<Address>,
        weights: Vec<u64>,
    },
    Count {
        caller: Address,
        id: ProposalId,
    },
    Pause {
        caller: Address,
    },
    Unpause {
        caller: Address,
    },
    Advance {
        secs: u64,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Vote { .. } => "vote",
            Self::Delegate { .. } => "delegate",
            Self::Undelegate { .. } => "undelegate",
            Self::AssignWeights { .. } => "assign_weights",
            Self::Count { .. } => "count",
            Self::Pause { .. } => "pause",
            Self::Unpause { .. } => "unpause",
            Self::Advance { .. } => "advance",
        }
    }
}

/// Result of applying one step.
#[derive(Debug)]
pub struct StepOutcome {
    pub op: &'static str,
    pub result: Result<String, LedgerError>,
    /// `Some(false)` when the step carried an `expect` that did not match.
    pub expectation_met: Option<bool>,
}

fn apply(ledger: &mut VotingLedger<NullClock>, action: &Action) -> Result<String, LedgerError> {
    match action {
        Action::Create {
            caller,
            id,
            description,
            duration_secs,
        } => ledger
            .create_proposal(caller, *id, description.clone(), *duration_secs)
            .map(|()| format!("created {id}")),
        Action::Vote {
            caller,
            id,
            support,
        } => ledger
            .vote(caller, *id, *support)
            .map(|w| format!("cast {w} {}", if *support { "for" } else { "against" })),
        Action::Delegate { caller, to } => ledger
            .delegate(caller, to)
            .map(|()| format!("{caller} -> {to}")),
        Action::Undelegate { caller } => Ok(if ledger.undelegate(caller) {
            "delegation removed".to_string()
        } else {
            "no delegation".to_string()
        }),
        Action::AssignWeights {
            caller,
            addresses,
            weights,
        } => {
            let weights: Vec<Weight> = weights
                .iter()
                .map(|&w| Weight::new(u128::from(w)))
                .collect();
            ledger
                .assign_voting_weight(caller, addresses, &weights)
                .map(|()| format!("{} weights assigned", weights.len()))
        }
        Action::Count { caller, id } => ledger
            .count_votes(caller, *id)
            .map(|passed| if passed { "passed" } else { "rejected" }.to_string()),
        Action::Pause { caller } => ledger.pause(caller).map(|()| "paused".to_string()),
        Action::Unpause { caller } => ledger.unpause(caller).map(|()| "unpaused".to_string()),
        Action::Advance { secs } => {
            ledger.clock().advance(*secs);
            Ok(format!("now {}", ledger.now()))
        }
    }
}

/// Apply every step in order. Failures are recorded, never fatal: each step
/// is an independent call against the ledger.
pub fn replay(ledger: &mut VotingLedger<NullClock>, steps: &[Step]) -> Vec<StepOutcome> {
    steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let op = step.action.name();
            let result = apply(ledger, &step.action);
            let expectation_met = step.expect.as_deref().map(|want| match &result {
                Ok(_) => want.eq_ignore_ascii_case("ok"),
                Err(e) => want == e.name(),
            });

            match (&result, expectation_met) {
                (_, Some(false)) => tracing::error!(
                    step = index,
                    op,
                    expected = step.expect.as_deref().unwrap_or_default(),
                    got = ?result,
                    "expectation failed"
                ),
                (Ok(detail), _) => tracing::info!(step = index, op, "{detail}"),
                (Err(e), _) => tracing::warn!(step = index, op, reason = e.name(), "{e}"),
            }
            StepOutcome {
                op,
                result,
                expectation_met,
            }
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct ProposalReport<'a> {
    #[serde(flatten)]
    pub proposal: &'a Proposal,
    pub status: ProposalStatus,
    pub voters: usize,
}

#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub op: &'static str,
    pub ok: bool,
    pub detail: String,
}

/// Final ledger state, printed as JSON after a replay.
#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub now: Timestamp,
    pub owner: &'a Address,
    pub paused: bool,
    pub total_votes_cast: Weight,
    pub steps: usize,
    pub failed_steps: usize,
    pub failed_expectations: usize,
    pub proposals: Vec<ProposalReport<'a>>,
    pub results: Vec<StepReport>,
}

impl<'a> Summary<'a> {
    pub fn new(ledger: &'a VotingLedger<NullClock>, outcomes: &[StepOutcome]) -> Self {
        let now = ledger.now();
        Self {
            now,
            owner: ledger.owner(),
            paused: ledger.is_paused(),
            total_votes_cast: ledger.total_votes_cast(),
            steps: outcomes.len(),
            failed_steps: outcomes.iter().filter(|o| o.result.is_err()).count(),
            failed_expectations: outcomes
                .iter()
                .filter(|o| o.expectation_met == Some(false))
                .count(),
            proposals: ledger
                .proposals()
                .map(|p| ProposalReport {
                    proposal: p,
                    status: p.status(now),
                    voters: ledger.voter_count(p.id),
                })
                .collect(),
            results: outcomes
                .iter()
                .enumerate()
                .map(|(step, o)| StepReport {
                    step,
                    op: o.op,
                    ok: o.result.is_ok(),
                    detail: match &o.result {
                        Ok(detail) => detail.clone(),
                        Err(e) => e.to_string(),
                    },
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_types::LedgerParams;

    const SCRIPT: &str = r#"
        [[step]]
        op = "assign_weights"
        caller = "owner"
        addresses = ["x", "y"]
        weights = [100, 100]

        [[step]]
        op = "create"
        caller = "x"
        id = 1
        description = "Test Proposal"
        duration_secs = 3600

        [[step]]
        op = "vote"
        caller = "x"
        id = 1
        support = true

        [[step]]
        op = "vote"
        caller = "x"
        id = 1
        support = true
        expect = "AlreadyVoted"

        [[step]]
        op = "vote"
        caller = "y"
        id = 1
        support = true

        [[step]]
        op = "advance"
        secs = 3601

        [[step]]
        op = "count"
        caller = "y"
        id = 1
        expect = "ok"
    "#;

    fn ledger() -> VotingLedger<NullClock> {
        VotingLedger::new(
            Address::new("owner"),
            LedgerParams::default(),
            NullClock::new(0),
        )
    }

    #[test]
    fn parses_all_steps() {
        let script = Script::from_toml_str(SCRIPT).unwrap();
        assert_eq!(script.steps.len(), 7);
        assert_eq!(script.start_time, None);
        assert_eq!(script.steps[0].action.name(), "assign_weights");
        assert_eq!(script.steps[3].expect.as_deref(), Some("AlreadyVoted"));
    }

    #[test]
    fn replay_reaches_expected_state() {
        let script = Script::from_toml_str(SCRIPT).unwrap();
        let mut l = ledger();
        let outcomes = replay(&mut l, &script.steps);

        let summary = Summary::new(&l, &outcomes);
        assert_eq!(summary.failed_steps, 1);
        assert_eq!(summary.failed_expectations, 0);
        assert_eq!(summary.total_votes_cast, Weight::new(200));
        assert_eq!(summary.proposals.len(), 1);
        assert_eq!(summary.proposals[0].status, ProposalStatus::Passed);
        assert_eq!(summary.proposals[0].voters, 2);
        assert!(!summary.results[3].ok);
        assert_eq!(summary.results[6].detail, "passed");
    }

    #[test]
    fn unmet_expectation_is_reported() {
        let script = Script::from_toml_str(
            r#"
            [[step]]
            op = "pause"
            caller = "mallory"
            expect = "ok"
            "#,
        )
        .unwrap();
        let mut l = ledger();
        let outcomes = replay(&mut l, &script.steps);
        assert_eq!(outcomes[0].expectation_met, Some(false));
        assert!(!l.is_paused());
    }

    #[test]
    fn summary_serializes_to_json() {
        let script = Script::from_toml_str(SCRIPT).unwrap();
        let mut l = ledger();
        let outcomes = replay(&mut l, &script.steps);
        let json = serde_json::to_value(Summary::new(&l, &outcomes)).unwrap();
        assert_eq!(json["proposals"][0]["for_votes"], 200);
        assert_eq!(json["proposals"][0]["status"], "passed");
    }

    #[test]
    fn unknown_op_is_a_parse_error() {
        assert!(Script::from_toml_str(
            r#"
            [[step]]
            op = "mint"
            caller = "x"
            "#
        )
        .is_err());
    }
}
