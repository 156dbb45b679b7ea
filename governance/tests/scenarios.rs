//! End-to-end scenarios driving a ledger over a deterministic clock, the way a
//! hosting environment would: one operation at a time, with time advanced
//! between calls.

use tally_governance::{LedgerConfig, LedgerError, ProposalStatus, VotingLedger};
use tally_nullables::NullClock;
use tally_types::{Address, LedgerParams, ProposalId, Weight};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn owner() -> Address {
    Address::new("0xowner")
}

fn addr1() -> Address {
    Address::new("0xaddr1")
}

fn addr2() -> Address {
    Address::new("0xaddr2")
}

fn setup() -> (NullClock, VotingLedger<NullClock>) {
    let clock = NullClock::new(1_000);
    let ledger = VotingLedger::new(owner(), LedgerParams::default(), clock.clone());
    (clock, ledger)
}

const ONE: ProposalId = ProposalId::new(1);

// ---------------------------------------------------------------------------
// Proposal creation
// ---------------------------------------------------------------------------

#[test]
fn creates_a_new_proposal() {
    let (_, mut ledger) = setup();
    ledger
        .create_proposal(&owner(), ONE, "Test Proposal", 3600)
        .unwrap();

    let proposal = ledger.proposal(ONE).unwrap();
    assert_eq!(proposal.description, "Test Proposal");
    assert!(ledger.proposal_exists(ONE));
    assert!(proposal.end_time > proposal.start_time);
}

#[test]
fn duplicate_id_is_rejected() {
    let (_, mut ledger) = setup();
    ledger
        .create_proposal(&owner(), ONE, "Test Proposal", 3600)
        .unwrap();
    assert_eq!(
        ledger.create_proposal(&owner(), ONE, "Test Proposal", 3600),
        Err(LedgerError::AlreadyExists(ONE))
    );
}

// ---------------------------------------------------------------------------
// Voting window
// ---------------------------------------------------------------------------

#[test]
fn vote_after_one_second_window_is_closed() {
    let (clock, mut ledger) = setup();
    ledger
        .create_proposal(&owner(), ONE, "Test Proposal", 1)
        .unwrap();
    clock.advance(2);

    let err = ledger.vote(&addr1(), ONE, true).unwrap_err();
    assert_eq!(err.name(), "VotingClosed");
}

#[test]
fn expired_proposal_is_not_active() {
    let (clock, mut ledger) = setup();
    ledger
        .create_proposal(&owner(), ONE, "Test Proposal", 1)
        .unwrap();
    clock.advance(2);

    assert_eq!(
        ledger.active_proposal(ONE).unwrap_err(),
        LedgerError::NotFound(ONE)
    );
}

// ---------------------------------------------------------------------------
// Counting
// ---------------------------------------------------------------------------

#[test]
fn counts_split_vote() {
    let (clock, mut ledger) = setup();
    ledger
        .create_proposal(&owner(), ONE, "Test Proposal", 3600)
        .unwrap();
    ledger.vote(&addr1(), ONE, true).unwrap();
    ledger.vote(&addr2(), ONE, false).unwrap();
    clock.advance(3601);

    assert!(!ledger.count_votes(&owner(), ONE).unwrap());
    let p = ledger.proposal(ONE).unwrap();
    assert_eq!(p.for_votes, Weight::ONE);
    assert_eq!(p.against_votes, Weight::ONE);
}

#[test]
fn counting_before_end_is_rejected() {
    let (_, mut ledger) = setup();
    ledger
        .create_proposal(&owner(), ONE, "Test Proposal", 3600)
        .unwrap();
    assert_eq!(
        ledger.count_votes(&owner(), ONE).unwrap_err().name(),
        "VotingNotEnded"
    );
}

#[test]
fn single_vote_does_not_meet_quorum() {
    let (clock, mut ledger) = setup();
    ledger
        .create_proposal(&owner(), ONE, "Test Proposal", 3600)
        .unwrap();
    ledger.vote(&addr1(), ONE, true).unwrap();
    clock.advance(3601);

    assert_eq!(
        ledger.count_votes(&owner(), ONE).unwrap_err().name(),
        "QuorumNotMet"
    );
}

#[test]
fn weighted_voters_pass_a_proposal() {
    let (clock, mut ledger) = setup();
    let x = Address::new("x");
    let y = Address::new("y");
    ledger
        .assign_voting_weight(
            &owner(),
            &[x.clone(), y.clone()],
            &[Weight::new(100), Weight::new(100)],
        )
        .unwrap();
    ledger
        .create_proposal(&owner(), ONE, "Raise the budget", 3600)
        .unwrap();
    ledger.vote(&x, ONE, true).unwrap();
    ledger.vote(&y, ONE, true).unwrap();
    clock.advance(3601);

    assert!(ledger.count_votes(&owner(), ONE).unwrap());
    let p = ledger.proposal(ONE).unwrap();
    assert_eq!(p.for_votes, Weight::new(200));
    assert_eq!(p.against_votes, Weight::ZERO);
    assert!(p.passed);
    assert_eq!(ledger.proposal_status(ONE).unwrap(), ProposalStatus::Passed);
    assert_eq!(ledger.total_votes_cast(), Weight::new(200));
}

// ---------------------------------------------------------------------------
// Delegation
// ---------------------------------------------------------------------------

#[test]
fn two_default_voters_accumulate() {
    let (_, mut ledger) = setup();
    ledger
        .create_proposal(&owner(), ONE, "Test Proposal", 3600)
        .unwrap();
    ledger.vote(&addr1(), ONE, true).unwrap();
    ledger.vote(&addr2(), ONE, true).unwrap();
    assert_eq!(ledger.proposal(ONE).unwrap().for_votes, Weight::new(2));
}

#[test]
fn delegated_weight_meets_quorum_alone() {
    let (clock, mut ledger) = setup();
    ledger
        .create_proposal(&owner(), ONE, "Test Proposal", 3600)
        .unwrap();
    ledger.delegate(&addr1(), &addr2()).unwrap();
    ledger.vote(&addr2(), ONE, true).unwrap();
    clock.advance(3601);

    assert!(ledger.count_votes(&owner(), ONE).unwrap());
    assert_eq!(ledger.voter_count(ONE), 1);
}

// ---------------------------------------------------------------------------
// Emergency stop
// ---------------------------------------------------------------------------

#[test]
fn pause_blocks_voting_until_unpaused() {
    let (_, mut ledger) = setup();
    ledger
        .create_proposal(&owner(), ONE, "Test Proposal", 3600)
        .unwrap();
    ledger.pause(&owner()).unwrap();

    assert_eq!(ledger.vote(&addr1(), ONE, true), Err(LedgerError::Paused));
    assert_eq!(ledger.vote(&addr2(), ONE, false), Err(LedgerError::Paused));

    ledger.unpause(&owner()).unwrap();
    assert_eq!(ledger.vote(&addr1(), ONE, true), Ok(Weight::ONE));
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn ledger_from_config_uses_its_quorum_and_owner() {
    let config = LedgerConfig::from_toml_str(
        r#"
        owner = "0xdao"
        quorum_threshold = 3
        default_weight = 2
        "#,
    )
    .unwrap();
    let clock = NullClock::new(0);
    let mut ledger = VotingLedger::from_config(&config, clock.clone());

    assert_eq!(ledger.owner(), &Address::new("0xdao"));
    ledger.create_proposal(&addr1(), ONE, "x", 10).unwrap();
    ledger.vote(&addr1(), ONE, true).unwrap();
    clock.advance(11);
    assert!(matches!(
        ledger.count_votes(&addr1(), ONE),
        Err(LedgerError::QuorumNotMet { have, need })
            if have == Weight::new(2) && need == Weight::new(3)
    ));
}
