//! Events emitted after a ledger operation commits.

use serde::Serialize;
use tally_types::{Address, ProposalId, Timestamp, Weight};

/// State changes observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    ProposalCreated {
        id: ProposalId,
        proposer: Address,
        end_time: Timestamp,
    },
    VoteCast {
        id: ProposalId,
        voter: Address,
        support: bool,
        weight: Weight,
        /// Delegators whose weight this ballot carried.
        carried: Vec<Address>,
    },
    Delegated {
        from: Address,
        to: Address,
    },
    Undelegated {
        from: Address,
        previous: Address,
    },
    WeightAssigned {
        address: Address,
        weight: Weight,
    },
    VotesCounted {
        id: ProposalId,
        for_votes: Weight,
        against_votes: Weight,
        passed: bool,
    },
    Paused {
        by: Address,
    },
    Unpaused {
        by: Address,
    },
}

type Listener = Box<dyn Fn(&LedgerEvent) + Send + Sync>;

/// Listeners attached to a [`VotingLedger`](crate::VotingLedger).
///
/// The ledger publishes exactly one event per committed state change, after
/// the write. A rejected operation publishes nothing, and an
/// `assign_voting_weight` call publishes one `WeightAssigned` per address.
/// Listeners run inline, in subscription order, and see only the event.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&LedgerEvent) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Hand a committed change to every listener.
    pub(crate) fn publish(&self, event: &LedgerEvent) {
        self.listeners.iter().for_each(|listener| listener(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn pause_event() -> LedgerEvent {
        LedgerEvent::Paused {
            by: Address::new("owner"),
        }
    }

    #[test]
    fn publish_reaches_every_listener() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let c1 = Arc::clone(&counter);
        bus.subscribe(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        });

        let c2 = Arc::clone(&counter);
        bus.subscribe(move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        });

        bus.publish(&pause_event());

        assert_eq!(counter.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn listeners_run_in_subscription_order() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        for tag in ["first", "second"] {
            let sink = Arc::clone(&order);
            bus.subscribe(move |_| sink.lock().unwrap().push(tag));
        }

        bus.publish(&pause_event());

        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn listener_receives_correct_event_variant() {
        let saw_paused = Arc::new(AtomicUsize::new(0));
        let saw_unpaused = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let sp = Arc::clone(&saw_paused);
        let su = Arc::clone(&saw_unpaused);
        bus.subscribe(move |event| match event {
            LedgerEvent::Paused { .. } => {
                sp.fetch_add(1, Ordering::SeqCst);
            }
            LedgerEvent::Unpaused { .. } => {
                su.fetch_add(1, Ordering::SeqCst);
            }
            _ => {}
        });

        bus.publish(&pause_event());
        bus.publish(&LedgerEvent::Unpaused {
            by: Address::new("owner"),
        });

        assert_eq!(saw_paused.load(Ordering::SeqCst), 1);
        assert_eq!(saw_unpaused.load(Ordering::SeqCst), 1);
    }
}
