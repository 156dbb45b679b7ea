//! Vote delegation — entrust voting weight to another address.
//!
//! Only direct delegators count toward a delegate's vote. If A delegates to B
//! and B delegates to C, C's vote carries B's weight but not A's: the link
//! from A ends at B, and B voting through C does not forward what B received.

use crate::error::LedgerError;
use std::collections::{BTreeMap, BTreeSet};
use tally_types::Address;

/// Delegation links plus a reverse index for vote-time resolution.
#[derive(Clone, Debug, Default)]
pub struct DelegationRegistry {
    /// delegator → delegate.
    delegations: BTreeMap<Address, Address>,
    /// delegate → direct delegators.
    reverse_delegations: BTreeMap<Address, BTreeSet<Address>>,
}

impl DelegationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a delegation without applying it.
    pub fn check(from: &Address, to: &Address) -> Result<(), LedgerError> {
        if from == to {
            return Err(LedgerError::SelfDelegation);
        }
        Ok(())
    }

    /// Set or repoint `from`'s delegation. Returns the previous delegate, if any.
    pub fn delegate(
        &mut self,
        from: &Address,
        to: &Address,
    ) -> Result<Option<Address>, LedgerError> {
        Self::check(from, to)?;
        let previous = self.unlink(from);
        self.delegations.insert(from.clone(), to.clone());
        self.reverse_delegations
            .entry(to.clone())
            .or_default()
            .insert(from.clone());
        Ok(previous)
    }

    /// Remove `from`'s delegation. Returns the delegate it pointed to, if any.
    pub fn undelegate(&mut self, from: &Address) -> Option<Address> {
        self.unlink(from)
    }

    fn unlink(&mut self, from: &Address) -> Option<Address> {
        let old_to = self.delegations.remove(from)?;
        if let Some(set) = self.reverse_delegations.get_mut(&old_to) {
            set.remove(from);
            if set.is_empty() {
                self.reverse_delegations.remove(&old_to);
            }
        }
        Some(old_to)
    }

    /// Get the direct delegate for an address (None if not delegated).
    pub fn delegate_of(&self, delegator: &Address) -> Option<&Address> {
        self.delegations.get(delegator)
    }

    /// All addresses that directly delegated to `delegate`, in address order.
    pub fn delegators_of<'a>(&'a self, delegate: &Address) -> impl Iterator<Item = &'a Address> + 'a {
        self.reverse_delegations
            .get(delegate)
            .into_iter()
            .flat_map(|set| set.iter())
    }
}
