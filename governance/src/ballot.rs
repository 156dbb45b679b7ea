//! Per-proposal record of who voted and whose weight has been cast.
//!
//! The two sets differ: a delegate voting casts its delegators' weight without
//! those delegators having voted. An address's weight is cast at most once per
//! proposal, whether it votes itself or is carried by its delegate.

use std::collections::HashSet;
use tally_types::Address;

#[derive(Clone, Debug, Default)]
pub struct BallotBox {
    voters: HashSet<Address>,
    cast: HashSet<Address>,
}

impl BallotBox {
    pub fn has_voted(&self, address: &Address) -> bool {
        self.voters.contains(address)
    }

    pub fn is_cast(&self, address: &Address) -> bool {
        self.cast.contains(address)
    }

    /// Record `voter`'s ballot and the addresses whose weight it carried.
    pub fn record<I>(&mut self, voter: Address, carried: I)
    where
        I: IntoIterator<Item = Address>,
    {
        self.cast.extend(carried);
        self.voters.insert(voter);
    }

    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }
}
