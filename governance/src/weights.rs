//! Per-address voting weight with a "one person one vote" default.

use std::collections::HashMap;
use tally_types::{Address, Weight};

#[derive(Clone, Debug)]
pub struct WeightRegistry {
    assigned: HashMap<Address, Weight>,
    default_weight: Weight,
}

impl WeightRegistry {
    pub fn new(default_weight: Weight) -> Self {
        Self {
            assigned: HashMap::new(),
            default_weight,
        }
    }

    /// Assigned weight, or the default if none was ever assigned.
    pub fn weight_of(&self, address: &Address) -> Weight {
        self.assigned
            .get(address)
            .copied()
            .unwrap_or(self.default_weight)
    }

    pub fn assign(&mut self, address: Address, weight: Weight) {
        self.assigned.insert(address, weight);
    }
}
