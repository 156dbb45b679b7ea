//! Ledger parameters fixed at instantiation.

use crate::weight::Weight;
use serde::{Deserialize, Serialize};

/// Tunable constants of a voting ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerParams {
    /// Minimum total weight (for + against) a proposal needs before it can be counted.
    pub quorum_threshold: Weight,

    /// Weight of an address that never had one assigned.
    pub default_weight: Weight,
}

impl Default for LedgerParams {
    fn default() -> Self {
        Self {
            quorum_threshold: Weight::new(2),
            default_weight: Weight::ONE,
        }
    }
}
