//! Errors raised while constructing fundamental types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}
