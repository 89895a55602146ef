//! Error types for ledger operations.
//!
//! A rejected append is an expected outcome, so `Rejection` is carried as a
//! value in `AppendOutcome` rather than only as an error.

use thiserror::Error;

/// Why a candidate block was refused. Checks run in the order listed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("linkage mismatch: expected prev hash {expected}, found {found}")]
    Linkage { expected: String, found: String },

    #[error("integrity mismatch at position {position}: stored hash does not match contents")]
    Integrity { position: u64 },

    #[error("ordering mismatch: expected position {expected}, found {found}")]
    Ordering { expected: u64, found: u64 },

    #[error("genesis flag set on block at position {position}")]
    GenesisFlag { position: u64 },
}

/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("payload serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        LedgerError::Serialization(e.to_string())
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
