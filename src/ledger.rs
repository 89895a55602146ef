//! Shared ledger service handed to request handlers.
//!
//! Appends take the write lock for the whole tail-read, validate and commit
//! sequence, so two appends never build on the same tail. Snapshots take the
//! read lock and copy, so a reader sees the chain before or after an append,
//! never halfway through one.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::chain::{AppendOutcome, Blockchain};
use crate::clock::Clock;
use crate::error::LedgerResult;
use crate::model::{Block, BookCheckout};

pub struct Ledger {
    chain: RwLock<Blockchain>,
    clock: Arc<dyn Clock>,
}

impl Ledger {
    /// Bootstrap a ledger holding only the genesis block.
    pub fn new(clock: Arc<dyn Clock>) -> LedgerResult<Self> {
        let chain = Blockchain::new(clock.as_ref())?;
        Ok(Self {
            chain: RwLock::new(chain),
            clock,
        })
    }

    /// Append one checkout event.
    pub fn append(&self, data: BookCheckout) -> LedgerResult<AppendOutcome> {
        let mut chain = self.chain.write();
        let outcome = chain.add_block(data, self.clock.as_ref())?;
        log_outcome(&outcome);
        Ok(outcome)
    }

    /// Submit a block built elsewhere. It goes through the same validation
    /// as `append`.
    #[cfg(test)]
    pub fn submit(&self, candidate: Block) -> AppendOutcome {
        let outcome = self.chain.write().commit(candidate);
        log_outcome(&outcome);
        outcome
    }

    /// Consistent copy of every block, genesis first.
    pub fn snapshot(&self) -> Vec<Block> {
        self.chain.read().blocks().to_vec()
    }

    pub fn block(&self, pos: u64) -> Option<Block> {
        self.chain.read().get(pos).cloned()
    }

    pub fn len(&self) -> usize {
        self.chain.read().len()
    }

    pub fn tail(&self) -> Block {
        self.chain.read().tail().clone()
    }

    /// Re-check the whole chain. Empty means every block verifies.
    pub fn verify(&self) -> Vec<String> {
        self.chain.read().verify()
    }
}

fn log_outcome(outcome: &AppendOutcome) {
    match outcome {
        AppendOutcome::Accepted { position, hash } => {
            info!(position, %hash, "block appended");
        }
        AppendOutcome::Rejected(reason) => {
            warn!(%reason, "block rejected");
        }
    }
}
