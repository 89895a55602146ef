//! Block construction, validation and the append-only chain container.

use crate::clock::Clock;
use crate::crypto::fingerprint;
use crate::error::{LedgerResult, Rejection};
use crate::model::{Block, BookCheckout};

/// Result of submitting a candidate to the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    Accepted { position: u64, hash: String },
    Rejected(Rejection),
}

/// Build the block that follows `prev`, hashed before it is returned.
pub fn create_block(prev: &Block, data: BookCheckout, clock: &dyn Clock) -> LedgerResult<Block> {
    let pos = prev.pos + 1;
    let timestamp = clock.now();
    let hash = fingerprint(pos, &timestamp, &data, &prev.hash)?;
    Ok(Block {
        pos,
        data,
        timestamp,
        hash,
        prev_hash: prev.hash.clone(),
    })
}

/// First block of every chain: position 0, empty prev hash, genesis payload.
pub fn genesis_block(clock: &dyn Clock) -> LedgerResult<Block> {
    let data = BookCheckout::genesis();
    let timestamp = clock.now();
    let hash = fingerprint(0, &timestamp, &data, "")?;
    Ok(Block {
        pos: 0,
        data,
        timestamp,
        hash,
        prev_hash: String::new(),
    })
}

/// Recompute a block's fingerprint from its own fields and compare.
pub fn hash_matches(block: &Block) -> bool {
    fingerprint(block.pos, &block.timestamp, &block.data, &block.prev_hash)
        .map(|h| h == block.hash)
        .unwrap_or(false)
}

/// Check `new` against the current tail: linkage, then integrity, then
/// ordering. Only the genesis block may carry the genesis flag.
pub fn valid_block(new: &Block, prev: &Block) -> Result<(), Rejection> {
    if new.prev_hash != prev.hash {
        return Err(Rejection::Linkage {
            expected: prev.hash.clone(),
            found: new.prev_hash.clone(),
        });
    }

    if !hash_matches(new) {
        return Err(Rejection::Integrity { position: new.pos });
    }

    if new.pos != prev.pos + 1 {
        return Err(Rejection::Ordering {
            expected: prev.pos + 1,
            found: new.pos,
        });
    }

    if new.data.is_genesis {
        return Err(Rejection::GenesisFlag { position: new.pos });
    }

    Ok(())
}

/// Walk a full chain and report every violation found. Empty means valid.
pub fn verify_chain(blocks: &[Block]) -> Vec<String> {
    let mut errors = vec![];

    let Some(genesis) = blocks.first() else {
        errors.push("chain has no genesis block".to_string());
        return errors;
    };
    if genesis.pos != 0 {
        errors.push(format!("genesis position is {}, expected 0", genesis.pos));
    }
    if !genesis.prev_hash.is_empty() {
        errors.push("genesis prev_hash should be empty".to_string());
    }
    if !genesis.data.is_genesis {
        errors.push("genesis payload is not flagged as genesis".to_string());
    }
    if !hash_matches(genesis) {
        errors.push("block 0 hash mismatch".to_string());
    }

    for pair in blocks.windows(2) {
        if let Err(reason) = valid_block(&pair[1], &pair[0]) {
            errors.push(format!("block {}: {reason}", pair[1].pos));
        }
    }

    errors
}

/// Ordered, append-only sequence of blocks. Never empty.
#[derive(Debug, Clone)]
pub struct Blockchain {
    blocks: Vec<Block>,
}

impl Blockchain {
    pub fn new(clock: &dyn Clock) -> LedgerResult<Self> {
        Ok(Self {
            blocks: vec![genesis_block(clock)?],
        })
    }

    pub fn tail(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn get(&self, pos: u64) -> Option<&Block> {
        usize::try_from(pos).ok().and_then(|i| self.blocks.get(i))
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Re-check every block. Empty means the chain is intact.
    pub fn verify(&self) -> Vec<String> {
        verify_chain(&self.blocks)
    }

    /// Build a candidate on top of the tail and commit it if it validates.
    pub fn add_block(
        &mut self,
        data: BookCheckout,
        clock: &dyn Clock,
    ) -> LedgerResult<AppendOutcome> {
        let candidate = create_block(self.tail(), data, clock)?;
        Ok(self.commit(candidate))
    }

    /// Validate an already-built candidate against the tail and append it on
    /// success. A rejected candidate leaves the chain untouched.
    pub fn commit(&mut self, candidate: Block) -> AppendOutcome {
        if let Err(reason) = valid_block(&candidate, self.tail()) {
            return AppendOutcome::Rejected(reason);
        }
        let outcome = AppendOutcome::Accepted {
            position: candidate.pos,
            hash: candidate.hash.clone(),
        };
        self.blocks.push(candidate);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn clock() -> FixedClock {
        FixedClock("2024-01-01T00:00:00Z".into())
    }

    fn fresh() -> Blockchain {
        Blockchain::new(&clock()).unwrap()
    }

    #[test]
    fn genesis_shape() {
        let chain = fresh();
        assert_eq!(chain.len(), 1);
        let g = chain.tail();
        assert_eq!(g.pos, 0);
        assert!(g.prev_hash.is_empty());
        assert!(g.data.is_genesis);
        assert!(hash_matches(g));
    }

    #[test]
    fn first_append_links_to_genesis() {
        let mut chain = fresh();
        let g = chain.tail().hash.clone();

        let outcome = chain
            .add_block(BookCheckout::new("b1", "alice", "2024-01-01"), &clock())
            .unwrap();

        let block = chain.get(1).unwrap();
        assert_eq!(
            outcome,
            AppendOutcome::Accepted {
                position: 1,
                hash: block.hash.clone()
            }
        );
        assert_eq!(block.prev_hash, g);
        assert_eq!(block.data.user, "alice");
        assert_eq!(chain.blocks().len(), 2);
        assert!(chain.blocks()[0].data.is_genesis);
    }

    #[test]
    fn sequential_appends_are_ordered_and_linked() {
        let mut chain = fresh();
        for i in 0..10 {
            let data = BookCheckout::new(format!("b{i}"), "bob", "2024-02-02");
            let outcome = chain.add_block(data, &clock()).unwrap();
            assert!(matches!(outcome, AppendOutcome::Accepted { .. }));
        }

        assert_eq!(chain.len(), 11);
        for (i, b) in chain.blocks().iter().enumerate() {
            assert_eq!(b.pos, i as u64);
            assert!(hash_matches(b));
        }
        for pair in chain.blocks().windows(2) {
            assert_eq!(pair[1].prev_hash, pair[0].hash);
            assert_eq!(pair[1].pos, pair[0].pos + 1);
        }
        assert!(verify_chain(chain.blocks()).is_empty());
    }

    #[test]
    fn wrong_prev_hash_is_rejected_for_linkage() {
        let mut chain = fresh();
        let mut candidate =
            create_block(chain.tail(), BookCheckout::new("b1", "alice", "d"), &clock()).unwrap();
        candidate.prev_hash = "deadbeef".into();
        candidate.hash = fingerprint(
            candidate.pos,
            &candidate.timestamp,
            &candidate.data,
            &candidate.prev_hash,
        )
        .unwrap();

        let outcome = chain.commit(candidate);
        assert!(matches!(
            outcome,
            AppendOutcome::Rejected(Rejection::Linkage { .. })
        ));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn tampered_payload_is_rejected_for_integrity() {
        let mut chain = fresh();
        let mut candidate =
            create_block(chain.tail(), BookCheckout::new("b1", "alice", "d"), &clock()).unwrap();
        candidate.data.user = "mallory".into();

        assert_eq!(
            chain.commit(candidate),
            AppendOutcome::Rejected(Rejection::Integrity { position: 1 })
        );
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn wrong_position_is_rejected_for_ordering() {
        let mut chain = fresh();
        let tail = chain.tail().clone();
        let data = BookCheckout::new("b1", "alice", "d");
        let hash = fingerprint(5, "t", &data, &tail.hash).unwrap();
        let candidate = Block {
            pos: 5,
            data,
            timestamp: "t".into(),
            hash,
            prev_hash: tail.hash,
        };

        assert_eq!(
            chain.commit(candidate),
            AppendOutcome::Rejected(Rejection::Ordering {
                expected: 1,
                found: 5
            })
        );
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn integrity_is_checked_before_ordering() {
        let mut chain = fresh();
        let mut candidate =
            create_block(chain.tail(), BookCheckout::new("b1", "alice", "d"), &clock()).unwrap();
        candidate.pos = 9;

        assert_eq!(
            chain.commit(candidate),
            AppendOutcome::Rejected(Rejection::Integrity { position: 9 })
        );
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn checkout_flagged_as_genesis_is_rejected() {
        let mut chain = fresh();
        let mut data = BookCheckout::new("b1", "alice", "d");
        data.is_genesis = true;

        let outcome = chain.add_block(data, &clock()).unwrap();
        assert_eq!(
            outcome,
            AppendOutcome::Rejected(Rejection::GenesisFlag { position: 1 })
        );
        assert_eq!(chain.len(), 1);
        assert_eq!(
            chain.blocks().iter().filter(|b| b.data.is_genesis).count(),
            1
        );
    }

    #[test]
    fn verify_flags_genesis_flag_after_position_zero() {
        let mut chain = fresh();
        chain
            .add_block(BookCheckout::new("b1", "alice", "d"), &clock())
            .unwrap();
        let mut blocks = chain.blocks().to_vec();
        blocks[1].data.is_genesis = true;
        blocks[1].hash = fingerprint(
            blocks[1].pos,
            &blocks[1].timestamp,
            &blocks[1].data,
            &blocks[1].prev_hash,
        )
        .unwrap();

        let errors = verify_chain(&blocks);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("block 1: genesis flag"), "{errors:?}");
        assert!(chain.verify().is_empty());
    }

    #[test]
    fn linkage_is_checked_before_integrity() {
        let mut chain = fresh();
        let mut candidate =
            create_block(chain.tail(), BookCheckout::new("b1", "alice", "d"), &clock()).unwrap();
        candidate.prev_hash = "wrong".into();
        candidate.pos = 9;

        assert!(matches!(
            chain.commit(candidate),
            AppendOutcome::Rejected(Rejection::Linkage { .. })
        ));
    }

    #[test]
    fn tampering_with_committed_block_is_detected() {
        let mut chain = fresh();
        for user in ["alice", "bob", "carol"] {
            chain
                .add_block(BookCheckout::new("b1", user, "d"), &clock())
                .unwrap();
        }
        let mut blocks = chain.blocks().to_vec();
        assert!(verify_chain(&blocks).is_empty());

        blocks[2].data.user = "mallory".into();
        assert!(!hash_matches(&blocks[2]));
        let errors = verify_chain(&blocks);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("block 2:"), "{errors:?}");

        // Re-hashing the tampered block breaks the link from its successor.
        blocks[2].hash = fingerprint(
            blocks[2].pos,
            &blocks[2].timestamp,
            &blocks[2].data,
            &blocks[2].prev_hash,
        )
        .unwrap();
        let errors = verify_chain(&blocks);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("block 3: linkage"), "{errors:?}");
    }

    #[test]
    fn verify_flags_bad_genesis() {
        let mut blocks = fresh().blocks().to_vec();
        blocks[0].data.is_genesis = false;
        let errors = verify_chain(&blocks);
        assert!(errors.iter().any(|e| e.contains("not flagged")));
        assert!(errors.iter().any(|e| e == "block 0 hash mismatch"));
        assert_eq!(verify_chain(&[]), vec!["chain has no genesis block"]);
    }
}
