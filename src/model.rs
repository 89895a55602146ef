//! Data model for book checkout events and the blocks that record them.

use serde::{Deserialize, Serialize};

/// A single checkout event. This is the block payload.
///
/// Field order is part of the canonical encoding: the fingerprint is taken
/// over the compact JSON of this struct, which is also its wire form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookCheckout {
    pub book_id: String,
    pub user: String,
    pub checkout_date: String,
    /// Set only on the bootstrap record; real events leave it false.
    #[serde(default)]
    pub is_genesis: bool,
}

impl BookCheckout {
    pub fn new(
        book_id: impl Into<String>,
        user: impl Into<String>,
        checkout_date: impl Into<String>,
    ) -> Self {
        Self {
            book_id: book_id.into(),
            user: user.into(),
            checkout_date: checkout_date.into(),
            is_genesis: false,
        }
    }

    /// Payload carried by the genesis block.
    pub fn genesis() -> Self {
        Self {
            is_genesis: true,
            ..Self::default()
        }
    }
}

/// Catalog metadata for a book. `id` is derived server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub author: String,
    pub publish_date: String,
    pub isbn: String,
}

/// One link of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    /// 0 for genesis, then +1 per block.
    pub pos: u64,
    pub data: BookCheckout,
    /// RFC3339 string captured at construction.
    pub timestamp: String,
    /// SHA-256 hex over (pos, timestamp, canonical data, prev_hash).
    pub hash: String,
    /// Hash of the predecessor; empty for genesis.
    pub prev_hash: String,
}
