//! Hashing helpers: block fingerprints and book identifiers.

use sha2::{Digest, Sha256};

use crate::error::LedgerResult;
use crate::model::{Book, BookCheckout};

/// Hash inputs (concatenate as bytes, SHA-256) and return lowercase hex.
pub fn hash_concat(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for p in parts {
        hasher.update(p);
    }
    hex::encode(hasher.finalize())
}

/// Canonical byte form of a payload: compact JSON in declared field order.
pub fn canonical_payload(data: &BookCheckout) -> LedgerResult<Vec<u8>> {
    Ok(serde_json::to_vec(data)?)
}

/// Compute a block fingerprint.
///
/// Input is `pos ++ timestamp ++ canonical(data) ++ prev_hash`, where `pos`
/// is rendered as decimal text ("12", not the code point 12).
pub fn fingerprint(
    pos: u64,
    timestamp: &str,
    data: &BookCheckout,
    prev_hash: &str,
) -> LedgerResult<String> {
    let payload = canonical_payload(data)?;
    Ok(hash_concat(&[
        pos.to_string().as_bytes(),
        timestamp.as_bytes(),
        &payload,
        prev_hash.as_bytes(),
    ]))
}

/// Derive a book's identifier from its ISBN and publish date.
pub fn book_id(book: &Book) -> String {
    hash_concat(&[book.isbn.as_bytes(), book.publish_date.as_bytes()])
}
