//! Proof-of-work sealing
//!
//! The nonce search is intentionally expensive and scales roughly
//! exponentially with difficulty. It is a rate-limiting and tamper-cost
//! demonstration, not a security mechanism. The loop is unbounded and
//! synchronous; an unreasonably high difficulty blocks the caller
//! indefinitely, which is accepted behavior.

use crate::ledger::Block;

/// True if the first `difficulty` hex characters of the hash are zeros.
pub fn meets_difficulty(hash: &str, difficulty: usize) -> bool {
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|c| c == b'0')
}

/// Increment the nonce and recompute the digest until it satisfies the
/// difficulty predicate. Mutates the block's nonce and hash; after this
/// returns, the block is sealed and treated as read-only.
pub fn seal_block(block: &mut Block, difficulty: usize) {
    while !meets_difficulty(&block.hash, difficulty) {
        block.nonce += 1;
        block.hash = block.compute_hash();
    }
    log::debug!(
        "Sealed block {} after {} nonce attempts",
        block.index,
        block.nonce
    );
}
