use crate::error::LedgerError;
use crate::sealer::seal_block;
use crate::vote::{now_millis, VoteData};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::VecDeque;

/// Default number of leading zero hex characters a sealed hash must show.
pub const DEFAULT_DIFFICULTY: usize = 2;

/// One sealed vote with tamper-evident linkage to its predecessor.
///
/// A block is unsealed while its nonce may still change and sealed once its
/// hash satisfies the difficulty predicate. Immutability after sealing is a
/// convention held by the ledger, not enforced by the type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub index: u64,
    /// Creation time in epoch milliseconds
    pub timestamp: i64,
    pub vote: VoteData,
    /// Hex hash of the predecessor; empty string only for genesis
    pub previous_hash: String,
    /// Hex SHA-256 content digest of all other fields
    pub hash: String,
    pub nonce: u64,
}

impl Block {
    /// Construct a block with nonce 0 and its initial hash computed.
    pub fn new(index: u64, timestamp: i64, vote: VoteData, previous_hash: String) -> Self {
        let mut block = Block {
            index,
            timestamp,
            vote,
            previous_hash,
            hash: String::new(),
            nonce: 0,
        };
        block.hash = block.compute_hash();
        block
    }

    /// Deterministic digest over all content fields in fixed order.
    /// Identical inputs always produce identical output.
    pub fn digest(
        index: u64,
        previous_hash: &str,
        timestamp: i64,
        vote: &VoteData,
        nonce: u64,
    ) -> String {
        let mut hasher = Sha256::new();
        hasher.update(index.to_le_bytes());
        hasher.update(previous_hash.as_bytes());
        hasher.update(timestamp.to_le_bytes());
        hasher.update(vote.voter_id.as_bytes());
        hasher.update(vote.candidate_id.as_bytes());
        hasher.update(vote.timestamp.to_le_bytes());
        hasher.update(nonce.to_le_bytes());
        hex::encode(hasher.finalize())
    }

    /// Recompute this block's digest from its current fields.
    pub fn compute_hash(&self) -> String {
        Block::digest(
            self.index,
            &self.previous_hash,
            self.timestamp,
            &self.vote,
            self.nonce,
        )
    }

    /// Stored hash matches the digest recomputed from current fields.
    pub fn is_self_consistent(&self) -> bool {
        self.hash == self.compute_hash()
    }
}

/// The append-only chain of sealed votes plus the queue of pending ones.
///
/// Owns its blocks and pending queue exclusively; callers only receive read
/// results. Single-writer: `submit_vote` and `seal_next_block` are meant to
/// be driven sequentially by one vote-casting workflow.
#[derive(Debug, Clone)]
pub struct Ledger {
    blocks: Vec<Block>,
    difficulty: usize,
    pending: VecDeque<VoteData>,
}

impl Default for Ledger {
    fn default() -> Self {
        Ledger::new()
    }
}

impl Ledger {
    /// Create a ledger containing only the genesis block, at the default
    /// difficulty.
    pub fn new() -> Self {
        Ledger::with_difficulty(DEFAULT_DIFFICULTY)
    }

    pub fn with_difficulty(difficulty: usize) -> Self {
        Ledger {
            blocks: vec![Ledger::genesis_block()],
            difficulty,
            pending: VecDeque::new(),
        }
    }

    fn genesis_block() -> Block {
        Block::new(0, now_millis(), VoteData::genesis(), String::new())
    }

    /// Rebuild a ledger from already-sealed blocks, trusting their stored
    /// hashes and nonces. Tampering is caught by a later `is_valid` call,
    /// never silently repaired here.
    pub fn from_blocks(blocks: Vec<Block>, difficulty: usize) -> Result<Self, LedgerError> {
        if blocks.is_empty() {
            return Err(LedgerError::MalformedChain(
                "chain has no genesis block".to_string(),
            ));
        }
        for (i, block) in blocks.iter().enumerate() {
            if block.index != i as u64 {
                return Err(LedgerError::MalformedChain(format!(
                    "block indices are not contiguous: expected {}, found {}",
                    i, block.index
                )));
            }
        }
        Ok(Ledger {
            blocks,
            difficulty,
            pending: VecDeque::new(),
        })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    pub fn latest_block(&self) -> &Block {
        // Invariant: the chain always contains at least the genesis block.
        self.blocks.last().expect("chain contains genesis")
    }

    pub fn pending_votes(&self) -> impl Iterator<Item = &VoteData> {
        self.pending.iter()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Queue a vote for inclusion in a future block. Unconditional: duplicate
    /// detection is the caller's admission policy, via `has_voter_voted`.
    pub fn submit_vote(&mut self, vote: VoteData) {
        log::debug!("Vote submitted by {}", vote.voter_id);
        self.pending.push_back(vote);
    }

    /// Seal the oldest pending vote into a new block and append it.
    ///
    /// One block carries exactly one vote; any remaining pending votes stay
    /// queued for subsequent seals rather than being dropped. Fails with
    /// `NoPendingVotes` when the queue is empty.
    pub fn seal_next_block(&mut self) -> Result<&Block, LedgerError> {
        let vote = self.pending.pop_front().ok_or(LedgerError::NoPendingVotes)?;

        let previous_hash = self.latest_block().hash.clone();
        let mut block = Block::new(self.blocks.len() as u64, now_millis(), vote, previous_hash);
        seal_block(&mut block, self.difficulty);

        log::info!("Block sealed: {}", block.hash);
        self.blocks.push(block);
        Ok(self.latest_block())
    }

    /// Serialize the whole chain for the storage collaborator. Pending votes
    /// are transient and are not part of the serialized form.
    pub fn serialize(&self) -> Result<String, LedgerError> {
        Ok(serde_json::to_string(&self.blocks)?)
    }

    /// Rebuild a ledger from its serialized form, preserving every stored
    /// hash and nonce exactly. Structurally invalid input fails fast; a
    /// partially-populated chain is never constructed.
    pub fn deserialize(data: &str) -> Result<Self, LedgerError> {
        let blocks: Vec<Block> = serde_json::from_str(data)?;
        Ledger::from_blocks(blocks, DEFAULT_DIFFICULTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sealed_ledger(votes: &[(&str, &str)]) -> Ledger {
        // Difficulty 1 keeps proof-of-work cheap in tests.
        let mut ledger = Ledger::with_difficulty(1);
        for (voter, candidate) in votes {
            ledger.submit_vote(VoteData::new(*voter, *candidate));
            ledger.seal_next_block().unwrap();
        }
        ledger
    }

    #[test]
    fn new_ledger_contains_only_genesis() {
        let ledger = Ledger::new();
        assert_eq!(ledger.len(), 1);
        assert!(!ledger.is_empty());
        assert_eq!(ledger.difficulty(), DEFAULT_DIFFICULTY);
        assert_eq!(ledger.pending_count(), 0);

        let genesis = ledger.latest_block();
        assert_eq!(genesis.index, 0);
        assert!(genesis.previous_hash.is_empty());
        assert!(genesis.vote.is_genesis());
        assert!(genesis.is_self_consistent());
    }

    #[test]
    fn digest_is_deterministic() {
        let vote = VoteData {
            voter_id: "v1".to_string(),
            candidate_id: "A".to_string(),
            timestamp: 1_700_000_000_000,
        };
        let a = Block::digest(1, "abc", 1_700_000_000_123, &vote, 42);
        let b = Block::digest(1, "abc", 1_700_000_000_123, &vote, 42);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        // Any field change moves the digest.
        let c = Block::digest(1, "abc", 1_700_000_000_123, &vote, 43);
        assert_ne!(a, c);
    }

    #[test]
    fn sealing_links_blocks_and_drains_one_vote() {
        let mut ledger = Ledger::with_difficulty(1);
        ledger.submit_vote(VoteData::new("v1", "A"));
        ledger.submit_vote(VoteData::new("v2", "B"));

        let (index, previous_hash) = {
            let block = ledger.seal_next_block().unwrap();
            (block.index, block.previous_hash.clone())
        };
        assert_eq!(index, 1);
        assert_eq!(previous_hash, ledger.blocks()[0].hash);

        // The surplus pending vote is preserved, not dropped.
        assert_eq!(ledger.pending_count(), 1);
        let second = ledger.seal_next_block().unwrap();
        assert_eq!(second.vote.voter_id, "v2");
        assert_eq!(ledger.pending_count(), 0);
    }

    #[test]
    fn sealing_with_empty_queue_fails() {
        let mut ledger = Ledger::with_difficulty(1);
        assert!(matches!(
            ledger.seal_next_block(),
            Err(LedgerError::NoPendingVotes)
        ));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn serialize_round_trip_preserves_hashes_and_nonces() {
        let ledger = sealed_ledger(&[("v1", "A"), ("v2", "B")]);
        let data = ledger.serialize().unwrap();
        let restored = Ledger::deserialize(&data).unwrap();

        assert_eq!(restored.len(), ledger.len());
        for (original, restored) in ledger.blocks().iter().zip(restored.blocks()) {
            assert_eq!(original.index, restored.index);
            assert_eq!(original.timestamp, restored.timestamp);
            assert_eq!(original.vote, restored.vote);
            assert_eq!(original.previous_hash, restored.previous_hash);
            assert_eq!(original.hash, restored.hash);
            assert_eq!(original.nonce, restored.nonce);
        }
        assert_eq!(restored.is_valid(), ledger.is_valid());
    }

    #[test]
    fn serialized_form_uses_external_field_names() {
        let ledger = sealed_ledger(&[("v1", "A")]);
        let data = ledger.serialize().unwrap();
        assert!(data.contains("\"previousHash\""));
        assert!(data.contains("\"nonce\""));
        assert!(data.contains("\"voterId\":\"v1\""));
    }

    #[test]
    fn deserialize_rejects_malformed_input() {
        assert!(matches!(
            Ledger::deserialize("not json at all"),
            Err(LedgerError::MalformedChain(_))
        ));
        assert!(matches!(
            Ledger::deserialize("[]"),
            Err(LedgerError::MalformedChain(_))
        ));

        // Non-contiguous indices are structurally invalid.
        let mut ledger = sealed_ledger(&[("v1", "A")]);
        ledger.blocks[1].index = 5;
        let data = ledger.serialize().unwrap();
        assert!(matches!(
            Ledger::deserialize(&data),
            Err(LedgerError::MalformedChain(_))
        ));
    }
}
