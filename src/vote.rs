//! Vote records as they appear inside sealed blocks

use serde::{Deserialize, Serialize};

/// Sentinel voter/candidate id carried by the genesis block
pub const GENESIS_SENTINEL: &str = "genesis";

/// One cast vote. Immutable once a block seals it; the ledger only ever
/// hands out copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteData {
    pub voter_id: String,
    pub candidate_id: String,
    /// Creation time in epoch milliseconds
    pub timestamp: i64,
}

impl VoteData {
    pub fn new(voter_id: impl Into<String>, candidate_id: impl Into<String>) -> Self {
        VoteData {
            voter_id: voter_id.into(),
            candidate_id: candidate_id.into(),
            timestamp: now_millis(),
        }
    }

    /// The sentinel vote seeding the hash chain.
    pub fn genesis() -> Self {
        VoteData::new(GENESIS_SENTINEL, GENESIS_SENTINEL)
    }

    pub fn is_genesis(&self) -> bool {
        self.voter_id == GENESIS_SENTINEL && self.candidate_id == GENESIS_SENTINEL
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_sentinel_round_trips_field_names() {
        let vote = VoteData::genesis();
        assert!(vote.is_genesis());

        let json = serde_json::to_string(&vote).unwrap();
        assert!(json.contains("\"voterId\""));
        assert!(json.contains("\"candidateId\""));
        assert!(json.contains("\"timestamp\""));

        let back: VoteData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vote);
    }

    #[test]
    fn regular_votes_are_not_genesis() {
        assert!(!VoteData::new("v1", "A").is_genesis());
    }
}
