//! Read-side aggregation over sealed blocks

use crate::ledger::core::chain::Ledger;
use crate::vote::VoteData;

impl Ledger {
    /// True if the voter appears in any sealed block or in the pending
    /// queue. A submitted-but-unsealed vote already counts as "voted".
    pub fn has_voter_voted(&self, voter_id: &str) -> bool {
        let sealed = self
            .sealed_votes()
            .any(|vote| vote.voter_id == voter_id);
        sealed || self.pending_votes().any(|vote| vote.voter_id == voter_id)
    }

    /// Number of sealed votes for the candidate. Pending votes do not count
    /// until sealed.
    pub fn count_votes_for(&self, candidate_id: &str) -> usize {
        self.sealed_votes()
            .filter(|vote| vote.candidate_id == candidate_id)
            .count()
    }

    /// Every sealed vote in chain order, genesis sentinel excluded.
    pub fn all_votes(&self) -> Vec<VoteData> {
        self.sealed_votes().cloned().collect()
    }

    pub fn total_votes(&self) -> usize {
        self.sealed_votes().count()
    }

    fn sealed_votes(&self) -> impl Iterator<Item = &VoteData> {
        self.blocks()
            .iter()
            .filter(|block| block.index > 0)
            .map(|block| &block.vote)
    }
}
