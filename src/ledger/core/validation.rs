use crate::error::LedgerError;
use crate::ledger::core::chain::Ledger;

impl Ledger {
    /// Walk the chain and report the first integrity violation found.
    ///
    /// Every non-genesis block must be self-consistent and must link to the
    /// hash of its predecessor. Genesis is implicitly self-consistent. A
    /// retroactive edit to any vote, timestamp, hash or nonce breaks one of
    /// the two checks.
    pub fn verify(&self) -> Result<(), LedgerError> {
        for i in 1..self.blocks().len() {
            let current = &self.blocks()[i];
            let previous = &self.blocks()[i - 1];

            if !current.is_self_consistent() {
                return Err(LedgerError::BrokenChain(format!(
                    "block {} failed self-consistency: stored hash {} does not match its content",
                    current.index, current.hash
                )));
            }

            if current.previous_hash != previous.hash {
                return Err(LedgerError::BrokenChain(format!(
                    "block {} does not link to block {}: expected previous hash {}, found {}",
                    current.index, previous.index, previous.hash, current.previous_hash
                )));
            }
        }
        Ok(())
    }

    /// Tamper-evidence check as a queryable fact. An invalid chain is a
    /// reportable condition, not an exception, and is never auto-corrected.
    pub fn is_valid(&self) -> bool {
        self.verify().is_ok()
    }
}
