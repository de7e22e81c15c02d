//! Candidate and voter registries
//!
//! The ledger core treats candidate and voter ids as opaque strings; this
//! module owns the records behind those ids and the registration rules
//! around them.

use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub position: String,
    pub department: String,
    pub manifesto: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voter {
    pub id: String,
    pub name: String,
    pub student_id: String,
    pub department: String,
    pub has_voted: bool,
}

/// All candidate and voter records for one election session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    candidates: Vec<Candidate>,
    voters: Vec<Voter>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn voters(&self) -> &[Voter] {
        &self.voters
    }

    pub fn candidate(&self, id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    pub fn voter(&self, id: &str) -> Option<&Voter> {
        self.voters.iter().find(|v| v.id == id)
    }

    pub fn add_candidate(&mut self, candidate: Candidate) -> Result<(), LedgerError> {
        if self.candidate(&candidate.id).is_some() {
            return Err(LedgerError::DuplicateCandidate(format!(
                "a candidate with id {} is already registered",
                candidate.id
            )));
        }
        self.candidates.push(candidate);
        Ok(())
    }

    /// Register a voter. A student id may appear at most once.
    pub fn register_voter(&mut self, voter: Voter) -> Result<(), LedgerError> {
        if self.voters.iter().any(|v| v.student_id == voter.student_id) {
            return Err(LedgerError::DuplicateVoter(format!(
                "a voter with student id {} is already registered",
                voter.student_id
            )));
        }
        self.voters.push(voter);
        Ok(())
    }

    /// Flip the voter's has-voted flag after their vote is sealed.
    pub fn mark_voted(&mut self, voter_id: &str) {
        if let Some(voter) = self.voters.iter_mut().find(|v| v.id == voter_id) {
            voter.has_voted = true;
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Load the roster at `path`, or start with an empty one if the file
    /// does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self, LedgerError> {
        if path.exists() {
            Roster::load(path)
        } else {
            Ok(Roster::new())
        }
    }
}
