//! Error types for BallotChain

use std::fmt;

#[derive(Debug, Clone)]
pub enum LedgerError {
    NoPendingVotes,
    MalformedChain(String),
    BrokenChain(String),
    DuplicateVoter(String),
    DuplicateCandidate(String),
    UnknownVoter(String),
    UnknownCandidate(String),
    ElectionClosed,
    DatabaseError(String),
    IoError(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LedgerError::NoPendingVotes => write!(f, "No pending votes to seal"),
            LedgerError::MalformedChain(msg) => write!(f, "Malformed serialized chain: {}", msg),
            LedgerError::BrokenChain(msg) => write!(f, "Broken chain: {}", msg),
            LedgerError::DuplicateVoter(msg) => write!(f, "Duplicate voter: {}", msg),
            LedgerError::DuplicateCandidate(msg) => write!(f, "Duplicate candidate: {}", msg),
            LedgerError::UnknownVoter(msg) => write!(f, "Unknown voter: {}", msg),
            LedgerError::UnknownCandidate(msg) => write!(f, "Unknown candidate: {}", msg),
            LedgerError::ElectionClosed => write!(f, "The election is not active"),
            LedgerError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            LedgerError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::MalformedChain(err.to_string())
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        LedgerError::DatabaseError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, LedgerError>;
