//! BallotChain - A tamper-evident voting ledger where every vote is sealed
//! into a hash-linked block
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`ledger`] - Chain management, validation, and vote tallying
//! - [`vote`] - Vote records and the genesis sentinel
//! - [`sealer`] - Proof-of-work sealing
//!
//! ## Election Workflow
//! - [`election`] - Vote admission, results, and change notifications
//! - [`roster`] - Candidate and voter registries
//!
//! ## State Management
//! - [`persistence`] - Storage collaborators (SQLite and in-memory)
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//! - [`cli`] - CLI utilities

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod ledger;
pub mod sealer;
pub mod vote;

// ============================================================================
// Election Workflow
// ============================================================================
pub mod election;
pub mod roster;

// ============================================================================
// State Management
// ============================================================================
pub mod persistence;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod cli;
pub mod config;
pub mod error;
