//! Storage collaborators for the voting ledger
//!
//! The ledger core never touches storage itself; the vote-casting workflow
//! hands a serialized chain to one of these backends after each state
//! change. Loaded chains are trusted as-is; `Ledger::is_valid` catches any
//! tampering introduced while the chain was at rest.

use crate::error::LedgerError;
use crate::ledger::{Block, Ledger, DEFAULT_DIFFICULTY};
use crate::vote::VoteData;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

/// Abstraction over persistence backends. Implementations save and reload
/// the whole chain; `load_ledger` returns `None` when nothing has been
/// stored yet.
pub trait Persistence: Send + Sync {
    fn save_ledger(&self, ledger: &Ledger) -> Result<(), LedgerError>;
    fn load_ledger(&self) -> Result<Option<Ledger>, LedgerError>;
}

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &str) -> Result<Self, LedgerError> {
        let conn = Connection::open(path)
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to open database: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS blocks (
                idx INTEGER PRIMARY KEY,
                timestamp INTEGER NOT NULL,
                voter_id TEXT NOT NULL,
                candidate_id TEXT NOT NULL,
                vote_timestamp INTEGER NOT NULL,
                previous_hash TEXT NOT NULL,
                hash TEXT NOT NULL,
                nonce INTEGER NOT NULL
            )",
            [],
        )
        .map_err(|e| LedgerError::DatabaseError(format!("Failed to create blocks table: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS metadata (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| {
            LedgerError::DatabaseError(format!("Failed to create metadata table: {}", e))
        })?;

        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, LedgerError> {
        self.conn
            .lock()
            .map_err(|_| LedgerError::DatabaseError("Mutex poisoned".to_string()))
    }
}

impl Persistence for Database {
    /// Saves the chain and its difficulty atomically in one transaction.
    fn save_ledger(&self, ledger: &Ledger) -> Result<(), LedgerError> {
        let conn_guard = self.lock()?;
        let tx = conn_guard.unchecked_transaction().map_err(|e| {
            LedgerError::DatabaseError(format!("Failed to start transaction: {}", e))
        })?;

        // The stored chain is replaced wholesale; rows from a longer,
        // previously stored chain must not survive into the next load.
        tx.execute("DELETE FROM blocks", [])
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to clear blocks: {}", e)))?;

        for block in ledger.blocks() {
            tx.execute(
                "INSERT OR REPLACE INTO blocks
                 (idx, timestamp, voter_id, candidate_id, vote_timestamp, previous_hash, hash, nonce)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    block.index as i64,
                    block.timestamp,
                    block.vote.voter_id,
                    block.vote.candidate_id,
                    block.vote.timestamp,
                    block.previous_hash,
                    block.hash,
                    block.nonce as i64,
                ],
            )
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to save block: {}", e)))?;
        }

        tx.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES ('difficulty', ?1)",
            params![ledger.difficulty().to_string()],
        )
        .map_err(|e| LedgerError::DatabaseError(format!("Failed to save difficulty: {}", e)))?;

        tx.commit().map_err(|e| {
            LedgerError::DatabaseError(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(())
    }

    fn load_ledger(&self) -> Result<Option<Ledger>, LedgerError> {
        let conn_guard = self.lock()?;
        let mut stmt = conn_guard
            .prepare(
                "SELECT idx, timestamp, voter_id, candidate_id, vote_timestamp, previous_hash, hash, nonce
                 FROM blocks ORDER BY idx ASC",
            )
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to prepare query: {}", e)))?;

        let blocks_iter = stmt
            .query_map([], |row| {
                let index: i64 = row.get(0)?;
                let nonce: i64 = row.get(7)?;
                Ok(Block {
                    index: index as u64,
                    timestamp: row.get(1)?,
                    vote: VoteData {
                        voter_id: row.get(2)?,
                        candidate_id: row.get(3)?,
                        timestamp: row.get(4)?,
                    },
                    previous_hash: row.get(5)?,
                    hash: row.get(6)?,
                    nonce: nonce as u64,
                })
            })
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to query blocks: {}", e)))?;

        let mut blocks = Vec::new();
        for block_result in blocks_iter {
            blocks.push(
                block_result
                    .map_err(|e| LedgerError::DatabaseError(format!("Failed to load block: {}", e)))?,
            );
        }

        if blocks.is_empty() {
            return Ok(None);
        }

        let difficulty: usize = conn_guard
            .query_row(
                "SELECT value FROM metadata WHERE key = 'difficulty'",
                [],
                |row| {
                    let val: String = row.get(0)?;
                    Ok(val.parse::<usize>().unwrap_or(DEFAULT_DIFFICULTY))
                },
            )
            .unwrap_or(DEFAULT_DIFFICULTY);

        Ok(Some(Ledger::from_blocks(blocks, difficulty)?))
    }
}

/// Simple in-memory persistence holding one serialized snapshot of the
/// chain, useful for tests and ephemeral runs.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    chain: Arc<Mutex<Option<String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Persistence for InMemoryStore {
    fn save_ledger(&self, ledger: &Ledger) -> Result<(), LedgerError> {
        let mut slot = self
            .chain
            .lock()
            .map_err(|_| LedgerError::DatabaseError("Mutex poisoned".to_string()))?;
        *slot = Some(ledger.serialize()?);
        Ok(())
    }

    fn load_ledger(&self) -> Result<Option<Ledger>, LedgerError> {
        let slot = self
            .chain
            .lock()
            .map_err(|_| LedgerError::DatabaseError("Mutex poisoned".to_string()))?;
        slot.as_deref().map(Ledger::deserialize).transpose()
    }
}
