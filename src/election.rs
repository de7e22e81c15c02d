//! The vote-casting workflow that sits above the ledger
//!
//! Admission policy lives here: the ledger itself accepts any submitted
//! vote, while this layer rejects duplicate voters, unknown ids, and votes
//! outside the election window, then drives the seal-persist-notify cycle.

use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::persistence::Persistence;
use crate::roster::{Candidate, Roster};
use crate::vote::VoteData;
use chrono::{DateTime, Duration, Utc};
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionInfo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
}

impl ElectionInfo {
    /// A session open for one week starting now.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        ElectionInfo {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            start_date: now,
            end_date: now + Duration::weeks(1),
            is_active: true,
        }
    }
}

/// Change notification emitted by the session after each ledger mutation.
#[derive(Debug, Clone)]
pub enum LedgerEvent {
    VoteSubmitted { voter_id: String },
    BlockSealed { index: u64, hash: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateTally {
    pub candidate_id: String,
    pub votes: usize,
}

/// One election session: the ledger, the roster behind its opaque ids, the
/// injected storage collaborator, and the event subscribers.
pub struct ElectionSession {
    ledger: Ledger,
    roster: Roster,
    info: ElectionInfo,
    storage: Box<dyn Persistence>,
    subscribers: Vec<Sender<LedgerEvent>>,
}

impl ElectionSession {
    /// Open a session, resuming a previously stored chain when the storage
    /// collaborator has one; otherwise a fresh chain is created at the
    /// given difficulty.
    pub fn open(
        info: ElectionInfo,
        roster: Roster,
        storage: Box<dyn Persistence>,
        difficulty: usize,
    ) -> Result<Self, LedgerError> {
        let ledger = match storage.load_ledger()? {
            Some(ledger) => {
                log::info!("Resumed ledger with {} blocks", ledger.len());
                ledger
            }
            None => Ledger::with_difficulty(difficulty),
        };
        Ok(ElectionSession {
            ledger,
            roster,
            info,
            storage,
            subscribers: Vec::new(),
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn info(&self) -> &ElectionInfo {
        &self.info
    }

    /// Subscribe to ledger change notifications.
    pub fn subscribe(&mut self) -> Receiver<LedgerEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self, event: LedgerEvent) {
        // Disconnected subscribers are dropped on the next notification.
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Cast one vote end to end: admission checks, submit, seal, persist,
    /// notify.
    ///
    /// Returns `Ok(false)` when the voter has already voted (a policy
    /// rejection, not an operational failure) and `Ok(true)` once the vote
    /// is sealed into the chain.
    pub fn cast_vote(&mut self, voter_id: &str, candidate_id: &str) -> Result<bool, LedgerError> {
        if !self.info.is_active {
            return Err(LedgerError::ElectionClosed);
        }
        if self.roster.voter(voter_id).is_none() {
            return Err(LedgerError::UnknownVoter(voter_id.to_string()));
        }
        if self.roster.candidate(candidate_id).is_none() {
            return Err(LedgerError::UnknownCandidate(candidate_id.to_string()));
        }
        if self.ledger.has_voter_voted(voter_id) {
            log::warn!("Rejected duplicate vote from {}", voter_id);
            return Ok(false);
        }

        self.ledger.submit_vote(VoteData::new(voter_id, candidate_id));
        self.notify(LedgerEvent::VoteSubmitted {
            voter_id: voter_id.to_string(),
        });

        let (index, hash) = {
            let block = self.ledger.seal_next_block()?;
            (block.index, block.hash.clone())
        };
        self.roster.mark_voted(voter_id);
        self.storage.save_ledger(&self.ledger)?;
        self.notify(LedgerEvent::BlockSealed { index, hash });

        Ok(true)
    }

    /// Sealed vote counts per registered candidate, zero counts included.
    pub fn results(&self) -> Vec<CandidateTally> {
        self.roster
            .candidates()
            .iter()
            .map(|candidate| CandidateTally {
                candidate_id: candidate.id.clone(),
                votes: self.ledger.count_votes_for(&candidate.id),
            })
            .collect()
    }

    /// The candidate with the most sealed votes; ties go to the earliest
    /// registered candidate. `None` when no candidates are registered.
    pub fn winner(&self) -> Option<&Candidate> {
        let results = self.results();
        let mut winning = results.first()?;
        for tally in &results[1..] {
            if tally.votes > winning.votes {
                winning = tally;
            }
        }
        self.roster.candidate(&winning.candidate_id)
    }

    /// Tamper-evidence check, surfaced to the caller as a fact rather than
    /// an error.
    pub fn audit(&self) -> bool {
        self.ledger.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::InMemoryStore;
    use crate::roster::Voter;

    fn candidate(id: &str) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: format!("Candidate {}", id),
            position: "President".to_string(),
            department: "Engineering".to_string(),
            manifesto: String::new(),
            image: None,
        }
    }

    fn voter(id: &str) -> Voter {
        Voter {
            id: id.to_string(),
            name: format!("Voter {}", id),
            student_id: format!("s-{}", id),
            department: "Engineering".to_string(),
            has_voted: false,
        }
    }

    fn session() -> ElectionSession {
        let mut roster = Roster::new();
        roster.add_candidate(candidate("A")).unwrap();
        roster.add_candidate(candidate("B")).unwrap();
        for id in ["v1", "v2", "v3"] {
            roster.register_voter(voter(id)).unwrap();
        }
        // Difficulty 1 keeps proof-of-work cheap in tests.
        ElectionSession::open(
            ElectionInfo::new("election-1", "Student Council"),
            roster,
            Box::new(InMemoryStore::new()),
            1,
        )
        .unwrap()
    }

    #[test]
    fn casting_votes_grows_the_chain_and_tallies() {
        let mut session = session();

        assert!(session.cast_vote("v1", "A").unwrap());
        assert_eq!(session.ledger().len(), 2);
        assert_eq!(session.ledger().count_votes_for("A"), 1);
        assert_eq!(session.ledger().count_votes_for("B"), 0);

        assert!(session.cast_vote("v2", "B").unwrap());
        assert_eq!(session.ledger().len(), 3);
        assert_eq!(session.ledger().count_votes_for("A"), 1);
        assert_eq!(session.ledger().count_votes_for("B"), 1);
        assert!(session.audit());
    }

    #[test]
    fn duplicate_voter_is_rejected_as_policy() {
        let mut session = session();
        assert!(session.cast_vote("v1", "A").unwrap());
        assert!(!session.cast_vote("v1", "B").unwrap());
        assert_eq!(session.ledger().len(), 2);
        assert!(session.roster().voter("v1").unwrap().has_voted);
    }

    #[test]
    fn unknown_ids_are_errors() {
        let mut session = session();
        assert!(matches!(
            session.cast_vote("ghost", "A"),
            Err(LedgerError::UnknownVoter(_))
        ));
        assert!(matches!(
            session.cast_vote("v1", "Z"),
            Err(LedgerError::UnknownCandidate(_))
        ));
    }

    #[test]
    fn closed_election_rejects_votes() {
        let mut session = session();
        session.info.is_active = false;
        assert!(matches!(
            session.cast_vote("v1", "A"),
            Err(LedgerError::ElectionClosed)
        ));
    }

    #[test]
    fn results_include_zero_count_candidates_and_pick_winner() {
        let mut session = session();
        session.cast_vote("v1", "A").unwrap();
        session.cast_vote("v2", "A").unwrap();
        session.cast_vote("v3", "B").unwrap();

        let results = session.results();
        assert_eq!(
            results,
            vec![
                CandidateTally {
                    candidate_id: "A".to_string(),
                    votes: 2
                },
                CandidateTally {
                    candidate_id: "B".to_string(),
                    votes: 1
                },
            ]
        );
        assert_eq!(session.winner().unwrap().id, "A");
    }

    #[test]
    fn subscribers_receive_submit_and_seal_events() {
        let mut session = session();
        let events = session.subscribe();

        session.cast_vote("v1", "A").unwrap();

        assert!(matches!(
            events.try_recv().unwrap(),
            LedgerEvent::VoteSubmitted { .. }
        ));
        match events.try_recv().unwrap() {
            LedgerEvent::BlockSealed { index, hash } => {
                assert_eq!(index, 1);
                assert_eq!(hash, session.ledger().latest_block().hash);
            }
            other => panic!("expected BlockSealed, got {:?}", other),
        }

        // Dropped receivers are pruned on the next cast.
        drop(events);
        session.cast_vote("v2", "B").unwrap();
        assert!(session.subscribers.is_empty());
    }
}
