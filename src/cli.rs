//! Shared helpers for the command-line binaries

use crate::config::{load_config, Config};
use crate::election::{ElectionInfo, ElectionSession};
use crate::persistence::Database;
use crate::roster::Roster;
use std::path::Path;

/// Load the configuration, open the database and roster it points at, and
/// resume (or start) the election session.
pub fn load_session_from_config() -> Result<(Config, ElectionSession), Box<dyn std::error::Error>> {
    let config = load_config()?;

    if let Some(parent) = Path::new(&config.database.path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::open(&config.database.path)?;
    let roster = Roster::load_or_default(Path::new(&config.roster.path))?;

    let mut info = ElectionInfo::new(config.election.id.clone(), config.election.title.clone());
    info.description = config.election.description.clone();

    let session = ElectionSession::open(
        info,
        roster,
        Box::new(database),
        config.election.difficulty,
    )?;
    Ok((config, session))
}
