//! Configuration management for BallotChain

use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub election: ElectionConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub roster: RosterConfig,
}

#[derive(Debug, Deserialize)]
pub struct ElectionConfig {
    #[serde(default = "default_election_id")]
    pub id: String,
    #[serde(default = "default_election_title")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: usize,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct RosterConfig {
    #[serde(default = "default_roster_path")]
    pub path: String,
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            id: default_election_id(),
            title: default_election_title(),
            description: String::new(),
            difficulty: default_difficulty(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            path: default_roster_path(),
        }
    }
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let config_str = fs::read_to_string("config.toml").unwrap_or_default();
    let config: Config = if config_str.is_empty() {
        // Sane defaults when config.toml is absent
        Config {
            election: ElectionConfig::default(),
            database: DatabaseConfig::default(),
            roster: RosterConfig::default(),
        }
    } else {
        toml::from_str(&config_str)?
    };

    // Validate critical values
    if config.database.path.is_empty() {
        return Err("database.path must be set in config.toml".into());
    }
    if config.roster.path.is_empty() {
        return Err("roster.path must be set in config.toml".into());
    }

    Ok(config)
}

fn default_election_id() -> String {
    "election-2025".to_string()
}

fn default_election_title() -> String {
    "Student Council Elections 2025".to_string()
}

fn default_difficulty() -> usize {
    crate::ledger::DEFAULT_DIFFICULTY
}

fn default_database_path() -> String {
    "./ballot-data/ledger.db".to_string()
}

fn default_roster_path() -> String {
    "./ballot-data/roster.json".to_string()
}
