#![forbid(unsafe_code)]
//! Cast a vote: admission check, proof-of-work seal, persist.

use ballotchain::cli::load_session_from_config;
use clap::Parser;
use colored::*;

#[derive(Parser)]
#[command(name = "ballot-cast", about = "Cast a vote in the current election")]
struct Args {
    /// Voter id as registered on the roster
    voter_id: String,
    /// Candidate id to vote for
    candidate_id: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let (config, mut session) = load_session_from_config()?;
    println!("{}", session.info().title.bright_cyan().bold());

    match session.cast_vote(&args.voter_id, &args.candidate_id)? {
        true => {
            let block = session.ledger().latest_block();
            println!("{}", "✅ Vote sealed into the chain".green().bold());
            println!("   block #{}  hash {}", block.index, block.hash.dimmed());
        }
        false => {
            println!(
                "{}",
                format!("❌ {} has already voted", args.voter_id).red().bold()
            );
            std::process::exit(1);
        }
    }

    session.roster().save(std::path::Path::new(&config.roster.path))?;
    Ok(())
}
