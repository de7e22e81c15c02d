#![forbid(unsafe_code)]
//! Audit the stored chain: self-consistency and linkage of every block.

use ballotchain::cli::load_session_from_config;
use clap::Parser;
use colored::*;

#[derive(Parser)]
#[command(name = "ballot-audit", about = "Verify the integrity of the vote ledger")]
struct Args {
    /// Print every block while auditing
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let (_config, session) = load_session_from_config()?;
    let ledger = session.ledger();

    if args.verbose {
        for block in ledger.blocks() {
            println!(
                "#{:<4} nonce {:<8} hash {}",
                block.index,
                block.nonce,
                block.hash.dimmed()
            );
        }
    }

    match ledger.verify() {
        Ok(()) => {
            println!(
                "{}",
                format!("✅ Chain valid: {} blocks, {} votes", ledger.len(), ledger.total_votes())
                    .green()
                    .bold()
            );
            Ok(())
        }
        Err(violation) => {
            // An invalid chain is reported, never auto-corrected.
            eprintln!("{}", format!("❌ {}", violation).red().bold());
            std::process::exit(1);
        }
    }
}
