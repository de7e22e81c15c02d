#![forbid(unsafe_code)]
//! Show the current tally per candidate and the leading candidate.

use ballotchain::cli::load_session_from_config;
use clap::Parser;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};

#[derive(Parser)]
#[command(name = "ballot-results", about = "Show election results")]
struct Args {}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let _args = Args::parse();

    let (_config, session) = load_session_from_config()?;
    println!("{}", session.info().title.bright_cyan().bold());
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Candidate").add_attribute(Attribute::Bold),
            Cell::new("Position").add_attribute(Attribute::Bold),
            Cell::new("Votes").add_attribute(Attribute::Bold),
        ]);

    for tally in session.results() {
        // Every tally row comes from a registered candidate.
        if let Some(candidate) = session.roster().candidate(&tally.candidate_id) {
            table.add_row(vec![
                Cell::new(&candidate.name),
                Cell::new(&candidate.position),
                Cell::new(tally.votes),
            ]);
        }
    }
    println!("{table}");

    println!(
        "\n{} sealed votes across {} blocks",
        session.ledger().total_votes(),
        session.ledger().len()
    );

    if let Some(winner) = session.winner() {
        println!(
            "{}",
            format!("🏆 Leading: {} ({})", winner.name, winner.position)
                .yellow()
                .bold()
        );
    } else {
        println!("{}", "No candidates registered".dimmed());
    }

    Ok(())
}
