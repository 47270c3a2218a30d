//! `visitlog show` and `visitlog count` — read the visit log from a terminal.

use crate::store::{csv, LogStore};
use anyhow::{Context, Result};
use colored::Colorize;

/// Run the `visitlog show` command: print the raw CSV.
pub async fn run_show(store: &dyn LogStore) -> Result<()> {
    let contents = store.read_all().await.context("Failed to read visit log")?;

    match contents {
        Some(contents) => {
            print!("{}", contents);
            if !contents.is_empty() && !contents.ends_with('\n') {
                println!();
            }
        }
        None => {
            println!();
            println!("  {} No visits recorded yet.", "ℹ".blue());
            println!("  Start the server and open it in a browser:");
            println!("    {}", "visitlog serve".dimmed());
            println!();
        }
    }

    Ok(())
}

/// Run the `visitlog count` command.
pub async fn run_count(store: &dyn LogStore) -> Result<()> {
    let count = store.count().await.context("Failed to read visit log")?;
    println!("{}", count);
    Ok(())
}

/// Describe the latest visit for the notify command's success line.
pub(crate) fn describe_last(contents: Option<&str>) -> Option<String> {
    contents.and_then(csv::last_record).map(|row| row.to_string())
}
