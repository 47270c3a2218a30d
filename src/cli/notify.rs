//! `visitlog notify` — mail the latest visit right now.

use crate::cli::log::describe_last;
use crate::notify::{Notifier, NotifyError};
use crate::store::LogStore;
use anyhow::Result;
use colored::Colorize;

/// Run the `visitlog notify` command.
pub async fn run_notify(store: &dyn LogStore, notifier: &Notifier) -> Result<()> {
    match notifier.notify_last().await {
        Ok(()) => {
            let contents = store.read_all().await?;
            println!();
            println!("  {} Notification sent.", "✓".green().bold());
            if let Some(row) = describe_last(contents.as_deref()) {
                println!("  {}", row.dimmed());
            }
            println!();
            Ok(())
        }
        Err(NotifyError::NoData) => {
            println!();
            println!("  {} No visits recorded yet, nothing to send.", "ℹ".blue());
            println!();
            Ok(())
        }
        Err(e) => Err(anyhow::Error::new(e).context("Failed to send notification")),
    }
}
