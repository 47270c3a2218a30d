//! visitlog — tiny visitor logger.
//!
//! Quick start:
//!   visitlog              # serve on $PORT (default 8080)
//!   visitlog count        # how many visits so far
//!   visitlog show         # dump the CSV
//!   visitlog notify       # mail the latest visit now
//!
//! For more info: visitlog --help

use clap::{Parser, Subcommand};
use colored::Colorize;
use visitlog::cli;
use visitlog::config::{MailArgs, ServeArgs, StoreArgs};
use visitlog::server;

/// visitlog — records visits to a CSV file and mails the latest one.
#[derive(Parser)]
#[command(
    name = "visitlog",
    version,
    about = "Record visitors to a CSV file and mail the latest entry",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Server options when no subcommand is given
    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server (the default)
    Serve(ServeArgs),

    /// Print the raw visit log
    Show {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Print the number of recorded visits
    Count {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Mail the most recent visit now
    Notify {
        #[command(flatten)]
        store: StoreArgs,

        #[command(flatten)]
        mail: MailArgs,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("visitlog=info,tower_http=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        None => server::serve(cli.serve).await,
        Some(Commands::Serve(args)) => server::serve(args).await,
        Some(Commands::Show { store }) => cli::log::run_show(store.store().as_ref()).await,
        Some(Commands::Count { store }) => cli::log::run_count(store.store().as_ref()).await,
        Some(Commands::Notify { store, mail }) => run_notify(store, mail).await,
    };

    if let Err(e) = result {
        eprintln!();
        eprintln!("  {} {}", "✗".red().bold(), e);
        for cause in e.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".dimmed(), cause);
        }
        eprintln!();
        std::process::exit(1);
    }
}

async fn run_notify(store: StoreArgs, mail: MailArgs) -> anyhow::Result<()> {
    let store = store.store();
    let notifier = mail.notifier(store.clone())?;
    cli::notify::run_notify(store.as_ref(), &notifier).await
}
