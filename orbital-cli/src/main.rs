//! Orbital CLI - reading progress on this device, synced with an Orbital server

mod client;
mod commands;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use client::SyncClient;
use orbital_core::{LocalProgressStore, UserId};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "orbital")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding the local progress cache
    #[arg(long, global = true, env = "ORBITAL_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Base URL of the Orbital server
    #[arg(
        long,
        global = true,
        env = "ORBITAL_SERVER",
        default_value = "http://127.0.0.1:3000"
    )]
    server: String,

    /// User id to sync as
    #[arg(long, global = true, env = "ORBITAL_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record reading progress for a book
    Read {
        /// Book id
        book: String,

        /// Percent complete (0-100)
        #[arg(allow_negative_numbers = true)]
        progress: i64,

        /// When the reading happened (RFC 3339), defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },

    /// List cached progress
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one cached book
    Show {
        /// Book id
        book: String,
    },

    /// Store a book's text for offline reading
    Cache {
        /// Book id
        book: String,

        /// Plain text file, paragraphs separated by blank lines
        file: PathBuf,
    },

    /// Forget a book's progress and cached text
    Remove {
        /// Book id
        book: String,
    },

    /// Send cached progress to the server
    Push,

    /// Fetch the server's progress and merge it into the cache
    Pull,

    /// Show reading statistics from the server
    Stats,
}

/// Everything a command needs from the global flags
struct Context {
    store: LocalProgressStore,
    server: String,
    user: Option<String>,
}

impl Context {
    fn client(&self) -> Result<SyncClient> {
        let user = self
            .user
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .context("no user id; pass --user or set ORBITAL_USER")?;
        SyncClient::new(&self.server, UserId::new(user))
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("orbital"))
        .unwrap_or_else(|| PathBuf::from(".orbital"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "orbital_cli=debug,orbital_core=debug"
    } else {
        "orbital_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
    tracing::debug!(path = ?data_dir, "using local cache");

    let ctx = Context {
        store: LocalProgressStore::open(data_dir),
        server: cli.server,
        user: cli.user,
    };

    match cli.command {
        Commands::Read { book, progress, at } => {
            commands::read(&ctx.store, &book, progress, at).await
        }

        Commands::List { json } => commands::list(&ctx.store, json).await,

        Commands::Show { book } => commands::show(&ctx.store, &book).await,

        Commands::Cache { book, file } => commands::cache(&ctx.store, &book, &file).await,

        Commands::Remove { book } => commands::remove(&ctx.store, &book).await,

        Commands::Push => commands::push(&ctx.store, &ctx.client()?).await,

        Commands::Pull => commands::pull(&ctx.store, &ctx.client()?).await,

        Commands::Stats => commands::stats(&ctx.client()?).await,
    }
}
