//! # Archive Viewer CLI (`arcv`)
//!
//! Shows the metadata and file listing of one remote archive record.
//!
//! ## Usage
//!
//! ```bash
//! arcv [--config ./config/arcv.toml] [--identifier <id>] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `arcv info` | Print the record's metadata fields |
//! | `arcv files` | Print one page of the file list |
//! | `arcv url <name>` | Print the download link for a file |
//! | `arcv browse` | Search and page interactively |
//!
//! Logs go to stderr. Set `RUST_LOG=debug` to see the metadata request.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use archive_viewer::browse;
use archive_viewer::config;
use archive_viewer::render;
use archive_viewer::session::Session;
use archive_viewer_core::links;
use archive_viewer_core::models::ArchiveDocument;
use archive_viewer_core::view::ViewEvent;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Archive Viewer: search and page through the files of a remote archive record.
#[derive(Parser)]
#[command(
    name = "arcv",
    about = "Archive Viewer: search and page through the files of a remote archive record",
    version,
    long_about = "Archive Viewer fetches the metadata document of one archive record \
    and lets you filter its file list by name, page through the results, and get \
    download links for individual files."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/arcv.toml` when that file exists, otherwise
    /// built-in defaults are used.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Record identifier. Overrides `[record].identifier`.
    #[arg(long, global = true)]
    identifier: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the record's metadata.
    Info,

    /// Print one page of the record's file list.
    ///
    /// A page outside the range of the filtered list is ignored and page 1
    /// is shown instead.
    Files {
        /// Case-insensitive substring to match against file names.
        #[arg(long, short)]
        search: Option<String>,

        /// Page number (1-based).
        #[arg(long, short)]
        page: Option<usize>,

        /// Print the page as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print the download link for a file in the record.
    Url {
        /// Exact file name as listed by `arcv files`.
        name: String,
    },

    /// Search and page through the file list interactively.
    ///
    /// Reads commands from stdin; type `help` once the record has loaded.
    Browse,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::resolve_config(cli.config.as_deref())?;
    if let Some(identifier) = cli.identifier {
        cfg.record.identifier = identifier;
        cfg = cfg.validate().context("invalid --identifier")?;
    }
    init_logging(&cfg.logging.level);

    let mut session = Session::new(&cfg)?;

    match cli.command {
        Commands::Browse => {
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            let mut out = std::io::stdout();
            browse::run_browse(&mut session, input, &mut out).await?;
        }
        Commands::Info => {
            let doc = load_or_exit(&mut session).await;
            print!("{}", render::render_info(&doc));
        }
        Commands::Files { search, page, json } => {
            load_or_exit(&mut session).await;
            if let Some(term) = search {
                session.apply(ViewEvent::Search(term));
            }
            if let Some(n) = page {
                if !session.apply(ViewEvent::Page(n)) && session.view().current_page() != n {
                    tracing::warn!(page = n, "page out of range, showing page 1");
                }
            }

            let page = session.page().context("record not loaded")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                if let Some(doc) = session.document() {
                    println!("{}", render::render_header(doc));
                }
                print!("{}", render::render_page(&page));
            }
        }
        Commands::Url { name } => {
            let doc = load_or_exit(&mut session).await;
            match doc.files.iter().find(|f| f.name == name) {
                Some(file) => println!(
                    "{}",
                    links::download_url(session.base_url(), doc.identifier(), &file.name)
                ),
                None => bail!("no file named '{}' in record '{}'", name, doc.identifier()),
            }
        }
    }

    Ok(())
}

/// Load the record or print the failure and exit non-zero.
async fn load_or_exit(session: &mut Session) -> Arc<ArchiveDocument> {
    match session.load().await {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!(
                "{}",
                render::render_failure(session.identifier(), &e.to_string())
            );
            std::process::exit(1);
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
