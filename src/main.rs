//! # Portfolio Harness CLI (`folio`)
//!
//! The `folio` binary inspects the static portfolio catalog, enriches it
//! with live GitHub data, searches it, and serves it as a JSON feed.
//!
//! ## Usage
//!
//! ```bash
//! folio --config ./config/folio.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `folio catalog` | Print the static catalog as JSON |
//! | `folio enrich` | Merge live repository data into the projects |
//! | `folio stats` | Print headline statistics |
//! | `folio facets` | Print the facet set |
//! | `folio search [query]` | Filter projects by facet and text |
//! | `folio related <name>` | Projects related to one project |
//! | `folio commits <name>` | Recent commits of a project |
//! | `folio repos` | Every public repository of the configured user |
//! | `folio context` | Assistant system instruction |
//! | `folio serve` | Start the JSON data feed |
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use portfolio_harness::search::{ALL_FACET, DEFAULT_RELATED_LIMIT};
use portfolio_harness::{commands, config, server};

/// Portfolio Harness CLI: a static portfolio catalog with failure-tolerant
/// GitHub enrichment.
#[derive(Parser)]
#[command(
    name = "folio",
    about = "Portfolio Harness: static portfolio catalog with live GitHub enrichment",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/folio.toml`. A missing file falls back to the
    /// built-in settings.
    #[arg(long, global = true, default_value = "./config/folio.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Print the static catalog as JSON.
    Catalog,

    /// Enrich every project with its live repository data.
    ///
    /// Requests run concurrently. A project whose request fails keeps its
    /// saved details and is listed on stderr.
    Enrich {
        /// Print the merged projects and failures as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print headline statistics.
    Stats {
        /// Refresh values from GitHub before printing.
        #[arg(long)]
        live: bool,
    },

    /// Print the facet set ("All" first, then every language and tag).
    Facets {
        /// Derive facets from live-enriched projects.
        #[arg(long)]
        live: bool,
    },

    /// Filter projects by facet and free text.
    Search {
        /// Case-insensitive text matched against name and description.
        query: Option<String>,

        /// Facet to restrict to (a language or tag).
        #[arg(long, default_value = ALL_FACET)]
        facet: String,

        /// Search live-enriched projects.
        #[arg(long)]
        live: bool,

        /// Print matching projects as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List projects related to a project by language and shared tags.
    Related {
        /// Project name.
        name: String,

        /// Maximum number of related projects.
        #[arg(long, default_value_t = DEFAULT_RELATED_LIMIT)]
        limit: usize,
    },

    /// Show recent commits of a project.
    Commits {
        /// Project name.
        name: String,
    },

    /// List every public repository of the configured user, page by page.
    Repos,

    /// Print the assistant system instruction and conversation starters.
    Context {
        /// Print only the portfolio context as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Start the JSON HTTP data feed.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Catalog => {
            commands::run_catalog(&cfg)?;
        }
        Commands::Enrich { json } => {
            commands::run_enrich(&cfg, json).await?;
        }
        Commands::Stats { live } => {
            commands::run_stats(&cfg, live).await?;
        }
        Commands::Facets { live } => {
            commands::run_facets(&cfg, live).await?;
        }
        Commands::Search {
            query,
            facet,
            live,
            json,
        } => {
            let query = query.unwrap_or_default();
            commands::run_search(&cfg, &query, &facet, live, json).await?;
        }
        Commands::Related { name, limit } => {
            commands::run_related(&cfg, &name, limit)?;
        }
        Commands::Commits { name } => {
            commands::run_commits(&cfg, &name).await?;
        }
        Commands::Repos => {
            commands::run_repos(&cfg).await?;
        }
        Commands::Context { json } => {
            commands::run_context(&cfg, json)?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
