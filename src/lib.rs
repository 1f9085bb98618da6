//! # Portfolio Harness
//!
//! A static portfolio catalog (profile, projects, stats, social links)
//! enriched with live GitHub data, with facet filtering and search over the
//! result.
//!
//! The catalog is always complete on its own. Live data is overlaid per
//! entry by a batch of concurrent requests; any request that fails leaves
//! its entry at the static values and is reported, never aborting the rest.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌──────────────┐
//! │ Static       │──▶│ Aggregator  │──▶│ Filter /     │
//! │ Catalog      │   │ join-all +  │   │ Search Index │
//! └──────────────┘   │ fallback    │   └──────┬───────┘
//!                    └──────┬──────┘          │
//!                           ▼                 ▼
//!                    ┌─────────────┐   ┌──────────────┐
//!                    │ RemoteSource│   │ CLI / HTTP   │
//!                    │ (GitHub)    │   │ feed         │
//!                    └─────────────┘   └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! folio catalog                   # static catalog as JSON
//! folio enrich                    # merge live repository data
//! folio search flow --facet React # filter projects
//! folio serve                     # JSON feed for the front end
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`catalog`] | Built-in and file-based static catalog |
//! | [`fetcher`] | GitHub client and the `RemoteSource` seam |
//! | [`contracts`] | Response shape validation |
//! | [`aggregate`] | Enrichment batch and pagination |
//! | [`stats`] | Live statistics refresh |
//! | [`search`] | Facets, filtering, related projects |
//! | [`commits`] | Recent commits of a project |
//! | [`assistant`] | Assistant context and reply handling |
//! | [`display`] | Relative time, colours, number formatting |
//! | [`server`] | JSON HTTP feed |

pub mod aggregate;
pub mod assistant;
pub mod catalog;
pub mod commands;
pub mod commits;
pub mod config;
pub mod contracts;
pub mod display;
pub mod fetcher;
pub mod models;
pub mod progress;
pub mod search;
pub mod server;
pub mod stats;
