//! Human-readable output for the `folio` commands.
//!
//! Each `run_*` function resolves the catalog from the configuration,
//! performs the command, and prints to stdout. Warnings about live data go
//! to stderr so stdout stays parseable.

use anyhow::{Context, Result};
use chrono::Utc;

use crate::aggregate::{enrich_projects, fetch_all_repositories};
use crate::assistant::{initial_suggestions, system_instruction, PortfolioContext};
use crate::catalog::resolve_catalog;
use crate::commits::recent_commits;
use crate::config::Config;
use crate::display::{format_thousands, time_ago_long, time_ago_short};
use crate::fetcher::GitHubClient;
use crate::models::{Catalog, Project};
use crate::progress::StderrProgress;
use crate::search::{derive_facets, filter_projects, related_projects};
use crate::stats::refresh_stats;

fn client(config: &Config) -> Result<GitHubClient> {
    GitHubClient::new(&config.github).context("Failed to build GitHub client")
}

/// Projects of `catalog`, enriched from GitHub when `live` is set.
async fn current_projects(config: &Config, catalog: &Catalog, live: bool) -> Result<Vec<Project>> {
    if !live {
        return Ok(catalog.projects.clone());
    }
    let client = client(config)?;
    let enrichment = enrich_projects(&client, &config.github.user, &catalog.projects).await;
    if let Some(warning) = enrichment.warning() {
        eprintln!("Warning: {}", warning);
    }
    Ok(enrichment.projects)
}

fn print_projects(projects: &[Project]) {
    if projects.is_empty() {
        println!("No projects.");
        return;
    }

    let now = Utc::now();
    println!(
        "{:<24} {:<12} {:>6} {:>6}  UPDATED",
        "NAME", "LANGUAGE", "STARS", "FORKS"
    );
    for p in projects {
        let opt = |v: Option<u64>| v.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());
        println!(
            "{:<24} {:<12} {:>6} {:>6}  {}",
            p.name,
            p.language.as_deref().unwrap_or("-"),
            opt(p.stars),
            opt(p.forks),
            p.updated_at
                .map(|ts| time_ago_short(ts, now))
                .unwrap_or_else(|| "-".to_string()),
        );
        if !p.tags.is_empty() {
            println!("    {}", p.tags.join(", "));
        }
    }
}

pub fn run_catalog(config: &Config) -> Result<()> {
    let catalog = resolve_catalog(config)?;
    println!("{}", serde_json::to_string_pretty(&catalog)?);
    Ok(())
}

pub async fn run_enrich(config: &Config, json: bool) -> Result<()> {
    let catalog = resolve_catalog(config)?;
    let client = client(config)?;
    let enrichment = enrich_projects(&client, &config.github.user, &catalog.projects).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&enrichment)?);
        return Ok(());
    }

    print_projects(&enrichment.projects);
    println!();
    println!("state: {}", enrichment.state().as_str());
    for failure in &enrichment.failures {
        eprintln!("  {}: {}", failure.name, failure.error);
    }
    if let Some(warning) = enrichment.warning() {
        eprintln!("Warning: {}", warning);
    }
    Ok(())
}

pub async fn run_stats(config: &Config, live: bool) -> Result<()> {
    let catalog = resolve_catalog(config)?;

    let stats = if live {
        let client = client(config)?;
        let refresh = refresh_stats(
            &client,
            &config.github.user,
            &catalog.stats,
            Utc::now().date_naive(),
        )
        .await;
        for failure in &refresh.failures {
            eprintln!("Warning: {} kept its saved value ({})", failure.label, failure.error);
        }
        refresh.stats
    } else {
        catalog.stats
    };

    for stat in &stats {
        println!("{:<28} {}", stat.label, stat.value);
    }
    Ok(())
}

pub async fn run_facets(config: &Config, live: bool) -> Result<()> {
    let catalog = resolve_catalog(config)?;
    let projects = current_projects(config, &catalog, live).await?;
    for facet in derive_facets(&projects) {
        println!("{}", facet);
    }
    Ok(())
}

pub async fn run_search(
    config: &Config,
    query: &str,
    facet: &str,
    live: bool,
    json: bool,
) -> Result<()> {
    let catalog = resolve_catalog(config)?;
    let projects = current_projects(config, &catalog, live).await?;
    let hits = filter_projects(&projects, facet, query);

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
    } else {
        print_projects(&hits);
    }
    Ok(())
}

fn find_project<'a>(catalog: &'a Catalog, name: &str) -> Result<&'a Project> {
    catalog
        .project(name)
        .ok_or_else(|| anyhow::anyhow!("project not found: {}", name))
}

pub fn run_related(config: &Config, name: &str, limit: usize) -> Result<()> {
    let catalog = resolve_catalog(config)?;
    let project = find_project(&catalog, name)?;
    let related = related_projects(&catalog.projects, project, limit);

    if related.is_empty() {
        println!("No related projects.");
        return Ok(());
    }
    for p in related {
        println!("{:<24} {}", p.name, p.description);
    }
    Ok(())
}

pub async fn run_commits(config: &Config, name: &str) -> Result<()> {
    let catalog = resolve_catalog(config)?;
    let project = find_project(&catalog, name)?;
    let client = client(config)?;

    let commits = recent_commits(&client, project, config.github.commits_per_project)
        .await
        .with_context(|| format!("Could not load recent commits for '{}'", name))?;

    let now = Utc::now();
    for c in &commits {
        println!("{}  {}", c.short_sha(), c.summary());
        println!("         by {} • {}", c.author_name, time_ago_long(c.date, now));
    }
    Ok(())
}

pub async fn run_repos(config: &Config) -> Result<()> {
    let client = client(config)?;
    let repos = fetch_all_repositories(&client, &config.github.user, &StderrProgress).await;

    let mut total_stars = 0u64;
    for repo in &repos {
        let stars = repo.stargazers_count.unwrap_or(0);
        total_stars += stars;
        println!(
            "{:<40} {:<12} {:>6}",
            repo.name.as_deref().unwrap_or("?"),
            repo.language.as_deref().unwrap_or("-"),
            stars
        );
    }
    println!();
    println!(
        "{} repositories, {} stars",
        format_thousands(repos.len() as u64),
        format_thousands(total_stars)
    );
    Ok(())
}

pub fn run_context(config: &Config, json: bool) -> Result<()> {
    let catalog = resolve_catalog(config)?;

    if json {
        let context = PortfolioContext::from_catalog(&catalog);
        println!("{}", context.to_json()?);
        return Ok(());
    }

    println!("{}", system_instruction(&catalog)?);
    println!();
    println!("Suggestions:");
    for s in initial_suggestions(&catalog) {
        println!("  - {}", s);
    }
    Ok(())
}
