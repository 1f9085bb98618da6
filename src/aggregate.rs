//! Failure-tolerant enrichment of the static catalog with live GitHub data.
//!
//! [`enrich_projects`] issues one repository request per catalog entry, all
//! in flight together on the calling task, and waits for every one of them
//! to settle. Each result is captured as a [`FetchOutcome`] and merged back
//! by position, so the output has the input's length and order no matter
//! which response arrives first. A failed entry keeps its static values and
//! is recorded in [`Enrichment::failures`]; nothing aborts the batch.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──▶ Fetching ──┬──▶ Enriched          (every entry merged)
//!                     └──▶ PartiallyFailed   (≥1 entry fell back)
//! ```
//!
//! There is no terminal failure state: if every request fails the result
//! is the static catalog, which is itself complete.
//!
//! # Pagination
//!
//! [`fetch_paginated`] walks an unbounded listing page by page with a fixed
//! page size of [`PAGE_SIZE`], stopping at the first short page or the first
//! failed page.

use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;

use crate::contracts::{parse_repositories, parse_repository, RepoPayload};
use crate::fetcher::{FetchError, RemoteSource, RequestOptions};
use crate::models::Project;
use crate::progress::{FetchProgressEvent, FetchProgressReporter};

/// Items requested per page from paginated endpoints.
pub const PAGE_SIZE: usize = 100;

/// Result of one request in a batch.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    Success(T),
    Failure(FetchError),
}

impl<T> From<Result<T, FetchError>> for FetchOutcome<T> {
    fn from(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(v) => FetchOutcome::Success(v),
            Err(e) => FetchOutcome::Failure(e),
        }
    }
}

/// Aggregator lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichState {
    Idle,
    Fetching,
    Enriched,
    PartiallyFailed,
}

impl EnrichState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrichState::Idle => "idle",
            EnrichState::Fetching => "fetching",
            EnrichState::Enriched => "enriched",
            EnrichState::PartiallyFailed => "partially_failed",
        }
    }
}

/// One catalog entry whose enrichment fell back to static data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichmentFailure {
    pub name: String,
    pub endpoint: String,
    pub error: String,
}

/// Output of a settled enrichment batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enrichment {
    /// Merged entries, in catalog order.
    pub projects: Vec<Project>,
    pub failures: Vec<EnrichmentFailure>,
}

impl Enrichment {
    pub fn partially_failed(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Terminal state of the batch.
    pub fn state(&self) -> EnrichState {
        if self.partially_failed() {
            EnrichState::PartiallyFailed
        } else {
            EnrichState::Enriched
        }
    }

    /// A single non-blocking notice for the user, if anything fell back.
    pub fn warning(&self) -> Option<String> {
        if !self.partially_failed() {
            return None;
        }
        let names: Vec<&str> = self.failures.iter().map(|f| f.name.as_str()).collect();
        Some(format!(
            "Live data unavailable for {} of {} projects ({}); showing saved details.",
            self.failures.len(),
            self.projects.len(),
            names.join(", ")
        ))
    }
}

/// Last non-empty path segment of a repository URL.
///
/// `https://github.com/owner/Repo-Name/` → `Repo-Name`.
pub fn repo_identifier(github_url: &str) -> Option<&str> {
    let path = github_url
        .split(['?', '#'])
        .next()
        .unwrap_or(github_url)
        .trim_end_matches('/');
    path.rsplit('/').next().filter(|s| !s.is_empty() && !s.contains(':'))
}

/// Endpoint for a project's repository metadata.
pub fn repository_endpoint(owner: &str, project: &Project) -> Option<String> {
    repo_identifier(&project.github_url).map(|id| format!("/repos/{}/{}", owner, id))
}

/// Overlay a repository payload onto a static entry.
///
/// Values present in the payload win; absent (or empty, for `description`
/// and `homepage`) values fall back to the static entry.
pub fn merge_repository(project: &Project, repo: RepoPayload) -> Project {
    let non_empty = |s: Option<String>| s.filter(|v| !v.trim().is_empty());

    Project {
        description: non_empty(repo.description).unwrap_or_else(|| project.description.clone()),
        live_url: non_empty(repo.homepage).or_else(|| project.live_url.clone()),
        stars: repo.stargazers_count.or(project.stars),
        forks: repo.forks_count.or(project.forks),
        language: repo.language.or_else(|| project.language.clone()),
        updated_at: repo.updated_at.or(project.updated_at),
        ..project.clone()
    }
}

async fn fetch_repository(
    source: &dyn RemoteSource,
    owner: &str,
    project: &Project,
) -> (String, Result<RepoPayload, FetchError>) {
    let Some(endpoint) = repository_endpoint(owner, project) else {
        let err = FetchError::InvalidRequest {
            endpoint: project.github_url.clone(),
            reason: "github_url has no repository segment".to_string(),
        };
        return (project.github_url.clone(), Err(err));
    };

    let result = source
        .get_json(&endpoint, &RequestOptions::default())
        .await
        .and_then(|body| parse_repository(&endpoint, body));
    (endpoint, result)
}

/// Enrich every project from its repository; never fails as a whole.
pub async fn enrich_projects(
    source: &dyn RemoteSource,
    owner: &str,
    projects: &[Project],
) -> Enrichment {
    let requests = projects
        .iter()
        .map(|project| fetch_repository(source, owner, project));
    let settled = join_all(requests).await;

    let mut merged = Vec::with_capacity(projects.len());
    let mut failures = Vec::new();

    for (project, (endpoint, result)) in projects.iter().zip(settled) {
        match FetchOutcome::from(result) {
            FetchOutcome::Success(repo) => merged.push(merge_repository(project, repo)),
            FetchOutcome::Failure(err) => {
                tracing::warn!(project = %project.name, error = %err, "enrichment failed, keeping static entry");
                failures.push(EnrichmentFailure {
                    name: project.name.clone(),
                    endpoint,
                    error: err.to_string(),
                });
                merged.push(project.clone());
            }
        }
    }

    tracing::info!(
        total = projects.len(),
        failed = failures.len(),
        "enrichment batch settled"
    );

    Enrichment {
        projects: merged,
        failures,
    }
}

fn page_endpoint(endpoint: &str, page: usize) -> String {
    let sep = if endpoint.contains('?') { '&' } else { '?' };
    format!("{}{}per_page={}&page={}", endpoint, sep, PAGE_SIZE, page)
}

/// Fetch every page of a listing endpoint, in order.
///
/// A failed page ends the walk; the pages collected so far are returned.
pub async fn fetch_paginated<T, F>(
    source: &dyn RemoteSource,
    endpoint: &str,
    parse: F,
    progress: &dyn FetchProgressReporter,
) -> Vec<T>
where
    F: Fn(&str, Value) -> Result<Vec<T>, FetchError>,
{
    let mut items = Vec::new();
    let mut page = 1;

    loop {
        let url = page_endpoint(endpoint, page);
        let result = source
            .get_json(&url, &RequestOptions::default())
            .await
            .and_then(|body| parse(&url, body));

        let batch = match result {
            Ok(batch) => batch,
            Err(err) => {
                tracing::warn!(endpoint = %url, error = %err, "page request failed, treating as end of data");
                break;
            }
        };

        let count = batch.len();
        items.extend(batch);
        progress.report(FetchProgressEvent::Page {
            endpoint: endpoint.to_string(),
            page,
            items: items.len() as u64,
        });

        if count < PAGE_SIZE {
            break;
        }
        page += 1;
    }

    progress.report(FetchProgressEvent::Done {
        endpoint: endpoint.to_string(),
        items: items.len() as u64,
    });

    items
}

/// All public repositories of `user`.
pub async fn fetch_all_repositories(
    source: &dyn RemoteSource,
    user: &str,
    progress: &dyn FetchProgressReporter,
) -> Vec<RepoPayload> {
    let endpoint = format!("/users/{}/repos", user);
    fetch_paginated(source, &endpoint, parse_repositories, progress).await
}
