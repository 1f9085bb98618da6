//! Live refresh of the headline statistics.
//!
//! Each [`Stat`] with a [`StatKind`] is backed by one GitHub query. All
//! queries run concurrently; a failed query leaves its stat at the static
//! value and is recorded, the rest still update.
//!
//! | Kind | Source |
//! |------|--------|
//! | `repositories` | `GET /users/{user}` → `public_repos` |
//! | `pull_requests` | `GET /search/issues?q=author:{user}+type:pr` → `total_count` |
//! | `issues` | `GET /search/issues?q=author:{user}+type:issue` → `total_count` |
//! | `commits` | `GET /search/commits?q=author:{user}+committer-date:>={date}` → `total_count` |
//! | `stars` | sum of `stargazers_count` over every repository |
//! | `contributions` | none, always static |

use chrono::{Duration, NaiveDate};
use futures::future::join_all;
use serde::Serialize;

use crate::aggregate::fetch_all_repositories;
use crate::contracts::{parse_search_total, parse_user};
use crate::display::{format_compact, format_thousands};
use crate::fetcher::{FetchError, RemoteSource, RequestOptions};
use crate::models::{Stat, StatKind};
use crate::progress::NoProgress;

/// Media type the commit search endpoint historically required.
pub const COMMIT_SEARCH_ACCEPT: &str = "application/vnd.github.cloak-preview+json";

/// A stat whose live value could not be fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatFailure {
    pub label: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsRefresh {
    pub stats: Vec<Stat>,
    pub failures: Vec<StatFailure>,
}

/// Display form of a live count.
pub fn format_stat_value(kind: StatKind, value: u64) -> String {
    match kind {
        StatKind::Commits => format_compact(value),
        _ => format_thousands(value),
    }
}

/// Start of the trailing one-year window ending at `today`.
pub fn commit_window_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(365)
}

async fn fetch_metric(
    source: &dyn RemoteSource,
    user: &str,
    kind: StatKind,
    today: NaiveDate,
) -> Option<Result<u64, FetchError>> {
    let result = match kind {
        StatKind::Repositories => {
            let endpoint = format!("/users/{}", user);
            source
                .get_json(&endpoint, &RequestOptions::default())
                .await
                .and_then(|body| parse_user(&endpoint, body))
                .map(|u| u.public_repos)
        }
        StatKind::PullRequests | StatKind::Issues => {
            let kind_filter = if kind == StatKind::PullRequests {
                "pr"
            } else {
                "issue"
            };
            let endpoint = format!("/search/issues?q=author:{}+type:{}", user, kind_filter);
            source
                .get_json(&endpoint, &RequestOptions::default())
                .await
                .and_then(|body| parse_search_total(&endpoint, body))
        }
        StatKind::Commits => {
            let endpoint = format!(
                "/search/commits?q=author:{}+committer-date:>={}",
                user,
                commit_window_start(today).format("%Y-%m-%d")
            );
            let options = RequestOptions::default().with_header("Accept", COMMIT_SEARCH_ACCEPT);
            source
                .get_json(&endpoint, &options)
                .await
                .and_then(|body| parse_search_total(&endpoint, body))
        }
        StatKind::Stars => {
            let repos = fetch_all_repositories(source, user, &NoProgress).await;
            if repos.is_empty() {
                Err(FetchError::malformed(
                    format!("/users/{}/repos", user),
                    "no repositories returned",
                ))
            } else {
                Ok(repos.iter().filter_map(|r| r.stargazers_count).sum())
            }
        }
        StatKind::Contributions => return None,
    };
    Some(result)
}

/// Refresh every live-backed stat; never fails as a whole.
pub async fn refresh_stats(
    source: &dyn RemoteSource,
    user: &str,
    stats: &[Stat],
    today: NaiveDate,
) -> StatsRefresh {
    let requests = stats.iter().map(|stat| async move {
        match stat.kind {
            Some(kind) => fetch_metric(source, user, kind, today).await,
            None => None,
        }
    });
    let settled = join_all(requests).await;

    let mut refreshed = Vec::with_capacity(stats.len());
    let mut failures = Vec::new();

    for (stat, outcome) in stats.iter().zip(settled) {
        match (stat.kind, outcome) {
            (Some(kind), Some(Ok(value))) => refreshed.push(Stat {
                value: format_stat_value(kind, value),
                ..stat.clone()
            }),
            (_, Some(Err(err))) => {
                tracing::warn!(stat = %stat.label, error = %err, "stat refresh failed, keeping static value");
                failures.push(StatFailure {
                    label: stat.label.clone(),
                    error: err.to_string(),
                });
                refreshed.push(stat.clone());
            }
            _ => refreshed.push(stat.clone()),
        }
    }

    StatsRefresh {
        stats: refreshed,
        failures,
    }
}
