//! Recent commits for a single project.
//!
//! Unlike enrichment this is a single request on demand, so a failure is
//! returned to the caller to show in place of the list.

use reqwest::Url;

use crate::contracts::parse_commits;
use crate::fetcher::{FetchError, RemoteSource, RequestOptions};
use crate::models::{Commit, Project};

/// `/repos/{owner}/{repo}/commits?per_page={limit}` for a project.
pub fn commits_endpoint(project: &Project, limit: u32) -> Result<String, FetchError> {
    let url = Url::parse(&project.github_url).map_err(|e| FetchError::InvalidRequest {
        endpoint: project.github_url.clone(),
        reason: e.to_string(),
    })?;

    let path = url.path().trim_end_matches('/');
    if path.trim_start_matches('/').split('/').count() < 2 {
        return Err(FetchError::InvalidRequest {
            endpoint: project.github_url.clone(),
            reason: "expected an owner/repository path".to_string(),
        });
    }

    Ok(format!("/repos{}/commits?per_page={}", path, limit))
}

/// The latest `limit` commits of `project`'s repository.
pub async fn recent_commits(
    source: &dyn RemoteSource,
    project: &Project,
    limit: u32,
) -> Result<Vec<Commit>, FetchError> {
    let endpoint = commits_endpoint(project, limit)?;
    let body = source
        .get_json(&endpoint, &RequestOptions::default())
        .await?;
    let mut commits = parse_commits(&endpoint, body)?;
    commits.truncate(limit as usize);
    Ok(commits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(url: &str) -> Project {
        Project {
            name: "p".to_string(),
            description: "d".to_string(),
            long_description: None,
            tags: vec![],
            github_url: url.to_string(),
            live_url: None,
            stars: None,
            forks: None,
            language: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_endpoint_from_repository_url() {
        let p = project("https://github.com/girishlade111/Lade-Auth");
        assert_eq!(
            commits_endpoint(&p, 5).unwrap(),
            "/repos/girishlade111/Lade-Auth/commits?per_page=5"
        );
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        let p = project("https://github.com/a/b/");
        assert_eq!(
            commits_endpoint(&p, 3).unwrap(),
            "/repos/a/b/commits?per_page=3"
        );
    }

    #[test]
    fn test_endpoint_rejects_bad_urls() {
        assert!(commits_endpoint(&project("not a url"), 5).is_err());
        assert!(commits_endpoint(&project("https://github.com/onlyowner"), 5).is_err());
    }
}
