//! Expected response shapes for the GitHub endpoints we read.
//!
//! Each `parse_*` function validates a raw JSON body and converts any shape
//! mismatch into [`FetchError::MalformedResponse`], so invalid data never
//! reaches the merge step. Fields the merge treats as optional are
//! `Option`s; JSON `null` deserializes to `None`.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::fetcher::FetchError;
use crate::models::Commit;

/// `GET /repos/{owner}/{repo}` and the items of `GET /users/{user}/repos`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RepoPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: Option<u64>,
    #[serde(default)]
    pub forks_count: Option<u64>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub homepage: Option<String>,
}

/// `GET /users/{user}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserPayload {
    #[serde(default)]
    pub login: Option<String>,
    pub public_repos: u64,
}

/// Envelope of the `/search/*` endpoints; only the count is read.
#[derive(Debug, Clone, PartialEq, Deserialize)]
struct SearchPayload {
    total_count: u64,
}

#[derive(Debug, Deserialize)]
struct CommitPayload {
    sha: String,
    commit: CommitDetail,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
    author: CommitAuthor,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    name: String,
    date: DateTime<Utc>,
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: Value) -> Result<T, FetchError> {
    serde_json::from_value(body).map_err(|e| FetchError::malformed(endpoint, e.to_string()))
}

fn expect_object(endpoint: &str, body: &Value) -> Result<(), FetchError> {
    if body.is_object() {
        Ok(())
    } else {
        Err(FetchError::malformed(endpoint, "expected a JSON object"))
    }
}

fn expect_array(endpoint: &str, body: &Value) -> Result<(), FetchError> {
    if body.is_array() {
        Ok(())
    } else {
        Err(FetchError::malformed(endpoint, "expected a JSON array"))
    }
}

pub fn parse_repository(endpoint: &str, body: Value) -> Result<RepoPayload, FetchError> {
    expect_object(endpoint, &body)?;
    decode(endpoint, body)
}

pub fn parse_repositories(endpoint: &str, body: Value) -> Result<Vec<RepoPayload>, FetchError> {
    expect_array(endpoint, &body)?;
    decode(endpoint, body)
}

pub fn parse_user(endpoint: &str, body: Value) -> Result<UserPayload, FetchError> {
    expect_object(endpoint, &body)?;
    decode(endpoint, body)
}

/// `total_count` of a search response.
pub fn parse_search_total(endpoint: &str, body: Value) -> Result<u64, FetchError> {
    expect_object(endpoint, &body)?;
    let payload: SearchPayload = decode(endpoint, body)?;
    Ok(payload.total_count)
}

pub fn parse_commits(endpoint: &str, body: Value) -> Result<Vec<Commit>, FetchError> {
    expect_array(endpoint, &body)?;
    let payloads: Vec<CommitPayload> = decode(endpoint, body)?;
    Ok(payloads
        .into_iter()
        .map(|c| Commit {
            sha: c.sha,
            message: c.commit.message,
            author_name: c.commit.author.name,
            date: c.commit.author.date,
            html_url: c.html_url,
        })
        .collect())
}
