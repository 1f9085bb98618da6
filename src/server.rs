//! JSON HTTP data feed for the presentation layer.
//!
//! The server answers from the static catalog as soon as it is listening,
//! then runs one enrichment batch (projects and stats) in the background.
//! When the batch settles the new catalog replaces the old one in a single
//! assignment, so a request sees either the pre-batch or the post-batch
//! snapshot, never a mix of both.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/catalog` | Current snapshot with enrichment state and warning |
//! | `GET`  | `/projects?facet=&q=` | Filtered projects |
//! | `GET`  | `/facets` | Facet set of the current catalog |
//! | `GET`  | `/projects/{name}/related` | Related projects |
//! | `GET`  | `/projects/{name}/commits` | Recent commits, fetched live |
//! | `GET`  | `/context` | Assistant system instruction and suggestions |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "project not found: x" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `upstream` (502),
//! `internal` (500).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

use crate::aggregate::{enrich_projects, EnrichState, EnrichmentFailure};
use crate::assistant::{initial_suggestions, system_instruction, PortfolioContext};
use crate::catalog::resolve_catalog;
use crate::commits::recent_commits;
use crate::config::Config;
use crate::display::language_color;
use crate::fetcher::{GitHubClient, RemoteSource};
use crate::models::Catalog;
use crate::search::{
    derive_facets, filter_projects, related_projects, ALL_FACET, DEFAULT_RELATED_LIMIT,
};
use crate::stats::{refresh_stats, StatFailure};

/// What the feed is currently serving.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub state: EnrichState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub failures: Vec<EnrichmentFailure>,
    pub stat_failures: Vec<StatFailure>,
    pub catalog: Catalog,
}

impl Snapshot {
    fn initial(catalog: Catalog) -> Self {
        Self {
            state: EnrichState::Idle,
            warning: None,
            failures: Vec::new(),
            stat_failures: Vec::new(),
            catalog,
        }
    }
}

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    source: Arc<dyn RemoteSource>,
    snapshot: Arc<RwLock<Arc<Snapshot>>>,
}

impl AppState {
    async fn current(&self) -> Arc<Snapshot> {
        self.snapshot.read().await.clone()
    }

    async fn replace(&self, next: Snapshot) {
        *self.snapshot.write().await = Arc::new(next);
    }
}

/// Starts the data feed with a live GitHub client.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let catalog = resolve_catalog(config)?;
    let source: Arc<dyn RemoteSource> = Arc::new(GitHubClient::new(&config.github)?);
    run_server_with_source(config, catalog, source).await
}

/// Starts the data feed over `catalog`, enriching through `source`.
///
/// Binds to `[server].bind` and runs until the process is terminated.
pub async fn run_server_with_source(
    config: &Config,
    catalog: Catalog,
    source: Arc<dyn RemoteSource>,
) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();

    let state = AppState {
        config: Arc::new(config.clone()),
        source,
        snapshot: Arc::new(RwLock::new(Arc::new(Snapshot::initial(catalog)))),
    };

    tokio::spawn(enrich_in_background(state.clone()));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/catalog", get(handle_catalog))
        .route("/projects", get(handle_projects))
        .route("/facets", get(handle_facets))
        .route("/projects/{name}/related", get(handle_related))
        .route("/projects/{name}/commits", get(handle_commits))
        .route("/context", get(handle_context))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "data feed listening");
    println!("Portfolio feed listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// One enrichment batch: Idle → Fetching → Enriched | PartiallyFailed.
async fn enrich_in_background(state: AppState) {
    let before = state.current().await;
    let catalog = before.catalog.clone();

    state
        .replace(Snapshot {
            state: EnrichState::Fetching,
            ..(*before).clone()
        })
        .await;

    let user = state.config.github.user.clone();
    let source = state.source.as_ref();
    let today = Utc::now().date_naive();

    let (enrichment, stats) = tokio::join!(
        enrich_projects(source, &user, &catalog.projects),
        refresh_stats(source, &user, &catalog.stats, today),
    );

    let next = Snapshot {
        state: enrichment.state(),
        warning: enrichment.warning(),
        failures: enrichment.failures,
        stat_failures: stats.failures,
        catalog: Catalog {
            projects: enrichment.projects,
            stats: stats.stats,
            ..catalog
        },
    };
    state.replace(next).await;
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn upstream(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_GATEWAY,
        code: "upstream".to_string(),
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

// ============ Handlers ============

async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn handle_catalog(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.current().await.as_ref().clone())
}

#[derive(Debug, Deserialize)]
struct ProjectsQuery {
    facet: Option<String>,
    q: Option<String>,
}

async fn handle_projects(
    State(state): State<AppState>,
    Query(params): Query<ProjectsQuery>,
) -> Json<serde_json::Value> {
    let snapshot = state.current().await;
    let facet = params.facet.unwrap_or_else(|| ALL_FACET.to_string());
    let query = params.q.unwrap_or_default();
    let projects = filter_projects(&snapshot.catalog.projects, &facet, &query);

    let language_colors: BTreeMap<&str, String> = projects
        .iter()
        .filter_map(|p| p.language.as_deref())
        .map(|lang| (lang, language_color(lang)))
        .collect();

    Json(json!({
        "facet": facet,
        "query": query,
        "count": projects.len(),
        "projects": projects,
        "language_colors": language_colors,
    }))
}

async fn handle_facets(State(state): State<AppState>) -> Json<serde_json::Value> {
    let snapshot = state.current().await;
    Json(json!({ "facets": derive_facets(&snapshot.catalog.projects) }))
}

#[derive(Debug, Deserialize)]
struct RelatedQuery {
    limit: Option<usize>,
}

async fn handle_related(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<RelatedQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let snapshot = state.current().await;
    let project = snapshot
        .catalog
        .project(&name)
        .ok_or_else(|| not_found(format!("project not found: {}", name)))?;

    let limit = params.limit.unwrap_or(DEFAULT_RELATED_LIMIT);
    if limit == 0 {
        return Err(bad_request("limit must be at least 1"));
    }
    let related = related_projects(&snapshot.catalog.projects, project, limit);

    Ok(Json(json!({ "project": name, "related": related })))
}

async fn handle_commits(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let snapshot = state.current().await;
    let project = snapshot
        .catalog
        .project(&name)
        .ok_or_else(|| not_found(format!("project not found: {}", name)))?;

    let commits = recent_commits(
        state.source.as_ref(),
        project,
        state.config.github.commits_per_project,
    )
    .await
    .map_err(|e| {
        tracing::warn!(project = %name, error = %e, "commit fetch failed");
        upstream(format!(
            "Could not load recent commits ({}). GitHub may be rate limiting; try again later.",
            e
        ))
    })?;

    Ok(Json(json!({ "project": name, "commits": commits })))
}

async fn handle_context(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let snapshot = state.current().await;
    let catalog = &snapshot.catalog;
    let instruction = system_instruction(catalog).map_err(|e| internal(e.to_string()))?;

    Ok(Json(json!({
        "system_instruction": instruction,
        "suggestions": initial_suggestions(catalog),
        "context": PortfolioContext::from_catalog(catalog),
    })))
}
