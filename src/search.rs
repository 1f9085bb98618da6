//! Facet filtering and free-text search over the current catalog.
//!
//! Everything here is a pure function of its inputs: the catalog slice is
//! never mutated and results are fresh vectors, so callers can recompute
//! on every change of (catalog, facet, query) without cached state.
//!
//! # Facets
//!
//! The facet set is `{"All"} ∪ {language} ∪ ⋃ tags`, sorted
//! lexicographically with `"All"` pinned first. Because it is derived from
//! whatever projects are passed in, enrichment that changes a language also
//! changes the facet set.
//!
//! # Matching
//!
//! | Filter | Rule |
//! |--------|------|
//! | facet `All` | every project |
//! | any other facet | `tags` contains it **or** `language` equals it |
//! | query | case-insensitive substring of `name` or `description` |
//!
//! The query is applied after the facet filter (logical AND).

use std::collections::BTreeSet;

use crate::models::Project;

/// The facet that matches every project.
pub const ALL_FACET: &str = "All";

/// Ordered, de-duplicated facet values for `projects`.
pub fn derive_facets(projects: &[Project]) -> Vec<String> {
    let mut values: BTreeSet<&str> = BTreeSet::new();
    for project in projects {
        if let Some(lang) = project.language.as_deref() {
            values.insert(lang);
        }
        for tag in &project.tags {
            values.insert(tag.as_str());
        }
    }
    values.remove(ALL_FACET);

    std::iter::once(ALL_FACET)
        .chain(values)
        .map(str::to_string)
        .collect()
}

/// Does `project` fall under `facet`?
pub fn matches_facet(project: &Project, facet: &str) -> bool {
    facet == ALL_FACET || project.has_tag(facet) || project.language.as_deref() == Some(facet)
}

/// Does `project` match the free-text `query`? The empty query matches.
///
/// Whitespace in the query is part of the needle.
pub fn matches_query(project: &Project, query: &str) -> bool {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    project.name.to_lowercase().contains(&needle)
        || project.description.to_lowercase().contains(&needle)
}

/// Projects under `facet` whose name or description contains `query`.
pub fn filter_projects(projects: &[Project], facet: &str, query: &str) -> Vec<Project> {
    projects
        .iter()
        .filter(|p| matches_facet(p, facet))
        .filter(|p| matches_query(p, query))
        .cloned()
        .collect()
}

/// Number of related projects shown next to a project.
pub const DEFAULT_RELATED_LIMIT: usize = 2;

/// Similarity between two projects: 2 for a shared language, 1 per shared tag.
pub fn relatedness(a: &Project, b: &Project) -> usize {
    let language = match (a.language.as_deref(), b.language.as_deref()) {
        (Some(x), Some(y)) if x == y => 2,
        _ => 0,
    };
    let shared_tags = b.tags.iter().filter(|t| a.has_tag(t)).count();
    language + shared_tags
}

/// The `limit` projects most related to `project`, best first.
///
/// Excludes `project` itself and anything with no relation. Ties keep
/// catalog order.
pub fn related_projects(projects: &[Project], project: &Project, limit: usize) -> Vec<Project> {
    let mut scored: Vec<(usize, &Project)> = projects
        .iter()
        .filter(|p| p.name != project.name)
        .map(|p| (relatedness(project, p), p))
        .filter(|(score, _)| *score > 0)
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(limit)
        .map(|(_, p)| p.clone())
        .collect()
}
