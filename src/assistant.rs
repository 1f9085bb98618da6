//! Data side of the conversational assistant.
//!
//! The generative-language service itself is an external collaborator and
//! is not called from here. This module prepares what is sent to it (a
//! system instruction carrying the serialized catalog) and folds what comes
//! back (incremental text chunks plus optional web citations) into a
//! finished [`ChatMessage`].

use serde::Serialize;
use std::collections::HashSet;

use crate::models::{Catalog, ChatMessage, ChatRole, GroundingSource};

/// The catalog as the assistant sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioContext {
    pub name: String,
    pub bio: String,
    pub roles: Vec<String>,
    pub about: String,
    pub projects: Vec<ProjectContext>,
    pub stats: Vec<StatContext>,
    pub socials: Vec<SocialContext>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContext {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub github_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatContext {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SocialContext {
    pub name: String,
    pub url: String,
}

impl PortfolioContext {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            name: catalog.profile.name.clone(),
            bio: catalog.profile.bio.clone(),
            roles: catalog.profile.roles.clone(),
            about: catalog.profile.about.clone(),
            projects: catalog
                .projects
                .iter()
                .map(|p| ProjectContext {
                    name: p.name.clone(),
                    description: p.detail_description().to_string(),
                    tags: p.tags.clone(),
                    language: p.language.clone(),
                    github_url: p.github_url.clone(),
                    live_url: p.live_url.clone(),
                })
                .collect(),
            stats: catalog
                .stats
                .iter()
                .map(|s| StatContext {
                    label: s.label.clone(),
                    value: s.value.clone(),
                })
                .collect(),
            socials: catalog
                .socials
                .iter()
                .map(|s| SocialContext {
                    name: s.name.clone(),
                    url: s.url.clone(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn persona_prompt(name: &str) -> String {
    format!(
        "You are the portfolio assistant for {name}. Be friendly, concise, and accurate.\n\
         \n\
         - Answer from the Portfolio Context below first; do not invent projects, skills, or links.\n\
         - For a project, summarize its description, list its tags and language, and offer its \
           GitHub and live demo links when present.\n\
         - For contact questions, use the socials listed in the context.\n\
         - Use web search only for questions the context cannot answer, say when you do, and cite \
           your sources.\n\
         - Use Markdown: bold project and technology names, bullet lists for stacks."
    )
}

/// System instruction for a conversation about `catalog`.
pub fn system_instruction(catalog: &Catalog) -> serde_json::Result<String> {
    let context = PortfolioContext::from_catalog(catalog).to_json()?;
    Ok(format!(
        "{}\n\n**Portfolio Context:**\n{}",
        persona_prompt(&catalog.profile.name),
        context
    ))
}

/// Conversation starters derived from the catalog.
pub fn initial_suggestions(catalog: &Catalog) -> Vec<String> {
    let mut suggestions = Vec::new();
    if let Some(first) = catalog.projects.first() {
        suggestions.push(format!("Tell me about '{}'", first.name));
    }
    if let Some(tag) = catalog.projects.iter().flat_map(|p| p.tags.first()).next() {
        suggestions.push(format!("List projects tagged '{}'", tag));
    }
    suggestions.push(format!("What are {}'s skills?", catalog.profile.name));
    suggestions.push("How can I get in touch?".to_string());
    suggestions
}

/// Keep the first source for each URI, in arrival order.
pub fn dedupe_sources(sources: Vec<GroundingSource>) -> Vec<GroundingSource> {
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .filter(|s| seen.insert(s.uri.clone()))
        .collect()
}

/// Folds a streamed model reply into one message.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    content: String,
    sources: Vec<GroundingSource>,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text chunk; returns the content so far.
    pub fn push_text(&mut self, chunk: &str) -> &str {
        self.content.push_str(chunk);
        &self.content
    }

    /// Record citations from a chunk, skipping ones without a URI or title.
    pub fn push_sources<I>(&mut self, sources: I)
    where
        I: IntoIterator<Item = GroundingSource>,
    {
        self.sources.extend(
            sources
                .into_iter()
                .filter(|s| !s.uri.is_empty() && !s.title.is_empty()),
        );
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn finish(self) -> ChatMessage {
        ChatMessage {
            role: ChatRole::Model,
            content: self.content,
            sources: dedupe_sources(self.sources),
        }
    }
}
