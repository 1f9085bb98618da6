//! The static catalog: the hand-authored fallback dataset.
//!
//! [`default_catalog`] returns the built-in table. A TOML file with the same
//! shape can replace it via `[catalog].path`; see [`load_catalog`]. Either
//! way the catalog is handed to the aggregator as an explicit value.
//!
//! ```toml
//! [profile]
//! name = "Ada"
//! bio = "Builds things."
//!
//! [[projects]]
//! name = "engine"
//! description = "Difference engine simulator"
//! tags = ["Rust"]
//! github_url = "https://github.com/ada/engine"
//! ```

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::path::Path;

use crate::config::Config;
use crate::models::{Catalog, Profile, Project, SocialLink, Stat, StatKind};

/// Resolve the catalog for a run: the configured file, or the built-in table.
pub fn resolve_catalog(config: &Config) -> Result<Catalog> {
    match &config.catalog.path {
        Some(path) => load_catalog(path),
        None => Ok(default_catalog()),
    }
}

/// Read and validate a catalog file.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;

    let catalog: Catalog = toml::from_str(&content)
        .with_context(|| format!("Failed to parse catalog file: {}", path.display()))?;

    validate_catalog(&catalog)?;

    Ok(catalog)
}

/// Check the fields every consumer relies on.
pub fn validate_catalog(catalog: &Catalog) -> Result<()> {
    if catalog.profile.name.trim().is_empty() {
        bail!("profile.name must not be empty");
    }

    let mut seen = HashSet::new();
    for (i, project) in catalog.projects.iter().enumerate() {
        if project.name.trim().is_empty() {
            bail!("projects[{}].name must not be empty", i);
        }
        if project.description.trim().is_empty() {
            bail!("project '{}' has an empty description", project.name);
        }
        if project.github_url.trim().is_empty() {
            bail!("project '{}' has an empty github_url", project.name);
        }
        if !seen.insert(project.name.as_str()) {
            bail!("duplicate project name: '{}'", project.name);
        }
    }

    for stat in &catalog.stats {
        if stat.label.trim().is_empty() {
            bail!("stat labels must not be empty");
        }
    }

    Ok(())
}

fn ts(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn tags(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

fn stat(icon: &str, value: &str, label: &str, url: Option<&str>, kind: StatKind) -> Stat {
    Stat {
        label: label.to_string(),
        value: value.to_string(),
        url: url.map(str::to_string),
        icon: Some(icon.to_string()),
        kind: Some(kind),
    }
}

#[allow(clippy::too_many_arguments)]
fn project(
    name: &str,
    description: &str,
    tag_list: &[&str],
    repo: &str,
    live_url: Option<&str>,
    stars: u64,
    forks: u64,
    language: &str,
    updated_at: &str,
) -> Project {
    Project {
        name: name.to_string(),
        description: description.to_string(),
        long_description: None,
        tags: tags(tag_list),
        github_url: format!("https://github.com/girishlade111/{}", repo),
        live_url: live_url.map(str::to_string),
        stars: Some(stars),
        forks: Some(forks),
        language: Some(language.to_string()),
        updated_at: ts(updated_at),
    }
}

fn social(name: &str, url: &str, icon: &str) -> SocialLink {
    SocialLink {
        name: name.to_string(),
        url: url.to_string(),
        icon: Some(icon.to_string()),
    }
}

/// The built-in catalog.
pub fn default_catalog() -> Catalog {
    let profile = Profile {
        name: "Girish Balaso Lade".to_string(),
        bio: "UX/UI Designer & Developer obsessed with building stuff people actually use... for free."
            .to_string(),
        roles: tags(&[
            "UX/UI Designer",
            "AI Agent Builder",
            "Open Source Developer",
            "Startup Founder",
        ]),
        about: "Developer, designer, and AI enthusiast creating open-source tools and modern web \
                experiences, mixing creativity with code."
            .to_string(),
        avatar_url: Some("https://github.com/girishlade111.png".to_string()),
    };

    let stats = vec![
        stat(
            "star",
            "588",
            "Stars Earned",
            Some("https://github.com/girishlade111?tab=stars"),
            StatKind::Stars,
        ),
        stat(
            "git-commit",
            "3.8K+",
            "Total Commits (Last Year)",
            None,
            StatKind::Commits,
        ),
        stat("git-pull-request", "16", "PRs", None, StatKind::PullRequests),
        stat("alert-circle", "42", "Issues", None, StatKind::Issues),
        stat(
            "git-branch",
            "614",
            "Repositories",
            Some("https://github.com/girishlade111?tab=repositories"),
            StatKind::Repositories,
        ),
        stat(
            "github",
            "3,183+",
            "Contributions",
            None,
            StatKind::Contributions,
        ),
    ];

    let projects = vec![
        project(
            "AetherCanvas AI",
            "AetherCanvas: AI Image Generation Studio (Ideogram Style)",
            &["TypeScript", "Next.js", "AI"],
            "AetherCanvas",
            None,
            29,
            4,
            "TypeScript",
            "2024-07-20T10:00:00Z",
        ),
        project(
            "Synergy-Flow",
            "An open-source project management tool designed for agile development workflows.",
            &["React", "Node.js", "MongoDB"],
            "Synergy-Flow",
            None,
            26,
            2,
            "JavaScript",
            "2024-06-15T10:00:00Z",
        ),
        project(
            "GB-Coder Public Beta",
            "A coding playground and educational platform for learning web development.",
            &["Vue.js", "Firebase", "TypeScript"],
            "GB-Coder-Public-Beta",
            None,
            1,
            0,
            "Vue",
            "2023-01-10T10:00:00Z",
        ),
        project(
            "Lade-Studio",
            "A digital agency website showcasing modern design and animation techniques.",
            &["Gatsby", "Framer Motion", "Contentful"],
            "Lade-Studio",
            Some("https://ladestudio.vercel.app/"),
            5,
            0,
            "JavaScript",
            "2023-05-22T10:00:00Z",
        ),
        project(
            "Lade Notion",
            "A Notion Clone built with Next.js 14, Supabase, and Tailwind CSS.",
            &["Next.js", "Supabase", "TypeScript", "Tailwind CSS"],
            "Lade-Notion",
            Some("https://lade-notion.vercel.app/"),
            47,
            7,
            "TypeScript",
            "2024-07-18T10:00:00Z",
        ),
        project(
            "Lade Auth",
            "Advanced Authentication with Next.js 14 using Auth.js, Server Actions, and more.",
            &["Next.js", "Auth.js", "TypeScript", "Zod"],
            "Lade-Auth",
            None,
            19,
            1,
            "TypeScript",
            "2024-07-01T10:00:00Z",
        ),
    ];

    let socials = vec![
        social("GitHub", "https://github.com/girishlade111", "github"),
        social(
            "LinkedIn",
            "https://www.linkedin.com/in/girish-lade-075bba201/",
            "linkedin",
        ),
        social(
            "Instagram",
            "https://www.instagram.com/girish_lade_/",
            "instagram",
        ),
        social(
            "CodePen",
            "https://codepen.io/Girish-Lade-the-looper",
            "code",
        ),
        social("Email", "mailto:girish@ladestack.in", "mail"),
    ];

    Catalog {
        profile,
        projects,
        stats,
        socials,
    }
}
