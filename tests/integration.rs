use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn folio_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("folio");
    path
}

/// Config pointing at a small custom catalog. The API base is unroutable so
/// nothing here can reach the network by accident.
fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    fs::write(
        config_dir.join("catalog.toml"),
        r#"[profile]
name = "Ada Lovelace"
bio = "Writes programs for engines that do not exist yet."
roles = ["Analyst"]

[[projects]]
name = "Loom-Flow"
description = "Pattern cards for the Jacquard loom."
tags = ["React", "TypeScript"]
github_url = "https://github.com/ada/loom-flow"
language = "TypeScript"

[[projects]]
name = "Engine Notes"
description = "Annotated translation of the Menabrea paper."
tags = ["Vue", "TypeScript"]
github_url = "https://github.com/ada/engine-notes"

[[projects]]
name = "Bernoulli"
description = "Computes Bernoulli numbers on the analytical engine."
tags = ["Assembly"]
github_url = "https://github.com/ada/bernoulli"
language = "Fortran"

[[stats]]
label = "Repositories"
value = "3"
kind = "repositories"

[[socials]]
name = "GitHub"
url = "https://github.com/ada"
"#,
    )
    .unwrap();

    let config_content = format!(
        r#"[github]
user = "ada"
api_base = "http://127.0.0.1:9"

[catalog]
path = "{}/config/catalog.toml"

[server]
bind = "127.0.0.1:7341"
"#,
        root.display()
    );

    let config_path = config_dir.join("folio.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_folio(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = folio_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run folio binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_catalog_prints_json() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_folio(&config_path, &["catalog"]);
    assert!(success, "catalog failed: stdout={}, stderr={}", stdout, stderr);

    let catalog: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(catalog["profile"]["name"], "Ada Lovelace");
    assert_eq!(catalog["projects"].as_array().unwrap().len(), 3);
}

#[test]
fn test_missing_config_uses_builtin_catalog() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("absent.toml");

    let (stdout, stderr, success) = run_folio(&config_path, &["catalog"]);
    assert!(success, "catalog failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Synergy-Flow"));
    assert!(stdout.contains("Girish Balaso Lade"));
}

#[test]
fn test_facets_all_first_then_sorted() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_folio(&config_path, &["facets"]);
    assert!(success);

    let facets: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        facets,
        vec!["All", "Assembly", "Fortran", "React", "TypeScript", "Vue"]
    );
}

#[test]
fn test_search_is_case_insensitive() {
    let (_tmp, config_path) = setup_test_env();

    let (lower, _, success) = run_folio(&config_path, &["search", "flow", "--json"]);
    assert!(success);
    let (upper, _, success) = run_folio(&config_path, &["search", "FLOW", "--json"]);
    assert!(success);

    assert_eq!(lower, upper);
    let hits: serde_json::Value = serde_json::from_str(&lower).unwrap();
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "Loom-Flow");
}

#[test]
fn test_search_facet_matches_language_or_tag() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_folio(
        &config_path,
        &["search", "--facet", "TypeScript", "--json"],
    );
    assert!(success);

    let hits: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let names: Vec<&str> = hits
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Loom-Flow", "Engine Notes"]);
}

#[test]
fn test_search_no_results() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_folio(&config_path, &["search", "xyzzy"]);
    assert!(success);
    assert!(stdout.contains("No projects."));
}

#[test]
fn test_related_projects() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_folio(&config_path, &["related", "Loom-Flow"]);
    assert!(success, "related failed: stderr={}", stderr);
    assert!(stdout.contains("Engine Notes"));
    assert!(!stdout.contains("Bernoulli"));
}

#[test]
fn test_related_unknown_project_fails() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_folio(&config_path, &["related", "Nope"]);
    assert!(!success);
    assert!(stderr.contains("project not found"));
}

#[test]
fn test_context_json() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_folio(&config_path, &["context", "--json"]);
    assert!(success);

    let context: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(context["name"], "Ada Lovelace");
    assert_eq!(context["projects"][0]["githubUrl"], "https://github.com/ada/loom-flow");
}

#[test]
fn test_context_instruction() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_folio(&config_path, &["context"]);
    assert!(success);
    assert!(stdout.starts_with("You are the portfolio assistant for Ada Lovelace"));
    assert!(stdout.contains("Tell me about 'Loom-Flow'"));
}

#[test]
fn test_static_stats() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_folio(&config_path, &["stats"]);
    assert!(success);
    assert!(stdout.contains("Repositories"));
    assert!(stdout.contains('3'));
}

#[test]
fn test_enrich_unreachable_api_falls_back() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_folio(&config_path, &["enrich", "--json"]);
    assert!(success, "enrich failed: stderr={}", stderr);

    let enrichment: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(enrichment["projects"].as_array().unwrap().len(), 3);
    assert_eq!(enrichment["failures"].as_array().unwrap().len(), 3);
    assert_eq!(enrichment["projects"][2]["language"], "Fortran");
}

#[test]
fn test_invalid_config_fails() {
    let (tmp, _) = setup_test_env();
    let bad = tmp.path().join("bad.toml");
    fs::write(&bad, "[github]\ncommits_per_project = 0\n").unwrap();

    let (_, stderr, success) = run_folio(&bad, &["catalog"]);
    assert!(!success);
    assert!(stderr.contains("commits_per_project"));
}

#[test]
fn test_invalid_catalog_fails() {
    let (tmp, config_path) = setup_test_env();
    fs::write(
        tmp.path().join("config/catalog.toml"),
        "[profile]\nname = \"\"\nbio = \"\"\n",
    )
    .unwrap();

    let (_, stderr, success) = run_folio(&config_path, &["catalog"]);
    assert!(!success);
    assert!(stderr.contains("profile.name"));
}
