//! Mapping from raw catalog payloads to display-ready view models.
//!
//! Normalization is best-effort: a payload of the wrong shape yields an empty
//! list and a record that fails validation is dropped, both with a log line
//! rather than an error.

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use super::api_types::{extract_list, PayloadShape, RawEcosystemRecord, RawProjectRecord};
use super::types::{EcosystemOption, ProjectViewModel};

/// Envelope field the project list is expected under
pub const PROJECTS_FIELD: &str = "projects";

/// Envelope field the ecosystem list is expected under
pub const ECOSYSTEMS_FIELD: &str = "ecosystems";

/// Longest description shown before truncation
pub const MAX_DESCRIPTION_LEN: usize = 80;

/// Card gradients, picked by a hash of the project name
pub const PALETTE: [&str; 8] = [
  "from-blue-500 to-cyan-500",
  "from-purple-500 to-pink-500",
  "from-green-500 to-emerald-500",
  "from-red-500 to-pink-500",
  "from-orange-500 to-red-500",
  "from-gray-600 to-gray-800",
  "from-green-600 to-green-800",
  "from-cyan-500 to-blue-600",
];

/// Normalize a "list projects" response into view models.
pub fn normalize_projects(payload: &Value) -> Vec<ProjectViewModel> {
  let items = recover_list(payload, PROJECTS_FIELD);

  let projects: Vec<ProjectViewModel> = items
    .iter()
    .filter_map(RawProjectRecord::decode)
    .filter_map(|record| to_view_model(&record))
    .collect();

  if projects.len() < items.len() {
    debug!(
      dropped = items.len() - projects.len(),
      kept = projects.len(),
      "dropped invalid project records"
    );
  }
  projects
}

/// Normalize a "list ecosystems" response, keeping active ecosystems only.
pub fn normalize_ecosystems(payload: &Value) -> Vec<EcosystemOption> {
  recover_list(payload, ECOSYSTEMS_FIELD)
    .iter()
    .filter_map(RawEcosystemRecord::decode)
    .filter(RawEcosystemRecord::is_active)
    .filter_map(|record| record.name)
    .map(|name| EcosystemOption { name })
    .collect()
}

fn recover_list<'a>(payload: &'a Value, field: &str) -> &'a [Value] {
  let (items, shape) = extract_list(payload, field);
  match &shape {
    PayloadShape::BareArray | PayloadShape::Envelope => {
      debug!(?shape, count = items.len(), field, "decoded payload");
    }
    PayloadShape::ScannedField(key) => {
      warn!(expected = field, found = %key, "list not under expected field, using first array field");
    }
    PayloadShape::Unrecognized => {
      warn!(expected = field, kind = json_kind(payload), "unrecognized payload shape");
    }
  }
  items
}

fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "bool",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}

/// Build a view model, or `None` if the record has no usable repo name
fn to_view_model(record: &RawProjectRecord) -> Option<ProjectViewModel> {
  let (owner, repo) = record.repo_parts()?;

  let description = truncate_description(record.description.as_deref()).unwrap_or_else(|| {
    fallback_description(record.language.as_deref(), record.category.as_deref())
  });

  Some(ProjectViewModel {
    id: record.id_text().unwrap_or_else(synthesize_id),
    name: repo.to_string(),
    icon: project_icon(owner),
    stars_display: format_number(record.stars_count.unwrap_or(0)),
    forks_display: format_number(record.forks_count.unwrap_or(0)),
    contributors: record.contributors_count.unwrap_or(0),
    open_issues: record.open_issues_count.unwrap_or(0),
    prs: record.open_prs_count.unwrap_or(0),
    description,
    tags: record.tag_list(),
    color_class: project_color(repo).to_string(),
  })
}

fn synthesize_id() -> String {
  format!(
    "project-{}-{}",
    Utc::now().timestamp_millis(),
    Uuid::new_v4().simple()
  )
}

/// 999 -> "999", 1500 -> "1.5K", 2_300_000 -> "2.3M"
pub fn format_number(n: u64) -> String {
  if n >= 1_000_000 {
    scaled(n, 1_000_000, 'M')
  } else if n >= 1_000 {
    scaled(n, 1_000, 'K')
  } else {
    n.to_string()
  }
}

/// One decimal of `n / unit`, with a tie going to the larger value.
///
/// The quotient is only an exact binary tie when its fraction is .25 or
/// .75; every other quotient is off-tie as a float and formats the same
/// either way.
fn scaled(n: u64, unit: u64, suffix: char) -> String {
  if n % (unit / 2) == unit / 4 {
    let step = unit / 10;
    let tenths = (n + step / 2) / step;
    format!("{}.{}{}", tenths / 10, tenths % 10, suffix)
  } else {
    format!("{:.1}{}", n as f64 / unit as f64, suffix)
  }
}

/// Avatar of the repository owner
pub fn project_icon(owner: &str) -> String {
  format!("https://github.com/{}.png?size=40", owner)
}

/// Palette entry chosen by the sum of the name's UTF-16 code units
pub fn project_color(name: &str) -> &'static str {
  let hash: u64 = name.encode_utf16().map(u64::from).sum();
  PALETTE[(hash % PALETTE.len() as u64) as usize]
}

/// First line of the description, cut to `MAX_DESCRIPTION_LEN` characters.
///
/// Returns `None` when there is nothing to show, so the caller can fall back.
pub fn truncate_description(description: Option<&str>) -> Option<String> {
  let description = description?;
  if description.trim().is_empty() {
    return None;
  }

  let first_line = description.split('\n').next().unwrap_or_default().trim();
  if first_line.is_empty() {
    return None;
  }

  if first_line.chars().count() > MAX_DESCRIPTION_LEN {
    let cut: String = first_line.chars().take(MAX_DESCRIPTION_LEN).collect();
    Some(format!("{}...", cut.trim_end()))
  } else {
    Some(first_line.to_string())
  }
}

/// "Rust repository - DevOps", or "Project repository" with nothing known
pub fn fallback_description(language: Option<&str>, category: Option<&str>) -> String {
  let language = language.filter(|l| !l.is_empty()).unwrap_or("Project");
  match category.filter(|c| !c.is_empty()) {
    Some(category) => format!("{} repository - {}", language, category),
    None => format!("{} repository", language),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_format_number() {
    assert_eq!(format_number(0), "0");
    assert_eq!(format_number(999), "999");
    assert_eq!(format_number(1000), "1.0K");
    assert_eq!(format_number(1500), "1.5K");
    assert_eq!(format_number(2_300_000), "2.3M");
  }

  #[test]
  fn test_format_number_rounds_halves_up() {
    assert_eq!(format_number(1250), "1.3K");
    assert_eq!(format_number(2250), "2.3K");
    assert_eq!(format_number(1_250_000), "1.3M");
    assert_eq!(format_number(3750), "3.8K");
    assert_eq!(format_number(1150), "1.1K");
    assert_eq!(format_number(1249), "1.2K");
  }

  #[test]
  fn test_truncate_long_single_line() {
    let text = "a".repeat(85);
    let truncated = truncate_description(Some(&text)).expect("non-empty");
    assert_eq!(truncated, format!("{}...", "a".repeat(80)));
  }

  #[test]
  fn test_truncate_keeps_first_line_only() {
    let text = "  Fast HTTP toolkit  \nSecond line with more detail";
    assert_eq!(
      truncate_description(Some(text)),
      Some("Fast HTTP toolkit".to_string())
    );
  }

  #[test]
  fn test_truncate_counts_characters_not_bytes() {
    let text = "é".repeat(80);
    assert_eq!(truncate_description(Some(&text)), Some(text.clone()));
  }

  #[test]
  fn test_truncate_blank_falls_through() {
    assert_eq!(truncate_description(None), None);
    assert_eq!(truncate_description(Some("   \n  ")), None);
  }

  #[test]
  fn test_fallback_description() {
    assert_eq!(fallback_description(None, None), "Project repository");
    assert_eq!(
      fallback_description(Some("Rust"), Some("DevOps")),
      "Rust repository - DevOps"
    );
    assert_eq!(
      fallback_description(Some(""), Some("Mobile")),
      "Project repository - Mobile"
    );
  }

  #[test]
  fn test_project_color_is_deterministic() {
    assert_eq!(project_color("toolkit"), project_color("toolkit"));
    // "ab" = 97 + 98 = 195, 195 % 8 = 3
    assert_eq!(project_color("ab"), PALETTE[3]);
    assert_eq!(project_color(""), PALETTE[0]);
  }

  #[test]
  fn test_malformed_payloads_yield_empty() {
    assert!(normalize_projects(&json!(null)).is_empty());
    assert!(normalize_projects(&json!({})).is_empty());
    assert!(normalize_projects(&json!({ "projects": "not-an-array" })).is_empty());
  }

  #[test]
  fn test_scenario_project_without_description() {
    let payload = json!({
      "projects": [{
        "id": "1",
        "github_full_name": "acme/toolkit",
        "stars_count": 2500,
        "description": ""
      }]
    });

    let projects = normalize_projects(&payload);
    assert_eq!(projects.len(), 1);

    let project = &projects[0];
    assert_eq!(project.id, "1");
    assert_eq!(project.name, "toolkit");
    assert_eq!(project.icon, "https://github.com/acme.png?size=40");
    assert_eq!(project.stars_display, "2.5K");
    assert_eq!(project.forks_display, "0");
    assert_eq!(project.description, "Project repository");
    assert!(project.tags.is_empty());
    assert_eq!(project.color_class, project_color("toolkit"));
  }

  #[test]
  fn test_invalid_records_are_dropped() {
    let payload = json!([
      { "id": "1", "github_full_name": "acme/toolkit" },
      { "id": "2" },
      "acme/string-record",
      null,
      { "id": "3", "github_full_name": "no-separator" },
      { "id": "4", "github_full_name": "rust-lang/cargo", "tags": ["build", 7, "rust"] }
    ]);

    let projects = normalize_projects(&payload);
    let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["toolkit", "cargo"]);
    assert_eq!(projects[1].tags, vec!["build".to_string(), "rust".to_string()]);
  }

  #[test]
  fn test_missing_id_is_synthesized() {
    let projects = normalize_projects(&json!([
      { "github_full_name": "acme/one" },
      { "github_full_name": "acme/two" }
    ]));

    assert_eq!(projects.len(), 2);
    assert!(projects[0].id.starts_with("project-"));
    assert_ne!(projects[0].id, projects[1].id);
  }

  #[test]
  fn test_counts_default_to_zero() {
    let projects = normalize_projects(&json!([{
      "github_full_name": "acme/toolkit",
      "contributors_count": 12,
      "open_prs_count": null
    }]));

    assert_eq!(projects[0].contributors, 12);
    assert_eq!(projects[0].open_issues, 0);
    assert_eq!(projects[0].prs, 0);
  }

  #[test]
  fn test_normalize_ecosystems_keeps_active() {
    let payload = json!({
      "ecosystems": [
        { "name": "Stellar", "status": "active" },
        { "name": "Legacy", "status": "archived" },
        { "status": "active" },
        { "name": "Polkadot", "status": "active" }
      ]
    });

    let names: Vec<String> = normalize_ecosystems(&payload)
      .into_iter()
      .map(|e| e.name)
      .collect();
    assert_eq!(names, vec!["Stellar", "Polkadot"]);
  }

  #[test]
  fn test_normalize_ecosystems_scans_envelope() {
    let payload = json!({ "count": 1, "items": [{ "name": "Stellar", "status": "active" }] });
    assert_eq!(normalize_ecosystems(&payload).len(), 1);
    assert!(normalize_ecosystems(&json!("oops")).is_empty());
  }
}
