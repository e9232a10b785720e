/// Display-ready project, produced by `normalize::normalize_projects`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectViewModel {
  pub id: String,
  pub name: String,
  pub icon: String,
  pub stars_display: String,
  pub forks_display: String,
  pub contributors: u64,
  pub open_issues: u64,
  pub prs: u64,
  /// Already truncated to one short line
  pub description: String,
  pub tags: Vec<String>,
  pub color_class: String,
}

/// Ecosystem available as a filter option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcosystemOption {
  pub name: String,
}
