mod app;
mod catalog;
mod config;
mod event;
mod filters;
mod logging;
mod query;
mod session;
mod ui;

use catalog::client::CatalogClient;
use catalog::types::ProjectViewModel;
use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use filters::FilterCategory;
use session::{BrowseSession, ListingState};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "pcat")]
#[command(about = "A terminal UI for browsing an open-source project catalog")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/pcat/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Catalog API base URL, overrides the config file
  #[arg(long)]
  api_url: Option<String>,

  /// Preselect a language filter (repeatable)
  #[arg(short, long)]
  language: Vec<String>,

  /// Preselect an ecosystem filter (repeatable)
  #[arg(short, long)]
  ecosystem: Vec<String>,

  /// Preselect a category filter (repeatable)
  #[arg(long)]
  category: Vec<String>,

  /// Preselect a tag filter (repeatable)
  #[arg(short, long)]
  tag: Vec<String>,

  /// Fetch once, print the project list and exit
  #[arg(short, long)]
  print: bool,
}

impl Args {
  fn preselected(&self) -> Vec<(FilterCategory, &str)> {
    let groups = [
      (FilterCategory::Language, &self.language),
      (FilterCategory::Ecosystem, &self.ecosystem),
      (FilterCategory::Category, &self.category),
      (FilterCategory::Tag, &self.tag),
    ];
    groups
      .into_iter()
      .flat_map(|(category, values)| values.iter().map(move |v| (category, v.as_str())))
      .collect()
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let config = config::Config::load(args.config.as_deref(), args.api_url.clone())?;
  let log_dir = logging::init_logging(&config.log_level)?;
  info!(log_dir = %log_dir.display(), api = %config.api.url, "starting pcat");

  let client = CatalogClient::new(&config)?;
  let title = config
    .title
    .clone()
    .unwrap_or_else(|| client.host().to_string());

  let mut session = BrowseSession::new(client, config.filters.clone(), config.cache_ttl());
  for (category, value) in args.preselected() {
    session.preselect(category, value);
  }
  session.start();

  if args.print {
    session.settle().await;
    return print_projects(&session);
  }

  let mut app = app::App::new(title, session);
  app.run().await?;

  Ok(())
}

/// Write the settled listing to stdout, one block per project
fn print_projects(session: &BrowseSession<CatalogClient>) -> Result<()> {
  match session.listing_state() {
    ListingState::Failed => {
      return Err(eyre!(
        "Failed to load projects: {}",
        session.error().unwrap_or("unknown error")
      ))
    }
    ListingState::Empty | ListingState::Loading => {
      println!("No projects found.");
      return Ok(());
    }
    ListingState::Ready => {}
  }

  for project in session.projects() {
    println!("{}", print_line(project));
  }
  Ok(())
}

fn print_line(project: &ProjectViewModel) -> String {
  let mut line = format!(
    "{}  ★ {}  forks {}  contributors {}  issues {}  PRs {}\n  {}",
    project.name,
    project.stars_display,
    project.forks_display,
    project.contributors,
    project.open_issues,
    project.prs,
    project.description,
  );
  if !project.tags.is_empty() {
    line.push_str("\n  ");
    line.push_str(&project.tags.iter().map(|t| format!("#{}", t)).collect::<Vec<_>>().join(" "));
  }
  line
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_repeatable_filter_flags() {
    let args = Args::parse_from([
      "pcat",
      "--api-url",
      "http://localhost:8080/api",
      "-l",
      "Rust",
      "--language",
      "Go",
      "--tag",
      "Bug",
      "--print",
    ]);
    assert!(args.print);
    assert_eq!(args.api_url.as_deref(), Some("http://localhost:8080/api"));
    assert_eq!(
      args.preselected(),
      vec![
        (FilterCategory::Language, "Rust"),
        (FilterCategory::Language, "Go"),
        (FilterCategory::Tag, "Bug"),
      ]
    );
  }

  #[test]
  fn test_print_line() {
    let project = ProjectViewModel {
      id: "1".to_string(),
      name: "cargo".to_string(),
      icon: "https://github.com/rust-lang.png?size=40".to_string(),
      stars_display: "12.3K".to_string(),
      forks_display: "2.1K".to_string(),
      contributors: 900,
      open_issues: 1200,
      prs: 80,
      description: "The Rust package manager".to_string(),
      tags: vec!["cli".to_string(), "build".to_string()],
      color_class: "from-blue-500 to-cyan-500".to_string(),
    };
    assert_eq!(
      print_line(&project),
      "cargo  ★ 12.3K  forks 2.1K  contributors 900  issues 1200  PRs 80\n  \
       The Rust package manager\n  #cli #build"
    );
  }
}
