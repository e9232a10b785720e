//! One browsing session: filter state, the project cache and the wiring
//! between them.
//!
//! Every filter change recomposes the backend query. When the composed query
//! differs from the previous one the cached list is expired first, so the
//! single cache entry always belongs to the current selection.

use std::time::Duration;
use tracing::{error, info};

use crate::catalog::normalize::{normalize_ecosystems, normalize_projects};
use crate::catalog::params::ProjectQuery;
use crate::catalog::types::{EcosystemOption, ProjectViewModel};
use crate::catalog::CatalogSource;
use crate::config::FilterOptionsConfig;
use crate::filters::{FilterCategory, FilterState};
use crate::query::{CachedQuery, FetchOutcome};

/// The ecosystem list changes rarely; keep it for the whole session
const ECOSYSTEM_TTL: Duration = Duration::from_secs(60 * 60);

/// What the project list area should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingState {
  /// Nothing to show yet, a fetch is running
  Loading,
  /// Latest fetch failed; `projects()` may still hold older data
  Failed,
  /// Latest fetch succeeded with no results
  Empty,
  /// Projects are available (possibly refreshing in the background)
  Ready,
}

pub struct BrowseSession<S: CatalogSource> {
  source: S,
  filters: FilterState,
  options: FilterOptionsConfig,
  projects: CachedQuery<Vec<ProjectViewModel>>,
  ecosystems: CachedQuery<Vec<EcosystemOption>>,
  ecosystem_names: Vec<String>,
  last_query: Option<ProjectQuery>,
}

impl<S: CatalogSource> BrowseSession<S> {
  pub fn new(source: S, options: FilterOptionsConfig, ttl: Duration) -> Self {
    Self {
      source,
      filters: FilterState::new(),
      options,
      projects: CachedQuery::new(ttl),
      ecosystems: CachedQuery::new(ECOSYSTEM_TTL),
      ecosystem_names: Vec::new(),
      last_query: None,
    }
  }

  /// Kick off the initial ecosystem and project fetches
  pub fn start(&mut self) {
    self.load_ecosystems();
    self.refresh();
  }

  pub fn load_ecosystems(&mut self) {
    let source = self.source.clone();
    self.ecosystems.fetch(move || {
      let request = source.list_ecosystems();
      async move {
        request
          .await
          .map(|payload| normalize_ecosystems(&payload))
          .map_err(|e| e.to_string())
      }
    });
  }

  /// Fetch projects for the current selection, from cache when fresh
  pub fn refresh(&mut self) -> FetchOutcome {
    let query = ProjectQuery::compose(self.filters.selection());
    if self.last_query.as_ref() != Some(&query) {
      self.projects.invalidate();
      self.last_query = Some(query.clone());
    }

    let source = self.source.clone();
    let description = query.describe();
    let outcome = self.projects.fetch(move || {
      let request = source.list_projects(&query);
      async move {
        request
          .await
          .map(|payload| normalize_projects(&payload))
          .map_err(|e| e.to_string())
      }
    });

    if let FetchOutcome::Started(token) = outcome {
      info!(?token, query = %description, "fetching projects");
    }
    outcome
  }

  /// Explicit re-fetch, ignoring the cache
  pub fn reload(&mut self) -> FetchOutcome {
    self.projects.invalidate();
    self.refresh()
  }

  pub fn toggle_filter(&mut self, category: FilterCategory, value: &str) {
    self.filters.toggle(category, value);
    self.refresh();
  }

  pub fn clear_filter(&mut self, category: FilterCategory, value: &str) {
    if self.filters.selection().contains(category, value) {
      self.filters.clear(category, value);
      self.refresh();
    }
  }

  pub fn clear_all_filters(&mut self) {
    if self.filters.active_count() > 0 {
      self.filters.clear_all();
      self.refresh();
    }
  }

  /// Remove the most recently shown chip, if any
  pub fn clear_last_filter(&mut self) {
    if let Some((category, value)) = self.filters.last_active() {
      self.clear_filter(category, &value);
    }
  }

  pub fn set_search_term(&mut self, category: FilterCategory, text: &str) {
    self.filters.set_search_term(category, text);
  }

  /// Select a value without fetching, for filters given before `start`
  pub fn preselect(&mut self, category: FilterCategory, value: &str) {
    if !self.filters.selection().contains(category, value) {
      self.filters.toggle(category, value);
    }
  }

  /// Apply finished fetches. Returns `true` if anything visible changed.
  pub fn tick(&mut self) -> bool {
    let ecosystems_changed = self.ecosystems.poll();
    if ecosystems_changed {
      self.sync_ecosystems();
    }
    let projects_changed = self.projects.poll();
    ecosystems_changed || projects_changed
  }

  /// Wait for every outstanding fetch to land
  pub async fn settle(&mut self) {
    self.ecosystems.settle().await;
    self.sync_ecosystems();
    self.projects.settle().await;
  }

  fn sync_ecosystems(&mut self) {
    if let Some(e) = self.ecosystems.error() {
      error!(error = %e, "failed to fetch ecosystems");
    }
    self.ecosystem_names = self
      .ecosystems
      .data()
      .map(|list| list.iter().map(|e| e.name.clone()).collect())
      .unwrap_or_default();
  }

  // Read-only state for the view layer

  pub fn projects(&self) -> &[ProjectViewModel] {
    self.projects.data().map(|v| v.as_slice()).unwrap_or(&[])
  }

  pub fn is_loading(&self) -> bool {
    self.projects.is_loading()
  }

  pub fn error(&self) -> Option<&str> {
    self.projects.error()
  }

  pub fn listing_state(&self) -> ListingState {
    let has_data = self.projects.data().is_some();
    if self.projects.is_error() {
      ListingState::Failed
    } else if !has_data {
      ListingState::Loading
    } else if self.projects().is_empty() {
      if self.is_loading() {
        ListingState::Loading
      } else {
        ListingState::Empty
      }
    } else {
      ListingState::Ready
    }
  }

  pub fn filters(&self) -> &FilterState {
    &self.filters
  }

  pub fn active_filter_count(&self) -> usize {
    self.filters.active_count()
  }

  pub fn active_filters(&self) -> Vec<(FilterCategory, String)> {
    self
      .filters
      .selection()
      .iter()
      .map(|(c, v)| (c, v.to_string()))
      .collect()
  }

  pub fn is_selected(&self, category: FilterCategory, value: &str) -> bool {
    self.filters.selection().contains(category, value)
  }

  /// Options for a category, narrowed by its search text
  pub fn options(&self, category: FilterCategory) -> Vec<&str> {
    let all = match category {
      FilterCategory::Language => &self.options.languages,
      FilterCategory::Ecosystem => &self.ecosystem_names,
      FilterCategory::Category => &self.options.categories,
      FilterCategory::Tag => &self.options.tags,
    };
    self.filters.filtered_options(category, all)
  }

  pub fn is_loading_ecosystems(&self) -> bool {
    self.ecosystems.is_loading()
  }

  /// Composed query currently shown, for the status line
  pub fn current_query(&self) -> Option<&ProjectQuery> {
    self.last_query.as_ref()
  }
}
