//! Projection of a filter selection onto the backend's query parameters.

use crate::filters::{FilterCategory, FilterSelection};

/// Query parameters accepted by the "list projects" endpoint.
///
/// The backend takes a single language, ecosystem and category even though
/// the browser lets users pick several. Only the first selected value of
/// those three is sent; tags are sent as a comma-separated list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProjectQuery {
  pub language: Option<String>,
  pub ecosystem: Option<String>,
  pub category: Option<String>,
  pub tags: Option<String>,
}

impl ProjectQuery {
  pub fn compose(selection: &FilterSelection) -> Self {
    let first = |category| selection.values(category).first().cloned();
    let tags = selection.values(FilterCategory::Tag);

    Self {
      language: first(FilterCategory::Language),
      ecosystem: first(FilterCategory::Ecosystem),
      category: first(FilterCategory::Category),
      tags: if tags.is_empty() {
        None
      } else {
        Some(tags.join(","))
      },
    }
  }

  /// Present parameters as (name, value) pairs, in a fixed order
  pub fn to_pairs(&self) -> Vec<(&'static str, &str)> {
    [
      ("language", &self.language),
      ("ecosystem", &self.ecosystem),
      ("category", &self.category),
      ("tags", &self.tags),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
    .collect()
  }

  pub fn is_empty(&self) -> bool {
    self.to_pairs().is_empty()
  }

  /// Human-readable form for logs and status lines
  pub fn describe(&self) -> String {
    if self.is_empty() {
      return "all projects".to_string();
    }
    self
      .to_pairs()
      .iter()
      .map(|(name, value)| format!("{}={}", name, value))
      .collect::<Vec<_>>()
      .join(" ")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn select(pairs: &[(FilterCategory, &str)]) -> FilterSelection {
    pairs
      .iter()
      .fold(FilterSelection::new(), |sel, (c, v)| sel.toggled(*c, v))
  }

  #[test]
  fn test_language_takes_first_value_only() {
    let query = ProjectQuery::compose(&select(&[
      (FilterCategory::Language, "Go"),
      (FilterCategory::Language, "Rust"),
    ]));
    assert_eq!(query.language.as_deref(), Some("Go"));
  }

  #[test]
  fn test_tags_joined_in_selection_order() {
    let query = ProjectQuery::compose(&select(&[
      (FilterCategory::Tag, "Bug"),
      (FilterCategory::Tag, "Help wanted"),
    ]));
    assert_eq!(query.tags.as_deref(), Some("Bug,Help wanted"));
  }

  #[test]
  fn test_empty_categories_are_absent() {
    let query = ProjectQuery::compose(&select(&[(FilterCategory::Category, "DevOps")]));
    assert_eq!(
      query,
      ProjectQuery {
        category: Some("DevOps".to_string()),
        ..Default::default()
      }
    );
    assert_eq!(query.to_pairs(), vec![("category", "DevOps")]);
  }

  #[test]
  fn test_empty_selection() {
    let query = ProjectQuery::compose(&FilterSelection::new());
    assert!(query.is_empty());
    assert_eq!(query.describe(), "all projects");
  }

  #[test]
  fn test_compose_is_deterministic() {
    let selection = select(&[
      (FilterCategory::Ecosystem, "Stellar"),
      (FilterCategory::Tag, "Bug"),
    ]);
    assert_eq!(
      ProjectQuery::compose(&selection),
      ProjectQuery::compose(&selection)
    );
    assert_eq!(
      ProjectQuery::compose(&selection).describe(),
      "ecosystem=Stellar tags=Bug"
    );
  }
}
