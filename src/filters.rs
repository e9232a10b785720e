//! Filter selection state for the project browser.

use std::fmt;
use std::str::FromStr;

/// The fixed set of filter categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterCategory {
  Language,
  Ecosystem,
  Category,
  Tag,
}

impl FilterCategory {
  /// All categories in display order
  pub const ALL: [FilterCategory; 4] = [
    FilterCategory::Language,
    FilterCategory::Ecosystem,
    FilterCategory::Category,
    FilterCategory::Tag,
  ];

  pub fn label(&self) -> &'static str {
    match self {
      FilterCategory::Language => "Languages",
      FilterCategory::Ecosystem => "Ecosystems",
      FilterCategory::Category => "Categories",
      FilterCategory::Tag => "Tags",
    }
  }

  /// Position in [`FilterCategory::ALL`]
  pub fn index(self) -> usize {
    match self {
      FilterCategory::Language => 0,
      FilterCategory::Ecosystem => 1,
      FilterCategory::Category => 2,
      FilterCategory::Tag => 3,
    }
  }

  /// Next category, wrapping around
  pub fn next(self) -> Self {
    Self::ALL[(self.index() + 1) % Self::ALL.len()]
  }

  /// Previous category, wrapping around
  pub fn prev(self) -> Self {
    Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
  }
}

impl fmt::Display for FilterCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

impl FromStr for FilterCategory {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "language" | "languages" => Ok(FilterCategory::Language),
      "ecosystem" | "ecosystems" => Ok(FilterCategory::Ecosystem),
      "category" | "categories" => Ok(FilterCategory::Category),
      "tag" | "tags" => Ok(FilterCategory::Tag),
      other => Err(format!("unknown filter category: {}", other)),
    }
  }
}

/// Selected values per category, in insertion order. Values are unique
/// within a category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
  values: [Vec<String>; 4],
}

impl FilterSelection {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn values(&self, category: FilterCategory) -> &[String] {
    &self.values[category.index()]
  }

  pub fn contains(&self, category: FilterCategory, value: &str) -> bool {
    self.values(category).iter().any(|v| v == value)
  }

  /// New selection with `value` removed if present, appended otherwise
  pub fn toggled(&self, category: FilterCategory, value: &str) -> Self {
    if self.contains(category, value) {
      self.without(category, value)
    } else {
      let mut next = self.clone();
      next.values[category.index()].push(value.to_string());
      next
    }
  }

  /// New selection with `value` removed from `category`
  pub fn without(&self, category: FilterCategory, value: &str) -> Self {
    let mut next = self.clone();
    next.values[category.index()].retain(|v| v != value);
    next
  }

  pub fn is_empty(&self) -> bool {
    self.values.iter().all(Vec::is_empty)
  }

  pub fn active_count(&self) -> usize {
    self.values.iter().map(Vec::len).sum()
  }

  /// Every selected (category, value) pair in display order
  pub fn iter(&self) -> impl Iterator<Item = (FilterCategory, &str)> {
    FilterCategory::ALL.into_iter().flat_map(move |category| {
      self
        .values(category)
        .iter()
        .map(move |v| (category, v.as_str()))
    })
  }
}

/// Per-category free text narrowing the option lists. Never sent to the
/// backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerms {
  terms: [String; 4],
}

impl SearchTerms {
  pub fn get(&self, category: FilterCategory) -> &str {
    &self.terms[category.index()]
  }

  pub fn set(&mut self, category: FilterCategory, text: &str) {
    self.terms[category.index()] = text.to_string();
  }

  /// Case-insensitive substring match; empty text matches everything
  pub fn matches(&self, category: FilterCategory, option: &str) -> bool {
    let term = self.get(category).to_lowercase();
    option.to_lowercase().contains(&term)
  }
}

/// Filter choices plus search text for one browsing session.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
  selection: FilterSelection,
  search: SearchTerms,
}

impl FilterState {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn selection(&self) -> &FilterSelection {
    &self.selection
  }

  pub fn toggle(&mut self, category: FilterCategory, value: &str) {
    self.selection = self.selection.toggled(category, value);
  }

  pub fn clear(&mut self, category: FilterCategory, value: &str) {
    if self.selection.contains(category, value) {
      self.selection = self.selection.without(category, value);
    }
  }

  pub fn clear_all(&mut self) {
    self.selection = FilterSelection::new();
  }

  pub fn active_count(&self) -> usize {
    self.selection.active_count()
  }

  pub fn set_search_term(&mut self, category: FilterCategory, text: &str) {
    self.search.set(category, text);
  }

  /// Options whose name matches the category's search text
  pub fn filtered_options<'a>(
    &self,
    category: FilterCategory,
    options: &'a [String],
  ) -> Vec<&'a str> {
    options
      .iter()
      .filter(|o| self.search.matches(category, o))
      .map(String::as_str)
      .collect()
  }

  /// The chip shown last, i.e. the one "remove last" takes away
  pub fn last_active(&self) -> Option<(FilterCategory, String)> {
    self
      .selection
      .iter()
      .last()
      .map(|(c, v)| (c, v.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_toggle_appends_then_removes() {
    let mut state = FilterState::new();
    state.toggle(FilterCategory::Language, "Go");
    state.toggle(FilterCategory::Language, "Rust");
    assert_eq!(
      state.selection().values(FilterCategory::Language),
      &["Go".to_string(), "Rust".to_string()]
    );

    state.toggle(FilterCategory::Language, "Go");
    assert_eq!(
      state.selection().values(FilterCategory::Language),
      &["Rust".to_string()]
    );
  }

  #[test]
  fn test_toggled_leaves_original_untouched() {
    let before = FilterSelection::new().toggled(FilterCategory::Tag, "Bug");
    let after = before.toggled(FilterCategory::Tag, "Feature");

    assert_eq!(before.values(FilterCategory::Tag).len(), 1);
    assert_eq!(after.values(FilterCategory::Tag).len(), 2);
    assert_ne!(before, after);
  }

  #[test]
  fn test_clear_missing_value_is_noop() {
    let mut state = FilterState::new();
    state.toggle(FilterCategory::Category, "DevOps");
    let before = state.selection().clone();

    state.clear(FilterCategory::Category, "Mobile");
    assert_eq!(state.selection(), &before);

    state.clear(FilterCategory::Category, "DevOps");
    assert!(state.selection().is_empty());
  }

  #[test]
  fn test_clear_all_and_active_count() {
    let mut state = FilterState::new();
    state.toggle(FilterCategory::Language, "Go");
    state.toggle(FilterCategory::Tag, "Bug");
    state.toggle(FilterCategory::Tag, "Help wanted");
    assert_eq!(state.active_count(), 3);

    state.clear_all();
    assert_eq!(state.active_count(), 0);
    assert!(state.selection().is_empty());
  }

  #[test]
  fn test_iter_follows_display_order() {
    let selection = FilterSelection::new()
      .toggled(FilterCategory::Tag, "Bug")
      .toggled(FilterCategory::Language, "Rust")
      .toggled(FilterCategory::Tag, "Feature");

    let pairs: Vec<_> = selection.iter().collect();
    assert_eq!(
      pairs,
      vec![
        (FilterCategory::Language, "Rust"),
        (FilterCategory::Tag, "Bug"),
        (FilterCategory::Tag, "Feature"),
      ]
    );
  }

  #[test]
  fn test_last_active() {
    let mut state = FilterState::new();
    assert_eq!(state.last_active(), None);

    state.toggle(FilterCategory::Ecosystem, "Stellar");
    state.toggle(FilterCategory::Language, "Go");
    assert_eq!(
      state.last_active(),
      Some((FilterCategory::Ecosystem, "Stellar".to_string()))
    );
  }

  #[test]
  fn test_filtered_options_case_insensitive() {
    let options: Vec<String> = ["TypeScript", "JavaScript", "Python", "Go"]
      .iter()
      .map(|s| s.to_string())
      .collect();
    let mut state = FilterState::new();

    assert_eq!(
      state.filtered_options(FilterCategory::Language, &options).len(),
      4
    );

    state.set_search_term(FilterCategory::Language, "SCRIPT");
    assert_eq!(
      state.filtered_options(FilterCategory::Language, &options),
      vec!["TypeScript", "JavaScript"]
    );

    // Search text is per category
    assert_eq!(
      state.filtered_options(FilterCategory::Tag, &options).len(),
      4
    );
  }

  #[test]
  fn test_category_parse_and_cycle() {
    assert_eq!("tags".parse::<FilterCategory>(), Ok(FilterCategory::Tag));
    assert_eq!(
      "Language".parse::<FilterCategory>(),
      Ok(FilterCategory::Language)
    );
    assert!("colour".parse::<FilterCategory>().is_err());

    assert_eq!(FilterCategory::Tag.next(), FilterCategory::Language);
    assert_eq!(FilterCategory::Language.prev(), FilterCategory::Tag);
  }
}
