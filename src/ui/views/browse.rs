use crate::catalog::client::CatalogClient;
use crate::catalog::types::ProjectViewModel;
use crate::filters::FilterCategory;
use crate::session::{BrowseSession, ListingState};
use crate::ui::components::{FilterPicker, FilterPickerEvent, KeyResult, PickerContents};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{palette_color, truncate};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::ProjectDetailView;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Root view: active filter chips above the project list
pub struct ProjectBrowserView {
  session: BrowseSession<CatalogClient>,
  list_state: ListState,
  picker: FilterPicker,
}

impl ProjectBrowserView {
  /// Takes a session that has already been started
  pub fn new(session: BrowseSession<CatalogClient>) -> Self {
    Self {
      session,
      list_state: ListState::default(),
      picker: FilterPicker::new(),
    }
  }

  fn projects(&self) -> &[ProjectViewModel] {
    self.session.projects()
  }

  fn render_chips(&self, frame: &mut Frame, area: Rect) {
    let chips = self.session.active_filters();
    let line = if chips.is_empty() {
      Line::from(vec![
        Span::styled(" No filters", Style::default().fg(Color::DarkGray)),
        Span::styled("  <f>", Style::default().fg(Color::Cyan)),
        Span::styled(" add one", Style::default().fg(Color::DarkGray)),
      ])
    } else {
      let mut spans = vec![Span::raw(" ")];
      for (category, value) in &chips {
        spans.push(Span::styled(
          format!(" {}: {} ", chip_prefix(*category), value),
          Style::default().fg(Color::Black).bg(Color::Cyan),
        ));
        spans.push(Span::raw(" "));
      }
      spans.push(Span::styled("<x>", Style::default().fg(Color::Cyan)));
      spans.push(Span::styled(" clear all", Style::default().fg(Color::DarkGray)));
      Line::from(spans)
    };
    frame.render_widget(Paragraph::new(line), area);
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.projects().len();
    ensure_valid_selection(&mut self.list_state, len);

    let title = if self.session.is_loading() {
      " Projects (loading...) ".to_string()
    } else if let Some(e) = self.session.error() {
      format!(" Projects (error: {}) ", e)
    } else {
      format!(" Projects ({}) ", len)
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if len == 0 {
      let (content, color) = match self.session.listing_state() {
        ListingState::Failed => (
          format!(
            "Failed to load projects: {}\n\nPress 'r' to retry.",
            self.session.error().unwrap_or("unknown error")
          ),
          Color::Red,
        ),
        ListingState::Empty if self.session.active_filter_count() > 0 => (
          "No projects found.\n\nTry removing some filters.".to_string(),
          Color::DarkGray,
        ),
        ListingState::Empty => ("No projects found.".to_string(), Color::DarkGray),
        ListingState::Loading | ListingState::Ready => {
          ("Loading projects...".to_string(), Color::DarkGray)
        }
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(color));
      frame.render_widget(paragraph, area);
      return;
    }

    let width = area.width.saturating_sub(6) as usize;

    // Collect items first to avoid borrow conflicts with list_state
    let items: Vec<ListItem> = self
      .projects()
      .iter()
      .map(|project| project_item(project, width))
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }

  fn render_picker(&mut self, frame: &mut Frame, area: Rect) {
    let category = self.picker.category();
    let session = &self.session;
    let options = session.options(category);
    let selected = |value: &str| session.is_selected(category, value);
    let contents = PickerContents {
      options: &options,
      selected: &selected,
      loading: category == FilterCategory::Ecosystem && session.is_loading_ecosystems(),
    };
    self.picker.render_overlay(frame, area, contents);
  }

  // Key handling helpers for or_else chain pattern
  fn handle_overlays(&mut self, key: KeyEvent) -> Option<ViewAction> {
    let result = {
      let options = self.session.options(self.picker.category());
      self.picker.handle_key(key, &options)
    };

    if !result.is_consumed() {
      return None;
    }
    match result {
      KeyResult::Event(FilterPickerEvent::Toggled(category, value)) => {
        self.session.toggle_filter(category, &value);
      }
      KeyResult::Event(FilterPickerEvent::SearchChanged(category, text)) => {
        self.session.set_search_term(category, &text);
      }
      _ => {}
    }
    Some(ViewAction::None)
  }

  fn handle_navigation(&mut self, key: KeyEvent) -> Option<ViewAction> {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.list_state.select_next();
        Some(ViewAction::None)
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.list_state.select_previous();
        Some(ViewAction::None)
      }
      KeyCode::Char('g') | KeyCode::Home => {
        self.list_state.select_first();
        Some(ViewAction::None)
      }
      KeyCode::Char('G') | KeyCode::End => {
        self.list_state.select_last();
        Some(ViewAction::None)
      }
      _ => None,
    }
  }

  fn handle_actions(&mut self, key: KeyEvent) -> Option<ViewAction> {
    match key.code {
      KeyCode::Char('f') | KeyCode::Char('/') => {
        self.picker.show();
        Some(ViewAction::None)
      }
      KeyCode::Char('x') => {
        self.session.clear_all_filters();
        Some(ViewAction::None)
      }
      KeyCode::Backspace => {
        self.session.clear_last_filter();
        Some(ViewAction::None)
      }
      KeyCode::Char('r') => {
        self.session.reload();
        Some(ViewAction::None)
      }
      KeyCode::Enter => {
        let project = self
          .list_state
          .selected()
          .and_then(|idx| self.projects().get(idx))?;
        Some(ViewAction::Push(Box::new(ProjectDetailView::new(
          project.clone(),
        ))))
      }
      KeyCode::Char('q') | KeyCode::Esc => Some(ViewAction::Pop),
      _ => None,
    }
  }
}

impl View for ProjectBrowserView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    self
      .handle_overlays(key)
      .or_else(|| self.handle_navigation(key))
      .or_else(|| self.handle_actions(key))
      .unwrap_or(ViewAction::None)
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Filter chips
        Constraint::Min(1),    // Project list
      ])
      .split(area);

    self.render_chips(frame, chunks[0]);
    self.render_list(frame, chunks[1]);
    self.render_picker(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    match self.session.current_query() {
      Some(query) if !query.is_empty() => format!("Projects [{}]", query.describe()),
      _ => "Projects".to_string(),
    }
  }

  fn active_filter_count(&self) -> usize {
    self.session.active_filter_count()
  }

  fn tick(&mut self) {
    self.session.tick();
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    if self.picker.is_active() {
      return vec![
        ShortcutInfo::new("tab", "category").with_priority(10),
        ShortcutInfo::new("space", "toggle").with_priority(20),
        ShortcutInfo::new("esc", "close").with_priority(90),
      ];
    }
    vec![
      ShortcutInfo::new("f", "filter").with_priority(10),
      ShortcutInfo::new("x", "clear").with_priority(20),
      ShortcutInfo::new("r", "reload").with_priority(30),
      ShortcutInfo::new("enter", "details").with_priority(40),
      ShortcutInfo::new("q", "quit").with_priority(90),
    ]
  }
}

fn chip_prefix(category: FilterCategory) -> &'static str {
  match category {
    FilterCategory::Language => "lang",
    FilterCategory::Ecosystem => "eco",
    FilterCategory::Category => "cat",
    FilterCategory::Tag => "tag",
  }
}

/// Three-line list row: name and counters, description, tags
fn project_item(project: &ProjectViewModel, width: usize) -> ListItem<'static> {
  let dim = Style::default().fg(Color::DarkGray);
  let stats = Line::from(vec![
    Span::styled(
      project.name.clone(),
      Style::default()
        .fg(palette_color(&project.color_class))
        .add_modifier(Modifier::BOLD),
    ),
    Span::raw("  "),
    Span::styled(format!("★ {}", project.stars_display), Style::default().fg(Color::Yellow)),
    Span::styled(format!("  forks {}", project.forks_display), dim),
    Span::styled(format!("  contributors {}", project.contributors), dim),
    Span::styled(format!("  issues {}", project.open_issues), dim),
    Span::styled(format!("  PRs {}", project.prs), dim),
  ]);

  let description = Line::from(Span::raw(format!(
    "  {}",
    truncate(&project.description, width)
  )));

  let tags = if project.tags.is_empty() {
    Line::from(Span::styled("  no tags", dim))
  } else {
    let joined = project
      .tags
      .iter()
      .map(|t| format!("#{}", t))
      .collect::<Vec<_>>()
      .join(" ");
    Line::from(Span::styled(
      format!("  {}", truncate(&joined, width)),
      Style::default().fg(Color::Cyan),
    ))
  };

  ListItem::new(vec![stats, description, tags])
}

#[cfg(test)]
mod tests {
  use super::*;

  fn project(tags: &[&str]) -> ProjectViewModel {
    ProjectViewModel {
      id: "1".to_string(),
      name: "toolkit".to_string(),
      icon: "https://github.com/acme.png?size=40".to_string(),
      stars_display: "2.5K".to_string(),
      forks_display: "12".to_string(),
      contributors: 3,
      open_issues: 4,
      prs: 1,
      description: "Project repository".to_string(),
      tags: tags.iter().map(|t| t.to_string()).collect(),
      color_class: "from-blue-500 to-cyan-500".to_string(),
    }
  }

  #[test]
  fn test_project_item_has_three_lines() {
    assert_eq!(project_item(&project(&[]), 40).height(), 3);
    assert_eq!(project_item(&project(&["cli", "async"]), 40).height(), 3);
  }

  #[test]
  fn test_chip_prefixes_are_distinct() {
    let mut prefixes: Vec<_> = FilterCategory::ALL.iter().map(|c| chip_prefix(*c)).collect();
    prefixes.dedup();
    assert_eq!(prefixes.len(), 4);
  }
}
