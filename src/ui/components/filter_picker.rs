use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::filters::FilterCategory;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs};

/// Events emitted by the filter picker that the parent view applies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPickerEvent {
  /// Option under the cursor was toggled
  Toggled(FilterCategory, String),
  /// Search text for a category changed
  SearchChanged(FilterCategory, String),
  /// Picker closed
  Closed,
}

/// What the picker needs from its owner to draw one category
pub struct PickerContents<'a> {
  pub options: &'a [&'a str],
  pub selected: &'a dyn Fn(&str) -> bool,
  pub loading: bool,
}

/// Overlay for choosing filter values, one tab per category.
///
/// Typing narrows the current tab's options; the owner keeps the search
/// terms and the selection, the picker only tracks focus and the cursor.
#[derive(Debug, Clone)]
pub struct FilterPicker {
  active: bool,
  category: FilterCategory,
  inputs: [TextInput; 4],
  cursor: usize,
}

impl Default for FilterPicker {
  fn default() -> Self {
    Self {
      active: false,
      category: FilterCategory::Language,
      inputs: Default::default(),
      cursor: 0,
    }
  }
}

impl FilterPicker {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn category(&self) -> FilterCategory {
    self.category
  }

  pub fn show(&mut self) {
    self.active = true;
    self.cursor = 0;
  }

  pub fn hide(&mut self) {
    self.active = false;
  }

  fn input(&self) -> &TextInput {
    &self.inputs[self.category.index()]
  }

  fn input_mut(&mut self) -> &mut TextInput {
    &mut self.inputs[self.category.index()]
  }

  /// Handle a key while the picker is open. `options` is the narrowed
  /// option list currently shown for the active category.
  pub fn handle_key(&mut self, key: KeyEvent, options: &[&str]) -> KeyResult<FilterPickerEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc => {
        self.hide();
        KeyResult::Event(FilterPickerEvent::Closed)
      }
      KeyCode::Tab => {
        self.category = self.category.next();
        self.cursor = 0;
        KeyResult::Handled
      }
      KeyCode::BackTab => {
        self.category = self.category.prev();
        self.cursor = 0;
        KeyResult::Handled
      }
      KeyCode::Down => {
        if !options.is_empty() {
          self.cursor = (self.cursor + 1) % options.len();
        }
        KeyResult::Handled
      }
      KeyCode::Up => {
        if !options.is_empty() {
          self.cursor = if self.cursor == 0 {
            options.len() - 1
          } else {
            self.cursor - 1
          };
        }
        KeyResult::Handled
      }
      KeyCode::Enter | KeyCode::Char(' ') => match options.get(self.cursor) {
        Some(value) => KeyResult::Event(FilterPickerEvent::Toggled(
          self.category,
          value.to_string(),
        )),
        None => KeyResult::Handled,
      },
      _ => match self.input_mut().handle_key(key) {
        InputResult::Edited => {
          self.cursor = 0;
          KeyResult::Event(FilterPickerEvent::SearchChanged(
            self.category,
            self.input().value(),
          ))
        }
        InputResult::Moved | InputResult::NotHandled => KeyResult::Handled,
      },
    }
  }

  /// Render the picker overlay if active
  pub fn render_overlay(&mut self, frame: &mut Frame, area: Rect, contents: PickerContents) {
    if !self.active {
      return;
    }

    let width = (area.width / 5 * 3).clamp(30.min(area.width), 60.min(area.width));
    let height = (contents.options.len() as u16 + 6)
      .max(8)
      .min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Filters ");
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height < 3 {
      return;
    }

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Category tabs
        Constraint::Length(1), // Search line
        Constraint::Min(1),    // Options
      ])
      .split(inner);

    let tabs = Tabs::new(FilterCategory::ALL.iter().map(|c| c.label()))
      .select(self.category.index())
      .style(Style::default().fg(Color::DarkGray))
      .highlight_style(Style::default().fg(Color::Yellow).bold());
    frame.render_widget(tabs, chunks[0]);

    let (before, after) = self.input().split_at_cursor();
    let search = Line::from(vec![
      Span::styled("/", Style::default().fg(Color::Yellow)),
      Span::raw(before),
      Span::styled("_", Style::default().fg(Color::Yellow)),
      Span::raw(after),
    ]);
    frame.render_widget(Paragraph::new(search), chunks[1]);

    if contents.options.is_empty() {
      let message = if contents.loading {
        "Loading..."
      } else if self.input().is_empty() {
        "No options available"
      } else {
        "No matches"
      };
      let paragraph = Paragraph::new(message).style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, chunks[2]);
      return;
    }

    self.cursor = self.cursor.min(contents.options.len() - 1);

    let items: Vec<ListItem> = contents
      .options
      .iter()
      .map(|option| {
        let (mark, style) = if (contents.selected)(*option) {
          ("[x] ", Style::default().fg(Color::Green))
        } else {
          ("[ ] ", Style::default().fg(Color::White))
        };
        ListItem::new(Line::from(vec![
          Span::styled(mark, style),
          Span::styled(option.to_string(), style),
        ]))
      })
      .collect();

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));
    let mut state = ListState::default();
    state.select(Some(self.cursor));
    frame.render_stateful_widget(list, chunks[2], &mut state);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  const LANGS: [&str; 3] = ["TypeScript", "Python", "Rust"];

  #[test]
  fn test_inactive_picker_ignores_keys() {
    let mut picker = FilterPicker::new();
    assert_eq!(
      picker.handle_key(key(KeyCode::Char('a')), &LANGS),
      KeyResult::NotHandled
    );
  }

  #[test]
  fn test_toggle_option_under_cursor() {
    let mut picker = FilterPicker::new();
    picker.show();
    picker.handle_key(key(KeyCode::Down), &LANGS);
    picker.handle_key(key(KeyCode::Down), &LANGS);
    assert_eq!(
      picker.handle_key(key(KeyCode::Char(' ')), &LANGS),
      KeyResult::Event(FilterPickerEvent::Toggled(
        FilterCategory::Language,
        "Rust".to_string()
      ))
    );
  }

  #[test]
  fn test_cursor_wraps_upward() {
    let mut picker = FilterPicker::new();
    picker.show();
    picker.handle_key(key(KeyCode::Up), &LANGS);
    assert_eq!(
      picker.handle_key(key(KeyCode::Enter), &LANGS),
      KeyResult::Event(FilterPickerEvent::Toggled(
        FilterCategory::Language,
        "Rust".to_string()
      ))
    );
  }

  #[test]
  fn test_typing_emits_search_for_current_category() {
    let mut picker = FilterPicker::new();
    picker.show();
    picker.handle_key(key(KeyCode::Tab), &[]);
    assert_eq!(picker.category(), FilterCategory::Ecosystem);
    picker.handle_key(key(KeyCode::Char('k')), &[]);
    assert_eq!(
      picker.handle_key(key(KeyCode::Char('8')), &[]),
      KeyResult::Event(FilterPickerEvent::SearchChanged(
        FilterCategory::Ecosystem,
        "k8".to_string()
      ))
    );
  }

  #[test]
  fn test_search_text_is_kept_per_category() {
    let mut picker = FilterPicker::new();
    picker.show();
    picker.handle_key(key(KeyCode::Char('p')), &LANGS);
    picker.handle_key(key(KeyCode::BackTab), &[]);
    assert_eq!(picker.category(), FilterCategory::Tag);
    assert!(picker.input().is_empty());
    picker.handle_key(key(KeyCode::Tab), &[]);
    assert_eq!(picker.input().value(), "p");
  }

  #[test]
  fn test_toggle_with_no_options_is_noop() {
    let mut picker = FilterPicker::new();
    picker.show();
    assert_eq!(
      picker.handle_key(key(KeyCode::Enter), &[]),
      KeyResult::Handled
    );
  }

  #[test]
  fn test_renders_on_very_wide_terminal() {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    let mut terminal = Terminal::new(TestBackend::new(2000, 30)).expect("test terminal");
    let mut picker = FilterPicker::new();
    picker.show();

    let selected = |value: &str| value == "Rust";
    terminal
      .draw(|frame| {
        let contents = PickerContents {
          options: &LANGS,
          selected: &selected,
          loading: false,
        };
        picker.render_overlay(frame, frame.area(), contents);
      })
      .expect("draw");

    let rendered: String = terminal
      .backend()
      .buffer()
      .content()
      .iter()
      .map(|cell| cell.symbol())
      .collect();
    assert!(rendered.contains("[x] Rust"));
  }

  #[test]
  fn test_escape_closes() {
    let mut picker = FilterPicker::new();
    picker.show();
    assert_eq!(
      picker.handle_key(key(KeyCode::Esc), &LANGS),
      KeyResult::Event(FilterPickerEvent::Closed)
    );
    assert!(!picker.is_active());
  }
}
