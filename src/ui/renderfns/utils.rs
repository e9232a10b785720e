use ratatui::prelude::Color;

/// Truncate to at most `max_chars` characters, ending in "..." when cut
pub fn truncate(s: &str, max_chars: usize) -> String {
  if s.chars().count() <= max_chars {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Terminal color for a project's gradient class, taken from its
/// starting stop (`from-<hue>-<shade>`)
pub fn palette_color(color_class: &str) -> Color {
  let mut stop = color_class
    .split_whitespace()
    .next()
    .and_then(|s| s.strip_prefix("from-"))
    .unwrap_or("")
    .split('-');

  match (stop.next(), stop.next()) {
    (Some("blue"), _) => Color::Blue,
    (Some("cyan"), _) => Color::Cyan,
    (Some("purple"), _) => Color::Magenta,
    (Some("red"), _) => Color::Red,
    (Some("orange"), _) => Color::LightRed,
    (Some("gray"), _) => Color::Gray,
    (Some("green"), Some("500")) => Color::LightGreen,
    (Some("green"), _) => Color::Green,
    _ => Color::White,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::normalize::PALETTE;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_counts_chars() {
    assert_eq!(truncate("añoañoaño", 6), "año...");
  }

  #[test]
  fn test_every_palette_entry_has_a_color() {
    for class in PALETTE {
      assert_ne!(palette_color(class), Color::White, "{}", class);
    }
  }

  #[test]
  fn test_shade_distinguishes_greens() {
    assert_eq!(palette_color("from-green-500 to-emerald-500"), Color::LightGreen);
    assert_eq!(palette_color("from-green-600 to-green-800"), Color::Green);
  }

  #[test]
  fn test_unknown_class_is_white() {
    assert_eq!(palette_color("bg-gray-500"), Color::White);
    assert_eq!(palette_color("from-teal-500 to-lime-500"), Color::White);
    assert_eq!(palette_color(""), Color::White);
  }
}
