use crate::catalog::types::ProjectViewModel;
use crate::ui::renderfns::palette_color;
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Read-only view of one project from the list
pub struct ProjectDetailView {
  project: ProjectViewModel,
}

impl ProjectDetailView {
  pub fn new(project: ProjectViewModel) -> Self {
    Self { project }
  }

  fn field<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
      Span::styled(format!("{:<14}", label), Style::default().fg(Color::DarkGray)),
      Span::raw(value),
    ])
  }

  fn render_detail(&self, frame: &mut Frame, area: Rect) {
    let project = &self.project;
    let block = Block::default()
      .title(format!(" {} ", project.name))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(palette_color(&project.color_class)));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(8), // Stats
        Constraint::Length(1), // Separator
        Constraint::Min(1),    // Description and tags
      ])
      .split(inner);

    let stats = vec![
      Self::field("Id", project.id.clone()),
      Self::field("Stars", project.stars_display.clone()),
      Self::field("Forks", project.forks_display.clone()),
      Self::field("Contributors", project.contributors.to_string()),
      Self::field("Open issues", project.open_issues.to_string()),
      Self::field("Pull requests", project.prs.to_string()),
      Self::field("Avatar", project.icon.clone()),
    ];
    frame.render_widget(Paragraph::new(stats), chunks[0]);

    let sep = Paragraph::new("─".repeat(chunks[1].width as usize))
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, chunks[1]);

    let mut body = vec![Line::from(project.description.as_str()), Line::default()];
    if project.tags.is_empty() {
      body.push(Line::from(Span::styled(
        "No tags",
        Style::default().fg(Color::DarkGray),
      )));
    } else {
      let tags: Vec<Span> = project
        .tags
        .iter()
        .flat_map(|tag| {
          [
            Span::styled(format!(" {} ", tag), Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" "),
          ]
        })
        .collect();
      body.push(Line::from(tags));
    }

    let body_para = Paragraph::new(body).wrap(Wrap { trim: true });
    frame.render_widget(body_para, chunks[2]);
  }
}

impl View for ProjectDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => ViewAction::Pop,
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_detail(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    self.project.name.clone()
  }
}
