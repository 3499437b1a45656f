use crate::provider::DemoProvider;
use crate::query::Query;
use crate::records::Demo;
use crate::ui::components::KeyResult;
use crate::ui::theme::Palette;
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::record_actions::{ActionOutcome, RecordActions};
use crate::ui::{draw_error, draw_placeholder};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

/// One demo, fetched by id
pub struct DemoDetailView {
  id: i64,
  query: Query<Option<Demo>>,
  actions: RecordActions<Demo>,
  deleted: bool,
}

impl DemoDetailView {
  pub fn new(id: i64, provider: DemoProvider) -> Self {
    let mut query = Query::new(provider.item_source(id));
    query.fetch();

    Self {
      id,
      query,
      actions: RecordActions::new(provider),
      deleted: false,
    }
  }

  fn demo(&self) -> Option<Demo> {
    self.query.snapshot().data.flatten()
  }
}

impl View for DemoDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if self.actions.handle_key(key) != KeyResult::NotHandled {
      return ViewAction::None;
    }

    match key.code {
      KeyCode::Char('r') => self.query.refetch(),
      KeyCode::Char('e') => {
        if let Some(demo) = self.demo() {
          self.actions.begin_rename(&demo);
        }
      }
      KeyCode::Char('d') => {
        if let Some(demo) = self.demo() {
          self.actions.begin_delete(&demo);
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, palette: &Palette) {
    let snapshot = self.query.snapshot();
    let title = if snapshot.is_fetching {
      format!(" Demo #{} (loading...) ", self.id)
    } else {
      format!(" Demo #{} ", self.id)
    };
    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(palette.border));

    match (&snapshot.data, &snapshot.error) {
      (Some(Some(demo)), error) => {
        let mut lines = vec![
          Line::from(Span::styled(demo.name.as_str(), palette.text_style().bold())),
          Line::raw(""),
          Line::from(vec![
            Span::styled("Date    ", palette.muted_style()),
            Span::styled(demo.display_date(), palette.accent_style()),
          ]),
          Line::from(vec![
            Span::styled("ISO     ", palette.muted_style()),
            Span::styled(demo.date.to_string(), palette.muted_style()),
          ]),
        ];
        if let Some(error) = error {
          lines.push(Line::raw(""));
          lines.push(Line::styled(
            format!("Refresh failed: {}", error),
            Style::default().fg(palette.error),
          ));
        }
        frame.render_widget(Paragraph::new(lines).block(block), area);
      }
      (Some(None), _) => draw_placeholder(frame, area, block, "Demo not found", palette),
      (None, Some(error)) => draw_error(frame, area, block, error, palette),
      (None, None) => draw_placeholder(frame, area, block, "Loading...", palette),
    }

    self.actions.render_overlays(frame, area, palette);
  }

  fn breadcrumb_label(&self) -> String {
    match self.demo() {
      Some(demo) => demo.name,
      None => format!("Demo {}", self.id),
    }
  }

  fn section(&self) -> &'static str {
    "Demos"
  }

  fn is_capturing_input(&self) -> bool {
    self.actions.is_active()
  }

  fn status(&self) -> Option<&str> {
    self.actions.status()
  }

  fn tick(&mut self) {
    if let Some(ActionOutcome::Deleted(_)) = self.actions.tick() {
      self.deleted = true;
    }
    self.query.poll();
  }

  fn is_finished(&self) -> bool {
    self.deleted
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("q", "back").with_priority(10),
      ShortcutInfo::new("e", "rename").with_priority(40),
      ShortcutInfo::new("d", "delete").with_priority(41),
      ShortcutInfo::new("r", "refresh").with_priority(50),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::provider::ResourceProvider;
  use crate::service::{ResourceService, SimulatedNetwork};
  use chrono::NaiveDate;
  use crossterm::event::KeyModifiers;
  use std::time::Duration;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn provider() -> DemoProvider {
    let demos = vec![Demo {
      id: 7,
      name: "Kickoff".to_string(),
      date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
    }];
    ResourceProvider::new(
      ResourceService::new(demos, SimulatedNetwork::instant()),
      Duration::from_secs(30),
    )
  }

  #[tokio::test(start_paused = true)]
  async fn test_loads_by_id() {
    let mut view = DemoDetailView::new(7, provider());
    assert_eq!(view.breadcrumb_label(), "Demo 7");

    tokio::time::sleep(Duration::from_millis(10)).await;
    view.tick();
    assert_eq!(view.breadcrumb_label(), "Kickoff");
  }

  #[tokio::test(start_paused = true)]
  async fn test_unknown_id_is_not_found() {
    let mut view = DemoDetailView::new(99, provider());
    tokio::time::sleep(Duration::from_millis(10)).await;
    view.tick();

    let snapshot = view.query.snapshot();
    assert!(snapshot.is_success());
    assert_eq!(snapshot.data, Some(None));
  }

  #[tokio::test(start_paused = true)]
  async fn test_delete_finishes_view() {
    let provider = provider();
    let mut view = DemoDetailView::new(7, provider.clone());
    tokio::time::sleep(Duration::from_millis(10)).await;
    view.tick();

    view.handle_key(key(KeyCode::Char('d')));
    assert!(view.is_capturing_input());
    view.handle_key(key(KeyCode::Char('y')));
    tokio::time::sleep(Duration::from_millis(10)).await;
    view.tick();

    assert!(view.is_finished());
    assert_eq!(view.status(), Some("Deleted \"Kickoff\""));
    assert!(provider.records().await.unwrap().is_empty());
  }
}
