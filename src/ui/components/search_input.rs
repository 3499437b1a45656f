use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::ui::renderfns::overlay_area;
use crate::ui::theme::Palette;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Events emitted by search input that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
  /// Query changed (on each keystroke, empty string on cancel)
  Changed(String),
  /// Overlay closed, filter persists
  Submitted,
}

/// `/` search box. The filter stays applied after the overlay closes.
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
  input: TextInput,
  active: bool,
}

impl SearchInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Current filter text
  pub fn query(&self) -> &str {
    self.input.value()
  }

  pub fn activate(&mut self) {
    self.active = true;
    self.input.clear();
  }

  /// Handle a key event. Call this regardless of active state, it handles
  /// activation too.
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<SearchEvent> {
    if !self.active {
      if key.code == KeyCode::Char('/') {
        self.activate();
        return KeyResult::Event(SearchEvent::Changed(String::new()));
      }
      return KeyResult::NotHandled;
    }

    match self.input.handle_key(key) {
      InputResult::Submitted(_) => {
        self.active = false;
        KeyResult::Event(SearchEvent::Submitted)
      }
      InputResult::Cancelled => {
        self.active = false;
        self.input.clear();
        KeyResult::Event(SearchEvent::Changed(String::new()))
      }
      InputResult::Consumed => {
        KeyResult::Event(SearchEvent::Changed(self.input.value().to_string()))
      }
      // Swallow everything else while typing
      InputResult::NotHandled => KeyResult::Handled,
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
    if !self.active {
      return;
    }

    let overlay = overlay_area(area, 3);
    frame.render_widget(Clear, overlay);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(palette.prompt))
      .title(" Search ");
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    if inner.height == 0 {
      return;
    }

    let line = Line::from(vec![
      Span::styled("/", Style::default().fg(palette.prompt)),
      Span::styled(self.input.value(), palette.text_style()),
      Span::styled("_", Style::default().fg(palette.prompt)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
  }
}
