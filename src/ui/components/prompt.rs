use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::ui::renderfns::overlay_area;
use crate::ui::theme::Palette;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
  /// Trimmed, non-empty value
  Submitted(String),
  Cancelled,
}

/// Modal text prompt used for renaming records
#[derive(Debug, Clone, Default)]
pub struct Prompt {
  title: String,
  input: TextInput,
  active: bool,
}

impl Prompt {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Open the prompt with `initial` as the editable value
  pub fn open(&mut self, title: impl Into<String>, initial: &str) {
    self.title = title.into();
    self.input = TextInput::with_value(initial);
    self.active = true;
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<PromptEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match self.input.handle_key(key) {
      InputResult::Submitted(value) => {
        let value = value.trim();
        if value.is_empty() {
          // Keep the prompt open
          return KeyResult::Handled;
        }
        self.active = false;
        KeyResult::Event(PromptEvent::Submitted(value.to_string()))
      }
      InputResult::Cancelled => {
        self.active = false;
        KeyResult::Event(PromptEvent::Cancelled)
      }
      InputResult::Consumed | InputResult::NotHandled => KeyResult::Handled,
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
    if !self.active {
      return;
    }

    let overlay = overlay_area(area, 4);
    frame.render_widget(Clear, overlay);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(palette.prompt))
      .title(format!(" {} ", self.title));
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    let lines = vec![
      Line::from(vec![
        Span::styled(self.input.value(), palette.text_style()),
        Span::styled("_", Style::default().fg(palette.prompt)),
      ]),
      Line::styled("Enter save  Esc cancel", palette.muted_style()),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
  }
}
