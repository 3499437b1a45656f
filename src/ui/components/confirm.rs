use super::KeyResult;
use crate::ui::renderfns::overlay_area;
use crate::ui::theme::Palette;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmEvent {
  Confirmed,
  Cancelled,
}

/// Yes/no overlay guarding destructive actions
#[derive(Debug, Clone, Default)]
pub struct Confirm {
  message: Option<String>,
}

impl Confirm {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.message.is_some()
  }

  pub fn open(&mut self, message: impl Into<String>) {
    self.message = Some(message.into());
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<ConfirmEvent> {
    if self.message.is_none() {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
        self.message = None;
        KeyResult::Event(ConfirmEvent::Confirmed)
      }
      KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
        self.message = None;
        KeyResult::Event(ConfirmEvent::Cancelled)
      }
      _ => KeyResult::Handled,
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
    let Some(message) = &self.message else {
      return;
    };

    let overlay = overlay_area(area, 5);
    frame.render_widget(Clear, overlay);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(palette.error))
      .title(" Confirm ");

    let text = vec![
      Line::styled(message.as_str(), palette.text_style()),
      Line::raw(""),
      Line::from(vec![
        Span::styled("<y>", Style::default().fg(palette.error)),
        Span::styled(" yes   ", palette.muted_style()),
        Span::styled("<n>", palette.accent_style()),
        Span::styled(" no", palette.muted_style()),
      ]),
    ];
    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, overlay);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_confirm_and_cancel() {
    let mut confirm = Confirm::new();
    assert_eq!(confirm.handle_key(key(KeyCode::Char('y'))), KeyResult::NotHandled);

    confirm.open("Delete Ada?");
    assert_eq!(confirm.handle_key(key(KeyCode::Char('x'))), KeyResult::Handled);
    assert_eq!(
      confirm.handle_key(key(KeyCode::Char('y'))),
      KeyResult::Event(ConfirmEvent::Confirmed)
    );
    assert!(!confirm.is_active());

    confirm.open("Delete Ada?");
    assert_eq!(
      confirm.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(ConfirmEvent::Cancelled)
    );
  }
}
