use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::commands::{self, Command};
use crate::ui::renderfns::overlay_area;
use crate::ui::theme::Palette;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

const MAX_SUGGESTIONS: usize = 8;

/// Events emitted by command input that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEvent {
  Submitted(String),
  Cancelled,
}

/// `:` command palette with autocomplete
#[derive(Debug, Clone, Default)]
pub struct CommandInput {
  input: TextInput,
  active: bool,
  selected_suggestion: usize,
}

impl CommandInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn activate(&mut self) {
    self.active = true;
    self.input.clear();
    self.selected_suggestion = 0;
  }

  pub fn suggestions(&self) -> Vec<&'static Command> {
    commands::get_suggestions(self.input.value())
  }

  /// Handle a key event. Call this regardless of active state, it handles
  /// activation too.
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<CommandEvent> {
    if !self.active {
      if key.code == KeyCode::Char(':') {
        self.activate();
        return KeyResult::Handled;
      }
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc => {
        self.close();
        return KeyResult::Event(CommandEvent::Cancelled);
      }
      KeyCode::Enter => {
        let cmd = self.resolve_command();
        self.close();
        return KeyResult::Event(CommandEvent::Submitted(cmd));
      }
      KeyCode::Tab | KeyCode::Down => {
        let count = self.suggestions().len().min(MAX_SUGGESTIONS);
        if count > 0 {
          self.selected_suggestion = (self.selected_suggestion + 1) % count;
        }
        return KeyResult::Handled;
      }
      KeyCode::BackTab | KeyCode::Up => {
        let count = self.suggestions().len().min(MAX_SUGGESTIONS);
        if count > 0 {
          self.selected_suggestion = (self.selected_suggestion + count - 1) % count;
        }
        return KeyResult::Handled;
      }
      _ => {}
    }

    if self.input.handle_key(key) == InputResult::Consumed {
      self.selected_suggestion = 0;
    }
    KeyResult::Handled
  }

  fn close(&mut self) {
    self.active = false;
    self.input.clear();
    self.selected_suggestion = 0;
  }

  /// Selected suggestion, or the raw input when nothing matches
  fn resolve_command(&self) -> String {
    match self.suggestions().get(self.selected_suggestion) {
      Some(cmd) => cmd.name.to_string(),
      None => self.input.value().trim().to_lowercase(),
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
    if !self.active {
      return;
    }

    let suggestions = self.suggestions();
    let shown = suggestions.len().min(MAX_SUGGESTIONS) as u16;
    let overlay = overlay_area(area, 3 + shown);
    frame.render_widget(Clear, overlay);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(palette.prompt))
      .title(" Command ");
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    if inner.height == 0 {
      return;
    }

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Length(1), Constraint::Min(0)])
      .split(inner);

    let input_line = Line::from(vec![
      Span::styled(":", Style::default().fg(palette.prompt)),
      Span::styled(self.input.value(), palette.text_style()),
      Span::styled("_", Style::default().fg(palette.prompt)),
    ]);
    frame.render_widget(Paragraph::new(input_line), chunks[0]);

    if suggestions.is_empty() || chunks[1].height == 0 {
      return;
    }

    let items: Vec<ListItem> = suggestions
      .iter()
      .take(MAX_SUGGESTIONS)
      .map(|cmd| {
        ListItem::new(Line::from(vec![
          Span::styled(format!("{:<10}", cmd.name), palette.accent_style()),
          Span::styled(cmd.description, palette.muted_style()),
        ]))
      })
      .collect();

    let list = List::new(items).highlight_style(palette.selected_style());
    let mut state = ListState::default();
    state.select(Some(self.selected_suggestion));
    frame.render_stateful_widget(list, chunks[1], &mut state);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn type_text(palette: &mut CommandInput, text: &str) {
    for c in text.chars() {
      palette.handle_key(key(KeyCode::Char(c)));
    }
  }

  #[test]
  fn test_colon_activates() {
    let mut palette = CommandInput::new();
    assert_eq!(palette.handle_key(key(KeyCode::Char(':'))), KeyResult::Handled);
    assert!(palette.is_active());
  }

  #[test]
  fn test_enter_submits_best_suggestion() {
    let mut palette = CommandInput::new();
    palette.activate();
    type_text(&mut palette, "dem");
    assert_eq!(
      palette.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(CommandEvent::Submitted("demos".to_string()))
    );
    assert!(!palette.is_active());
  }

  #[test]
  fn test_tab_cycles_suggestions() {
    let mut palette = CommandInput::new();
    palette.activate();
    palette.handle_key(key(KeyCode::Tab));
    assert_eq!(
      palette.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(CommandEvent::Submitted("demos".to_string()))
    );

    palette.activate();
    palette.handle_key(key(KeyCode::BackTab));
    assert_eq!(
      palette.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(CommandEvent::Submitted("quit".to_string()))
    );
  }

  #[test]
  fn test_unknown_input_submitted_raw() {
    let mut palette = CommandInput::new();
    palette.activate();
    type_text(&mut palette, "Nope");
    assert_eq!(
      palette.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(CommandEvent::Submitted("nope".to_string()))
    );
  }

  #[test]
  fn test_escape_cancels() {
    let mut palette = CommandInput::new();
    palette.activate();
    type_text(&mut palette, "us");
    assert_eq!(
      palette.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(CommandEvent::Cancelled)
    );
    assert!(!palette.is_active());
  }
}
