pub mod components;
pub mod paging;
pub mod renderfns;
pub mod theme;
pub mod view;
pub mod views;

use crate::app::App;
use crate::service::ServiceError;
use ratatui::prelude::*;
use ratatui::widgets::{Block, ListState, Paragraph, TableState, Wrap};
use theme::Palette;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let [header, content, footer] = Layout::vertical([
    Constraint::Length(1), // Header
    Constraint::Min(1),    // Main content
    Constraint::Length(1), // Footer
  ])
  .areas(frame.area());

  let palette = app.palette();

  renderfns::draw_header(
    frame,
    header,
    app.title(),
    app.section(),
    app.color_scheme(),
    &app.shortcuts(),
    &palette,
  );

  app.render_content(frame, content, &palette);

  renderfns::draw_footer(
    frame,
    footer,
    &app.breadcrumb(),
    app.status_message(),
    &palette,
  );
}

/// Clamp a list selection to `len` rows, selecting the first row when
/// nothing is selected yet
pub fn ensure_valid_selection(state: &mut ListState, len: usize) {
  state.select(clamp_selection(state.selected(), len));
}

/// Table variant of [`ensure_valid_selection`]
pub fn ensure_valid_table_selection(state: &mut TableState, len: usize) {
  state.select(clamp_selection(state.selected(), len));
}

fn clamp_selection(selected: Option<usize>, len: usize) -> Option<usize> {
  if len == 0 {
    None
  } else {
    Some(selected.unwrap_or(0).min(len - 1))
  }
}

/// Block title with a loading marker or record count
pub fn list_title(label: &str, shown: usize, is_fetching: bool) -> String {
  if is_fetching {
    format!(" {} (loading...) ", label)
  } else {
    format!(" {} ({}) ", label, shown)
  }
}

/// Error panel shown in place of content that failed to load
pub fn draw_error(frame: &mut Frame, area: Rect, block: Block, error: &ServiceError, palette: &Palette) {
  let mut text = vec![Line::styled(format!("Error: {}", error), Style::default().fg(palette.error))];
  // Retrying cannot bring back a missing record
  if error.is_transient() {
    text.push(Line::raw(""));
    text.push(Line::styled("Press 'r' to retry.", palette.muted_style()));
  }
  let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
  frame.render_widget(paragraph, area);
}

/// Centered placeholder text inside `block`
pub fn draw_placeholder(frame: &mut Frame, area: Rect, block: Block, text: &str, palette: &Palette) {
  let paragraph = Paragraph::new(text)
    .block(block)
    .alignment(Alignment::Center)
    .style(palette.muted_style());
  frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_selection_clamped() {
    let mut state = ListState::default();
    ensure_valid_selection(&mut state, 3);
    assert_eq!(state.selected(), Some(0));

    state.select(Some(10));
    ensure_valid_selection(&mut state, 3);
    assert_eq!(state.selected(), Some(2));

    ensure_valid_selection(&mut state, 0);
    assert_eq!(state.selected(), None);
  }

  #[test]
  fn test_list_title() {
    assert_eq!(list_title("Team", 4, false), " Team (4) ");
    assert_eq!(list_title("Team", 4, true), " Team (loading...) ");
  }
}
