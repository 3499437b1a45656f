use crate::ui::theme::Palette;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the footer bar with the view breadcrumb, and a status message on
/// the right when there is one
pub fn draw_footer(
  frame: &mut Frame,
  area: Rect,
  breadcrumb: &[String],
  status: Option<&str>,
  palette: &Palette,
) {
  let mut spans = vec![Span::raw(" ")];

  for (i, part) in breadcrumb.iter().enumerate() {
    if i > 0 {
      spans.push(Span::styled(" > ", palette.muted_style()));
    }

    let style = if i + 1 == breadcrumb.len() {
      palette.accent_style().bold()
    } else {
      palette.text_style()
    };
    spans.push(Span::styled(part.as_str(), style));
  }

  let background = Style::default().bg(palette.bar_bg);
  frame.render_widget(Paragraph::new(Line::from(spans)).style(background), area);

  if let Some(status) = status {
    let width = (status.chars().count() as u16 + 1).min(area.width / 2);
    let [_, right] = Layout::horizontal([Constraint::Min(0), Constraint::Length(width)]).areas(area);
    let line = Line::from(Span::styled(status, palette.muted_style()));
    frame.render_widget(Paragraph::new(line).style(background), right);
  }
}
