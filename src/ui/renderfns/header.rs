use crate::ui::theme::{ColorScheme, Palette};
use crate::ui::view::ShortcutInfo;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar with title, section, color scheme and shortcuts
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  title: &str,
  section: &str,
  scheme: ColorScheme,
  shortcuts: &[ShortcutInfo],
  palette: &Palette,
) {
  let separator = Span::styled("│", palette.muted_style());
  let mut spans = vec![
    Span::styled(format!(" {} ", title), palette.accent_style().bold()),
    separator.clone(),
    Span::styled(format!(" {} ", section), palette.text_style().bold()),
    separator,
    Span::styled(format!(" {} ", scheme.label()), palette.muted_style()),
    Span::raw(" "),
  ];

  for shortcut in sorted_shortcuts(shortcuts) {
    spans.push(Span::raw("  "));
    spans.push(Span::styled(format!("<{}>", shortcut.key), palette.accent_style()));
    spans.push(Span::styled(format!(" {}", shortcut.label), palette.muted_style()));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(palette.bar_bg));
  frame.render_widget(paragraph, area);
}

/// Shortcuts by priority, first occurrence of each key wins
fn sorted_shortcuts(shortcuts: &[ShortcutInfo]) -> Vec<&ShortcutInfo> {
  let mut sorted: Vec<&ShortcutInfo> = shortcuts.iter().collect();
  sorted.sort_by_key(|s| s.priority);
  let mut seen = Vec::new();
  sorted.retain(|s| {
    if seen.contains(&s.key) {
      false
    } else {
      seen.push(s.key);
      true
    }
  });
  sorted
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_shortcuts_sorted_and_deduplicated() {
    let shortcuts = vec![
      ShortcutInfo::new("d", "delete").with_priority(50),
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("d", "duplicate").with_priority(60),
    ];
    let keys: Vec<_> = sorted_shortcuts(&shortcuts)
      .iter()
      .map(|s| (s.key, s.label))
      .collect();
    assert_eq!(keys, vec![(":", "command"), ("d", "delete")]);
  }
}
