use ratatui::prelude::Rect;

/// Truncate a string to at most `max_len` characters, adding "..." if
/// truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Area for a popup anchored to the top-left of `area` with a small
/// margin, clamped to fit inside it
pub fn overlay_area(area: Rect, height: u16) -> Rect {
  let width = (area.width * 60 / 100).clamp(30, 60).min(area.width.saturating_sub(2));
  let height = height.min(area.height.saturating_sub(2));
  Rect::new(area.x + 1, area.y + 1, width, height)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_multibyte() {
    assert_eq!(truncate("Zoë Müller-Schmidt", 8), "Zoë M...");
  }

  #[test]
  fn test_overlay_fits_inside_area() {
    let area = Rect::new(0, 2, 100, 30);
    assert_eq!(overlay_area(area, 3), Rect::new(1, 3, 60, 3));

    let small = Rect::new(0, 0, 20, 4);
    let overlay = overlay_area(small, 10);
    assert_eq!(overlay.width, 18);
    assert_eq!(overlay.height, 2);
  }
}
