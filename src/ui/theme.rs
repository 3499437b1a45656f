use ratatui::prelude::{Color, Style};
use serde::Deserialize;

/// Light or dark color scheme, toggled at runtime with `t`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
  Light,
  #[default]
  Dark,
}

impl ColorScheme {
  pub fn toggle(self) -> Self {
    match self {
      ColorScheme::Light => ColorScheme::Dark,
      ColorScheme::Dark => ColorScheme::Light,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      ColorScheme::Light => "light",
      ColorScheme::Dark => "dark",
    }
  }

  pub fn palette(self) -> Palette {
    match self {
      ColorScheme::Dark => Palette {
        bar_bg: Color::Black,
        text: Color::White,
        muted: Color::DarkGray,
        accent: Color::Cyan,
        border: Color::Blue,
        highlight_bg: Color::DarkGray,
        prompt: Color::Yellow,
        error: Color::Red,
        success: Color::Green,
      },
      ColorScheme::Light => Palette {
        bar_bg: Color::Gray,
        text: Color::Black,
        muted: Color::DarkGray,
        accent: Color::Blue,
        border: Color::DarkGray,
        highlight_bg: Color::Gray,
        prompt: Color::Magenta,
        error: Color::Red,
        success: Color::Green,
      },
    }
  }
}

/// Colors used by every view and component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
  /// Header and footer background
  pub bar_bg: Color,
  pub text: Color,
  pub muted: Color,
  pub accent: Color,
  pub border: Color,
  /// Selected row background
  pub highlight_bg: Color,
  /// Overlay borders and input prompts
  pub prompt: Color,
  pub error: Color,
  pub success: Color,
}

impl Palette {
  pub fn text_style(&self) -> Style {
    Style::default().fg(self.text)
  }

  pub fn muted_style(&self) -> Style {
    Style::default().fg(self.muted)
  }

  pub fn accent_style(&self) -> Style {
    Style::default().fg(self.accent)
  }

  pub fn selected_style(&self) -> Style {
    Style::default().bg(self.highlight_bg).fg(self.text)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_toggle_round_trips() {
    assert_eq!(ColorScheme::Dark.toggle(), ColorScheme::Light);
    assert_eq!(ColorScheme::Dark.toggle().toggle(), ColorScheme::Dark);
  }

  #[test]
  fn test_schemes_differ() {
    assert_ne!(ColorScheme::Dark.palette(), ColorScheme::Light.palette());
    assert_eq!(ColorScheme::Light.palette().text, Color::Black);
  }
}
