use crossterm::event::KeyEvent;
use ratatui::prelude::*;

use crate::ui::theme::Palette;

/// A keyboard shortcut hint for display in the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutInfo {
  pub key: &'static str,
  pub label: &'static str,
  pub priority: u8, // Lower = shown first
}

impl ShortcutInfo {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self {
      key,
      label,
      priority: 100,
    }
  }

  pub const fn with_priority(mut self, priority: u8) -> Self {
    self.priority = priority;
    self
  }
}

/// Actions that a view can request in response to user input
pub enum ViewAction {
  /// No action needed
  None,
  /// Push a new view onto the stack
  Push(Box<dyn View>),
  /// Pop current view from stack (go back)
  Pop,
}

impl std::fmt::Debug for ViewAction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ViewAction::None => write!(f, "None"),
      ViewAction::Push(view) => write!(f, "Push({})", view.breadcrumb_label()),
      ViewAction::Pop => write!(f, "Pop"),
    }
  }
}

/// Trait for view behavior
///
/// Views handle their own input modes (search, edit, confirm) and return
/// actions for the App to execute: App → View → Components.
///
/// Views observe data through `Query<T>` handles and poll them in `tick()`.
pub trait View {
  /// Handle a key event, returning an action for App to execute
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction;

  /// Render the view to the frame
  fn render(&mut self, frame: &mut Frame, area: Rect, palette: &Palette);

  /// Label for this view in the footer breadcrumb
  fn breadcrumb_label(&self) -> String;

  /// Section name shown in the header
  fn section(&self) -> &'static str;

  /// Whether the view is capturing text input, so global keys like `t`
  /// and `:` must be passed through
  fn is_capturing_input(&self) -> bool {
    false
  }

  /// Message for the footer, e.g. the outcome of the last mutation
  fn status(&self) -> Option<&str> {
    None
  }

  /// Called on each tick to poll async queries
  fn tick(&mut self) {}

  /// Whether the view should be popped after the last tick, e.g. because
  /// the record it shows was deleted
  fn is_finished(&self) -> bool {
    false
  }

  /// Keyboard shortcuts to display in the header
  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("q", "back").with_priority(30),
    ]
  }
}
