use crate::provider::UserProvider;
use crate::query::Query;
use crate::records::User;
use crate::ui::theme::Palette;
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::record_actions::{ActionOutcome, RecordActions};
use crate::ui::components::KeyResult;
use crate::ui::{draw_error, draw_placeholder};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// One team member, fetched by id
pub struct UserDetailView {
  id: i64,
  query: Query<Option<User>>,
  actions: RecordActions<User>,
  /// Set once the user was deleted from this view
  closed: bool,
}

impl UserDetailView {
  pub fn new(id: i64, provider: UserProvider) -> Self {
    let mut query = Query::new(provider.item_source(id));
    query.fetch();

    Self {
      id,
      query,
      actions: RecordActions::new(provider),
      closed: false,
    }
  }

  fn user(&self) -> Option<User> {
    self.query.snapshot().data.flatten()
  }

  fn render_detail(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
    let snapshot = self.query.snapshot();
    let title = if snapshot.is_fetching {
      format!(" User {} (loading...) ", self.id)
    } else {
      format!(" User {} ", self.id)
    };
    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(palette.border));

    let user = match (&snapshot.data, &snapshot.error) {
      (Some(Some(user)), _) => user,
      (Some(None), _) => {
        return draw_placeholder(frame, area, block, "User not found", palette);
      }
      (None, Some(error)) => return draw_error(frame, area, block, error, palette),
      (None, None) => return draw_placeholder(frame, area, block, "Loading...", palette),
    };

    let label = |text: &'static str| Span::styled(format!("{:<8}", text), palette.muted_style());
    let mut lines = vec![
      Line::from(Span::styled(user.name.as_str(), palette.text_style().bold())),
      Line::raw(""),
      Line::from(vec![label("Email"), Span::styled(user.email.as_str(), palette.accent_style())]),
      Line::from(vec![
        label("Role"),
        Span::styled(user.role.as_deref().unwrap_or("-"), palette.text_style()),
      ]),
      Line::from(vec![
        label("Avatar"),
        Span::styled(user.avatar_url.as_deref().unwrap_or("-"), palette.muted_style()),
      ]),
    ];
    if let Some(error) = &snapshot.error {
      lines.push(Line::raw(""));
      lines.push(Line::styled(
        format!("Refresh failed: {}", error),
        Style::default().fg(palette.error),
      ));
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
  }
}

impl View for UserDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if self.actions.handle_key(key) != KeyResult::NotHandled {
      return ViewAction::None;
    }

    match key.code {
      KeyCode::Char('r') => self.query.refetch(),
      KeyCode::Char('e') => {
        if let Some(user) = self.user() {
          self.actions.begin_rename(&user);
        }
      }
      KeyCode::Char('d') => {
        if let Some(user) = self.user() {
          self.actions.begin_delete(&user);
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, palette: &Palette) {
    self.render_detail(frame, area, palette);
    self.actions.render_overlays(frame, area, palette);
  }

  fn breadcrumb_label(&self) -> String {
    match self.user() {
      Some(user) => user.name,
      None => format!("User {}", self.id),
    }
  }

  fn section(&self) -> &'static str {
    "Users"
  }

  fn is_capturing_input(&self) -> bool {
    self.actions.is_active()
  }

  fn status(&self) -> Option<&str> {
    self.actions.status()
  }

  fn tick(&mut self) {
    if let Some(ActionOutcome::Deleted(_)) = self.actions.tick() {
      self.closed = true;
    }
    self.query.poll();
  }

  fn is_finished(&self) -> bool {
    self.closed
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("q", "back").with_priority(10),
      ShortcutInfo::new("e", "rename").with_priority(40),
      ShortcutInfo::new("d", "delete").with_priority(41),
      ShortcutInfo::new("r", "refresh").with_priority(50),
    ]
  }
}
