use crate::provider::UserProvider;
use crate::query::Query;
use crate::records::User;
use crate::ui::components::{KeyResult, SearchEvent, SearchInput};
use crate::ui::renderfns::truncate;
use crate::ui::theme::Palette;
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::record_actions::RecordActions;
use crate::ui::views::UserDetailView;
use crate::ui::{draw_error, draw_placeholder, ensure_valid_selection, list_title};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Team members with search, rename and delete.
///
/// Renders the provider's read model; `query` only keeps it fetched.
pub struct UserListView {
  provider: UserProvider,
  query: Query<Vec<User>>,
  list_state: ListState,
  search: SearchInput,
  actions: RecordActions<User>,
}

impl UserListView {
  pub fn new(provider: UserProvider) -> Self {
    let mut query = Query::new(provider.list_source());
    query.fetch();

    Self {
      actions: RecordActions::new(provider.clone()),
      provider,
      query,
      list_state: ListState::default(),
      search: SearchInput::new(),
    }
  }

  /// Users matching the search filter, in store order
  fn visible(&self) -> Vec<User> {
    filter_users(self.provider.state().records.unwrap_or_default(), self.search.query())
  }

  fn selected_user(&self) -> Option<User> {
    let index = self.list_state.selected()?;
    self.visible().into_iter().nth(index)
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect, palette: &Palette) {
    let state = self.provider.state();
    let total = state.records.as_ref().map(Vec::len).unwrap_or(0);
    let visible = filter_users(state.records.clone().unwrap_or_default(), self.search.query());
    ensure_valid_selection(&mut self.list_state, visible.len());

    let block = Block::default()
      .title(list_title("Team", total, state.is_fetching))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(palette.border));

    if state.records.is_none() {
      match (&state.error, state.is_pending) {
        (Some(error), false) => draw_error(frame, area, block, error, palette),
        _ => draw_placeholder(frame, area, block, "Loading team...", palette),
      }
      return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [summary_area, list_area] =
      Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);

    let mut summary = vec![Span::styled(
      format!(" Showing {} of {}", visible.len(), total),
      palette.muted_style(),
    )];
    if !self.search.query().is_empty() {
      summary.push(Span::styled(
        format!("  filter: {}", self.search.query()),
        palette.accent_style(),
      ));
    }
    if let Some(error) = state.error.as_ref().filter(|_| state.is_error) {
      summary.push(Span::styled(
        format!("  refresh failed: {}", error),
        Style::default().fg(palette.error),
      ));
    }
    frame.render_widget(Paragraph::new(Line::from(summary)), summary_area);

    if visible.is_empty() {
      let text = if total == 0 {
        "No team members yet"
      } else {
        "No results found"
      };
      let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(palette.muted_style());
      frame.render_widget(paragraph, list_area);
      return;
    }

    let items: Vec<ListItem> = visible
      .iter()
      .map(|user| {
        ListItem::new(Line::from(vec![
          Span::styled(format!("{:<24}", truncate(&user.name, 24)), palette.text_style()),
          Span::raw(" "),
          Span::styled(format!("{:<32}", truncate(&user.email, 32)), palette.accent_style()),
          Span::raw(" "),
          Span::styled(user.role.as_deref().unwrap_or("-").to_string(), palette.muted_style()),
        ]))
      })
      .collect();

    let list = List::new(items)
      .highlight_style(palette.selected_style().add_modifier(Modifier::BOLD))
      .highlight_symbol("> ");
    frame.render_stateful_widget(list, list_area, &mut self.list_state);
  }
}

/// Keep the users matching `query`, case-insensitively, in order
pub fn filter_users(users: Vec<User>, query: &str) -> Vec<User> {
  users.into_iter().filter(|user| user.matches(query)).collect()
}

impl View for UserListView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if self.actions.handle_key(key) != KeyResult::NotHandled {
      return ViewAction::None;
    }

    match self.search.handle_key(key) {
      KeyResult::Event(SearchEvent::Changed(_)) => {
        self.list_state.select(Some(0));
        return ViewAction::None;
      }
      KeyResult::Event(SearchEvent::Submitted) | KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('r') => self.query.refetch(),
      KeyCode::Char('e') => {
        if let Some(user) = self.selected_user() {
          self.actions.begin_rename(&user);
        }
      }
      KeyCode::Char('d') => {
        if let Some(user) = self.selected_user() {
          self.actions.begin_delete(&user);
        }
      }
      KeyCode::Enter => {
        if let Some(user) = self.selected_user() {
          return ViewAction::Push(Box::new(UserDetailView::new(
            user.id,
            self.provider.clone(),
          )));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, palette: &Palette) {
    self.render_list(frame, area, palette);
    self.search.render_overlay(frame, area, palette);
    self.actions.render_overlays(frame, area, palette);
  }

  fn breadcrumb_label(&self) -> String {
    "Team".to_string()
  }

  fn section(&self) -> &'static str {
    "Users"
  }

  fn is_capturing_input(&self) -> bool {
    self.search.is_active() || self.actions.is_active()
  }

  fn status(&self) -> Option<&str> {
    self.actions.status()
  }

  fn tick(&mut self) {
    self.actions.tick();
    self.query.poll();
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("/", "search").with_priority(20),
      ShortcutInfo::new("e", "rename").with_priority(40),
      ShortcutInfo::new("d", "delete").with_priority(41),
      ShortcutInfo::new("r", "refresh").with_priority(50),
      ShortcutInfo::new("t", "theme").with_priority(60),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn user(id: i64, name: &str, email: &str, role: Option<&str>) -> User {
    User {
      id,
      name: name.to_string(),
      email: email.to_string(),
      avatar_url: None,
      role: role.map(str::to_string),
    }
  }

  #[test]
  fn test_filter_users() {
    let users = vec![
      user(1, "Ada Lovelace", "ada@example.com", Some("Engineer")),
      user(2, "Grace Hopper", "grace@navy.mil", Some("Admiral")),
      user(3, "Alan Turing", "alan@example.com", None),
    ];

    let by_email: Vec<i64> = filter_users(users.clone(), "EXAMPLE").iter().map(|u| u.id).collect();
    assert_eq!(by_email, vec![1, 3]);
    assert_eq!(filter_users(users.clone(), "admiral")[0].id, 2);
    assert_eq!(filter_users(users.clone(), "").len(), 3);
    assert!(filter_users(users, "nobody").is_empty());
  }
}
