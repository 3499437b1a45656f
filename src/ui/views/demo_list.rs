use crate::provider::DemoProvider;
use crate::query::Query;
use crate::records::Demo;
use crate::ui::components::KeyResult;
use crate::ui::paging::Pager;
use crate::ui::renderfns::truncate;
use crate::ui::theme::Palette;
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::record_actions::RecordActions;
use crate::ui::views::DemoDetailView;
use crate::ui::{draw_error, draw_placeholder, ensure_valid_table_selection, list_title};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

/// Paginated table of demos
pub struct DemoListView {
  provider: DemoProvider,
  query: Query<Vec<Demo>>,
  pager: Pager,
  table_state: TableState,
  actions: RecordActions<Demo>,
}

impl DemoListView {
  pub fn new(provider: DemoProvider, page_size: usize) -> Self {
    let mut query = Query::new(provider.list_source());
    query.fetch();

    Self {
      actions: RecordActions::new(provider.clone()),
      provider,
      query,
      pager: Pager::new(page_size),
      table_state: TableState::default(),
    }
  }

  fn demos(&self) -> Vec<Demo> {
    self.provider.state().records.unwrap_or_default()
  }

  /// Rows of the current page
  fn page(&self) -> Vec<Demo> {
    let demos = self.demos();
    let range = self.pager.range(demos.len());
    demos[range].to_vec()
  }

  fn selected_demo(&self) -> Option<Demo> {
    let index = self.table_state.selected()?;
    self.page().into_iter().nth(index)
  }

  fn turn_page(&mut self, forward: bool) {
    let len = self.demos().len();
    if forward {
      self.pager.next(len);
    } else {
      self.pager.previous(len);
    }
    self.table_state.select(Some(0));
  }

  fn render_table(&mut self, frame: &mut Frame, area: Rect, palette: &Palette) {
    let state = self.provider.state();
    let demos = state.records.clone().unwrap_or_default();

    let mut block = Block::default()
      .title(list_title("Demos", demos.len(), state.is_fetching))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(palette.border));
    if let Some(indicator) = self.pager.indicator(demos.len()) {
      block = block.title_bottom(Line::styled(format!(" {} ", indicator), palette.muted_style()).right_aligned());
    }

    if state.records.is_none() {
      match (&state.error, state.is_pending) {
        (Some(error), false) => draw_error(frame, area, block, error, palette),
        _ => draw_placeholder(frame, area, block, "Loading demos...", palette),
      }
      return;
    }

    if demos.is_empty() {
      draw_placeholder(frame, area, block, "No demos scheduled", palette);
      return;
    }

    let page = &demos[self.pager.range(demos.len())];
    ensure_valid_table_selection(&mut self.table_state, page.len());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let failure = state.error.as_ref().filter(|_| state.is_error);
    let (table_area, error_area) = match failure {
      Some(_) => {
        let [table, error] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);
        (table, Some(error))
      }
      None => (inner, None),
    };

    let header = Row::new(["ID", "Name", "Date"].map(|h| Cell::from(h).style(palette.accent_style().bold())));
    let rows: Vec<Row> = page
      .iter()
      .map(|demo| {
        Row::new(vec![
          Cell::from(demo.id.to_string()).style(palette.muted_style()),
          Cell::from(truncate(&demo.name, 48)).style(palette.text_style()),
          Cell::from(demo.display_date()).style(palette.text_style()),
        ])
      })
      .collect();

    let table = Table::new(
      rows,
      [Constraint::Length(6), Constraint::Min(20), Constraint::Length(12)],
    )
    .header(header)
    .row_highlight_style(palette.selected_style().add_modifier(Modifier::BOLD))
    .highlight_symbol("> ");
    frame.render_stateful_widget(table, table_area, &mut self.table_state);

    if let (Some(error), Some(error_area)) = (failure, error_area) {
      let line = Line::styled(format!(" Refresh failed: {}", error), Style::default().fg(palette.error));
      frame.render_widget(Paragraph::new(line), error_area);
    }
  }
}

impl View for DemoListView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if self.actions.handle_key(key) != KeyResult::NotHandled {
      return ViewAction::None;
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.table_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.table_state.select_previous(),
      KeyCode::Char('n') | KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => {
        self.turn_page(true)
      }
      KeyCode::Char('p') | KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => {
        self.turn_page(false)
      }
      KeyCode::Char('r') => self.query.refetch(),
      KeyCode::Char('e') => {
        if let Some(demo) = self.selected_demo() {
          self.actions.begin_rename(&demo);
        }
      }
      KeyCode::Char('d') => {
        if let Some(demo) = self.selected_demo() {
          self.actions.begin_delete(&demo);
        }
      }
      KeyCode::Enter => {
        if let Some(demo) = self.selected_demo() {
          return ViewAction::Push(Box::new(DemoDetailView::new(
            demo.id,
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
    self.render_table(frame, area, palette);
    self.actions.render_overlays(frame, area, palette);
  }

  fn breadcrumb_label(&self) -> String {
    let len = self.demos().len();
    match self.pager.indicator(len) {
      Some(_) => format!("Demos [{}/{}]", self.pager.page(len) + 1, self.pager.total_pages(len)),
      None => "Demos".to_string(),
    }
  }

  fn section(&self) -> &'static str {
    "Demos"
  }

  fn is_capturing_input(&self) -> bool {
    self.actions.is_active()
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
      ShortcutInfo::new("n/p", "page").with_priority(20),
      ShortcutInfo::new("e", "rename").with_priority(40),
      ShortcutInfo::new("d", "delete").with_priority(41),
      ShortcutInfo::new("r", "refresh").with_priority(50),
      ShortcutInfo::new("t", "theme").with_priority(60),
    ]
  }
}
