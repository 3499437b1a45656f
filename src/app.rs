use crate::commands::Action;
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::provider::Providers;
use crate::ui;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::theme::{ColorScheme, Palette};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::{DemoListView, UserListView};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tracing::{debug, info};

/// Root section a session starts in, and that `:users`/`:demos` switch to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Section {
  #[default]
  Users,
  Demos,
}

/// Restores the terminal on every exit path, errors included
struct TerminalGuard;

impl Drop for TerminalGuard {
  fn drop(&mut self) {
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);
  }
}

/// Main application state
pub struct App {
  /// Navigation stack, root is always at index 0
  view_stack: Vec<Box<dyn View>>,
  command_input: CommandInput,
  config: Config,
  providers: Providers,
  color_scheme: ColorScheme,
  /// Message left behind by a view that closed itself, or by the palette
  flash: Option<String>,
  should_quit: bool,
}

impl App {
  pub fn new(config: Config, providers: Providers, start: Section) -> Self {
    let mut app = Self {
      view_stack: Vec::new(),
      command_input: CommandInput::new(),
      color_scheme: config.color_scheme,
      config,
      providers,
      flash: None,
      should_quit: false,
    };
    app.switch_section(start);
    app
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let mut events = EventHandler::new(Duration::from_millis(self.config.ui.tick_ms));

    while !self.should_quit() {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }

    info!(
      user_calls = self.providers.users.service().total_calls(),
      demo_calls = self.providers.demos.service().total_calls(),
      "quitting"
    );
    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => self.tick(),
      Event::Resize => {}
    }
  }

  fn tick(&mut self) {
    let Some(view) = self.view_stack.last_mut() else {
      return;
    };
    view.tick();

    if view.is_finished() && self.view_stack.len() > 1 {
      if let Some(view) = self.view_stack.pop() {
        self.flash = view.status().map(str::to_string);
      }
    }
  }

  pub fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    // A view typing into its own overlay gets every key
    let capturing = self
      .view_stack
      .last()
      .is_some_and(|view| view.is_capturing_input());

    if !capturing {
      // Palette first, it is modal while open
      match self.command_input.handle_key(key) {
        KeyResult::Event(CommandEvent::Submitted(cmd)) => {
          self.execute_command(&cmd);
          return;
        }
        KeyResult::Event(CommandEvent::Cancelled) | KeyResult::Handled => return,
        KeyResult::NotHandled => {}
      }

      if key.code == KeyCode::Char('t') {
        self.toggle_theme();
        return;
      }
    }

    let action = match self.view_stack.last_mut() {
      Some(view) => view.handle_key(key),
      None => ViewAction::None,
    };
    self.apply(action);
  }

  fn apply(&mut self, action: ViewAction) {
    match action {
      ViewAction::None => {}
      ViewAction::Push(view) => {
        debug!(view = %view.breadcrumb_label(), "push view");
        self.flash = None;
        self.view_stack.push(view);
      }
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
    }
  }

  fn execute_command(&mut self, cmd: &str) {
    match Action::parse(cmd) {
      Some(Action::Users) => self.switch_section(Section::Users),
      Some(Action::Demos) => self.switch_section(Section::Demos),
      Some(Action::Theme) => self.toggle_theme(),
      Some(Action::Quit) => self.should_quit = true,
      None if cmd.is_empty() => {}
      None => self.flash = Some(format!("Unknown command: {}", cmd)),
    }
  }

  /// Replace the whole stack with a fresh root view
  fn switch_section(&mut self, section: Section) {
    let root: Box<dyn View> = match section {
      Section::Users => Box::new(UserListView::new(self.providers.users.clone())),
      Section::Demos => Box::new(DemoListView::new(
        self.providers.demos.clone(),
        self.config.ui.page_size,
      )),
    };
    debug!(?section, "switch section");
    self.view_stack.clear();
    self.view_stack.push(root);
    self.flash = None;
  }

  fn toggle_theme(&mut self) {
    self.color_scheme = self.color_scheme.toggle();
    debug!(scheme = self.color_scheme.label(), "toggle color scheme");
  }

  pub fn should_quit(&self) -> bool {
    self.should_quit
  }

  pub fn render_content(&mut self, frame: &mut Frame, area: Rect, palette: &Palette) {
    if let Some(view) = self.view_stack.last_mut() {
      view.render(frame, area, palette);
    }
    self.command_input.render_overlay(frame, area, palette);
  }

  pub fn title(&self) -> &str {
    &self.config.title
  }

  pub fn color_scheme(&self) -> ColorScheme {
    self.color_scheme
  }

  pub fn palette(&self) -> Palette {
    self.color_scheme.palette()
  }

  pub fn section(&self) -> &'static str {
    self.view_stack.last().map(|v| v.section()).unwrap_or("")
  }

  pub fn breadcrumb(&self) -> Vec<String> {
    self.view_stack.iter().map(|v| v.breadcrumb_label()).collect()
  }

  pub fn shortcuts(&self) -> Vec<ShortcutInfo> {
    self
      .view_stack
      .last()
      .map(|v| v.shortcuts())
      .unwrap_or_default()
  }

  pub fn status_message(&self) -> Option<&str> {
    self
      .view_stack
      .last()
      .and_then(|v| v.status())
      .or(self.flash.as_deref())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::NetworksConfig;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn app(start: Section) -> App {
    let config = Config {
      network: NetworksConfig::default().without_latency(),
      ..Config::default()
    };
    let providers = Providers::from_config(&config).unwrap();
    App::new(config, providers, start)
  }

  fn run_command(app: &mut App, cmd: &str) {
    app.handle_key(key(KeyCode::Char(':')));
    for c in cmd.chars() {
      app.handle_key(key(KeyCode::Char(c)));
    }
    app.handle_key(key(KeyCode::Enter));
  }

  #[tokio::test]
  async fn test_starts_in_requested_section() {
    assert_eq!(app(Section::Users).section(), "Users");
    assert_eq!(app(Section::Demos).breadcrumb(), vec!["Demos".to_string()]);
  }

  #[tokio::test]
  async fn test_palette_switches_section() {
    let mut app = app(Section::Users);
    run_command(&mut app, "demos");
    assert_eq!(app.section(), "Demos");
    run_command(&mut app, "u");
    assert_eq!(app.section(), "Users");
  }

  #[tokio::test]
  async fn test_theme_toggle_by_key_and_command() {
    let mut app = app(Section::Users);
    assert_eq!(app.color_scheme(), ColorScheme::Dark);
    app.handle_key(key(KeyCode::Char('t')));
    assert_eq!(app.color_scheme(), ColorScheme::Light);
    run_command(&mut app, "theme");
    assert_eq!(app.color_scheme(), ColorScheme::Dark);
  }

  #[tokio::test]
  async fn test_t_is_text_while_searching() {
    let mut app = app(Section::Users);
    app.handle_key(key(KeyCode::Char('/')));
    app.handle_key(key(KeyCode::Char('t')));
    assert_eq!(app.color_scheme(), ColorScheme::Dark);
  }

  #[tokio::test]
  async fn test_unknown_command_reported() {
    let mut app = app(Section::Users);
    run_command(&mut app, "zzz");
    assert_eq!(app.status_message(), Some("Unknown command: zzz"));
  }

  #[tokio::test]
  async fn test_quit_from_root() {
    let mut app = app(Section::Demos);
    app.handle_key(key(KeyCode::Char('q')));
    assert!(app.should_quit());
  }
}
