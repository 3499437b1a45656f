use crate::provider::ResourceProvider;
use crate::query::Mutation;
use crate::records::Record;
use crate::ui::components::{Confirm, ConfirmEvent, KeyResult, Prompt, PromptEvent};
use crate::ui::theme::Palette;
use crossterm::event::KeyEvent;
use ratatui::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActionKind {
  Rename,
  Delete,
}

/// Settled rename or delete
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome<R> {
  Renamed(R),
  Deleted(R),
  Failed,
}

/// Rename and delete flows shared by list and detail views: the overlays,
/// the single pending mutation and the resulting status line.
pub struct RecordActions<R: Record> {
  provider: ResourceProvider<R>,
  prompt: Prompt,
  confirm: Confirm,
  /// Record the open overlay acts on
  target: Option<R>,
  mutation: Mutation<R>,
  pending: Option<ActionKind>,
  status: Option<String>,
}

impl<R: Record> RecordActions<R> {
  pub fn new(provider: ResourceProvider<R>) -> Self {
    Self {
      provider,
      prompt: Prompt::new(),
      confirm: Confirm::new(),
      target: None,
      mutation: Mutation::new(),
      pending: None,
      status: None,
    }
  }

  /// Whether an overlay owns the keyboard
  pub fn is_active(&self) -> bool {
    self.prompt.is_active() || self.confirm.is_active()
  }

  pub fn is_pending(&self) -> bool {
    self.mutation.is_pending()
  }

  pub fn status(&self) -> Option<&str> {
    self.status.as_deref()
  }

  pub fn begin_rename(&mut self, record: &R) {
    if self.refuse_while_pending() {
      return;
    }
    self.prompt.open(format!("Rename {}", record.name()), record.name());
    self.target = Some(record.clone());
  }

  pub fn begin_delete(&mut self, record: &R) {
    if self.refuse_while_pending() {
      return;
    }
    self.confirm.open(format!("Delete \"{}\"?", record.name()));
    self.target = Some(record.clone());
  }

  fn refuse_while_pending(&mut self) -> bool {
    if self.mutation.is_pending() {
      self.status = Some("Still saving, try again in a moment".to_string());
      return true;
    }
    false
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<()> {
    match self.prompt.handle_key(key) {
      KeyResult::Event(PromptEvent::Submitted(name)) => {
        if let Some(record) = self.target.take() {
          let provider = self.provider.clone();
          let patch = R::rename(&name);
          self.start(ActionKind::Rename, async move {
            provider.update(record.id(), patch).await
          });
        }
        return KeyResult::Handled;
      }
      KeyResult::Event(PromptEvent::Cancelled) => {
        self.target = None;
        return KeyResult::Handled;
      }
      KeyResult::Handled => return KeyResult::Handled,
      KeyResult::NotHandled => {}
    }

    match self.confirm.handle_key(key) {
      KeyResult::Event(ConfirmEvent::Confirmed) => {
        if let Some(record) = self.target.take() {
          let provider = self.provider.clone();
          self.start(ActionKind::Delete, async move { provider.delete(record.id()).await });
        }
        KeyResult::Handled
      }
      KeyResult::Event(ConfirmEvent::Cancelled) => {
        self.target = None;
        KeyResult::Handled
      }
      KeyResult::Handled => KeyResult::Handled,
      KeyResult::NotHandled => KeyResult::NotHandled,
    }
  }

  fn start<Fut>(&mut self, kind: ActionKind, operation: Fut)
  where
    Fut: std::future::Future<Output = Result<R, crate::service::ServiceError>> + Send + 'static,
  {
    if self.mutation.mutate(operation) {
      self.pending = Some(kind);
      self.status = Some(match kind {
        ActionKind::Rename => "Saving...".to_string(),
        ActionKind::Delete => "Deleting...".to_string(),
      });
    }
  }

  /// Poll the pending mutation. Returns the outcome once, when it settles.
  pub fn tick(&mut self) -> Option<ActionOutcome<R>> {
    let result = self.mutation.poll()?;
    let kind = self.pending.take()?;

    let (status, outcome) = match (kind, result) {
      (ActionKind::Rename, Ok(record)) => (
        format!("Renamed to \"{}\"", record.name()),
        ActionOutcome::Renamed(record),
      ),
      (ActionKind::Delete, Ok(record)) => (
        format!("Deleted \"{}\"", record.name()),
        ActionOutcome::Deleted(record),
      ),
      (ActionKind::Rename, Err(e)) => (format!("Rename failed: {}", e), ActionOutcome::Failed),
      (ActionKind::Delete, Err(e)) => (format!("Delete failed: {}", e), ActionOutcome::Failed),
    };
    self.status = Some(status);
    Some(outcome)
  }

  pub fn render_overlays(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
    self.prompt.render_overlay(frame, area, palette);
    self.confirm.render_overlay(frame, area, palette);
  }
}
