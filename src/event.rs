use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};

/// How long the reader thread blocks before checking whether to exit
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Application events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Terminal resized, redraw
  Resize,
  /// Periodic tick for query polling
  Tick,
}

/// Merges terminal input and a tick timer into one event source
pub struct EventHandler {
  rx: mpsc::UnboundedReceiver<Event>,
  ticks: Interval,
}

impl EventHandler {
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    // crossterm reads block, so input gets its own thread. It exits once
    // the receiver is dropped.
    std::thread::spawn(move || loop {
      if tx.is_closed() {
        break;
      }
      if !event::poll(INPUT_POLL).unwrap_or(false) {
        continue;
      }
      let event = match event::read() {
        Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => Event::Key(key),
        Ok(CrosstermEvent::Resize(_, _)) => Event::Resize,
        _ => continue,
      };
      if tx.send(event).is_err() {
        break;
      }
    });

    let mut ticks = tokio::time::interval(tick_rate);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    Self { rx, ticks }
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    tokio::select! {
      _ = self.ticks.tick() => Some(Event::Tick),
      event = self.rx.recv() => event,
    }
  }
}
