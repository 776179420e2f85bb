use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use sortscope_core::advisor::{Advisor, Quiz};
use sortscope_core::Algorithm;
use tokio::sync::mpsc;
use tracing::debug;

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
}

/// Result of an async advisory request
#[derive(Debug)]
pub enum AdvisoryResult {
    Explanation {
        algorithm: Algorithm,
        result: std::result::Result<String, String>,
    },
    Quiz {
        algorithm: Algorithm,
        result: std::result::Result<Quiz, String>,
    },
}

/// Fetch an explanation in the background and report it on `tx`
pub fn spawn_explanation(advisor: Advisor, algorithm: Algorithm, tx: mpsc::UnboundedSender<AdvisoryResult>) {
    tokio::spawn(async move {
        debug!(algorithm = algorithm.id(), "fetching explanation");
        let result = advisor.explain(algorithm).await.map_err(|e| e.to_string());
        let _ = tx.send(AdvisoryResult::Explanation { algorithm, result });
    });
}

/// Fetch a quiz in the background and report it on `tx`
pub fn spawn_quiz(advisor: Advisor, algorithm: Algorithm, tx: mpsc::UnboundedSender<AdvisoryResult>) {
    tokio::spawn(async move {
        debug!(algorithm = algorithm.id(), "fetching quiz");
        let result = advisor.quiz(algorithm).await.map_err(|e| e.to_string());
        let _ = tx.send(AdvisoryResult::Quiz { algorithm, result });
    });
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms.max(1)),
        }
    }

    /// Poll for the next event
    pub fn next(&self) -> Result<Option<AppEvent>> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// Tick event for periodic updates
    Tick,
}
