//! Event types for the TUI event loop.

use crate::coordinator::{Epoch, GenerationRequest};
use crate::host::PanelId;
use crate::reveal::TimerToken;
use arkiva_core::{Document, GenerationError};
use crossterm::event::KeyEvent;

/// Terminal-side events, produced by the input reader thread.
#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Resize { width: u16, height: u16 },
}

/// Events posted back to the loop by timers and backend calls.
///
/// Every variant names the panel or request it belongs to, so the host can
/// route it without any shared mutable state in the spawned tasks.
#[derive(Debug, Clone)]
pub enum SummaryEvent {
    Tick {
        panel: PanelId,
        token: TimerToken,
    },
    Generated {
        request: GenerationRequest,
        outcome: Result<String, GenerationError>,
    },
    DocumentLoaded {
        panel: PanelId,
        epoch: Epoch,
        result: Result<Document, GenerationError>,
    },
}
