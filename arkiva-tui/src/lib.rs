//! ARKIVA TUI library exports.

pub mod config;
pub mod controller;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod host;
pub mod keys;
pub mod reveal;
pub mod state;
pub mod theme;
pub mod views;
pub mod widgets;

pub use controller::{DocumentSlot, PanelSnapshot, PresentationController};
pub use coordinator::{Admission, Epoch, GenerationRequest, RequestCoordinator, Subscription};
pub use events::SummaryEvent;
pub use host::{PanelHost, PanelId};
pub use reveal::{RevealScheduler, RevealState, RevealTiming, TimerToken};
