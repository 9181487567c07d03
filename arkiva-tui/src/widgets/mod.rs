//! Reusable widget components.

pub mod detail;
pub mod summary;

pub use detail::DetailPanel;
pub use summary::{collapsed_text, SummaryPanel, COLLAPSED_CHARS};
