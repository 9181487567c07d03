//! Application state for the TUI.

use crate::config::TuiConfig;
use crate::controller::{DocumentSlot, PresentationController};
use crate::host::{PanelHost, PanelId};
use crate::keys::Action;
use crate::theme::SynthBruteTheme;
use arkiva_core::DocumentId;

pub struct App {
    pub config: TuiConfig,
    pub theme: SynthBruteTheme,
    pub host: PanelHost,
    /// The details panel.
    pub panel: PanelId,
    pub documents: Vec<DocumentId>,
    pub selected: usize,
    pub opened: Option<DocumentId>,
}

impl App {
    pub fn new(config: TuiConfig, mut host: PanelHost) -> Self {
        let panel = host.add_panel();
        let documents = config.document_ids();
        Self {
            config,
            theme: SynthBruteTheme::synthbrute(),
            host,
            panel,
            documents,
            selected: 0,
            opened: None,
        }
    }

    pub fn selected_document(&self) -> Option<DocumentId> {
        self.documents.get(self.selected).copied()
    }

    pub fn details(&self) -> Option<&PresentationController> {
        self.host.panel(self.panel)
    }

    pub fn select_next(&mut self) {
        if !self.documents.is_empty() {
            self.selected = (self.selected + 1) % self.documents.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.documents.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.documents.len() - 1);
        }
    }

    /// Apply a key action. Returns `true` when the app should exit.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::MoveDown => self.select_next(),
            Action::MoveUp => self.select_previous(),
            Action::Open => {
                if let Some(id) = self.selected_document() {
                    self.open(id);
                }
            }
            Action::Reload => {
                if let Some(id) = self.opened {
                    self.host.open_document(self.panel, id);
                }
            }
            Action::Close => {
                self.opened = None;
                self.host.close(self.panel);
            }
            Action::ToggleExpand => {
                if let Some(panel) = self.host.panel_mut(self.panel) {
                    panel.toggle_expanded();
                }
            }
        }
        false
    }

    /// Open `id` in the details panel, re-showing the loaded version when it
    /// is already on screen.
    fn open(&mut self, id: DocumentId) {
        let loaded = match self.details().map(PresentationController::document) {
            Some(DocumentSlot::Loaded(doc)) if doc.id == id && self.opened == Some(id) => {
                Some(doc.as_ref().clone())
            }
            _ => None,
        };
        self.opened = Some(id);
        match loaded {
            Some(doc) => {
                self.host.open(self.panel, doc);
            }
            None => {
                self.host.open_document(self.panel, id);
            }
        }
    }
}
