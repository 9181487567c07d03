//! Document details panel with its AI summary.

use crate::controller::DocumentSlot;
use crate::state::App;
use crate::theme::document_status_color;
use crate::widgets::{DetailPanel, SummaryPanel};
use arkiva_core::Document;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(details) = app.details() else {
        return;
    };

    match details.document() {
        DocumentSlot::Empty => {
            let style = Style::default().fg(app.theme.text_dim);
            message(f, app, area, "Select a document and press Enter.", style);
        }
        DocumentSlot::Loading(id) => {
            let text = format!("Loading document #{}…", id);
            message(f, app, area, &text, Style::default().fg(app.theme.warning));
        }
        DocumentSlot::Failed { document_id, message: error } => {
            let text = format!("Document #{}: {}", document_id, error);
            message(f, app, area, &text, Style::default().fg(app.theme.error));
        }
        DocumentSlot::Loaded(doc) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(12), Constraint::Min(0)])
                .split(area);

            details_panel(app, doc).render(f, chunks[0]);
            SummaryPanel {
                snapshot: details.snapshot(),
                theme: &app.theme,
            }
            .render(f, chunks[1]);
        }
    }
}

fn details_panel<'a>(app: &App, doc: &'a Document) -> DetailPanel<'a> {
    DetailPanel::new(
        "Details",
        Style::default().fg(app.theme.secondary),
        Style::default().fg(app.theme.primary_dim),
    )
    .field("Title", doc.title.as_str())
    .optional_field("Description", doc.description.as_deref())
    .field("Category", doc.category.as_str())
    .optional_field("Tags", doc.tags.as_deref())
    .field("File type", doc.file_type.as_str())
    .styled_field(
        "Status",
        doc.status.to_string(),
        Style::default().fg(document_status_color(doc.status, &app.theme)),
    )
    .optional_field("Uploaded by", doc.uploaded_by_email.as_deref())
    .field("Updated", doc.updated_at.format("%Y-%m-%d %H:%M").to_string())
    .field("Link", doc.web_view_link.as_str())
}

fn message(f: &mut Frame<'_>, app: &App, area: Rect, text: &str, style: Style) {
    let widget = Paragraph::new(text.to_string())
        .style(style)
        .block(
            Block::default()
                .title("Details")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(widget, area);
}
