//! View rendering.

pub mod document;

use crate::state::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
        .split(layout[1]);
    render_document_list(f, app, body[0]);
    document::render(f, app, body[1]);

    render_footer(f, app, layout[2]);
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let stats = app.host.stats();
    let title = format!(
        "ARKIVA | {} | cached: {} | hit rate: {:.0}%",
        app.config.api_base_url,
        stats.entry_count,
        stats.hit_rate() * 100.0
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
        .title(Span::styled(title, Style::default().fg(app.theme.primary)));
    f.render_widget(block, area);
}

fn render_document_list(f: &mut Frame<'_>, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .documents
        .iter()
        .map(|id| {
            let marker = if app.opened == Some(*id) { "▸ " } else { "  " };
            ListItem::new(format!("{}Document #{}", marker, id))
        })
        .collect();

    let mut state = ListState::default();
    if !app.documents.is_empty() {
        state.select(Some(app.selected));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .title("Documents")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border_focus)),
        )
        .style(Style::default().fg(app.theme.text).bg(app.theme.bg))
        .highlight_style(
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        );
    f.render_stateful_widget(list, area, &mut state);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let help = "j/k move • Enter open • Esc close • x expand • r reload • q quit";
    let footer = Paragraph::new(help)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(app.theme.text_dim));
    f.render_widget(footer, area);
}
