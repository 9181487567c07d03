//! AI summary area: loading indicator, revealed text, or error banner.

use crate::controller::PanelSnapshot;
use crate::theme::SynthBruteTheme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::borrow::Cow;

/// Characters shown while the summary is collapsed.
pub const COLLAPSED_CHARS: usize = 280;

/// The text to draw, clamped unless `expanded`.
pub fn collapsed_text(text: &str, expanded: bool) -> Cow<'_, str> {
    if expanded || text.chars().count() <= COLLAPSED_CHARS {
        return Cow::Borrowed(text);
    }
    let clamped = crate::reveal::char_prefix(text, COLLAPSED_CHARS);
    Cow::Owned(format!("{}…", clamped.trim_end()))
}

pub struct SummaryPanel<'a> {
    pub snapshot: &'a PanelSnapshot,
    pub theme: &'a SynthBruteTheme,
}

impl<'a> SummaryPanel<'a> {
    pub fn title(&self) -> &'static str {
        match (self.snapshot.can_expand, self.snapshot.expanded) {
            (true, true) => "AI Summary [x: collapse]",
            (true, false) => "AI Summary [x: expand]",
            _ => "AI Summary",
        }
    }

    pub fn lines(&self) -> Vec<Line<'a>> {
        let snapshot = self.snapshot;
        if let Some(message) = &snapshot.error_message {
            return vec![Line::from(Span::styled(
                format!("⚠ {}", message),
                Style::default()
                    .fg(self.theme.error)
                    .add_modifier(Modifier::BOLD),
            ))];
        }
        if snapshot.is_loading {
            return vec![Line::from(vec![
                Span::styled("Generating summary ", Style::default().fg(self.theme.text_dim)),
                Span::styled(
                    snapshot.placeholder_frame.unwrap_or_default(),
                    Style::default().fg(self.theme.secondary),
                ),
            ])];
        }
        let style = Style::default().fg(self.theme.text);
        collapsed_text(&snapshot.visible_text, snapshot.expanded)
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), style)))
            .collect()
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let border = if self.snapshot.error_message.is_some() {
            self.theme.error
        } else if self.snapshot.is_loading {
            self.theme.warning
        } else {
            self.theme.border
        };
        let widget = Paragraph::new(self.lines())
            .block(
                Block::default()
                    .title(self.title())
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border)),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(widget, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_not_clamped() {
        assert_eq!(collapsed_text("short", false), "short");
    }

    #[test]
    fn test_long_text_is_clamped_until_expanded() {
        let text = "ë".repeat(COLLAPSED_CHARS + 10);
        let collapsed = collapsed_text(&text, false);
        assert_eq!(collapsed.chars().count(), COLLAPSED_CHARS + 1);
        assert!(collapsed.ends_with('…'));
        assert_eq!(collapsed_text(&text, true), text.as_str());
    }

    #[test]
    fn test_error_banner_replaces_text() {
        let theme = SynthBruteTheme::synthbrute();
        let snapshot = PanelSnapshot {
            error_message: Some("quota".to_string()),
            ..PanelSnapshot::default()
        };
        let panel = SummaryPanel {
            snapshot: &snapshot,
            theme: &theme,
        };
        let lines = panel.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans[0].content, "⚠ quota");
    }

    #[test]
    fn test_title_reflects_expansion() {
        let theme = SynthBruteTheme::synthbrute();
        let snapshot = PanelSnapshot {
            visible_text: "done".to_string(),
            can_expand: true,
            ..PanelSnapshot::default()
        };
        let panel = SummaryPanel {
            snapshot: &snapshot,
            theme: &theme,
        };
        assert_eq!(panel.title(), "AI Summary [x: expand]");
    }
}
