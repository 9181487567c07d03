//! Detail panel widget for showing field/value pairs.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct DetailPanel<'a> {
    pub title: &'a str,
    /// Label, value, and an optional style for the value.
    pub fields: Vec<(&'a str, String, Option<Style>)>,
    pub label_style: Style,
    pub border_style: Style,
}

impl<'a> DetailPanel<'a> {
    pub fn new(title: &'a str, label_style: Style, border_style: Style) -> Self {
        Self {
            title,
            fields: Vec::new(),
            label_style,
            border_style,
        }
    }

    pub fn field(mut self, label: &'a str, value: impl Into<String>) -> Self {
        self.fields.push((label, value.into(), None));
        self
    }

    pub fn styled_field(mut self, label: &'a str, value: impl Into<String>, style: Style) -> Self {
        self.fields.push((label, value.into(), Some(style)));
        self
    }

    /// Add a field only when there is a value to show.
    pub fn optional_field(self, label: &'a str, value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => self.field(label, value),
            None => self,
        }
    }

    pub fn lines(&self) -> Vec<Line<'_>> {
        self.fields
            .iter()
            .map(|(label, value, style)| {
                let value = match style {
                    Some(style) => Span::styled(value.as_str(), *style),
                    None => Span::raw(value.as_str()),
                };
                Line::from(vec![Span::styled(format!("{}: ", label), self.label_style), value])
            })
            .collect()
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let widget = Paragraph::new(Text::from(self.lines()))
            .block(
                Block::default()
                    .title(self.title)
                    .borders(Borders::ALL)
                    .border_style(self.border_style),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(widget, area);
    }
}
