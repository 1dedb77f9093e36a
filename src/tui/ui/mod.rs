//! UI module: View components for the TUI.

pub mod form;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::FieldTheme;

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DISCLAIMER: Estimates come from a fitted statistical model and do not replace evaluation by medical staff.",
            FieldTheme::text_muted(),
        )]),
        Line::from(vec![Span::styled(
            "Values far outside the advisory ranges degrade the estimate.",
            FieldTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(FieldTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
