//! Pitcher feature input form.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::application::{FormResponse, RiskForm};
use crate::domain::FeatureName;
use crate::tui::styles::FieldTheme;

/// Number of fields in the left column.
const LEFT_COLUMN_FIELDS: usize = 5;

/// A single labelled input.
#[derive(Debug, Clone)]
pub struct FormField {
    pub feature: FeatureName,
    pub value: String,
}

impl FormField {
    fn title(&self) -> String {
        format!(
            " {} (Range: {}) ",
            self.feature.label(),
            self.feature.advisory_range()
        )
    }
}

/// Input form state
pub struct FormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            fields: FeatureName::ALL
                .into_iter()
                .map(|feature| FormField {
                    feature,
                    value: feature.default_value().to_string(),
                })
                .collect(),
            selected_field: 0,
        }
    }
}

impl FormState {
    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Append a character to the current field.
    ///
    /// Returns whether the field changed.
    pub fn input_char(&mut self, c: char) -> bool {
        if c.is_ascii_digit() || matches!(c, '.' | '-' | 'e' | 'E' | '+') {
            self.fields[self.selected_field].value.push(c);
            true
        } else {
            false
        }
    }

    pub fn delete_char(&mut self) -> bool {
        self.fields[self.selected_field].value.pop().is_some()
    }

    pub fn clear_field(&mut self) -> bool {
        let field = &mut self.fields[self.selected_field].value;
        let changed = !field.is_empty();
        field.clear();
        changed
    }

    /// Restore every field to its default value.
    pub fn reset(&mut self) {
        let selected = self.selected_field;
        *self = Self::default();
        self.selected_field = selected;
    }

    /// Snapshot the fields as a form submission.
    #[must_use]
    pub fn to_risk_form(&self, n_clicks: u64) -> RiskForm {
        let mut form = RiskForm {
            n_clicks: Some(n_clicks),
            ..RiskForm::default()
        };
        for field in &self.fields {
            form.set(field.feature.key(), field.value.clone());
        }
        form
    }
}

/// Render the calculator: inputs, calculate button, and result line.
pub fn render_risk_form(f: &mut Frame, area: Rect, state: &FormState, response: &FormResponse) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Result
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], state);
    render_result(f, chunks[2], response);
    render_form_footer(f, chunks[3]);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(Span::styled(
        "Injury Risk Calculator",
        FieldTheme::title(),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(FieldTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &FormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = LEFT_COLUMN_FIELDS.min(state.fields.len());
    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let field_height = 3;
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(field_height))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let (border_style, title_style) = if is_selected {
            (FieldTheme::border_focused(), FieldTheme::focused())
        } else {
            (FieldTheme::border(), FieldTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(field.title(), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value_display = if field.value.is_empty() {
            Span::styled(field.feature.placeholder(), FieldTheme::text_muted())
        } else {
            Span::styled(field.value.as_str(), FieldTheme::text())
        };

        let content = Paragraph::new(Line::from(vec![
            Span::raw(" "),
            value_display,
            if is_selected {
                Span::styled("▌", FieldTheme::cursor())
            } else {
                Span::raw("")
            },
        ]))
        .block(block);

        f.render_widget(content, chunks[i]);
    }

    // The calculate button sits under the right column.
    if offset > 0 {
        let button = Paragraph::new(Line::from(Span::styled(
            " Calculate Risk ",
            FieldTheme::button(),
        )));
        f.render_widget(button, chunks[fields.len()]);
    }
}

fn render_result(f: &mut Frame, area: Rect, response: &FormResponse) {
    let style = match response {
        FormResponse::Prompt => FieldTheme::text_secondary(),
        FormResponse::Risk(_) => FieldTheme::success(),
        FormResponse::Error(_) => FieldTheme::danger(),
    };

    let result = Paragraph::new(Line::from(Span::styled(response.to_string(), style)))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(FieldTheme::border()),
        );

    f.render_widget(result, area);
}

fn render_form_footer(f: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        Span::styled("[↑↓] ", FieldTheme::key_hint()),
        Span::styled("Navigate ", FieldTheme::key_desc()),
        Span::styled("[Enter] ", FieldTheme::key_hint()),
        Span::styled("Calculate Risk ", FieldTheme::key_desc()),
        Span::styled("[Del] ", FieldTheme::key_hint()),
        Span::styled("Clear ", FieldTheme::key_desc()),
        Span::styled("[Ctrl+R] ", FieldTheme::key_hint()),
        Span::styled("Reset ", FieldTheme::key_desc()),
        Span::styled("[Esc] ", FieldTheme::key_hint()),
        Span::styled("Quit", FieldTheme::key_desc()),
    ]);

    f.render_widget(Paragraph::new(hints), area);
}
