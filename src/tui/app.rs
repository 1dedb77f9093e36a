//! Main TUI application state.
//!
//! Handles:
//! - Input event handling
//! - Form submission through the inference service
//! - Terminal setup and teardown

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::application::{load_service, respond, ArtifactInferenceService, FormResponse};
use crate::config::AppConfig;
use crate::Result;

use super::ui::{
    form::{render_risk_form, FormState},
    render_disclaimer,
};

/// Main application state
pub struct App {
    /// Whether the app should quit
    should_quit: bool,

    /// Inference service over the loaded artifacts
    service: ArtifactInferenceService,

    /// Input form state
    form_state: FormState,

    /// Times the calculate action has fired
    clicks: u64,

    /// Text currently shown under the form
    response: FormResponse,
}

impl App {
    /// Load the artifacts named by `config` and build the application.
    ///
    /// # Errors
    /// Returns error if either artifact cannot be loaded. No form is shown
    /// without both.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let service = load_service(config)?;
        Ok(Self::with_service(service))
    }

    /// Create application with an already-built service.
    #[must_use]
    pub fn with_service(service: ArtifactInferenceService) -> Self {
        Self {
            should_quit: false,
            service,
            form_state: FormState::default(),
            clicks: 0,
            response: FormResponse::Prompt,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                render_risk_form(f, chunks[0], &self.form_state, &self.response);
                render_disclaimer(f, chunks[1]);
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('q') | KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('r') => {
                    self.form_state.reset();
                    self.refresh();
                }
                _ => {}
            }
            return;
        }

        let changed = match key {
            KeyCode::Esc => {
                self.should_quit = true;
                false
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.form_state.prev_field();
                false
            }
            KeyCode::Down | KeyCode::Tab => {
                self.form_state.next_field();
                false
            }
            KeyCode::Enter => {
                self.clicks = self.clicks.saturating_add(1);
                tracing::debug!("Calculate Risk triggered ({} clicks)", self.clicks);
                true
            }
            KeyCode::Char(c) => self.form_state.input_char(c),
            KeyCode::Backspace => self.form_state.delete_char(),
            KeyCode::Delete => self.form_state.clear_field(),
            _ => false,
        };

        // Once triggered, every edit re-scores the form.
        if changed {
            self.refresh();
        }
    }

    fn refresh(&mut self) {
        let form = self.form_state.to_risk_form(self.clicks);
        self.response = respond(&self.service, &form);
    }
}
