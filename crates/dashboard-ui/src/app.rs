//! Application state and TUI event loop for the sales dashboard.
//!
//! [`App`] owns the theme and the sidebar state. It draws the dashboard for
//! a [`DashboardSession`] and turns key presses into filter changes, each of
//! which recomputes the report before the next frame.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};

use dashboard_runtime::session::{DashboardSession, FilterDimension};

use crate::dashboard_view::{self, SidebarState};
use crate::themes::Theme;

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// Focused filter list and cursor positions.
    pub sidebar: SidebarState,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            sidebar: SidebarState::default(),
            should_quit: false,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the interactive dashboard until `q`, `Q` or `Ctrl+C`.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so a resize is
    /// picked up on the next tick even without a key press.
    pub fn run(mut self, session: &mut DashboardSession<'_>) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);
        tracing::info!("dashboard started");

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame, session)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key, session),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        tracing::info!("dashboard closed");

        result
    }

    /// Apply one key press to the sidebar and the session.
    pub fn handle_key(&mut self, key: KeyEvent, session: &mut DashboardSession<'_>) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let focus = self.sidebar.focus;
        let len = session.options(focus).len();

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                self.sidebar.focus = match focus {
                    FilterDimension::Branch => FilterDimension::Month,
                    FilterDimension::Month => FilterDimension::Branch,
                };
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let cursor = self.sidebar.cursor_mut(focus);
                *cursor = cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let cursor = self.sidebar.cursor_mut(focus);
                if *cursor + 1 < len {
                    *cursor += 1;
                }
            }
            KeyCode::Home => *self.sidebar.cursor_mut(focus) = 0,
            KeyCode::End => *self.sidebar.cursor_mut(focus) = len.saturating_sub(1),
            KeyCode::Char(' ') | KeyCode::Enter => {
                let cursor = self.sidebar.cursor(focus);
                if let Some(value) = session.options(focus).get(cursor) {
                    session.toggle(focus, value);
                }
            }
            KeyCode::Char('a') => session.select_all(focus),
            KeyCode::Char('n') => session.clear(focus),
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame, session: &DashboardSession<'_>) {
        let area = frame.area();
        dashboard_view::render_dashboard(frame, area, session, &self.sidebar, &self.theme);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
