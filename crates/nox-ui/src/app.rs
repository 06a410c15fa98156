//! Application state and TUI event loop for the NOx report.
//!
//! [`App`] owns the theme, the four chart specs and the yearly summary
//! rows. The user pages between views; nothing is recomputed while the
//! report is open.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};

use nox_core::limits::HOURLY_LIMIT_UGM3;
use nox_core::models::{NoxSeries, YearlyStat};

use crate::chart_view::{self, ChartSpec};
use crate::table_view::{self, TableRowData};
use crate::themes::Theme;

// ── View ──────────────────────────────────────────────────────────────────────

/// Which page the TUI is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// One of the charts, by position in [`App::charts`].
    Chart(usize),
    /// Per-year summary table.
    Summary,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the NOx report TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// Charts in report order.
    pub charts: Vec<ChartSpec>,
    /// Rows of the summary table.
    pub rows: Vec<TableRowData>,
    /// Page currently shown.
    pub view: View,
    /// Free-form status text shown in the footer.
    pub status: String,
    /// Hourly value the exceedance chart and table column count against.
    pub exceedance_threshold: f64,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    /// Build the report for `series` and its yearly statistics.
    pub fn new(theme_name: &str, series: &NoxSeries, yearly: &[YearlyStat]) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            charts: ChartSpec::all(series),
            rows: table_view::rows_from_stats(yearly),
            view: View::Chart(0),
            status: String::new(),
            exceedance_threshold: HOURLY_LIMIT_UGM3,
            should_quit: false,
        }
    }

    /// Label the exceedance chart and table column with `threshold`.
    pub fn with_exceedance_threshold(mut self, threshold: f64) -> Self {
        self.exceedance_threshold = threshold;
        self.charts = self
            .charts
            .into_iter()
            .map(|c| c.with_exceedance_threshold(threshold))
            .collect();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    // ── Navigation ────────────────────────────────────────────────────────────

    /// Number of pages: every chart plus the summary table.
    pub fn page_count(&self) -> usize {
        self.charts.len() + 1
    }

    fn page_index(&self) -> usize {
        match self.view {
            View::Chart(i) => i,
            View::Summary => self.charts.len(),
        }
    }

    fn set_page(&mut self, index: usize) {
        self.view = if index < self.charts.len() {
            View::Chart(index)
        } else {
            View::Summary
        };
    }

    /// Advance to the next page, wrapping around.
    pub fn next_view(&mut self) {
        let next = (self.page_index() + 1) % self.page_count();
        self.set_page(next);
    }

    /// Go back to the previous page, wrapping around.
    pub fn previous_view(&mut self) {
        let count = self.page_count();
        let prev = (self.page_index() + count - 1) % count;
        self.set_page(prev);
    }

    /// Apply one key press. Returns `true` when the view changed.
    ///
    /// `→`/`Tab`/`l` go forward, `←`/`BackTab`/`h` go back, `s` jumps to the
    /// summary and `q`, `Esc` or `Ctrl+C` quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let before = self.view;
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => self.next_view(),
            KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => self.previous_view(),
            KeyCode::Char('s') => self.view = View::Summary,
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if let Some(i) = c.to_digit(10).and_then(|d| (d as usize).checked_sub(1)) {
                    if i < self.page_count() {
                        self.set_page(i);
                    }
                }
            }
            _ => {}
        }
        self.view != before
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the report TUI until the user quits.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so the loop stays
    /// on the current thread.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        let tick_rate = Duration::from_millis(250);

        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }
        Ok(())
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current page and footer into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let [body, footer] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

        match self.view {
            View::Chart(i) => match self.charts.get(i) {
                Some(spec) => chart_view::render_chart(frame, body, spec, &self.theme),
                None => chart_view::render_no_data(frame, body, "NOx", &self.theme),
            },
            View::Summary => table_view::render_table_view(
                frame,
                body,
                &self.rows,
                self.exceedance_threshold,
                &self.theme,
            ),
        }

        let mut spans = vec![Span::styled(
            format!(" {}/{} ", self.page_index() + 1, self.page_count()),
            self.theme.title,
        )];
        if !self.status.is_empty() {
            spans.push(Span::styled(format!("{}  ", self.status), self.theme.text));
        }
        spans.push(Span::styled(
            "←/→ switch view · s summary · q quit",
            self.theme.dim,
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), footer);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
