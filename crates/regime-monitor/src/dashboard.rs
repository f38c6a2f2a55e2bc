//! TUI Dashboard using ratatui.

use chrono::{DateTime, Local};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table},
    Frame, Terminal,
};
use regime_allocation::{format_currency, parse_capital, Allocation, AllocationError};
use regime_score::{DashboardReport, Regime};
use rust_decimal::Decimal;
use std::fmt::Display;
use std::io;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const MAX_MESSAGES: usize = 50;

/// What the run loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Refresh,
    Quit,
}

/// Dashboard state.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Latest successful pipeline run
    pub report: Option<DashboardReport>,
    /// Capital as typed by the user
    pub capital_input: String,
    pub currency: String,
    /// Time of the latest successful refresh
    pub updated_at: Option<DateTime<Local>>,
    pub messages: Vec<String>,
}

impl DashboardState {
    /// Create an empty state with a starting capital.
    pub fn new(capital: Decimal, currency: impl Into<String>) -> Self {
        Self {
            report: None,
            capital_input: capital.normalize().to_string(),
            currency: currency.into(),
            updated_at: None,
            messages: Vec::new(),
        }
    }

    /// Record the outcome of a refresh.
    ///
    /// A failed refresh keeps the previous report on screen.
    pub fn apply_refresh<E: Display>(
        &mut self,
        result: Result<DashboardReport, E>,
        now: DateTime<Local>,
    ) {
        match result {
            Ok(report) => {
                let message = match &report.current {
                    Some(current) => format!(
                        "{} refreshed: score {} ({})",
                        now.format("%H:%M:%S"),
                        current.score(),
                        current.regime
                    ),
                    None => format!(
                        "{} refreshed: not enough history to score",
                        now.format("%H:%M:%S")
                    ),
                };
                self.push_message(message);
                self.report = Some(report);
                self.updated_at = Some(now);
            }
            Err(e) => {
                warn!(error = %e, "Dashboard refresh failed");
                self.push_message(format!("{} refresh failed: {}", now.format("%H:%M:%S"), e));
            }
        }
    }

    /// Apply a key press to the state.
    pub fn handle_key(&mut self, code: KeyCode) -> KeyAction {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') => KeyAction::Refresh,
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.capital_input.push(c);
                KeyAction::None
            }
            KeyCode::Char('.') if !self.capital_input.contains('.') => {
                self.capital_input.push('.');
                KeyAction::None
            }
            KeyCode::Backspace => {
                self.capital_input.pop();
                KeyAction::None
            }
            _ => KeyAction::None,
        }
    }

    /// Allocation for the typed capital under the current regime.
    pub fn allocation(&self) -> Result<Option<Allocation>, AllocationError> {
        let capital = parse_capital(&self.capital_input)?;
        match &self.report {
            Some(report) => report.allocation(capital),
            None => Ok(None),
        }
    }

    pub fn push_message(&mut self, message: String) {
        self.messages.push(message);
        if self.messages.len() > MAX_MESSAGES {
            let excess = self.messages.len() - MAX_MESSAGES;
            self.messages.drain(..excess);
        }
    }
}

/// TUI Dashboard.
pub struct Dashboard {
    tick: Duration,
    refresh_interval: Duration,
}

impl Dashboard {
    /// Create a new dashboard that refreshes every `refresh_interval`.
    pub fn new(refresh_interval: Duration) -> Self {
        Self {
            tick: Duration::from_millis(250),
            refresh_interval,
        }
    }

    /// Run the dashboard until the user quits.
    ///
    /// `refresh` runs one full fetch and pipeline pass. It is called on
    /// start, on `r` and whenever the refresh interval elapses.
    pub fn run<F, E>(&self, state: &mut DashboardState, mut refresh: F) -> io::Result<()>
    where
        F: FnMut() -> Result<DashboardReport, E>,
        E: Display,
    {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.run_loop(&mut terminal, state, &mut refresh);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        res
    }

    fn run_loop<F, E>(
        &self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        state: &mut DashboardState,
        refresh: &mut F,
    ) -> io::Result<()>
    where
        F: FnMut() -> Result<DashboardReport, E>,
        E: Display,
    {
        let mut refresh_now = |state: &mut DashboardState,
                               terminal: &mut Terminal<CrosstermBackend<io::Stdout>>|
         -> io::Result<Instant> {
            state.push_message("Fetching market data...".to_string());
            terminal.draw(|f| render(f, state))?;
            state.apply_refresh(refresh(), Local::now());
            Ok(Instant::now())
        };

        let mut last_refresh = refresh_now(state, terminal)?;
        info!(interval = ?self.refresh_interval, "Dashboard started");

        loop {
            terminal.draw(|f| render(f, state))?;

            if event::poll(self.tick)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        match state.handle_key(key.code) {
                            KeyAction::Quit => return Ok(()),
                            KeyAction::Refresh => last_refresh = refresh_now(state, terminal)?,
                            KeyAction::None => {}
                        }
                    }
                }
            }

            if last_refresh.elapsed() >= self.refresh_interval {
                last_refresh = refresh_now(state, terminal)?;
            }
        }
    }
}

fn render(frame: &mut Frame, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(4), // Metrics
            Constraint::Min(12),   // Chart and allocation
            Constraint::Length(8), // Messages
        ])
        .split(frame.area());

    render_header(frame, chunks[0]);
    render_metrics(frame, chunks[1], state);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[2]);
    render_history(frame, body[0], state);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(body[1]);
    render_capital(frame, side[0], state);
    render_allocation(frame, side[1], state);

    render_messages(frame, chunks[3], state);
}

fn regime_color(regime: Regime) -> Color {
    match regime {
        Regime::StrongBull => Color::Green,
        Regime::ModerateBull => Color::LightGreen,
        Regime::Neutral => Color::Yellow,
        Regime::Defensive => Color::LightRed,
        Regime::HighRiskBear => Color::Red,
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![Line::from(vec![
        Span::styled(
            "Institutional Market Structure Dashboard",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | 'r' refresh | 0-9 . Backspace edit capital | 'q' quit"),
    ])])
    .block(Block::default().borders(Borders::ALL).title("Regime"));
    frame.render_widget(header, area);
}

fn render_metrics(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let report = state.report.as_ref();
    let current = report.and_then(|r| r.current.as_ref());
    let color = current.map_or(Color::White, |c| regime_color(c.regime));

    let close_title = report
        .map_or_else(|| "Close".to_string(), |r| format!("{} Close", r.primary_symbol));
    let metrics = [
        (
            close_title,
            report.map_or_else(|| "-".to_string(), |r| format!("{:.2}", r.last_close)),
            Color::White,
        ),
        (
            "Institutional Score".to_string(),
            current.map_or_else(|| "-".to_string(), |c| format!("{} / 100", c.score())),
            color,
        ),
        (
            "Suggested Exposure".to_string(),
            current.map_or_else(|| "-".to_string(), |c| c.exposure().to_string()),
            color,
        ),
        (
            "Market Regime".to_string(),
            current.map_or_else(|| "-".to_string(), |c| c.regime.label().to_string()),
            color,
        ),
    ];

    for ((title, value, color), area) in metrics.into_iter().zip(columns.iter()) {
        let widget = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(widget, *area);
    }
}

fn render_history(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Institutional Score History");

    let Some(report) = &state.report else {
        frame.render_widget(Paragraph::new("No data").block(block), area);
        return;
    };

    // Missing scores are left out of the line.
    let points: Vec<(f64, f64)> = report
        .history
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.score.map(|s| (i as f64, f64::from(s))))
        .collect();

    let first = report.history.iter().find_map(|p| p.date);
    let last = report.history.iter().rev().find_map(|p| p.date);
    let x_labels: Vec<String> = [first, last]
        .iter()
        .map(|d| d.map_or_else(String::new, |d| d.to_string()))
        .collect();

    let dataset = Dataset::default()
        .name("score")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, report.history.len().saturating_sub(1).max(1) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, 100.0])
                .labels(["0", "50", "100"]),
        );
    frame.render_widget(chart, area);
}

fn render_capital(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let valid = parse_capital(&state.capital_input).is_ok();
    let input = Paragraph::new(Line::from(vec![
        Span::raw(state.currency.as_str()),
        Span::styled(
            state.capital_input.as_str(),
            Style::default().fg(if valid { Color::White } else { Color::Red }),
        ),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Capital"));
    frame.render_widget(input, area);
}

fn render_allocation(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Capital Allocation");

    let allocation = match state.allocation() {
        Ok(Some(allocation)) => allocation,
        Ok(None) => {
            frame.render_widget(Paragraph::new("No regime available").block(block), area);
            return;
        }
        Err(e) => {
            let text = Paragraph::new(Span::styled(e.to_string(), Style::default().fg(Color::Red)));
            frame.render_widget(text.block(block), area);
            return;
        }
    };

    let money = |v: Decimal| format_currency(v, &state.currency);
    let header_cells = ["", "Min", "Max"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).height(1);

    let rows = vec![
        Row::new(vec![
            Cell::from("Equity"),
            Cell::from(money(allocation.equity_min)).style(Style::default().fg(Color::Green)),
            Cell::from(money(allocation.equity_max)).style(Style::default().fg(Color::Green)),
        ]),
        Row::new(vec![
            Cell::from("Cash"),
            Cell::from(money(allocation.cash_min)),
            Cell::from(money(allocation.cash_max)),
        ]),
    ];

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(20),
            Constraint::Percentage(40),
            Constraint::Percentage(40),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}

fn render_messages(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let updated = state.updated_at.map_or_else(
        || "Last updated: never".to_string(),
        |t| format!("Last updated: {}", t.format("%Y-%m-%d %H:%M:%S")),
    );

    let mut lines = vec![Line::from(Span::styled(
        updated,
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    lines.extend(
        state
            .messages
            .iter()
            .rev()
            .take(5)
            .map(|m| Line::from(m.as_str())),
    );

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(paragraph, area);
}
