use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

use transferval::config;
use transferval::provider;
use transferval::state::{
    apply_delta, AppState, Delta, ProviderCommand, Screen, SearchDebounce, MIN_QUERY_LEN,
};

struct App {
    state: AppState,
    debounce: SearchDebounce,
    cmd_tx: mpsc::Sender<ProviderCommand>,
    should_quit: bool,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(),
            debounce: SearchDebounce::new(config::search_debounce()),
            cmd_tx,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        match self.state.screen {
            Screen::Search => self.on_search_key(key),
            // Search input is disabled while a detail fetch is in flight;
            // stray selections and back presses are dropped here.
            Screen::LoadingDetail => {}
            Screen::PlayerDetail => self.on_detail_key(key),
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Up => self.state.select_prev_suggestion(),
            KeyCode::Down => self.state.select_next_suggestion(),
            KeyCode::Enter => {
                if let Some(cmd) = self.state.select_suggestion() {
                    self.debounce.cancel();
                    self.send(cmd);
                }
            }
            KeyCode::Backspace => {
                let mut text = self.state.query.clone();
                text.pop();
                self.on_query_change(text);
            }
            KeyCode::Char(c) => {
                let mut text = self.state.query.clone();
                text.push(c);
                self.on_query_change(text);
            }
            _ => {}
        }
    }

    fn on_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('b') | KeyCode::Esc => self.state.back(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn on_query_change(&mut self, text: String) {
        if self.state.set_query(text) {
            self.debounce
                .keystroke(self.state.query.clone(), Instant::now());
        } else {
            self.debounce.cancel();
        }
    }

    /// Fire the debounced search once the keyboard has gone quiet.
    fn maybe_fire_search(&mut self) {
        if let Some(query) = self.debounce.due(Instant::now()) {
            let cmd = self.state.begin_search(&query);
            self.send(cmd);
        }
    }

    fn send(&mut self, cmd: ProviderCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Fetch worker unavailable");
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    provider::spawn_provider(tx, cmd_rx);

    let mut app = App::new(cmd_tx);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    // The tick has to stay well under the debounce window so a quiet
    // keyboard fires the search promptly.
    let tick_rate = Duration::from_millis(50);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        app.maybe_fire_search();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.state.tick();
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Search => render_search(frame, chunks[1], &app.state),
        Screen::LoadingDetail => render_loading(frame, chunks[1], &app.state),
        Screen::PlayerDetail => render_detail(frame, chunks[1], &app.state),
    }

    let footer =
        Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);
}

fn header_text(state: &AppState) -> String {
    let title = match state.screen {
        Screen::Search => "TRANSFER VAL | Search",
        Screen::LoadingDetail => "TRANSFER VAL | Loading",
        Screen::PlayerDetail => "TRANSFER VAL | Player",
    };
    let line1 = format!("  .-.  {title}");
    let line2 = " ( € )".to_string();
    let line3 = "  `-`".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Search => "Type to search | ↑/↓ Move | Enter Open player | Esc Quit".to_string(),
        Screen::LoadingDetail => "Fetching player data...".to_string(),
        Screen::PlayerDetail => "b/Esc Back | q Quit".to_string(),
    }
}

fn render_search(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(area);

    let input_title = if state.search_loading {
        format!("Transfer Val {}", state.spinner())
    } else {
        "Transfer Val".to_string()
    };
    let input = if state.query.is_empty() {
        Paragraph::new("Type a player name...").style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(format!("{}█", state.query))
    };
    frame.render_widget(
        input.block(Block::default().title(input_title).borders(Borders::ALL)),
        sections[0],
    );

    if let Some(notice) = &state.search_notice {
        let warn = Paragraph::new(notice.as_str()).style(Style::default().fg(Color::Red));
        frame.render_widget(warn, sections[1]);
    }

    render_suggestions(frame, sections[2], state);

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, sections[3]);
}

fn render_suggestions(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.suggestions.is_empty() {
        let hint = if state.query.chars().count() < MIN_QUERY_LEN {
            "Results appear after two characters"
        } else if state.search_loading {
            "Searching..."
        } else {
            "No players found"
        };
        let empty = Paragraph::new(hint).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let widths = suggestion_columns();
    if area.height == 0 {
        return;
    }

    let visible = area.height as usize;
    let total = state.suggestions.len();
    let (start, end) = visible_range(state.suggestion_selected, total, visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: area.x,
            y: area.y + i as u16,
            width: area.width,
            height: 1,
        };

        let selected = idx == state.suggestion_selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let s = &state.suggestions[idx];
        render_cell_text(frame, cols[0], &s.display_name, row_style);
        render_cell_text(frame, cols[1], &s.value_display, row_style);
        render_cell_text(frame, cols[2], &s.team, row_style);
    }
}

fn suggestion_columns() -> [Constraint; 3] {
    [
        Constraint::Min(20),
        Constraint::Length(14),
        Constraint::Min(12),
    ]
}

fn render_loading(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(40, 20, area);
    let name = state.loading_player.as_deref().unwrap_or("player");
    let text = format!("{} Loading {name}...", state.spinner());
    let loading = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(loading, popup_area);
}

fn render_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(player) = &state.player else {
        let empty = Paragraph::new("No player loaded");
        frame.render_widget(empty, area);
        return;
    };

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(6),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);

    let heading = format!(
        "{}\nValue: {}",
        player.name, player.detail.market_value
    );
    let header = Paragraph::new(heading).style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(header, sections[0]);

    let info = [
        format!("Team:        {}", player.team),
        format!("Nationality: {}", player.detail.nationality),
        format!("Position:    {}", player.detail.position),
        format!("Age:         {}", player.detail.age),
    ]
    .join("\n");
    let info = Paragraph::new(info)
        .block(Block::default().title("Player Info").borders(Borders::ALL));
    frame.render_widget(info, sections[1]);

    let image = Paragraph::new(format!("Photo: {}", player.detail.image_url))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(image, sections[2]);

    render_transfers(frame, sections[3], state);
}

fn render_transfers(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(player) = &state.player else {
        return;
    };

    let block = Block::default().title("Transfer History").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    if player.detail.transfers.is_empty() {
        let empty = Paragraph::new(format!("No transfers to show for {}", player.name))
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let widths = transfer_columns();
    let header_area = Rect {
        height: 1,
        ..inner
    };
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(header_area);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    render_cell_text(frame, cols[0], "Date", bold);
    render_cell_text(frame, cols[1], "Origin", bold);
    render_cell_text(frame, cols[2], "Destination", bold);
    render_cell_text(frame, cols[3], "Fee", bold);

    let visible = inner.height.saturating_sub(1) as usize;
    for (i, transfer) in player.detail.transfers.iter().take(visible).enumerate() {
        let row_area = Rect {
            x: inner.x,
            y: inner.y + 1 + i as u16,
            width: inner.width,
            height: 1,
        };
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);
        render_cell_text(frame, cols[0], &transfer.date, Style::default());
        render_cell_text(frame, cols[1], &transfer.origin, Style::default());
        render_cell_text(frame, cols[2], &transfer.destination, Style::default());
        render_cell_text(frame, cols[3], &transfer.fee, Style::default());
    }
}

fn transfer_columns() -> [Constraint; 4] {
    [
        Constraint::Length(14),
        Constraint::Min(14),
        Constraint::Min(14),
        Constraint::Length(14),
    ]
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    let skip = state.logs.len().saturating_sub(2);
    state
        .logs
        .iter()
        .skip(skip)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
