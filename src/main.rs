use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph};

use formcast::export;
use formcast::metrics::TeamMetrics;
use formcast::predict::OutcomeProbs;
use formcast::state::{AppState, Comparison, PickSlot, Screen};
use formcast::tally::TeamSplit;

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new() -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.screen = Screen::Setup,
            KeyCode::Char('2') => {
                if self.state.comparison.is_some() {
                    self.state.screen = Screen::Dashboard;
                }
            }
            KeyCode::Char('3') => self.state.screen = Screen::Rankings,
            KeyCode::Char('j') | KeyCode::Down => {
                self.state.select_next();
                self.refresh_after_selection();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.select_prev();
                self.refresh_after_selection();
            }
            KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                if self.state.screen == Screen::Setup {
                    self.state.toggle_pick_slot();
                }
            }
            KeyCode::Enter | KeyCode::Char('d') => self.state.confirm_matchup(),
            KeyCode::Char('b') | KeyCode::Esc => self.state.screen = Screen::Setup,
            KeyCode::Char('s') => {
                if self.state.screen == Screen::Rankings {
                    self.state.cycle_rank_metric();
                }
            }
            KeyCode::Char('r') => self.reload_season(),
            KeyCode::Char('e') => self.export_comparison(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn refresh_after_selection(&mut self) {
        if self.state.screen == Screen::Setup {
            self.state.recompute_comparison();
        }
    }

    fn reload_season(&mut self) {
        match self.state.load_season() {
            Ok(()) => {
                let line = format!(
                    "[INFO] Loaded {} matches, {} teams ({})",
                    self.state.matches.len(),
                    self.state.teams.len(),
                    self.state.season_label
                );
                self.state.push_log(line);
            }
            Err(err) => self.state.push_log(format!("[WARN] Season load failed: {err:#}")),
        }
    }

    fn export_comparison(&mut self) {
        let Some(cmp) = self.state.comparison.clone() else {
            self.state.push_log("[INFO] Nothing to export yet");
            return;
        };
        let path = export_path(&cmp.team1, &cmp.team2);
        match export::export_comparison(&path, &self.state.season_label, &cmp, &self.state.matches)
        {
            Ok(report) => {
                self.state.push_log(format!(
                    "[INFO] Exported {} sheets ({} match rows) to {}",
                    report.sheets,
                    report.match_rows,
                    path.display()
                ));
                self.state.last_export = Some(path);
            }
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }
}

fn export_path(team1: &str, team2: &str) -> PathBuf {
    let slug = |name: &str| {
        name.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect::<String>()
    };
    PathBuf::from(format!("formcast_{}_vs_{}.xlsx", slug(team1), slug(team2)))
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new();
    app.reload_season();
    let res = run_app(&mut terminal, &mut app);

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

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
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
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Setup => render_setup(frame, chunks[1], &app.state),
        Screen::Dashboard => render_dashboard(frame, chunks[1], &app.state),
        Screen::Rankings => render_rankings(frame, chunks[1], &app.state),
    }

    let footer =
        Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let screen = match state.screen {
        Screen::Setup => "SETUP".to_string(),
        Screen::Dashboard => "MATCHUP".to_string(),
        Screen::Rankings => format!("RANKINGS | Sort: {}", state.rankings_metric.label()),
    };
    format!(
        "FORMCAST | {} | {} matches | {screen}",
        state.season_label,
        state.matches.len()
    )
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Setup => {
            "1 Setup | 3 Rankings | j/k Move | Tab Column | Enter Compare | r Reload | ? Help | q Quit"
                .to_string()
        }
        Screen::Dashboard => {
            "1 Setup | 3 Rankings | b/Esc Back | e Export | r Reload | ? Help | q Quit".to_string()
        }
        Screen::Rankings => {
            "1 Setup | 2 Matchup | j/k Move | s Sort | r Reload | ? Help | q Quit".to_string()
        }
    }
}

fn render_setup(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.teams.is_empty() {
        let empty = Paragraph::new(
            "No season loaded. Put open-data under the data dir (FORMCAST_DATA_DIR) or run the ingest bin, then press r.",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_team_picker(
        frame,
        cols[0],
        state,
        PickSlot::Team1,
        state.team1_selected,
    );
    render_team_picker(
        frame,
        cols[1],
        state,
        PickSlot::Team2,
        state.team2_selected,
    );
}

fn render_team_picker(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    slot: PickSlot,
    selected: usize,
) {
    let active = state.pick_slot == slot;
    let title = match slot {
        PickSlot::Team1 => "Team 1",
        PickSlot::Team2 => "Team 2",
    };
    let border_style = if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
        return;
    }
    let visible = inner.height as usize;
    let (start, end) = visible_range(selected, state.teams.len(), visible);

    let mut lines = Vec::with_capacity(end - start);
    for idx in start..end {
        let marker = if idx == selected { "> " } else { "  " };
        lines.push(format!("{marker}{}", state.teams[idx]));
    }
    let style = if active {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(Paragraph::new(lines.join("\n")).style(style), inner);
}

fn render_dashboard(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(cmp) = &state.comparison else {
        let empty = Paragraph::new("Pick two teams on the Setup screen first")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(5)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ])
        .split(rows[0]);

    let left = Paragraph::new(team_panel_text(&cmp.split1, &cmp.metrics1))
        .block(Block::default().title(cmp.team1.clone()).borders(Borders::ALL));
    frame.render_widget(left, columns[0]);

    let middle_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(7)])
        .split(columns[1]);

    let chart_block = Block::default().title("Rate Comparison").borders(Borders::ALL);
    let chart_inner = chart_block.inner(middle_chunks[0]);
    frame.render_widget(chart_block, middle_chunks[0]);
    frame.render_widget(rates_bar_chart(&cmp.metrics1, &cmp.metrics2), chart_inner);

    render_prediction(frame, middle_chunks[1], cmp);

    let right = Paragraph::new(team_panel_text(&cmp.split2, &cmp.metrics2))
        .block(Block::default().title(cmp.team2.clone()).borders(Borders::ALL));
    frame.render_widget(right, columns[2]);

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, rows[1]);
}

fn team_panel_text(split: &TeamSplit, metrics: &TeamMetrics) -> String {
    let lines = [
        format!("Played: {}", metrics.matches_played),
        format!(
            "Home:   {}W {}D {}L ({}:{})",
            split.home.wins,
            split.home.draws,
            split.home.losses,
            split.home.goals_for,
            split.home.goals_against
        ),
        format!(
            "Away:   {}W {}D {}L ({}:{})",
            split.away.wins,
            split.away.draws,
            split.away.losses,
            split.away.goals_for,
            split.away.goals_against
        ),
        String::new(),
        format!("Win%:   {:.2}", metrics.win_rate),
        format!("Draw%:  {:.2}", metrics.draw_rate),
        format!("Loss%:  {:.2}", metrics.loss_rate),
        format!("Avg GF: {:.2}", metrics.avg_goals_for),
        format!("Avg GA: {:.2}", metrics.avg_goals_against),
    ];
    lines.join("\n")
}

fn render_prediction(frame: &mut Frame, area: Rect, cmp: &Comparison) {
    let block = Block::default().title("Prediction").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(outcome) = &cmp.outcome else {
        let notice = Paragraph::new("Insufficient data: neither side has usable match history")
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(notice, inner);
        return;
    };

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(inner);

    let lines = [
        format!("{:<12} {:>6.2}%", truncate(&cmp.team1, 12), outcome.p_team1),
        format!("{:<12} {:>6.2}%", "Draw", outcome.p_draw),
        format!("{:<12} {:>6.2}%", truncate(&cmp.team2, 12), outcome.p_team2),
    ];
    frame.render_widget(Paragraph::new(lines.join("\n")), parts[0]);
    frame.render_widget(outcome_bar_chart(outcome), parts[1]);
}

fn truncate(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        name.chars().take(max.saturating_sub(1)).collect::<String>() + "…"
    }
}

fn outcome_bar_chart(outcome: &OutcomeProbs) -> BarChart<'static> {
    let team1 = Bar::default()
        .value(outcome.p_team1.round() as u64)
        .text_value(String::new())
        .style(Style::default().fg(Color::Green));
    let draw = Bar::default()
        .value(outcome.p_draw.round() as u64)
        .text_value(String::new())
        .style(Style::default().fg(Color::Yellow));
    let team2 = Bar::default()
        .value(outcome.p_team2.round() as u64)
        .text_value(String::new())
        .style(Style::default().fg(Color::Red));

    BarChart::default()
        .data(BarGroup::default().bars(&[team1, draw, team2]))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .group_gap(0)
        .max(100)
}

fn rates_bar_chart(m1: &TeamMetrics, m2: &TeamMetrics) -> BarChart<'static> {
    let pair = |label: &'static str, a: f64, b: f64| {
        BarGroup::default().label(label.into()).bars(&[
            Bar::default()
                .value(a.round() as u64)
                .style(Style::default().fg(Color::Green)),
            Bar::default()
                .value(b.round() as u64)
                .style(Style::default().fg(Color::Red)),
        ])
    };

    BarChart::default()
        .data(pair("Win%", m1.win_rate, m2.win_rate))
        .data(pair("Draw%", m1.draw_rate, m2.draw_rate))
        .data(pair("Loss%", m1.loss_rate, m2.loss_rate))
        .bar_width(5)
        .bar_gap(1)
        .group_gap(3)
        .max(100)
}

fn render_rankings(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = rankings_columns();
    render_rankings_header(frame, sections[0], &widths);

    let list_area = sections[1];
    if state.rankings.is_empty() {
        let empty = Paragraph::new("No season loaded").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }
    if list_area.height == 0 {
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.rankings_selected, state.rankings.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };

        let selected = idx == state.rankings_selected;
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

        let row = &state.rankings[idx];
        render_cell_text(frame, cols[0], &format!("{}", idx + 1), row_style);
        render_cell_text(frame, cols[1], &row.team, row_style);
        render_cell_text(
            frame,
            cols[2],
            &row.metrics.matches_played.to_string(),
            row_style,
        );
        render_cell_text(frame, cols[3], &format!("{:.1}", row.metrics.win_rate), row_style);
        render_cell_text(frame, cols[4], &format!("{:.1}", row.metrics.draw_rate), row_style);
        render_cell_text(frame, cols[5], &format!("{:.1}", row.metrics.loss_rate), row_style);
        render_cell_text(frame, cols[6], &row.goals_scored().to_string(), row_style);
        render_cell_text(frame, cols[7], &format!("{:+}", row.goal_difference()), row_style);
    }
}

fn rankings_columns() -> [Constraint; 8] {
    [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(5),
        Constraint::Length(5),
    ]
}

fn render_rankings_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);

    render_cell_text(frame, cols[0], "#", style);
    render_cell_text(frame, cols[1], "Team", style);
    render_cell_text(frame, cols[2], "Played", style);
    render_cell_text(frame, cols[3], "Win%", style);
    render_cell_text(frame, cols[4], "Draw%", style);
    render_cell_text(frame, cols[5], "Loss%", style);
    render_cell_text(frame, cols[6], "GF", style);
    render_cell_text(frame, cols[7], "GD", style);
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, area);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
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

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Formcast - Help",
        "",
        "Global:",
        "  1            Setup (team pickers)",
        "  2            Matchup dashboard",
        "  3            Season rankings",
        "  r            Reload season data",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Setup:",
        "  j/k or ↑/↓   Move in the active list",
        "  Tab / h / l  Switch picker column",
        "  Enter / d    Compare the two teams",
        "",
        "Dashboard:",
        "  e            Export matchup to xlsx",
        "  b / Esc      Back to setup",
        "",
        "Rankings:",
        "  s            Cycle sort metric",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
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
