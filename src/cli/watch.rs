//! Watch command implementation - Interactive TUI viewer.

// CLI watch uses intentional casts for display and timing
#![allow(
    clippy::similar_names,
    clippy::needless_pass_by_value,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]

use super::{CliError, PolicyKind};
use collect::session::Session;
use collect::{Action, GridPosition, Player};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::collections::HashMap;
use std::io::stdout;
use std::time::{Duration, Instant};

/// Execute the watch command.
///
/// # Errors
///
/// Returns an error if the TUI fails.
pub(crate) fn execute(
    width: i32,
    height: i32,
    players: usize,
    resources: usize,
    seed: Option<u64>,
    policy: PolicyKind,
    speed: u64,
) -> Result<(), CliError> {
    // Generate seed if not provided
    let seed = seed.unwrap_or_else(super::random_seed);
    let config = super::game_config(width, height, players, resources);
    let session = super::build_session(config, seed, policy)?;

    // Run the TUI
    run_tui(session, seed, speed)
}

/// App state for the TUI.
struct App {
    session: Session,
    seed: u64,
    paused: bool,
    speed_ms: u64,
    last_tick: Instant,
}

impl App {
    fn new(session: Session, seed: u64, speed_ms: u64) -> Self {
        Self {
            session,
            seed,
            paused: true, // Start paused
            speed_ms: speed_ms.clamp(10, 500),
            last_tick: Instant::now(),
        }
    }

    fn advance(&mut self) -> Result<(), CliError> {
        self.session.tick()?;
        self.last_tick = Instant::now();
        Ok(())
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    fn increase_speed(&mut self) {
        self.speed_ms = self.speed_ms.saturating_sub(10).max(10);
    }

    fn decrease_speed(&mut self) {
        self.speed_ms = (self.speed_ms + 10).min(500);
    }

    fn should_auto_tick(&self) -> bool {
        !self.paused && self.last_tick.elapsed() >= Duration::from_millis(self.speed_ms)
    }
}

fn run_tui(session: Session, seed: u64, speed: u64) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session, seed, speed);
    let mut outcome = Ok(());

    loop {
        // Draw
        if let Err(e) = terminal.draw(|f| ui(f, &app)) {
            outcome = Err(e.into());
            break;
        }

        // Auto-tick if needed
        if app.should_auto_tick()
            && let Err(e) = app.advance()
        {
            outcome = Err(e);
            break;
        }

        // Handle input with timeout
        if event::poll(Duration::from_millis(10))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Esc => break,
                KeyCode::Char(' ') => app.toggle_pause(),
                KeyCode::Enter => {
                    let _ = app.session.toggle_human_control();
                }
                KeyCode::Char('n') => {
                    app.paused = true;
                    if let Err(e) = app.advance() {
                        outcome = Err(e);
                        break;
                    }
                }
                KeyCode::Char('+' | '=') => app.increase_speed(),
                KeyCode::Char('-') => app.decrease_speed(),
                KeyCode::Char('q') => app.session.set_pending_action(Action::UpLeft),
                KeyCode::Char('w') | KeyCode::Up => {
                    app.session.set_pending_action(Action::Up);
                }
                KeyCode::Char('e') => app.session.set_pending_action(Action::UpRight),
                KeyCode::Char('a') | KeyCode::Left => {
                    app.session.set_pending_action(Action::Left);
                }
                KeyCode::Char('d') | KeyCode::Right => {
                    app.session.set_pending_action(Action::Right);
                }
                KeyCode::Char('z') => app.session.set_pending_action(Action::DownLeft),
                KeyCode::Char('x') | KeyCode::Down => {
                    app.session.set_pending_action(Action::Down);
                }
                KeyCode::Char('c') => app.session.set_pending_action(Action::DownRight),
                _ => {}
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    outcome
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(10),    // Main content
            Constraint::Length(3),  // Footer
        ])
        .split(f.area());

    // Header
    render_header(f, chunks[0], app);

    // Main content - field and stats
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[1]);

    render_field(f, main_chunks[0], app);
    render_stats(f, main_chunks[1], app);

    // Footer
    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let status = if app.paused { "PAUSED" } else { "RUNNING" };

    let title = format!(
        " Collect | Seed {} | Round {} | Tick {}/{} | {} | {}ms/tick ",
        app.seed,
        app.session.round(),
        app.session.round_tick(),
        app.session.round_ticks(),
        status,
        app.speed_ms
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_field(f: &mut Frame, area: Rect, app: &App) {
    let game = app.session.game();
    let config = game.config();
    let target = game.target();

    // Viewport centered on the target, clamped to the field
    let visible_width = (area.width as usize).saturating_sub(2).min(config.width as usize);
    let visible_height = (area.height as usize).saturating_sub(2).min(config.height as usize);
    let origin_x = (target.x - visible_width as i32 / 2)
        .clamp(0, (config.width - visible_width as i32).max(0));
    let origin_y = (target.y - visible_height as i32 / 2)
        .clamp(0, (config.height - visible_height as i32).max(0));

    // Entities drawn over empty cells; later inserts win a shared cell
    let mut cells: HashMap<GridPosition, (char, Style)> = HashMap::new();
    cells.insert(
        target,
        ('T', Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
    );
    for resource in game.resources() {
        cells.insert(*resource, ('*', Style::default().fg(Color::Yellow)));
    }
    for player in game.players() {
        cells.insert(player.position, player_cell(player));
    }
    cells.insert(
        game.monster(),
        ('M', Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
    );

    let mut lines: Vec<Line> = Vec::new();
    for sy in 0..visible_height {
        let mut spans = Vec::new();
        for sx in 0..visible_width {
            let world = GridPosition::new(origin_x + sx as i32, origin_y + sy as i32);
            if let Some((ch, style)) = cells.get(&world) {
                spans.push(Span::styled(ch.to_string(), *style));
            } else {
                spans.push(Span::styled(".", Style::default().fg(Color::DarkGray)));
            }
        }
        lines.push(Line::from(spans));
    }

    let field_widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Field "));

    f.render_widget(field_widget, area);
}

fn player_cell(player: &Player) -> (char, Style) {
    let ch = char::from_digit((player.identifier % 10) as u32, 10).unwrap_or('?');
    let mut style = Style::default().fg(player_color(player.identifier));
    if player.has_resource {
        style = style.add_modifier(Modifier::BOLD);
    }
    (ch, style)
}

fn render_stats(f: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let game = session.game();
    let mut lines = Vec::new();

    lines.push(Line::from(""));

    for player in game.players() {
        let color = player_color(player.identifier);
        let human = session.human_player() == Some(player.identifier);

        let tag = if human { " [HUMAN]" } else { "" };
        let carrying = if player.has_resource { " [CARRYING]" } else { "" };

        lines.push(Line::from(vec![
            Span::styled(
                format!("Player {}", player.identifier),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{tag}{carrying}")),
        ]));

        lines.push(Line::from(format!("  Score: {}", player.score)));
        lines.push(Line::from(format!(
            "  Rolling: {}",
            session.rolling_score(player.identifier)
        )));
        lines.push(Line::from(format!(
            "  Reward: {:.2}",
            session.rolling_reward(player.identifier)
        )));
        if let Some(epsilon) = session.exploration_rate(player.identifier) {
            lines.push(Line::from(format!("  Epsilon: {:.1}%", epsilon * 100.0)));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(format!("Steals: {}", session.steals())));
    lines.push(Line::from(format!("Resources: {}", game.resources().len())));

    let stats_widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Players "))
        .wrap(Wrap { trim: false });

    f.render_widget(stats_widget, area);
}

fn player_color(identifier: usize) -> Color {
    match identifier {
        0 => Color::Red,
        1 => Color::Blue,
        2 => Color::Green,
        3 => Color::Yellow,
        4 => Color::Magenta,
        5 => Color::Cyan,
        6 => Color::LightRed,
        7 => Color::LightBlue,
        _ => Color::White,
    }
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let controls = if app.session.human_player().is_some() {
        " [Esc] Quit  [Space] Pause  [Enter] Release control  [qwe/adz/xc] Move  [n] Step  [+/-] Speed "
    } else {
        " [Esc] Quit  [Space] Pause  [Enter] Take control  [n] Step  [+/-] Speed "
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}
