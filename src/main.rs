use std::{
    collections::HashMap,
    fs::File,
    io::{self, stdout},
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use zodiac2048::{
    board::SIZE,
    config::{Args, GameConfig},
    game::{Game, GameEvent},
    glyph::{celebration_glyph, tile_glyph},
    input::{action_for_key, Action, SwipeTracker},
    leaderboard::LEADERBOARD_SIZE,
};

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 8;
const CELL_HEIGHT: u16 = 3;
const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// How long spawn/merge highlights stay lit. Purely cosmetic.
const HIGHLIGHT_DURATION: Duration = Duration::from_millis(200);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Highlight {
    Spawned,
    Merged,
}

// ============================================================================
// Color Mapping
// ============================================================================

fn tile_color(value: u32) -> Color {
    match value {
        0 => Color::DarkGray,
        2 | 4 => Color::White,
        8 | 16 => Color::Yellow,
        32 | 64 => Color::Rgb(255, 165, 0),
        128 | 256 => Color::Red,
        512 | 1024 => Color::Magenta,
        _ => Color::Cyan,
    }
}

// ============================================================================
// Rendering
// ============================================================================

struct View<'a> {
    game: &'a Game,
    config: &'a GameConfig,
    highlights: &'a HashMap<usize, Highlight>,
}

fn render(frame: &mut Frame, view: &View) {
    let area = frame.size();
    render_game(frame, view, area);
    if view.game.is_game_over() {
        render_game_over(frame, view.game, area);
    }
}

fn render_game(frame: &mut Frame, view: &View, area: Rect) {
    let board_width = SIZE as u16 * CELL_WIDTH + 2;
    let board_height = SIZE as u16 * CELL_HEIGHT + 2;
    let side_width = 26;
    let side_height = board_height.max(LEADERBOARD_SIZE as u16 + 8);
    let total_width = board_width + side_width;
    let total_height = side_height + 2;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([Constraint::Length(side_height), Constraint::Fill(1)])
        .split(main_area);
    let game_row = vertical[0];

    // Layout: [Board][Score + Leaderboard]
    let horizontal = Layout::horizontal([
        Constraint::Length(board_width),
        Constraint::Length(side_width),
    ])
    .split(game_row);

    let side = Layout::vertical([Constraint::Length(5), Constraint::Fill(1)]).split(horizontal[1]);

    render_board(frame, view, horizontal[0]);
    render_score(frame, view.game, side[0]);
    render_leaderboard(frame, view.game, side[1]);

    let controls_area = Rect {
        x: area.x,
        y: game_row.y + game_row.height,
        width: area.width,
        height: 2,
    };
    if controls_area.y + 1 < area.height {
        let controls = Paragraph::new(vec![Line::from(
            "Arrows/WASD/HJKL or drag: Move | N: New game | R: Restart | Q/ESC: Quit",
        )])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(controls, controls_area);
    }
}

fn render_board(frame: &mut Frame, view: &View, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Zodiac 2048 ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([Constraint::Length(CELL_HEIGHT); SIZE]).split(inner);
    for (row, row_area) in rows.iter().enumerate() {
        let cols = Layout::horizontal([Constraint::Length(CELL_WIDTH); SIZE]).split(*row_area);
        for (col, cell_area) in cols.iter().enumerate() {
            let index = row * SIZE + col;
            render_cell(frame, view, index, *cell_area);
        }
    }
}

fn render_cell(frame: &mut Frame, view: &View, index: usize, area: Rect) {
    let value = view.game.board().get(index);
    let mut style = Style::default().fg(tile_color(value));
    match view.highlights.get(&index) {
        Some(Highlight::Merged) => style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED),
        Some(Highlight::Spawned) => style = style.add_modifier(Modifier::BOLD),
        None => {}
    }

    let mut lines = vec![Line::from(Span::styled(tile_glyph(value), style))];
    if view.config.show_numbers && value != 0 {
        lines.push(Line::from(Span::styled(value.to_string(), style)));
    }

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(paragraph, area);
}

fn render_score(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Score ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let best = game.leaderboard().best().unwrap_or(0).max(game.score());
    let lines = vec![
        Line::from(Span::styled(
            game.score().to_string(),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(format!("Best {best}")),
        Line::from(format!("Top tile {}", celebration_glyph(game.max_tile()))),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn render_leaderboard(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Leaderboard ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = if game.leaderboard().is_empty() {
        vec![Line::from(Span::styled(
            "No scores yet",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        game.leaderboard()
            .entries()
            .iter()
            .enumerate()
            .map(|(rank, record)| {
                let style = if game.last_rank() == Some(rank) {
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(Span::styled(
                    format!("#{:<2} {:>6}  {}", rank + 1, record.score, record.date),
                    style,
                ))
            })
            .collect()
    };

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_game_over(frame: &mut Frame, game: &Game, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("GAME OVER", Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(celebration_glyph(game.max_tile())),
        Line::from(format!("Score: {}", game.score())),
        Line::from(""),
        Line::from(Span::styled(
            "Press R to play again",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "Press ESC to quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Game Over ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    let popup_area = centered_rect(26, 11, area);
    frame.render_widget(paragraph, popup_area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Main Loop
// ============================================================================

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let Some(path) = args.log_path() else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn collect_highlights(events: Vec<GameEvent>, highlights: &mut HashMap<usize, Highlight>) {
    for event in events {
        match event {
            GameEvent::NewGame => highlights.clear(),
            GameEvent::TileSpawned { index, .. } => {
                highlights.insert(index, Highlight::Spawned);
            }
            GameEvent::TilesMerged { index, .. } => {
                highlights.insert(index, Highlight::Merged);
            }
            _ => {}
        }
    }
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, config: &GameConfig) -> io::Result<()> {
    let mut game = Game::from_config(config);
    let mut swipes = SwipeTracker::new(config.swipe_threshold);
    let mut highlights = HashMap::new();
    let mut highlighted_at = Instant::now();

    loop {
        if highlighted_at.elapsed() >= HIGHLIGHT_DURATION {
            highlights.clear();
        }

        terminal.draw(|frame| {
            let view = View {
                game: &game,
                config,
                highlights: &highlights,
            };
            render(frame, &view)
        })?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        let action = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => action_for_key(key.code),
            Event::Mouse(mouse) => swipes.handle(&mouse).map(Action::Move),
            _ => None,
        };

        match action {
            Some(Action::Quit) => break,
            Some(Action::Move(direction)) => {
                game.apply_move(direction);
            }
            Some(Action::NewGame) => game.new_game(),
            Some(Action::Restart) if game.is_game_over() => game.new_game(),
            _ => {}
        }

        let events = game.take_events();
        if !events.is_empty() {
            highlights.clear();
            collect_highlights(events, &mut highlights);
            highlighted_at = Instant::now();
        }
    }

    game.finish();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;
    let config = args.into_config()?;

    // Setup terminal
    enable_raw_mode().context("enabling raw mode")?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &config);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(DisableMouseCapture)?;
    stdout().execute(LeaveAlternateScreen)?;

    result.context("running game loop")
}
