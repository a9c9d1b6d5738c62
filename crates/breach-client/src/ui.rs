//! Terminal rendering.
//!
//! Reads the game and draws it; never mutates it. Flashing effects are
//! derived from the host clock so they keep blinking while the game waits
//! on a timed transition.

use breach_core::{Coord, Game, GamePhase, Millis};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Terminal columns per grid cell
pub const CELL_W: u16 = 8;
/// Terminal rows per grid cell
pub const CELL_H: u16 = 4;

const FLASH_MS: Millis = 250;
const CURSOR_MS: Millis = 500;
const LOG_LINES: usize = 5;

const PURPLE: Color = Color::Rgb(128, 0, 128);
const YELLOW: Color = Color::Rgb(255, 193, 7);
const LOG_GREEN: Color = Color::Rgb(0, 255, 0);

/// Draw one frame. Returns the area the grid cells occupy, for mouse hits.
pub fn draw(f: &mut Frame, game: &Game, now: Millis) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                   // Header
            Constraint::Min(10),                     // Board and panels
            Constraint::Length(LOG_LINES as u16 + 3), // Log / name entry
            Constraint::Length(1),                   // Key help
        ])
        .split(f.area());

    render_header(f, chunks[0], game);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(26),
            Constraint::Min(10),
            Constraint::Length(26),
        ])
        .split(chunks[1]);

    render_resources(f, main[0], game);
    let grid = render_grid(f, main[1], game, now);
    render_dice(f, main[2], game);
    render_log(f, chunks[2], game, now);
    render_help(f, chunks[3], game);

    grid
}

fn flash_on(now: Millis) -> bool {
    (now / FLASH_MS) % 2 == 0
}

fn render_header(f: &mut Frame, area: Rect, game: &Game) {
    let title = format!(" STATIC BREACH | {} ", game.phase.label().to_uppercase());
    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

/// Style for an ability or action line
fn action_style(enabled: bool) -> Style {
    if enabled {
        Style::default().fg(YELLOW).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_resources(f: &mut Frame, area: Rect, game: &Game) {
    let max_signal = game.config.starting_signal.max(0) as usize;
    let signal = game.resources.signal.clamp(0, max_signal as i32) as usize;
    let bar = format!("{}{}", "■ ".repeat(signal), "□ ".repeat(max_signal - signal));
    let costs = game.config.costs;

    let lines = vec![
        Line::from(Span::styled("SIGNAL STRENGTH", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(bar, Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(format!("Chrono: {}", game.resources.chrono)),
        Line::from(Span::styled(
            format!("Lore: {}", game.resources.lore),
            Style::default().fg(YELLOW),
        )),
        Line::from(""),
        Line::from(Span::styled("Chrono Abilities", Style::default().fg(YELLOW))),
        Line::from(Span::styled(
            format!("[1] RE ROLL 1 ({}C)", costs.rewind),
            action_style(game.can_rewind()),
        )),
        Line::from(Span::styled(
            format!("[2] RE ROLL 2 ({}C)", costs.rewind),
            action_style(game.can_rewind()),
        )),
        Line::from(Span::styled(
            format!("[o] OVERLOAD ({}C)", costs.overload),
            action_style(game.can_overload()),
        )),
        Line::from(Span::styled(
            format!("[s] SKIP ({}C)", costs.skip),
            action_style(game.can_skip()),
        )),
    ];

    let panel = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(panel, area);
}

fn render_dice(f: &mut Frame, area: Rect, game: &Game) {
    let face = |index: usize| {
        game.turn
            .dice
            .get(index)
            .map_or_else(|| "--".to_string(), |face| face.to_string())
    };

    let lines = vec![
        Line::from(Span::styled("Dice Results", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("DICE 1"),
        Line::from(Span::styled(format!("  {}", face(0)), Style::default().fg(Color::White))),
        Line::from("DICE 2"),
        Line::from(Span::styled(format!("  {}", face(1)), Style::default().fg(Color::White))),
        Line::from(""),
        Line::from(format!("Strength: {}", game.turn.strength)),
        Line::from(""),
        Line::from(Span::styled("[space] ROLL", action_style(game.can_roll()))),
        Line::from(Span::styled("[enter] RESOLVE", action_style(game.can_resolve()))),
    ];

    let panel = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(panel, area);
}

/// Lay out and draw the board, centred in `area`
fn render_grid(f: &mut Frame, area: Rect, game: &Game, now: Millis) -> Rect {
    let size = u16::from(game.board.size());
    let outer = centered(area, size * CELL_W + 2, size * CELL_H + 2);

    f.render_widget(Block::default().borders(Borders::ALL).title(" GRID "), outer);
    let inner = Rect::new(
        outer.x + 1,
        outer.y + 1,
        outer.width.saturating_sub(2),
        outer.height.saturating_sub(2),
    );

    for cell in game.board.cells() {
        let coord = cell.coord;
        let rect = Rect::new(
            inner.x + u16::from(coord.col) * CELL_W,
            inner.y + u16::from(coord.row) * CELL_H,
            CELL_W,
            CELL_H,
        )
        .intersection(inner);
        if rect.width == 0 || rect.height == 0 {
            continue;
        }

        let (text, style) = cell_look(game, coord, now);
        let border = if game.turn.selected == Some(coord) {
            Style::default().fg(YELLOW).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let widget = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(style)
            .block(Block::default().borders(Borders::ALL).border_style(border));
        f.render_widget(widget, rect);
    }

    inner
}

fn player_look() -> (String, Style) {
    ("@".into(), Style::default().fg(Color::Black).bg(Color::Cyan))
}

fn exit_look() -> (String, Style) {
    ("EXIT".into(), Style::default().fg(Color::White).bg(Color::Red))
}

/// Label and colours of one cell this frame
fn cell_look(game: &Game, coord: Coord, now: Millis) -> (String, Style) {
    let exit = game.board.exit();

    match &game.phase {
        GamePhase::LoreAnimation { coord: lore, .. } if *lore == coord => {
            return if flash_on(now) {
                (
                    "LORE".into(),
                    Style::default().fg(Color::Black).bg(YELLOW),
                )
            } else {
                player_look()
            };
        }
        GamePhase::WinAnimation { .. } if coord == exit => {
            return if flash_on(now) { player_look() } else { exit_look() };
        }
        GamePhase::LoseAnimation { fill, .. } => {
            let filled = game.board.fill_order().iter().take(*fill).any(|c| *c == coord);
            let full = *fill >= game.board.cell_count();
            if full && flash_on(now) {
                return ("!!".into(), Style::default().fg(Color::White).bg(Color::LightRed));
            }
            if filled {
                return filled_look();
            }
        }
        _ => {}
    }

    if coord == exit {
        exit_look()
    } else if coord == game.player_position() {
        player_look()
    } else if game.board.is_breached(&coord) {
        (String::new(), Style::default().bg(Color::Black))
    } else {
        let shield = game
            .board
            .shield_at(&coord)
            .map_or_else(String::new, |s| s.to_string());
        (
            shield,
            Style::default()
                .fg(Color::White)
                .bg(PURPLE)
                .add_modifier(Modifier::BOLD),
        )
    }
}

fn filled_look() -> (String, Style) {
    (String::new(), Style::default().bg(Color::Red))
}

fn render_log(f: &mut Frame, area: Rect, game: &Game, now: Millis) {
    let green = Style::default().fg(LOG_GREEN);

    let lines: Vec<Line> = if game.phase == GamePhase::EnterName {
        let cursor = if (now / CURSOR_MS) % 2 == 0 { "█" } else { " " };
        vec![
            Line::from(Span::styled(
                "ENTER NAME:",
                green.add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled(game.player_name.clone(), Style::default().fg(Color::White)),
                Span::raw(cursor),
            ]),
            Line::from(format!("Final score: {}", game.final_score)),
            Line::from(""),
            Line::from(Span::styled("[esc] RESTART GAME", green)),
        ]
    } else if game.is_game_over() {
        game.log()
            .take(1)
            .map(|msg| Line::from(Span::styled(msg.to_string(), green.add_modifier(Modifier::BOLD))))
            .collect()
    } else {
        game.recent_log(LOG_LINES)
            .into_iter()
            .map(|msg| {
                let style = if msg == "LORE FOUND!" {
                    green.add_modifier(Modifier::BOLD)
                } else {
                    green
                };
                Line::from(Span::styled(msg.to_string(), style))
            })
            .collect()
    };

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" LOG "));
    f.render_widget(panel, area);
}

fn render_help(f: &mut Frame, area: Rect, game: &Game) {
    let help = match game.phase {
        GamePhase::EnterName => "type name | [enter] submit | [backspace] delete | [esc] restart",
        GamePhase::Playing => {
            "[arrows/click] select | [space] roll | [enter] resolve | [1/2] re roll | [o] overload | [s] skip | [q] quit"
        }
        _ => "[q] quit",
    };
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

/// A `width` x `height` rect centred in `area`, clipped to it
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_centered_fits() {
        let area = Rect::new(0, 0, 40, 20);
        assert_eq!(centered(area, 34, 18), Rect::new(3, 1, 34, 18));
        assert_eq!(centered(area, 100, 100), area);
    }

    #[test]
    fn test_cell_look_basics() {
        let game = Game::standard(3);
        assert_eq!(cell_look(&game, game.board.exit(), 0).0, "EXIT");
        assert_eq!(cell_look(&game, game.player_position(), 0).0, "@");

        let shielded = Coord::new(1, 1);
        let shield = game.board.shield_at(&shielded).expect("shield");
        assert_eq!(cell_look(&game, shielded, 0).0, shield.to_string());
    }

    #[test]
    fn test_lore_flash_alternates() {
        let mut game = Game::standard(3);
        let coord = Coord::new(2, 0);
        game.phase = GamePhase::LoreAnimation {
            coord,
            started_at: 0,
        };
        assert_eq!(cell_look(&game, coord, 0).0, "LORE");
        assert_eq!(cell_look(&game, coord, 250).0, "@");
    }

    #[test]
    fn test_draw_returns_grid_area() {
        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).expect("terminal");
        let game = Game::standard(3);

        let mut grid = Rect::default();
        terminal
            .draw(|f| grid = draw(f, &game, 0))
            .expect("draw");

        assert_eq!(grid.width, 4 * CELL_W);
        assert_eq!(grid.height, 4 * CELL_H);
    }
}
