//! Raw terminal input to game intents.
//!
//! Mapping is pure: it looks at the event and the current game, and never
//! mutates anything. Whether an intent is actually allowed is still the
//! game's call.

use crate::ui::{CELL_H, CELL_W};
use breach_core::{Coord, Direction, Game, GamePhase, Intent};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

/// What the frame loop should do with an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Apply(Intent),
    Quit,
}

/// Map any terminal event; `grid` is where the board was last drawn
pub fn map_event(event: &Event, game: &Game, grid: Rect) -> Option<Command> {
    match event {
        Event::Key(key) => map_key(key, game),
        Event::Mouse(mouse) => map_mouse(mouse, game, grid),
        _ => None,
    }
}

/// Map a key press
pub fn map_key(key: &KeyEvent, game: &Game) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    match game.phase {
        GamePhase::EnterName => map_name_key(key),
        GamePhase::Playing => map_play_key(key, game),
        // Animations gate everything except quitting
        _ => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
            _ => None,
        },
    }
}

fn map_name_key(key: &KeyEvent) -> Option<Command> {
    let intent = match key.code {
        KeyCode::Enter => Intent::CommitName,
        KeyCode::Backspace => Intent::Backspace,
        KeyCode::Esc => Intent::RequestRestart,
        KeyCode::Char(c) => Intent::TypeChar(c),
        _ => return None,
    };
    Some(Command::Apply(intent))
}

fn map_play_key(key: &KeyEvent, game: &Game) -> Option<Command> {
    let intent = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(Command::Quit),
        KeyCode::Up => return step(game, Direction::Up),
        KeyCode::Down => return step(game, Direction::Down),
        KeyCode::Left => return step(game, Direction::Left),
        KeyCode::Right => return step(game, Direction::Right),
        KeyCode::Char(' ') | KeyCode::Char('r') => Intent::Roll,
        KeyCode::Enter => Intent::Resolve,
        KeyCode::Char('1') => Intent::Rewind(0),
        KeyCode::Char('2') => Intent::Rewind(1),
        KeyCode::Char('o') => Intent::Overload,
        KeyCode::Char('s') => Intent::Skip,
        _ => return None,
    };
    Some(Command::Apply(intent))
}

/// Select the neighbour of the player token in `direction`
fn step(game: &Game, direction: Direction) -> Option<Command> {
    game.player_position()
        .neighbor(direction, game.board.size())
        .map(|coord| Command::Apply(Intent::SelectTile(coord)))
}

/// Map a left click on the board to a tile selection
pub fn map_mouse(mouse: &MouseEvent, game: &Game, grid: Rect) -> Option<Command> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) || !game.is_playing() {
        return None;
    }
    cell_at(mouse.column, mouse.row, grid, game.board.size())
        .map(|coord| Command::Apply(Intent::SelectTile(coord)))
}

/// Which cell of a `size` x `size` board drawn at `grid` contains a point.
///
/// Cells sit at a fixed pitch from the grid origin; `grid` may be clipped
/// on small terminals, so points outside it never hit a cell.
pub fn cell_at(x: u16, y: u16, grid: Rect, size: u8) -> Option<Coord> {
    if x < grid.x || y < grid.y || x >= grid.x + grid.width || y >= grid.y + grid.height {
        return None;
    }

    let col = (x - grid.x) / CELL_W;
    let row = (y - grid.y) / CELL_H;

    if col >= u16::from(size) || row >= u16::from(size) {
        return None;
    }
    Some(Coord::new(row as u8, col as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn apply(intent: Intent) -> Option<Command> {
        Some(Command::Apply(intent))
    }

    #[test]
    fn test_arrows_select_neighbours() {
        let game = Game::standard(1);
        // Player starts bottom-left
        assert_eq!(
            map_key(&press(KeyCode::Up), &game),
            apply(Intent::SelectTile(Coord::new(2, 0)))
        );
        assert_eq!(
            map_key(&press(KeyCode::Right), &game),
            apply(Intent::SelectTile(Coord::new(3, 1)))
        );
        assert_eq!(map_key(&press(KeyCode::Down), &game), None);
        assert_eq!(map_key(&press(KeyCode::Left), &game), None);
    }

    #[test]
    fn test_play_keys() {
        let game = Game::standard(1);
        assert_eq!(map_key(&press(KeyCode::Char(' ')), &game), apply(Intent::Roll));
        assert_eq!(map_key(&press(KeyCode::Enter), &game), apply(Intent::Resolve));
        assert_eq!(map_key(&press(KeyCode::Char('1')), &game), apply(Intent::Rewind(0)));
        assert_eq!(map_key(&press(KeyCode::Char('2')), &game), apply(Intent::Rewind(1)));
        assert_eq!(map_key(&press(KeyCode::Char('o')), &game), apply(Intent::Overload));
        assert_eq!(map_key(&press(KeyCode::Char('s')), &game), apply(Intent::Skip));
        assert_eq!(map_key(&press(KeyCode::Char('q')), &game), Some(Command::Quit));
        assert_eq!(map_key(&press(KeyCode::Char('x')), &game), None);
    }

    #[test]
    fn test_name_entry_keys() {
        let mut game = Game::standard(1);
        game.phase = GamePhase::EnterName;
        assert_eq!(map_key(&press(KeyCode::Char('q')), &game), apply(Intent::TypeChar('q')));
        assert_eq!(map_key(&press(KeyCode::Backspace), &game), apply(Intent::Backspace));
        assert_eq!(map_key(&press(KeyCode::Enter), &game), apply(Intent::CommitName));
        assert_eq!(map_key(&press(KeyCode::Esc), &game), apply(Intent::RequestRestart));
    }

    #[test]
    fn test_animations_only_allow_quit() {
        let mut game = Game::standard(1);
        game.phase = GamePhase::WinAnimation { started_at: 0 };
        assert_eq!(map_key(&press(KeyCode::Char(' ')), &game), None);
        assert_eq!(map_key(&press(KeyCode::Esc), &game), Some(Command::Quit));
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let mut game = Game::standard(1);
        game.phase = GamePhase::EnterName;
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&key, &game), Some(Command::Quit));
    }

    #[test]
    fn test_key_release_is_ignored() {
        let game = Game::standard(1);
        let key = KeyEvent {
            code: KeyCode::Char(' '),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_key(&key, &game), None);
    }

    #[test]
    fn test_cell_at() {
        let grid = Rect::new(10, 5, 32, 16);
        assert_eq!(cell_at(10, 5, grid, 4), Some(Coord::new(0, 0)));
        assert_eq!(cell_at(41, 20, grid, 4), Some(Coord::new(3, 3)));
        assert_eq!(cell_at(18, 9, grid, 4), Some(Coord::new(1, 1)));
        assert_eq!(cell_at(9, 5, grid, 4), None);
        assert_eq!(cell_at(42, 5, grid, 4), None);
    }

    #[test]
    fn test_cell_at_on_clipped_grid() {
        // Terminal too small for the whole board: only the top-left part shows
        let grid = Rect::new(0, 0, 20, 10);
        assert_eq!(cell_at(17, 9, grid, 4), Some(Coord::new(2, 2)));
        assert_eq!(cell_at(8, 4, grid, 4), Some(Coord::new(1, 1)));
        assert_eq!(cell_at(7, 3, grid, 4), Some(Coord::new(0, 0)));
        assert_eq!(cell_at(20, 9, grid, 4), None);
        assert_eq!(cell_at(17, 10, grid, 4), None);
    }

    #[test]
    fn test_click_selects_tile() {
        let game = Game::standard(1);
        let grid = Rect::new(0, 0, 32, 16);
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 1,
            row: 13,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(
            map_mouse(&click, &game, grid),
            apply(Intent::SelectTile(Coord::new(3, 0)))
        );
    }
}
