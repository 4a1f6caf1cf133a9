//! Customer display (VFD) command byte strings.
//!
//! Two-line, 20-column displays that accept the ESC/POS display subset.
//! Commands taking a parameter are built by the helpers at the bottom of
//! this module, which validate the documented ranges.

use crate::{CodeError, NamedCommand};

/// Number of character columns on the display.
pub const COLUMNS: u8 = 20;
/// Number of character rows on the display.
pub const ROWS: u8 = 2;

/// `HT`: move cursor one column right.
pub const MOVE_CURSOR_RIGHT: &[u8] = b"\x09";
/// `BS`: move cursor one column left.
pub const MOVE_CURSOR_LEFT: &[u8] = b"\x08";
/// `US LF`: move cursor up one line.
pub const MOVE_CURSOR_UP: &[u8] = b"\x1f\x0a";
/// `LF`: move cursor down one line.
pub const MOVE_CURSOR_DOWN: &[u8] = b"\x0a";
/// `US CR`: move cursor to the right-most position.
pub const MOVE_CURSOR_RIGHT_MOST: &[u8] = b"\x1f\x0d";
/// `CR`: move cursor to the left-most position.
pub const MOVE_CURSOR_LEFT_MOST: &[u8] = b"\x0d";
/// `VT`: move cursor to the home position (top left).
pub const MOVE_CURSOR_HOME: &[u8] = b"\x0b";
/// `US B`: move cursor to the bottom position (bottom left).
pub const MOVE_CURSOR_BOTTOM: &[u8] = b"\x1f\x42";
/// `US $`: prefix of the goto command, followed by `x y`.
pub const CURSOR_GOTO: &[u8] = b"\x1f\x24";
/// `US C`: prefix of the cursor display command, followed by `n`.
pub const CURSOR_DISPLAY: &[u8] = b"\x1f\x43";
/// `FF`: clear the whole screen.
pub const CLEAR_SCREEN: &[u8] = b"\x0c";
/// `CAN`: clear the line the cursor is on.
pub const CLEAR_CURSOR_LINE: &[u8] = b"\x18";
/// `US X`: prefix of the brightness command, followed by `n`.
pub const BRIGHTNESS: &[u8] = b"\x1f\x58";
/// `US E`: prefix of the blink command, followed by `n`.
pub const BLINK_DISPLAY: &[u8] = b"\x1f\x45";

/// All fixed display commands, by name.
pub const COMMANDS: &[NamedCommand] = &[
    cmd("move-cursor-right", "cursor one column right", MOVE_CURSOR_RIGHT),
    cmd("move-cursor-left", "cursor one column left", MOVE_CURSOR_LEFT),
    cmd("move-cursor-up", "cursor one line up", MOVE_CURSOR_UP),
    cmd("move-cursor-down", "cursor one line down", MOVE_CURSOR_DOWN),
    cmd(
        "move-cursor-right-most",
        "cursor to right-most position",
        MOVE_CURSOR_RIGHT_MOST,
    ),
    cmd(
        "move-cursor-left-most",
        "cursor to left-most position",
        MOVE_CURSOR_LEFT_MOST,
    ),
    cmd("move-cursor-home", "cursor to home position", MOVE_CURSOR_HOME),
    cmd(
        "move-cursor-bottom",
        "cursor to bottom position",
        MOVE_CURSOR_BOTTOM,
    ),
    cmd("clear-screen", "clear the display", CLEAR_SCREEN),
    cmd("clear-line", "clear the cursor line", CLEAR_CURSOR_LINE),
];

const fn cmd(name: &'static str, description: &'static str, bytes: &'static [u8]) -> NamedCommand {
    NamedCommand {
        name,
        description,
        bytes,
    }
}

/// Relative and absolute cursor movements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CursorMove {
    /// One column right.
    Right,
    /// One column left.
    Left,
    /// One line up.
    Up,
    /// One line down.
    Down,
    /// Right-most column of the current line.
    RightMost,
    /// Left-most column of the current line.
    LeftMost,
    /// Top left.
    Home,
    /// Bottom left.
    Bottom,
}

impl CursorMove {
    /// The command bytes for this movement.
    pub fn command(self) -> &'static [u8] {
        match self {
            CursorMove::Right => MOVE_CURSOR_RIGHT,
            CursorMove::Left => MOVE_CURSOR_LEFT,
            CursorMove::Up => MOVE_CURSOR_UP,
            CursorMove::Down => MOVE_CURSOR_DOWN,
            CursorMove::RightMost => MOVE_CURSOR_RIGHT_MOST,
            CursorMove::LeftMost => MOVE_CURSOR_LEFT_MOST,
            CursorMove::Home => MOVE_CURSOR_HOME,
            CursorMove::Bottom => MOVE_CURSOR_BOTTOM,
        }
    }
}

/// `US C n`: show (`n = 1`) or hide (`n = 0`) the cursor.
pub fn cursor_display(visible: bool) -> [u8; 3] {
    [CURSOR_DISPLAY[0], CURSOR_DISPLAY[1], u8::from(visible)]
}

/// `US $ x y`: move the cursor to column `col` (1–20) of row `row` (1–2).
pub fn cursor_goto(col: u8, row: u8) -> Result<[u8; 4], CodeError> {
    check_range("column", col, 1, COLUMNS)?;
    check_range("row", row, 1, ROWS)?;
    Ok([CURSOR_GOTO[0], CURSOR_GOTO[1], col, row])
}

/// `US X n`: set brightness level `n` (1–4).
pub fn brightness(level: u8) -> Result<[u8; 3], CodeError> {
    check_range("brightness", level, 1, 4)?;
    Ok([BRIGHTNESS[0], BRIGHTNESS[1], level])
}

/// `US E n`: blink with `n × 50 ms` on and off.
///
/// `n = 0` cancels blinking; `n = 255` turns the display off.
pub fn blink(interval: u8) -> [u8; 3] {
    [BLINK_DISPLAY[0], BLINK_DISPLAY[1], interval]
}

pub(crate) fn check_range(param: &'static str, value: u8, min: u8, max: u8) -> Result<(), CodeError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(CodeError::OutOfRange {
            param,
            value: u32::from(value),
            min: u32::from(min),
            max: u32::from(max),
        })
    }
}
