use std::fmt;

use crate::constants::{GRID_SIZE, MAX_WAIT_MS, STATIC_WAIT, TICK_MS};
use crate::structures::PixelGrid;

/// One driver instruction: the opcode that ends up quoted in the emitted
/// files plus the comment that sits next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub opcode: String,
    pub comment: String,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted = format!("\"{}\"", self.opcode);
        write!(f, "{:<6}\t\t\t// {}", quoted, self.comment)
    }
}

pub fn encode_turn_on() -> Command {
    Command {
        opcode: "e0f".to_string(),
        comment: "Select max brightness".to_string(),
    }
}

pub fn encode_turn_off() -> Command {
    Command {
        opcode: "e00".to_string(),
        comment: "Select min brightness".to_string(),
    }
}

pub fn encode_select_all() -> Command {
    Command {
        opcode: "a".to_string(),
        comment: "Select all".to_string(),
    }
}

/// Selects a single LED. The driver wants the row digit before the column
/// digit; the comment numbers both from 1.
pub fn encode_select(x: u8, y: u8) -> Command {
    assert!(
        (x as usize) < GRID_SIZE && (y as usize) < GRID_SIZE,
        "LED coordinates are 0-15"
    );
    Command {
        opcode: format!("s{:x}{:x}", y, x),
        comment: format!("Select LED on row {} on column {}", y + 1, x + 1),
    }
}

/// The commands that move the driver past the current screen. A static
/// screen holds until an external trigger and, unless it is the last one,
/// is followed by an explicit screen change. An animation frame waits a
/// number of 15 ms ticks and moves on by itself, last frame included.
pub fn encode_advance(wait_time: i32, is_last_screen: bool) -> Vec<Command> {
    if wait_time == STATIC_WAIT {
        let mut commands = vec![Command {
            opcode: "wffff".to_string(),
            comment: "Stop here".to_string(),
        }];
        if !is_last_screen {
            commands.push(Command {
                opcode: "x".to_string(),
                comment: "Next screen".to_string(),
            });
        }
        commands
    } else {
        // 983025 ms and up would format as "wffff", the indefinite hold
        let clamped = wait_time.clamp(0, MAX_WAIT_MS);
        vec![Command {
            opcode: format!("w{:04x}", clamped / TICK_MS),
            comment: format!("Wait for about {} milliseconds", clamped),
        }]
    }
}

/// Encodes one screen: the brightness preamble, one select per lit LED in
/// column-then-row order, then the advance commands. `None` stands in for
/// an index with nothing stored and emits only the static-hold advance.
pub fn encode_screen(
    grid: Option<&PixelGrid>,
    is_last_screen: bool,
    wait_time: i32,
) -> Vec<Command> {
    let grid = match grid {
        Some(grid) => grid,
        None => return encode_advance(STATIC_WAIT, false),
    };

    let mut commands = vec![encode_turn_off(), encode_select_all(), encode_turn_on()];
    for (x, y) in grid.lit() {
        commands.push(encode_select(x, y));
    }
    commands.extend(encode_advance(wait_time, is_last_screen));
    commands
}
