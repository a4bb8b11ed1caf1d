use std::path::PathBuf;

use crate::code_writer::{self, SavedPaths};
use crate::constants::STATIC_WAIT;
use crate::errors::SaveError;
use crate::structures::{Document, PixelGrid, ScreenSequence};
use crate::undo::UndoHistory;

/// One discrete editing action, fed to [`EditorSession::apply`] by the
/// front-end loop. Coordinates and screen indices are 0-based here; the
/// front-end translates whatever it shows the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    Toggle(u8, u8),
    NextScreen,
    PrevScreen,
    Undo,
    Clear,
    Save,
    Print,
    CopyFrom(usize),
    ToggleAnimationMode,
    SetWaitTime(i32),
}

/// What a command did, so the front-end knows whether to redraw or report.
#[derive(Debug)]
pub enum Outcome {
    Changed,
    NoOp,
    Saved(SavedPaths),
    Printed,
}

/// All editing state for one run: the stored screens, the shared wait
/// time, the screen being edited and its working grid, and the undo
/// stacks. The working grid is a copy of the current screen and is synced
/// back into the sequence on navigation, save and print.
pub struct EditorSession {
    sequence: ScreenSequence,
    wait_time: i32,
    current_screen: usize,
    working_grid: PixelGrid,
    undo_history: UndoHistory,
    output_dir: PathBuf,
}

impl EditorSession {
    pub fn new(document: Document, output_dir: PathBuf) -> Self {
        let working_grid = document.screens.screen(0).cloned().unwrap_or_default();
        EditorSession {
            sequence: document.screens,
            wait_time: document.wait_time,
            current_screen: 0,
            working_grid,
            undo_history: UndoHistory::new(),
            output_dir,
        }
    }

    pub fn current_screen(&self) -> usize {
        self.current_screen
    }

    pub fn wait_time(&self) -> i32 {
        self.wait_time
    }

    pub fn is_animation(&self) -> bool {
        self.wait_time != STATIC_WAIT
    }

    pub fn working_grid(&self) -> &PixelGrid {
        &self.working_grid
    }

    /// Applies one command. Only filesystem trouble during save or print
    /// surfaces as an error; everything else reports through the outcome.
    pub fn apply(&mut self, command: EditorCommand) -> Result<Outcome, SaveError> {
        match command {
            EditorCommand::Toggle(x, y) => {
                self.undo_history
                    .record(self.current_screen, &self.working_grid);
                self.working_grid.toggle(x, y);
                Ok(Outcome::Changed)
            }
            EditorCommand::Clear => {
                self.undo_history
                    .record(self.current_screen, &self.working_grid);
                self.working_grid = PixelGrid::new();
                Ok(Outcome::Changed)
            }
            EditorCommand::CopyFrom(index) => {
                self.undo_history
                    .record(self.current_screen, &self.working_grid);
                self.working_grid = self.sequence.screen(index).cloned().unwrap_or_default();
                Ok(Outcome::Changed)
            }
            EditorCommand::NextScreen => {
                self.store_working_grid();
                self.current_screen += 1;
                self.seed_working_grid();
                Ok(Outcome::Changed)
            }
            EditorCommand::PrevScreen => {
                if self.current_screen == 0 {
                    return Ok(Outcome::NoOp);
                }
                self.store_working_grid();
                self.current_screen -= 1;
                self.seed_working_grid();
                Ok(Outcome::Changed)
            }
            EditorCommand::Undo => match self.undo_history.undo(self.current_screen) {
                Some(snapshot) => {
                    self.sequence.set_screen(self.current_screen, &snapshot);
                    self.working_grid = snapshot;
                    Ok(Outcome::Changed)
                }
                None => Ok(Outcome::NoOp),
            },
            EditorCommand::Save => {
                self.store_working_grid();
                match code_writer::save(&self.sequence, self.wait_time, &self.output_dir)? {
                    Some(paths) => Ok(Outcome::Saved(paths)),
                    None => Ok(Outcome::NoOp),
                }
            }
            EditorCommand::Print => {
                self.store_working_grid();
                if self.sequence.is_blank() {
                    return Ok(Outcome::NoOp);
                }
                code_writer::print_all(&self.sequence, self.wait_time)?;
                Ok(Outcome::Printed)
            }
            EditorCommand::ToggleAnimationMode => {
                self.wait_time = if self.is_animation() { STATIC_WAIT } else { 0 };
                Ok(Outcome::Changed)
            }
            EditorCommand::SetWaitTime(ms) => {
                self.wait_time = ms;
                Ok(Outcome::Changed)
            }
        }
    }

    fn store_working_grid(&mut self) {
        self.sequence.set_screen(self.current_screen, &self.working_grid);
    }

    fn seed_working_grid(&mut self) {
        self.working_grid = self
            .sequence
            .screen(self.current_screen)
            .cloned()
            .unwrap_or_default();
    }
}
