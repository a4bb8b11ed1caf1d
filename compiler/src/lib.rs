#[macro_use]
extern crate serde_derive;

mod code_writer;
mod constants;
pub mod encoder;
mod errors;
mod input_reader;
mod session;
pub mod structures;
mod undo;

pub use crate::code_writer::{print_all, save, write_commands, SavedPaths};
pub use crate::constants::{GRID_SIZE, MAX_WAIT_MS, STATIC_WAIT, TICK_MS};
pub use crate::errors::{LoadError, SaveError};
pub use crate::input_reader::load_document;
pub use crate::session::{EditorCommand, EditorSession, Outcome};
pub use crate::undo::UndoHistory;
