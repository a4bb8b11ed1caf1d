use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::constants::STATIC_WAIT;
use crate::encoder::Command;
use crate::errors::SaveError;
use crate::structures::{Document, ScreenSequence};

/// Where one save landed: the raw command list, the commented copy and
/// the reloadable input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPaths {
    pub raw: PathBuf,
    pub descriptive: PathBuf,
    pub json: PathBuf,
}

/// Writes every command in order, one line each.
pub fn write_commands<W: Write>(writer: &mut W, screens: &[Vec<Command>]) -> io::Result<()> {
    for screen in screens {
        for command in screen {
            writeln!(writer, "{}", command)?;
        }
    }
    Ok(())
}

/// The commented form: a `// Screen #1:` (or frame) marker above each
/// screen's block, with a blank line between blocks.
fn write_descriptive<W: Write>(
    writer: &mut W,
    screens: &[Vec<Command>],
    wait_time: i32,
) -> io::Result<()> {
    let label = if wait_time == STATIC_WAIT { "Screen" } else { "Frame" };
    for (index, screen) in screens.iter().enumerate() {
        if index > 0 {
            writeln!(writer)?;
        }
        writeln!(writer, "// {} #{}:", label, index + 1)?;
        for command in screen {
            writeln!(writer, "{}", command)?;
        }
    }
    Ok(())
}

/// First save number whose raw file does not exist yet, so a new save
/// never lands on top of an old one.
fn next_save_number(out_dir: &Path) -> u32 {
    let mut number = 1;
    while out_dir.join(format!("code{}.txt", number)).is_file() {
        number += 1;
    }
    number
}

/// Compacts a copy of the sequence, encodes it once and writes the three
/// artifacts: `code{N}.txt`, `code_with_descriptions{N}.txt` and
/// `input_code{N}.json`. A sequence with nothing lit writes nothing and
/// returns `Ok(None)`.
pub fn save(
    sequence: &ScreenSequence,
    wait_time: i32,
    out_dir: &Path,
) -> Result<Option<SavedPaths>, SaveError> {
    let mut compacted = sequence.clone();
    let screens = compacted.encode_screens(wait_time);
    if screens.is_empty() {
        return Ok(None);
    }

    fs::create_dir_all(out_dir)?;
    let number = next_save_number(out_dir);
    let paths = SavedPaths {
        raw: out_dir.join(format!("code{}.txt", number)),
        descriptive: out_dir.join(format!("code_with_descriptions{}.txt", number)),
        json: out_dir.join(format!("input_code{}.json", number)),
    };

    write_commands(&mut File::create(&paths.raw)?, &screens)?;
    write_descriptive(&mut File::create(&paths.descriptive)?, &screens, wait_time)?;

    let document = Document {
        screens: compacted,
        wait_time,
    };
    serde_json::to_writer_pretty(File::create(&paths.json)?, &document)?;

    Ok(Some(paths))
}

/// Prints the whole command stream to stdout, one command per line. A
/// blank sequence prints nothing.
pub fn print_all(sequence: &ScreenSequence, wait_time: i32) -> io::Result<()> {
    let mut compacted = sequence.clone();
    let screens = compacted.encode_screens(wait_time);
    write_commands(&mut io::stdout().lock(), &screens)
}
