use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use compiler::structures::Document;
use compiler::{
    load_document, print_all, save, EditorCommand, EditorSession, Outcome, SavedPaths, GRID_SIZE,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Edit screens interactively and save driver code from the editor
    Edit {
        /// Input JSON to start from; scans the output directory when absent
        input: Option<PathBuf>,
        #[clap(short, long, default_value = "code")]
        out_dir: PathBuf,
    },
    /// Compile an input JSON straight to the three code artifacts
    Build {
        input: PathBuf,
        #[clap(short, long, default_value = "code")]
        out_dir: PathBuf,
    },
    /// Print an input JSON's command stream
    Print { input: PathBuf },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Edit { input, out_dir } => run_edit(input, out_dir),
        Commands::Build { input, out_dir } => run_build(&input, &out_dir),
        Commands::Print { input } => run_print(&input),
    }
}

fn run_build(input: &Path, out_dir: &Path) {
    let document = load_document(input).expect("Could not load input file");
    match save(&document.screens, document.wait_time, out_dir).expect("Could not save code") {
        Some(paths) => report_saved(&paths),
        None => println!("Nothing to save"),
    }
}

fn run_print(input: &Path) {
    let document = load_document(input).expect("Could not load input file");
    print_all(&document.screens, document.wait_time).expect("Could not write to stdout");
}

fn run_edit(input: Option<PathBuf>, out_dir: PathBuf) {
    let document = match input.or_else(|| pick_input_file(&out_dir)) {
        Some(path) => {
            println!("Inputting file {}", path.display());
            println!();
            log::info!("loading {}", path.display());
            load_document(&path).expect("Could not load input file")
        }
        None => Document::default(),
    };

    let mut session = EditorSession::new(document, out_dir);
    println!("Type \"help\" for the command list.");
    render_screen(&session);

    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush().expect("Could not flush stdout");

        line.clear();
        let read = io::stdin()
            .read_line(&mut line)
            .expect("Could not read from stdin");
        if read == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let action = match parse_line(&line) {
            Some(action) => action,
            None => {
                println!("Unknown command, type \"help\" for the list");
                continue;
            }
        };
        match action {
            Action::Quit => break,
            Action::Help => print_help(),
            Action::Show => render_screen(&session),
            Action::Core(command) => {
                log::debug!("applying {:?}", command);
                match session.apply(command).expect("Could not write code files") {
                    Outcome::Changed => render_screen(&session),
                    Outcome::NoOp => println!("Nothing to do"),
                    Outcome::Saved(paths) => report_saved(&paths),
                    Outcome::Printed => println!(),
                }
            }
        }
    }
}

/// Lists files in `dir` whose name contains "input" and asks for one by
/// index, re-asking until the answer is in range. `None` when there is
/// nothing to offer.
fn pick_input_file(dir: &Path) -> Option<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return None,
    };
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.contains("input"))
                .unwrap_or(false)
        })
        .collect();
    candidates.sort();

    if candidates.is_empty() {
        return None;
    }

    loop {
        for (index, path) in candidates.iter().enumerate() {
            println!("{} : {}", index, path.display());
        }
        println!();
        print!("Give input file index from the list: ");
        io::stdout().flush().expect("Could not flush stdout");

        let mut answer = String::new();
        io::stdin()
            .read_line(&mut answer)
            .expect("Could not read from stdin");
        let index: usize = answer.trim().parse().expect("Could not parse index");
        if index < candidates.len() {
            return Some(candidates.swap_remove(index));
        }
        println!("Incorrect index");
        println!();
    }
}

/// What one input line asks for: a core editing command, or one of the
/// shim-level actions that never leave the front-end.
#[derive(Debug, PartialEq, Eq)]
enum Action {
    Core(EditorCommand),
    Show,
    Help,
    Quit,
}

/// Parses one line of editor input. Screen numbers are 1-based on the
/// surface, coordinates 0-based like the rulers around the grid.
fn parse_line(line: &str) -> Option<Action> {
    let mut words = line.split_whitespace();
    let action = match words.next()? {
        "t" | "toggle" => {
            let x: u8 = words.next()?.parse().ok()?;
            let y: u8 = words.next()?.parse().ok()?;
            if (x as usize) >= GRID_SIZE || (y as usize) >= GRID_SIZE {
                return None;
            }
            Action::Core(EditorCommand::Toggle(x, y))
        }
        "n" | "next" => Action::Core(EditorCommand::NextScreen),
        "p" | "prev" => Action::Core(EditorCommand::PrevScreen),
        "u" | "undo" => Action::Core(EditorCommand::Undo),
        "c" | "clear" => Action::Core(EditorCommand::Clear),
        "s" | "save" => Action::Core(EditorCommand::Save),
        "print" => Action::Core(EditorCommand::Print),
        "copy" => {
            let screen_number: usize = words.next()?.parse().ok()?;
            Action::Core(EditorCommand::CopyFrom(screen_number.checked_sub(1)?))
        }
        "a" | "animate" => Action::Core(EditorCommand::ToggleAnimationMode),
        "w" | "wait" => Action::Core(EditorCommand::SetWaitTime(words.next()?.parse().ok()?)),
        "show" => Action::Show,
        "help" | "?" => Action::Help,
        "q" | "quit" => Action::Quit,
        _ => return None,
    };
    match words.next() {
        Some(_) => None,
        None => Some(action),
    }
}

fn render_screen(session: &EditorSession) {
    println!();
    if session.is_animation() {
        println!(
            "Frame {} ({} ms per frame)",
            session.current_screen() + 1,
            session.wait_time()
        );
    } else {
        println!("Screen {}", session.current_screen() + 1);
    }

    print!("  ");
    for x in 0..GRID_SIZE {
        print!(" {:x}", x);
    }
    println!();
    for y in 0..GRID_SIZE {
        print!(" {:x}", y);
        for x in 0..GRID_SIZE {
            if session.working_grid().is_lit(x as u8, y as u8) {
                print!(" #");
            } else {
                print!(" .");
            }
        }
        println!();
    }
}

fn report_saved(paths: &SavedPaths) {
    println!("Saved raw code to {:?}", paths.raw);
    println!("and informative code to {:?}", paths.descriptive);
    println!("and input code to {:?}", paths.json);
}

fn print_help() {
    println!("Commands:");
    println!("  t X Y        toggle the LED at column X, row Y (0-15)");
    println!("  n / p        go to the next / previous screen");
    println!("  u            undo the last edit on this screen");
    println!("  c            clear this screen");
    println!("  copy K       copy screen K here (as numbered above the grid)");
    println!("  a            toggle animation mode");
    println!("  w MS         set milliseconds per frame");
    println!("  s            save the code files");
    println!("  print        print the command stream");
    println!("  show         redraw the grid");
    println!("  q            quit without saving");
}
