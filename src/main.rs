//! Tarsia Maker
//!
//! Command-line editor for Tarsia puzzles. Puzzles travel between commands as
//! save tokens: each editing command reads a token, applies one change and
//! prints the new token, so commands can be chained through a pipe.

use std::io::Read;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;

use tarsia::grid::{format_layout, format_puzzle};
use tarsia::{
    GridChoice, InvalidTokenError, PieceIndex, PieceIndexError, PuzzleState, Session, Side,
};

/// Creates, edits and shuffles Tarsia puzzles stored as save tokens.
#[derive(Parser)]
#[command(name = "tarsia")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the available grids.
    Grids,
    /// Show the tiles and pieces of a grid.
    Layout { grid: GridChoice },
    /// Print the token of the starter puzzle.
    New {
        #[arg(long, default_value_t = GridChoice::default())]
        grid: GridChoice,
    },
    /// Print the questions and answers of a puzzle.
    Show(TokenArg),
    /// Renumber the pieces at random, keeping questions with their answers.
    Shuffle(TokenArg),
    /// Change the grid. Text on pieces the new grid lacks is kept.
    SetGrid {
        grid: GridChoice,
        #[command(flatten)]
        token: TokenArg,
    },
    /// Remove all text, keeping the grid.
    Clear(TokenArg),
    /// Replace the text of one piece. Giving no lines removes it.
    Set {
        side: SideArg,
        index: PieceIndex,
        lines: Vec<String>,
        #[command(flatten)]
        token: TokenArg,
    },
}

#[derive(clap::Args)]
struct TokenArg {
    /// Save token to read. Read from stdin when omitted.
    #[arg(long)]
    token: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum SideArg {
    Question,
    Answer,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Question => Side::Question,
            SideArg::Answer => Side::Answer,
        }
    }
}

/// Failure reported to the user before exiting.
#[derive(Error, Debug)]
enum CliError {
    #[error("Failed to read token: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid tarsia code: {0}")]
    Token(#[from] InvalidTokenError),
    #[error("{0}")]
    Piece(#[from] PieceIndexError),
}

fn main() -> ExitCode {
    env_logger::builder().init();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Runs one command and returns what it prints.
fn run(command: Command) -> Result<String, CliError> {
    let output = match command {
        Command::Grids => list_grids(),
        Command::Layout { grid } => format_layout(&tarsia::compute(grid)).trim_end().to_string(),
        Command::New { grid } => Session::new(PuzzleState::default().with_grid(grid)).save(),
        Command::Show(token) => {
            let session = load(token)?;
            format_puzzle(session.state(), session.layout())
                .trim_end()
                .to_string()
        }
        Command::Shuffle(token) => {
            let mut session = load(token)?;
            session.shuffle();
            session.save()
        }
        Command::SetGrid { grid, token } => {
            let mut session = load(token)?;
            session.set_grid(grid);
            session.save()
        }
        Command::Clear(token) => {
            let mut session = load(token)?;
            session.clear();
            session.save()
        }
        Command::Set {
            side,
            index,
            lines,
            token,
        } => {
            let mut session = load(token)?;
            session.set_text(side.into(), index, lines)?;
            session.save()
        }
    };
    Ok(output)
}

/// Builds a session from `--token`, or from stdin when it is absent.
fn load(arg: TokenArg) -> Result<Session, CliError> {
    let token = match arg.token {
        Some(token) => token,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let mut session = Session::default();
    session.load(&token)?;
    Ok(session)
}

/// Lists each grid with its tile and piece counts.
fn list_grids() -> String {
    GridChoice::ALL
        .iter()
        .map(|&grid| {
            let layout = tarsia::compute(grid);
            format!(
                "{:<16}{:>3} tiles{:>4} pieces",
                grid.id(),
                layout.tile_count(),
                layout.piece_count()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
