//! Interactive candidate selection.
//!
//! Hooks usually run with standard input redirected, so prompts are read
//! from the controlling terminal opened explicitly.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};

use comfy_table::{presets::UTF8_FULL, Cell, Table};
use tracing::debug;

use crate::errors::TerminalError;
use crate::models::{Candidate, CandidatePool};

pub const PROMPT: &str = "» Select a passport [ID] or «(q)uit»: ";

const GLOBAL_MARKER: &str = "global";

#[cfg(unix)]
const TTY_IN: &str = "/dev/tty";
#[cfg(unix)]
const TTY_OUT: &str = "/dev/tty";
#[cfg(windows)]
const TTY_IN: &str = "CONIN$";
#[cfg(windows)]
const TTY_OUT: &str = "CONOUT$";

// ---------------------------------------------------------------------------
// Prompt input
// ---------------------------------------------------------------------------

/// Source of interactive answers.
pub trait Prompter {
    /// Show `prompt` and read one line. `Ok(None)` means end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, TerminalError>;
}

/// Line-oriented prompt over any reader/writer pair.
pub struct LinePrompt<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompt<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, TerminalError> {
        self.writer.write_all(prompt.as_bytes())?;
        self.writer.flush()?;

        // Bytes, not `read_line`: undecodable input is an invalid answer,
        // not an I/O failure.
        let mut line = Vec::new();
        if self.reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }
}

/// Prompt bound to the controlling terminal.
pub type TerminalPrompt = LinePrompt<BufReader<File>, File>;

impl TerminalPrompt {
    /// Open the controlling terminal, ignoring standard input.
    pub fn open() -> Result<Self, TerminalError> {
        let input = OpenOptions::new()
            .read(true)
            .open(TTY_IN)
            .map_err(TerminalError::Unavailable)?;
        let output = OpenOptions::new()
            .write(true)
            .open(TTY_OUT)
            .map_err(TerminalError::Unavailable)?;
        Ok(LinePrompt::new(BufReader::new(input), output))
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// A parsed answer to the selection prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Chosen(usize),
    Quit,
}

/// Result of running the selector to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Chosen { key: usize, candidate: Candidate },
    Quit,
}

/// Interpret one line of input against `pool`.
///
/// Returns `None` for anything that is neither the quit token nor a key of
/// the pool.
pub fn parse_selection(input: &str, pool: &CandidatePool) -> Option<Selection> {
    let token = input.trim();
    if token.eq_ignore_ascii_case("q") || token.eq_ignore_ascii_case("quit") {
        return Some(Selection::Quit);
    }
    token
        .parse::<usize>()
        .ok()
        .filter(|key| pool.contains_key(*key))
        .map(Selection::Chosen)
}

/// Presents a candidate pool and blocks until a valid choice is made.
pub struct CandidateSelector {
    pool: CandidatePool,
}

impl CandidateSelector {
    pub fn new(pool: CandidatePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &CandidatePool {
        &self.pool
    }

    /// Table of candidates in ascending key order.
    pub fn render(&self) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["ID", "User", "Mail", "Service"]);

        for (key, candidate) in self.pool.iter() {
            let service = match candidate {
                Candidate::Passport(p) => p.service.as_str(),
                Candidate::Global(_) => GLOBAL_MARKER,
            };
            table.add_row(vec![
                Cell::new(key),
                Cell::new(candidate.name()),
                Cell::new(candidate.email()),
                Cell::new(service),
            ]);
        }

        table.to_string()
    }

    /// Prompt until the user picks a key of the pool or quits.
    ///
    /// Invalid answers are dropped and the prompt repeats with no limit.
    /// End of input on the terminal is an error, not a quit.
    pub fn select<P: Prompter>(self, prompt: &mut P) -> Result<Choice, TerminalError> {
        loop {
            let line = prompt.read_line(PROMPT)?.ok_or(TerminalError::Closed)?;

            match parse_selection(&line, &self.pool) {
                Some(Selection::Quit) => return Ok(Choice::Quit),
                Some(Selection::Chosen(key)) => {
                    if let Some(candidate) = self.pool.get(key) {
                        debug!(key, "passport selected");
                        return Ok(Choice::Chosen { key, candidate: candidate.clone() });
                    }
                }
                None => debug!(input = line.trim(), "ignoring invalid selection"),
            }
        }
    }
}
