//! Interactive confirmation port.
//!
//! Production wires [`TerminalConfirm`] to stdin/stdout; tests replay
//! answers through [`ScriptedConfirm`]. Both share [`parse_answer`].

use std::collections::VecDeque;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

const PROMPT_SUFFIX: &str = " (y/n): ";

/// Yes/no question asked before a bulk or irreversible mutation.
pub trait Confirm {
    /// Blocks until a recognised answer is given.
    ///
    /// # Errors
    /// Returns an error when the answer source cannot be read or written.
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Interprets one answer line.
///
/// `y`/`yes` accept; `n`/`no`/empty decline; anything else is unrecognised.
pub fn parse_answer(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "" | "n" | "no" => Some(false),
        _ => None,
    }
}

/// Prompts on a writer and reads answers line by line, re-asking until one
/// is recognised. End of input counts as a decline.
pub struct TerminalConfirm<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl TerminalConfirm<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Confirm for TerminalConfirm<R, W> {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        loop {
            write!(self.output, "{question}{PROMPT_SUFFIX}")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(false);
            }
            if let Some(answer) = parse_answer(&line) {
                return Ok(answer);
            }
        }
    }
}

/// Replays a fixed answer sequence and records every question asked.
#[derive(Debug, Default)]
pub struct ScriptedConfirm {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedConfirm {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Questions shown so far, in order.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        self.asked.push(question.to_string());
        while let Some(answer) = self.answers.pop_front() {
            if let Some(parsed) = parse_answer(&answer) {
                return Ok(parsed);
            }
        }
        Ok(false)
    }
}
