//! Operator-facing prompt surface.
//!
//! `OperatorConsole` only knows how to print a notice and read one line
//! (plain or masked). Choice parsing and the reject-and-re-ask validation
//! loop live in [`select_item`] and [`prompt_until_valid`] so every console
//! implementation shares the same retry behaviour.

use std::borrow::Cow;
use std::io::{BufRead, IsTerminal, Stdout, Write};

use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
/// Enumerates the ways a single prompt can fail.
pub enum PromptError {
    #[error("input stream closed")]
    Eof,
    #[error("interrupted by operator")]
    Interrupted,
    #[error("failed to read input: {0}")]
    Io(String),
}

/// Trait contract for the interactive surface the launcher talks to.
pub trait OperatorConsole {
    fn notice(&mut self, message: &str);

    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError>;

    fn read_masked(&mut self, prompt: &str) -> Result<String, PromptError>;
}

/// Asks for one of `items` by number or name until a valid choice is given.
pub fn select_item(
    console: &mut dyn OperatorConsole,
    label: &str,
    items: &[&str],
) -> Result<usize, PromptError> {
    let choices = items
        .iter()
        .enumerate()
        .map(|(index, item)| format!("{}={}", index + 1, item))
        .collect::<Vec<_>>()
        .join(", ");
    let prompt = format!("{label} [{choices}]: ");
    loop {
        let raw = console.read_line(&prompt)?;
        if let Some(index) = parse_choice(&raw, items) {
            return Ok(index);
        }
        console.notice(&format!("invalid selection '{}', please try again", raw.trim()));
    }
}

/// Reads values until `validate` accepts one. Unbounded; ends only on input failure.
pub fn prompt_until_valid<F>(
    console: &mut dyn OperatorConsole,
    prompt: &str,
    masked: bool,
    validate: F,
) -> Result<String, PromptError>
where
    F: Fn(&str) -> Result<(), String>,
{
    loop {
        let raw = if masked {
            console.read_masked(prompt)?
        } else {
            console.read_line(prompt)?
        };
        let value = raw.trim();
        match validate(value) {
            Ok(()) => return Ok(value.to_string()),
            Err(reason) => console.notice(&format!("{reason}, please try again")),
        }
    }
}

fn parse_choice(raw: &str, items: &[&str]) -> Option<usize> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(number) = trimmed.parse::<usize>() {
        return (1..=items.len()).contains(&number).then(|| number - 1);
    }
    items
        .iter()
        .position(|item| item.eq_ignore_ascii_case(trimmed))
}

/// Console over any buffered reader; prints prompts and notices to stdout.
///
/// Used for non-terminal stdin and by tests with an in-memory script. Masked
/// reads cannot hide input here and behave like plain reads.
pub struct LineConsole<R, W = Stdout> {
    reader: R,
    writer: W,
    transcript: Vec<String>,
}

impl<R: BufRead> LineConsole<R> {
    pub fn new(reader: R) -> Self {
        Self::with_writer(reader, std::io::stdout())
    }
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn with_writer(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            transcript: Vec::new(),
        }
    }

    /// Every notice and prompt shown so far, in order.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    fn read_raw(&mut self, prompt: &str) -> Result<String, PromptError> {
        self.transcript.push(prompt.to_string());
        // The prompt has no newline, so it stays buffered until flushed.
        if let Err(error) = write!(self.writer, "{prompt}").and_then(|()| self.writer.flush()) {
            tracing::debug!(error = %error, "failed to show prompt");
        }
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(|error| PromptError::Io(error.to_string()))?;
        let _ = writeln!(self.writer);
        if read == 0 {
            return Err(PromptError::Eof);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl<R: BufRead, W: Write> OperatorConsole for LineConsole<R, W> {
    fn notice(&mut self, message: &str) {
        let _ = writeln!(self.writer, "{message}");
        self.transcript.push(message.to_string());
    }

    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError> {
        self.read_raw(prompt)
    }

    fn read_masked(&mut self, prompt: &str) -> Result<String, PromptError> {
        self.read_raw(prompt)
    }
}

#[derive(Default)]
struct MaskingHelper {
    masking: bool,
}

impl Completer for MaskingHelper {
    type Candidate = String;
}

impl Hinter for MaskingHelper {
    type Hint = String;
}

impl Validator for MaskingHelper {}

impl Highlighter for MaskingHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.masking {
            Cow::Owned("*".repeat(line.chars().count()))
        } else {
            Cow::Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        self.masking
    }
}

impl Helper for MaskingHelper {}

/// Interactive terminal console backed by rustyline; masked reads echo `*`.
pub struct TerminalConsole {
    editor: Editor<MaskingHelper, DefaultHistory>,
}

impl TerminalConsole {
    pub fn new() -> anyhow::Result<Self> {
        let mut editor = Editor::<MaskingHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(MaskingHelper::default()));
        Ok(Self { editor })
    }

    fn read_with_mask(&mut self, prompt: &str, masking: bool) -> Result<String, PromptError> {
        if let Some(helper) = self.editor.helper_mut() {
            helper.masking = masking;
        }
        let result = self.editor.readline(prompt);
        if let Some(helper) = self.editor.helper_mut() {
            helper.masking = false;
        }
        match result {
            Ok(line) => Ok(line),
            Err(ReadlineError::Eof) => Err(PromptError::Eof),
            Err(ReadlineError::Interrupted) => Err(PromptError::Interrupted),
            Err(error) => Err(PromptError::Io(error.to_string())),
        }
    }
}

impl OperatorConsole for TerminalConsole {
    fn notice(&mut self, message: &str) {
        println!("{message}");
    }

    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError> {
        self.read_with_mask(prompt, false)
    }

    fn read_masked(&mut self, prompt: &str) -> Result<String, PromptError> {
        self.read_with_mask(prompt, true)
    }
}

/// Picks the rustyline console for a terminal and a plain line reader otherwise.
pub fn open_operator_console() -> Box<dyn OperatorConsole> {
    if std::io::stdin().is_terminal() {
        match TerminalConsole::new() {
            Ok(console) => return Box::new(console),
            Err(error) => {
                tracing::warn!(error = %error, "terminal console unavailable, using line input");
            }
        }
    }
    Box::new(LineConsole::new(std::io::BufReader::new(std::io::stdin())))
}
