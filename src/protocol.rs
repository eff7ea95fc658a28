//! Turn protocol spoken with the game authority.
//!
//! The server streams text lines. A blank line ends a block and asks for one
//! line of player input; `EDIT` asks for a rearranged hand (and table); `END`
//! closes the session. Nothing in here performs I/O: the binary reads lines,
//! feeds them to [`TurnProtocol`], and writes back whatever the `answer_*`
//! functions return.

use std::collections::VecDeque;

use crate::Hand;

/// Reserved token: terminate the session
pub const END_TOKEN: &str = "END";
/// Reserved token: request a hand/table rearrangement
pub const EDIT_TOKEN: &str = "EDIT";
/// Reply that aborts an edit
pub const ABORT_EDIT: &str = "end";

/// Classification of one line received from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Message(String),
    EndOfBlock,
    Edit,
    End,
}

impl Inbound {
    /// `None` means the server closed the stream, which ends the session.
    pub fn from_line(line: Option<&str>) -> Self {
        match line {
            None => Inbound::End,
            Some(END_TOKEN) => Inbound::End,
            Some(EDIT_TOKEN) => Inbound::Edit,
            Some("") => Inbound::EndOfBlock,
            Some(text) => Inbound::Message(text.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// One line of free-form player input
    Turn,
    /// Updated hand, then (unless aborted) updated table
    Edit,
}

/// What the client should do after feeding a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Show(String),
    Prompt(PromptKind),
    Close,
}

/// Session state machine
#[derive(Debug, Default)]
pub struct TurnProtocol {
    closed: bool,
    prompts_issued: usize,
}

impl TurnProtocol {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one server line (`None` at end of stream)
    pub fn feed(&mut self, line: Option<&str>) -> Step {
        if self.closed {
            return Step::Close;
        }

        match Inbound::from_line(line) {
            Inbound::Message(text) => Step::Show(text),
            Inbound::EndOfBlock => {
                self.prompts_issued += 1;
                Step::Prompt(PromptKind::Turn)
            }
            Inbound::Edit => {
                self.prompts_issued += 1;
                Step::Prompt(PromptKind::Edit)
            }
            Inbound::End => {
                self.closed = true;
                Step::Close
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of prompts issued so far
    pub fn prompts(&self) -> usize {
        self.prompts_issued
    }
}

/// Source of player input lines
pub trait InputSource {
    /// Next line without its terminator, or `None` when input is exhausted
    fn next_line(&mut self) -> Option<String>;

    /// Show a prompt to the player. Scripted sources ignore it.
    fn prompt(&mut self, _message: &str) {}
}

/// Pre-supplied input lines, consumed in order
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput(VecDeque<String>);

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedInput(lines.into_iter().map(Into::into).collect())
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.0.push_back(line.into());
    }

    pub fn remaining(&self) -> usize {
        self.0.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_line(&mut self) -> Option<String> {
        self.0.pop_front()
    }
}

fn require_line<S: InputSource + ?Sized>(input: &mut S) -> Result<String, String> {
    input
        .next_line()
        .ok_or_else(|| "Input closed before the server prompt was answered".to_string())
}

/// Reply to a turn prompt: exactly one line
pub fn answer_turn<S: InputSource + ?Sized>(input: &mut S) -> Result<Vec<String>, String> {
    Ok(vec![require_line(input)?])
}

/// Reply to an edit prompt.
///
/// Returns `["end"]` when the player aborts, otherwise the normalized hand
/// line followed by the table line. Hand lines that do not parse as tiles are
/// rejected and the player is asked again.
pub fn answer_edit<S: InputSource + ?Sized>(input: &mut S) -> Result<Vec<String>, String> {
    input.prompt("Type end to kill the game OR, ");

    let hand = loop {
        input.prompt("Enter your updated hand without the tiles you want to use: ");
        let line = require_line(input)?;
        if line.trim() == ABORT_EDIT {
            return Ok(vec![ABORT_EDIT.to_string()]);
        }

        match Hand::parse(&line) {
            Ok(hand) => break hand,
            Err(e) => {
                eprintln!("Rejected hand {:?}: {}", line, e);
            }
        }
    };

    input.prompt("Enter the updated table: ");
    let table = require_line(input)?;

    Ok(vec![hand.to_wire(), table])
}

/// Reply lines for whichever prompt the protocol issued
pub fn answer<S: InputSource + ?Sized>(
    kind: PromptKind,
    input: &mut S,
) -> Result<Vec<String>, String> {
    match kind {
        PromptKind::Turn => answer_turn(input),
        PromptKind::Edit => answer_edit(input),
    }
}
