use std::io::Write;

use anyhow::Result;
use crossterm::cursor::{MoveLeft, MoveTo};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};

use crate::engine::scoring::RunResult;
use crate::event::ByteSource;
use crate::session::input::{DELETE, INTERRUPT};

const ESCAPE: u8 = 0x1b;
const MAX_DIGITS: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuCommand {
    NewRun,
    Replay,
    NewSample,
    ChangeSampleSize,
    Quit,
    Interrupt,
}

impl MenuCommand {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte.to_ascii_lowercase() {
            b'n' => Some(MenuCommand::NewRun),
            b'r' => Some(MenuCommand::Replay),
            b's' => Some(MenuCommand::NewSample),
            b'c' => Some(MenuCommand::ChangeSampleSize),
            b'q' => Some(MenuCommand::Quit),
            INTERRUPT => Some(MenuCommand::Interrupt),
            _ => None,
        }
    }
}

pub struct MenuItem {
    pub key: char,
    pub label: &'static str,
}

pub const MENU_ITEMS: &[MenuItem] = &[
    MenuItem {
        key: 'n',
        label: "new test",
    },
    MenuItem {
        key: 'r',
        label: "replay",
    },
    MenuItem {
        key: 's',
        label: "new word sample",
    },
    MenuItem {
        key: 'c',
        label: "change sample size",
    },
    MenuItem {
        key: 'q',
        label: "quit",
    },
];

/// What the menu screen shows about the session.
#[derive(Clone, Debug, Default)]
pub struct MenuView<'a> {
    pub result: Option<&'a RunResult>,
    pub best_wpm: f64,
    pub word_count: usize,
    pub notice: Option<&'a str>,
}

impl MenuView<'_> {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(r) = self.result {
            lines.push(format!("time:      {:.2}s", r.elapsed_secs));
            lines.push(format!("wpm:       {:.1}", r.adjusted_wpm));
            lines.push(format!("raw wpm:   {:.1}", r.raw_wpm));
            lines.push(format!(
                "accuracy:  {:.0}% ({}/{})",
                r.accuracy(),
                r.correct_chars,
                r.total_chars
            ));
        }
        lines.push(format!("best wpm:  {:.1}", self.best_wpm));
        lines.push(format!("words:     {}", self.word_count));
        lines.push(String::new());
        if let Some(notice) = self.notice {
            lines.push(format!("! {notice}"));
            lines.push(String::new());
        }
        let prompt = MENU_ITEMS
            .iter()
            .map(|item| format!("[{}] {}", item.key, item.label))
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(prompt);
        lines
    }
}

/// Raw mode has no line discipline, so every line ends in CRLF.
pub fn draw<W: Write>(out: &mut W, lines: &[String]) -> Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    for line in lines {
        queue!(out, Print(line), Print("\r\n"))?;
    }
    out.flush()?;
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumberInput {
    Value(usize),
    Cancelled,
    Interrupted,
}

/// Small echoing line editor for a decimal number: digits, Backspace,
/// Enter to accept, Esc to cancel.
pub fn read_number<S: ByteSource, W: Write>(
    input: &mut S,
    out: &mut W,
    prompt: &str,
) -> Result<NumberInput> {
    queue!(out, Print("\r\n"), Print(prompt))?;
    out.flush()?;

    let mut digits = String::new();
    loop {
        let Some(byte) = input.next_byte()? else {
            return Ok(NumberInput::Interrupted);
        };
        match byte {
            INTERRUPT => return Ok(NumberInput::Interrupted),
            ESCAPE => return Ok(NumberInput::Cancelled),
            b'\r' | b'\n' => {
                return Ok(digits
                    .parse()
                    .map_or(NumberInput::Cancelled, NumberInput::Value));
            }
            DELETE => {
                if digits.pop().is_some() {
                    queue!(out, MoveLeft(1), Print(' '), MoveLeft(1))?;
                }
            }
            b if b.is_ascii_digit() && digits.len() < MAX_DIGITS => {
                digits.push(char::from(b));
                queue!(out, Print(char::from(b)))?;
            }
            _ => continue,
        }
        out.flush()?;
    }
}
