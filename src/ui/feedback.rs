use std::io::Write;

use anyhow::Result;
use crossterm::cursor::{MoveLeft, MoveTo};
use crossterm::style::{Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};

use crate::session::input::Action;
use crate::session::target::TargetText;
use crate::ui::theme::Palette;

/// Receives the matcher's decisions for one run or replay and turns them
/// into something visible.
pub trait Feedback {
    fn begin_run(&mut self, target: &TargetText, replay: bool) -> Result<()>;
    fn action(&mut self, action: &Action) -> Result<()>;
    fn end_run(&mut self) -> Result<()>;
}

/// Draws the target on one line and overwrites it in place as keys arrive.
pub struct TerminalFeedback<W: Write> {
    out: W,
    palette: Palette,
    show_lookahead: bool,
}

impl<W: Write> TerminalFeedback<W> {
    pub fn new(out: W, palette: Palette, show_lookahead: bool) -> Self {
        Self {
            out,
            palette,
            show_lookahead,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn pending_style(&mut self) -> Result<()> {
        if self.show_lookahead {
            queue!(self.out, SetForegroundColor(self.palette.pending))?;
        } else {
            queue!(self.out, ResetColor)?;
        }
        Ok(())
    }
}

impl<W: Write> Feedback for TerminalFeedback<W> {
    fn begin_run(&mut self, target: &TargetText, _replay: bool) -> Result<()> {
        queue!(self.out, MoveTo(0, 0), Clear(ClearType::All))?;
        self.pending_style()?;
        queue!(self.out, Print(target), ResetColor, MoveTo(0, 0))?;
        self.out.flush()?;
        Ok(())
    }

    fn action(&mut self, action: &Action) -> Result<()> {
        match *action {
            Action::Matched(ch) => queue!(
                self.out,
                SetForegroundColor(self.palette.correct),
                Print(ch),
                ResetColor
            )?,
            Action::Mismatched(expected) => queue!(
                self.out,
                SetForegroundColor(self.palette.incorrect),
                Print(expected),
                ResetColor
            )?,
            Action::Edited {
                revealed,
                moved: true,
            } => {
                queue!(self.out, MoveLeft(1))?;
                self.pending_style()?;
                queue!(self.out, Print(revealed), ResetColor, MoveLeft(1))?;
            }
            Action::Edited { moved: false, .. } | Action::Ignored | Action::Terminate => {
                return Ok(());
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn end_run(&mut self) -> Result<()> {
        execute!(self.out, ResetColor)?;
        Ok(())
    }
}

/// Keeps every action in memory. Used by tests and by anything that wants
/// to compare two passes over the same target.
#[derive(Clone, Debug, Default)]
pub struct ActionLog {
    pub runs: Vec<Vec<Action>>,
    pub replays: Vec<bool>,
}

impl ActionLog {
    pub fn last_run(&self) -> &[Action] {
        self.runs.last().map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Feedback for ActionLog {
    fn begin_run(&mut self, _target: &TargetText, replay: bool) -> Result<()> {
        self.runs.push(Vec::new());
        self.replays.push(replay);
        Ok(())
    }

    fn action(&mut self, action: &Action) -> Result<()> {
        if let Some(run) = self.runs.last_mut() {
            run.push(*action);
        }
        Ok(())
    }

    fn end_run(&mut self) -> Result<()> {
        Ok(())
    }
}
