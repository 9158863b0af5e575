use std::io::Write;

use anyhow::Result;
use log::{info, warn};

use crate::clock::Clock;
use crate::error::InvalidOperation;
use crate::event::ByteSource;
use crate::session::controller::{RunOutcome, SessionController};
use crate::ui::feedback::Feedback;
use crate::ui::menu::{self, MenuCommand, MenuView, NumberInput};

/// How the session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exit {
    Quit,
    /// Ctrl+C or closed input.
    Abort,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Run,
    Replay,
    Menu,
    Done(Exit),
}

/// The outer menu loop around a session controller.
pub struct App<S: ByteSource, C: Clock, F: Feedback, W: Write> {
    pub controller: SessionController<S, C, F>,
    out: W,
    notice: Option<String>,
}

impl<S: ByteSource, C: Clock, F: Feedback, W: Write> App<S, C, F, W> {
    pub fn new(controller: SessionController<S, C, F>, out: W) -> Self {
        Self {
            controller,
            out,
            notice: None,
        }
    }

    pub fn into_parts(self) -> (SessionController<S, C, F>, W) {
        (self.controller, self.out)
    }

    /// Starts with a live run, then alternates between the menu and
    /// whatever the user picks until they quit.
    pub fn run(&mut self) -> Result<Exit> {
        let mut step = Step::Run;
        loop {
            step = match step {
                Step::Run => {
                    let outcome = self.controller.start_run();
                    self.settle(outcome)?
                }
                Step::Replay => {
                    let outcome = self.controller.replay();
                    self.settle(outcome)?
                }
                Step::Menu => self.menu()?,
                Step::Done(exit) => return Ok(exit),
            };
        }
    }

    /// Recoverable failures become a notice on the menu; anything else is
    /// fatal.
    fn settle(&mut self, outcome: Result<RunOutcome>) -> Result<Step> {
        match outcome {
            Ok(RunOutcome::Aborted) => Ok(Step::Done(Exit::Abort)),
            Ok(RunOutcome::Completed(_)) => Ok(Step::Menu),
            Err(err) => {
                self.report(err)?;
                Ok(Step::Menu)
            }
        }
    }

    fn report(&mut self, err: anyhow::Error) -> Result<()> {
        match err.downcast_ref::<InvalidOperation>() {
            Some(invalid) => {
                warn!("{invalid}");
                self.notice = Some(invalid.to_string());
                Ok(())
            }
            None => Err(err),
        }
    }

    fn draw_menu(&mut self) -> Result<()> {
        let notice = self.notice.take();
        let view = MenuView {
            result: self.controller.state().last_result.as_ref(),
            best_wpm: self.controller.best_wpm(),
            word_count: self.controller.word_count(),
            notice: notice.as_deref(),
        };
        menu::draw(&mut self.out, &view.lines())
    }

    fn menu(&mut self) -> Result<Step> {
        self.draw_menu()?;
        loop {
            let Some(byte) = self.controller.input_mut().next_byte()? else {
                return Ok(Step::Done(Exit::Abort));
            };
            let Some(command) = MenuCommand::from_byte(byte) else {
                continue;
            };
            info!("menu command {command:?}");
            let next = match command {
                MenuCommand::NewRun => Step::Run,
                MenuCommand::Replay => Step::Replay,
                MenuCommand::NewSample => {
                    self.controller.new_sample()?;
                    Step::Run
                }
                MenuCommand::ChangeSampleSize => {
                    let prompt = format!("words (1-{}): ", self.controller.pool_size());
                    let input = menu::read_number(self.controller.input_mut(), &mut self.out, &prompt)?;
                    match input {
                        NumberInput::Value(n) => match self.controller.set_word_count(n) {
                            Ok(()) => Step::Run,
                            Err(err) => {
                                self.report(err)?;
                                Step::Menu
                            }
                        },
                        NumberInput::Cancelled => Step::Menu,
                        NumberInput::Interrupted => Step::Done(Exit::Abort),
                    }
                }
                MenuCommand::Quit => Step::Done(Exit::Quit),
                MenuCommand::Interrupt => Step::Done(Exit::Abort),
            };
            return Ok(next);
        }
    }
}
