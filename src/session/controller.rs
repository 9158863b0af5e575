use std::time::Duration;

use anyhow::Result;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::clock::Clock;
use crate::engine::scoring::{self, RunResult, SessionBest};
use crate::error::{InvalidOperation, ResourceError};
use crate::event::ByteSource;
use crate::generator::word_source::WordSource;
use crate::session::input::{self, Action, DEFAULT_SPACE_PLACEHOLDER, MatchState};
use crate::session::recorder::{self, KeyEvent, Recorder};
use crate::session::target::TargetText;
use crate::ui::feedback::Feedback;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Scoring,
    AwaitingDecision,
    Replaying,
    Terminated,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RunOutcome {
    Completed(RunResult),
    /// Ctrl+C or closed input. Not an error.
    Aborted,
}

#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub word_count: usize,
    pub space_placeholder: char,
    pub seed: Option<u64>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            word_count: 10,
            space_placeholder: DEFAULT_SPACE_PLACEHOLDER,
            seed: None,
        }
    }
}

/// Everything that survives between runs on one sample.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    pub target: Option<TargetText>,
    /// Keystrokes of the last completed run; replays read it, never extend it.
    pub last_log: Option<Vec<KeyEvent>>,
    pub last_result: Option<RunResult>,
    pub best: SessionBest,
    pub completed_runs: usize,
}

pub struct SessionController<S: ByteSource, C: Clock, F: Feedback> {
    words: WordSource,
    settings: SessionSettings,
    rng: SmallRng,
    state: SessionState,
    recorder: Recorder,
    phase: Phase,
    input: S,
    clock: C,
    feedback: F,
}

impl<S: ByteSource, C: Clock, F: Feedback> SessionController<S, C, F> {
    pub fn new(
        words: WordSource,
        settings: SessionSettings,
        input: S,
        clock: C,
        feedback: F,
    ) -> Result<Self, ResourceError> {
        words.ensure_capacity(settings.word_count)?;
        let rng = match settings.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Ok(Self {
            words,
            settings,
            rng,
            state: SessionState::default(),
            recorder: Recorder::new(),
            phase: Phase::Idle,
            input,
            clock,
            feedback,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn target(&self) -> Option<&TargetText> {
        self.state.target.as_ref()
    }

    pub fn best_wpm(&self) -> f64 {
        self.state.best.get()
    }

    pub fn word_count(&self) -> usize {
        self.settings.word_count
    }

    pub fn pool_size(&self) -> usize {
        self.words.len()
    }

    pub fn can_replay(&self) -> bool {
        self.state.last_log.as_ref().is_some_and(|log| !log.is_empty())
    }

    pub fn input_mut(&mut self) -> &mut S {
        &mut self.input
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Draws a fresh sample. Best WPM and the replay log belong to the old
    /// sample and are dropped.
    pub fn new_sample(&mut self) -> Result<&TargetText, ResourceError> {
        let target = self.words.sample(self.settings.word_count, &mut self.rng)?;
        info!("new sample: {target}");
        self.state.best.reset();
        self.state.last_log = None;
        self.state.last_result = None;
        self.state.target = Some(target);
        self.state.target.as_ref().ok_or(ResourceError::EmptyTarget)
    }

    /// Changes how many words are drawn and draws a new sample of that size.
    pub fn set_word_count(&mut self, count: usize) -> Result<()> {
        if count == 0 || count > self.words.len() {
            return Err(InvalidOperation::SampleSizeOutOfRange {
                requested: count,
                available: self.words.len(),
            }
            .into());
        }
        self.settings.word_count = count;
        self.new_sample()?;
        Ok(())
    }

    fn current_target(&mut self) -> Result<TargetText, ResourceError> {
        match &self.state.target {
            Some(target) => Ok(target.clone()),
            None => self.new_sample().cloned(),
        }
    }

    /// A live, timed run over the current sample (drawing one if needed).
    pub fn start_run(&mut self) -> Result<RunOutcome> {
        let target = self.current_target()?;
        let mut state = MatchState::with_placeholder(target.clone(), self.settings.space_placeholder);
        self.recorder.clear();
        self.phase = Phase::Running;
        info!("run started over {} chars", target.len());
        self.feedback.begin_run(&target, false)?;

        while !state.is_complete() {
            let Some(byte) = self.input.next_byte()? else {
                info!("input closed mid-run");
                return self.abort();
            };
            let action = input::process_byte(&mut state, byte);
            if action == Action::Terminate {
                return self.abort();
            }
            if action.is_recorded() {
                self.recorder.record(char::from(byte), self.clock.now());
            }
            self.feedback.action(&action)?;
        }

        self.feedback.end_run()?;
        let log = self.recorder.snapshot();
        let elapsed = recorder::elapsed(&log);
        self.state.last_log = Some(log);
        self.finish(&state, elapsed)
    }

    /// Re-drives the matcher from the last completed run's log at its
    /// original pace. Live input is only checked for Ctrl+C.
    pub fn replay(&mut self) -> Result<RunOutcome> {
        let (Some(target), Some(log)) = (self.state.target.clone(), self.state.last_log.clone())
        else {
            return Err(InvalidOperation::NoPriorRun.into());
        };
        if log.is_empty() {
            return Err(InvalidOperation::NoPriorRun.into());
        }

        let mut state = MatchState::with_placeholder(target.clone(), self.settings.space_placeholder);
        self.phase = Phase::Replaying;
        info!("replaying {} keystrokes", log.len());
        self.feedback.begin_run(&target, true)?;

        for (event, delay) in log.iter().zip(recorder::delays(&log)) {
            if self.input.interrupt_pending()? {
                return self.abort();
            }
            self.clock.sleep(delay);
            let action = input::process_byte(&mut state, event.byte());
            self.feedback.action(&action)?;
            if state.is_complete() {
                break;
            }
        }

        self.feedback.end_run()?;
        self.finish(&state, recorder::elapsed(&log))
    }

    fn finish(&mut self, state: &MatchState, elapsed: Duration) -> Result<RunOutcome> {
        self.phase = Phase::Scoring;
        let scored = scoring::score(&state.target, &state.transcript, elapsed.as_secs_f64());
        self.phase = Phase::AwaitingDecision;

        let result = match scored {
            Ok(result) => result,
            Err(err) => {
                warn!("run could not be scored: {err}");
                self.state.last_result = None;
                return Err(InvalidOperation::from(err).into());
            }
        };
        info!(
            "run finished in {:.2}s: adjusted {:.1} wpm, raw {:.1} wpm, {}/{} correct",
            result.elapsed_secs,
            result.adjusted_wpm,
            result.raw_wpm,
            result.correct_chars,
            result.total_chars
        );
        if self.state.best.update(&result) {
            info!("new session best {:.1} wpm", result.adjusted_wpm);
        }
        self.state.completed_runs += 1;
        self.state.last_result = Some(result.clone());
        Ok(RunOutcome::Completed(result))
    }

    fn abort(&mut self) -> Result<RunOutcome> {
        info!("session aborted by user");
        self.feedback.end_run()?;
        self.phase = Phase::Terminated;
        Ok(RunOutcome::Aborted)
    }
}
