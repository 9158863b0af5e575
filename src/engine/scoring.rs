use crate::error::ScoringError;
use crate::session::target::TargetText;

/// Characters per "word" in the usual typing-test convention.
pub const CHARS_PER_WORD: f64 = 5.0;

#[derive(Clone, Debug, PartialEq)]
pub struct RunResult {
    pub elapsed_secs: f64,
    pub correct_chars: usize,
    pub total_chars: usize,
    pub adjusted_wpm: f64,
    pub raw_wpm: f64,
}

impl RunResult {
    pub fn accuracy(&self) -> f64 {
        if self.total_chars == 0 {
            return 0.0;
        }
        (self.correct_chars as f64 / self.total_chars as f64 * 100.0).clamp(0.0, 100.0)
    }
}

pub fn wpm(chars: usize, elapsed_secs: f64) -> Result<f64, ScoringError> {
    if elapsed_secs <= 0.0 {
        return Err(ScoringError::DivisionByZero);
    }
    Ok((chars as f64 / CHARS_PER_WORD) / (elapsed_secs / 60.0))
}

/// Positions where the transcript agrees with a non-space target character.
/// Target characters past the end of the transcript simply don't count.
pub fn correct_chars(target: &TargetText, transcript: &[char]) -> usize {
    target
        .chars()
        .iter()
        .zip(transcript)
        .filter(|&(&want, &got)| want != ' ' && want == got)
        .count()
}

/// Raw WPM measures target throughput: it is based on the non-space target
/// length, not on what was typed.
pub fn score(
    target: &TargetText,
    transcript: &[char],
    elapsed_secs: f64,
) -> Result<RunResult, ScoringError> {
    let total_chars = target.non_space_count();
    let correct_chars = correct_chars(target, transcript);
    Ok(RunResult {
        elapsed_secs,
        correct_chars,
        total_chars,
        adjusted_wpm: wpm(correct_chars, elapsed_secs)?,
        raw_wpm: wpm(total_chars, elapsed_secs)?,
    })
}

/// Best adjusted WPM seen on the current sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SessionBest(f64);

impl SessionBest {
    pub fn get(self) -> f64 {
        self.0
    }

    pub fn update(&mut self, result: &RunResult) -> bool {
        if result.adjusted_wpm > self.0 {
            self.0 = result.adjusted_wpm;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.0 = 0.0;
    }
}
