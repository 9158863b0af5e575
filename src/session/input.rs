use log::debug;

use crate::session::target::TargetText;

/// Ctrl+C as delivered by a raw-mode terminal.
pub const INTERRUPT: u8 = 0x03;
/// What the Backspace key sends in raw mode.
pub const DELETE: u8 = 0x7f;
/// Shown in place of a missed space, which cannot be highlighted.
pub const DEFAULT_SPACE_PLACEHOLDER: char = '-';

/// A raw byte classified for the matcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Interrupt,
    Delete,
    Char(char),
    /// Anything else, e.g. the pieces of an arrow-key escape sequence.
    Malformed(u8),
}

impl Key {
    pub fn decode(byte: u8) -> Self {
        match byte {
            INTERRUPT => Key::Interrupt,
            DELETE => Key::Delete,
            b if b.is_ascii_alphanumeric() || b == b' ' => Key::Char(char::from(b)),
            b => Key::Malformed(b),
        }
    }
}

/// The matcher's decision for one byte. Rendering is up to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Typed character equals the expected one.
    Matched(char),
    /// Carries the expected character for display, with a space already
    /// replaced by the placeholder.
    Mismatched(char),
    /// Backspace. `revealed` is the target character now under the cursor;
    /// `moved` is false when the cursor was already at 0.
    Edited { revealed: char, moved: bool },
    Ignored,
    Terminate,
}

impl Action {
    /// Whether the keystroke belongs in the replay log.
    pub fn is_recorded(&self) -> bool {
        !matches!(self, Action::Ignored | Action::Terminate)
    }
}

/// Match cursor plus what the user has typed so far over one target.
#[derive(Clone, Debug)]
pub struct MatchState {
    pub target: TargetText,
    pub cursor: usize,
    pub transcript: Vec<char>,
    pub placeholder: char,
}

impl MatchState {
    pub fn new(target: TargetText) -> Self {
        Self::with_placeholder(target, DEFAULT_SPACE_PLACEHOLDER)
    }

    pub fn with_placeholder(target: TargetText, placeholder: char) -> Self {
        Self {
            target,
            cursor: 0,
            transcript: Vec::new(),
            placeholder,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.target.len()
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.transcript.clear();
    }
}

pub fn process_byte(state: &mut MatchState, byte: u8) -> Action {
    debug!("pressed byte: {byte:#04x}");
    let action = match Key::decode(byte) {
        Key::Interrupt => Action::Terminate,
        Key::Delete => process_backspace(state),
        Key::Char(ch) => process_char(state, ch),
        Key::Malformed(b) => {
            debug!("skipping non-alphanumeric byte {b:#04x}");
            Action::Ignored
        }
    };
    debug!("cursor {} => {action:?}", state.cursor);
    action
}

pub fn process_char(state: &mut MatchState, ch: char) -> Action {
    let Some(expected) = state.target.char_at(state.cursor) else {
        return Action::Ignored;
    };

    let typed = ch.to_ascii_lowercase();
    state.transcript.push(typed);
    state.cursor += 1;

    if typed == expected {
        Action::Matched(typed)
    } else if expected == ' ' {
        Action::Mismatched(state.placeholder)
    } else {
        Action::Mismatched(expected)
    }
}

pub fn process_backspace(state: &mut MatchState) -> Action {
    let moved = state.cursor > 0;
    if moved {
        state.cursor -= 1;
        state.transcript.pop();
    }
    // Target is never empty, so index 0 always exists.
    let revealed = state.target.char_at(state.cursor).unwrap_or(' ');
    Action::Edited { revealed, moved }
}
