use std::fmt;
use std::sync::Arc;

use crate::error::ResourceError;

/// The phrase the user has to reproduce. Cheap to clone: all runs and
/// replays over the same sample share one buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetText {
    chars: Arc<[char]>,
}

impl TargetText {
    pub fn new(text: &str) -> Result<Self, ResourceError> {
        if text.is_empty() {
            return Err(ResourceError::EmptyTarget);
        }
        Ok(Self {
            chars: text.chars().collect(),
        })
    }

    /// Joins words with single spaces.
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Result<Self, ResourceError> {
        let joined = words
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join(" ");
        Self::new(&joined)
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn char_at(&self, idx: usize) -> Option<char> {
        self.chars.get(idx).copied()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn non_space_count(&self) -> usize {
        self.chars.iter().filter(|&&c| c != ' ').count()
    }

    pub fn word_count(&self) -> usize {
        self.chars.split(|&c| c == ' ').filter(|w| !w.is_empty()).count()
    }
}

impl fmt::Display for TargetText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.chars.iter().try_for_each(|c| write!(f, "{c}"))
    }
}
