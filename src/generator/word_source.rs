use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::info;
use rand::Rng;
use rand::seq::SliceRandom;
use rust_embed::Embed;

use crate::error::ResourceError;
use crate::session::target::TargetText;

#[derive(Embed)]
#[folder = "assets/"]
struct WordAssets;

const BUNDLED_LIST: &str = "words.txt";

/// Inclusive word length bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LengthBounds {
    pub min: usize,
    pub max: usize,
}

impl LengthBounds {
    pub fn contains(&self, len: usize) -> bool {
        (self.min..=self.max).contains(&len)
    }
}

/// Pool of candidate words a test is sampled from.
#[derive(Clone, Debug)]
pub struct WordSource {
    words: Vec<String>,
}

impl WordSource {
    pub fn from_words(words: Vec<String>) -> Result<Self, ResourceError> {
        if words.is_empty() {
            return Err(ResourceError::EmptyPool);
        }
        Ok(Self { words })
    }

    /// One word per line; trimmed, lowercased, filtered by `bounds`.
    pub fn parse(text: &str, bounds: LengthBounds) -> Result<Self, ResourceError> {
        Self::from_words(filter_words(text, bounds))
    }

    pub fn load_file(path: &Path, bounds: LengthBounds) -> Result<Self, ResourceError> {
        let text = fs::read_to_string(path).map_err(|source| ResourceError::WordFile {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Self::parse(&text, bounds)?;
        info!("loaded {} words from {}", source.len(), path.display());
        Ok(source)
    }

    pub fn bundled(bounds: LengthBounds) -> Result<Self, ResourceError> {
        let file = WordAssets::get(BUNDLED_LIST).ok_or(ResourceError::EmptyPool)?;
        let text = String::from_utf8_lossy(file.data.as_ref());
        let source = Self::parse(&text, bounds)?;
        info!("loaded {} bundled words", source.len());
        Ok(source)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn ensure_capacity(&self, count: usize) -> Result<(), ResourceError> {
        if count > self.words.len() {
            return Err(ResourceError::PoolTooSmall {
                available: self.words.len(),
                requested: count,
            });
        }
        Ok(())
    }

    /// `count` distinct words, joined by single spaces.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Result<TargetText, ResourceError> {
        self.ensure_capacity(count)?;
        let picked: Vec<&str> = self
            .words
            .choose_multiple(rng, count)
            .map(String::as_str)
            .collect();
        TargetText::from_words(&picked)
    }
}

fn filter_words(text: &str, bounds: LengthBounds) -> Vec<String> {
    let mut seen = HashSet::new();
    text.lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|w| bounds.contains(w.len()) && w.chars().all(|c| c.is_ascii_alphanumeric()))
        .filter(|w| seen.insert(w.clone()))
        .collect()
}
