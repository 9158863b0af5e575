use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::generator::word_source::LengthBounds;
use crate::session::controller::SessionSettings;
use crate::session::input::DEFAULT_SPACE_PLACEHOLDER;
use crate::ui::theme::{ColorConfig, Palette};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_word_count")]
    pub word_count: usize,
    #[serde(default = "default_min_word_len")]
    pub min_word_len: usize,
    #[serde(default = "default_max_word_len")]
    pub max_word_len: usize,
    #[serde(default)]
    pub word_file: Option<String>,
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default = "default_show_lookahead")]
    pub show_lookahead: bool,
    #[serde(default = "default_space_placeholder")]
    pub space_placeholder: char,
    #[serde(default)]
    pub colors: ColorConfig,
}

fn default_word_count() -> usize {
    10
}
fn default_min_word_len() -> usize {
    3
}
fn default_max_word_len() -> usize {
    10
}
fn default_show_lookahead() -> bool {
    true
}
fn default_space_placeholder() -> char {
    DEFAULT_SPACE_PLACEHOLDER
}

impl Default for Config {
    fn default() -> Self {
        Self {
            word_count: default_word_count(),
            min_word_len: default_min_word_len(),
            max_word_len: default_max_word_len(),
            word_file: None,
            log_file: None,
            show_lookahead: default_show_lookahead(),
            space_placeholder: default_space_placeholder(),
            colors: ColorConfig::default(),
        }
    }
}

impl Config {
    /// Loads the user config, or defaults when there is none.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keytrace")
            .join("config.toml")
    }

    pub fn log_path(&self) -> PathBuf {
        match &self.log_file {
            Some(path) => PathBuf::from(path),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("keytrace")
                .join("typing.log"),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.word_count == 0 {
            bail!("word_count must be at least 1");
        }
        if self.min_word_len == 0 {
            bail!("min_word_len must be at least 1");
        }
        if self.min_word_len > self.max_word_len {
            bail!(
                "min_word_len ({}) is greater than max_word_len ({})",
                self.min_word_len,
                self.max_word_len
            );
        }
        let p = self.space_placeholder;
        if !p.is_ascii_graphic() {
            bail!("space_placeholder must be a visible ASCII character, got {p:?}");
        }
        self.palette()?;
        Ok(())
    }

    pub fn bounds(&self) -> LengthBounds {
        LengthBounds {
            min: self.min_word_len,
            max: self.max_word_len,
        }
    }

    pub fn palette(&self) -> Result<Palette> {
        Palette::from_config(&self.colors)
    }

    pub fn session_settings(&self, seed: Option<u64>) -> SessionSettings {
        SessionSettings {
            word_count: self.word_count,
            space_placeholder: self.space_placeholder,
            seed,
        }
    }
}
