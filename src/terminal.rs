use std::io;

use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::style::ResetColor;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::{info, warn};

use crate::error::ResourceError;

/// Holds the terminal in raw mode. Dropping it puts the terminal back in
/// cooked mode, whichever way the session ends.
#[derive(Debug)]
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    pub fn acquire() -> Result<Self, ResourceError> {
        enable_raw_mode().map_err(ResourceError::RawMode)?;
        info!("terminal switched to raw mode");
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), ResetColor, Show);
        match disable_raw_mode() {
            Ok(()) => info!("terminal restored"),
            Err(e) => warn!("failed to restore terminal: {e}"),
        }
    }
}
