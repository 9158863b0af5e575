use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use env_logger::{Env, Target};
use log::info;

use keytrace::app::{App, Exit};
use keytrace::clock::SystemClock;
use keytrace::config::Config;
use keytrace::event::StdinBytes;
use keytrace::generator::word_source::WordSource;
use keytrace::session::controller::SessionController;
use keytrace::terminal::RawModeGuard;
use keytrace::ui::feedback::TerminalFeedback;

#[derive(Parser)]
#[command(name = "keytrace", version, about = "Terminal typing speed trainer with keystroke replay")]
struct Cli {
    #[arg(long, help = "Config file (default: <config dir>/keytrace/config.toml)")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Number of words per test")]
    words: Option<usize>,

    #[arg(long, help = "Shortest word to sample")]
    min_len: Option<usize>,

    #[arg(long, help = "Longest word to sample")]
    max_len: Option<usize>,

    #[arg(long, help = "Word list, one word per line (default: bundled list)")]
    word_file: Option<String>,

    #[arg(long, help = "Keystroke trace log")]
    log_file: Option<String>,

    #[arg(long, help = "Seed for word sampling")]
    seed: Option<u64>,

    #[arg(long, help = "Draw untyped text in the default color")]
    no_lookahead: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(words) = self.words {
            config.word_count = words;
        }
        if let Some(min) = self.min_len {
            config.min_word_len = min;
        }
        if let Some(max) = self.max_len {
            config.max_word_len = max;
        }
        if let Some(ref path) = self.word_file {
            config.word_file = Some(path.clone());
        }
        if let Some(ref path) = self.log_file {
            config.log_file = Some(path.clone());
        }
        if self.no_lookahead {
            config.show_lookahead = false;
        }
    }
}

fn init_logging(config: &Config) -> Result<()> {
    let path = config.log_path();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(&path).with_context(|| format!("creating log {}", path.display()))?;
    env_logger::Builder::from_env(Env::default().default_filter_or("debug"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn load_words(config: &Config) -> Result<WordSource> {
    let words = match &config.word_file {
        Some(path) => WordSource::load_file(Path::new(path), config.bounds())?,
        None => WordSource::bundled(config.bounds())?,
    };
    words.ensure_capacity(config.word_count)?;
    Ok(words)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.apply(&mut config);
    config.validate()?;
    init_logging(&config)?;

    // Everything that can fail for lack of resources happens before the
    // terminal is touched.
    let words = load_words(&config)?;
    let palette = config.palette()?;
    info!("starting with {} words in pool", words.len());

    let guard = RawModeGuard::acquire()?;
    let feedback = TerminalFeedback::new(io::stdout(), palette, config.show_lookahead);
    let controller = SessionController::new(
        words,
        config.session_settings(cli.seed),
        StdinBytes::new(),
        SystemClock,
        feedback,
    )?;
    let mut app = App::new(controller, io::stdout());
    let result = app.run();
    let _ = execute!(io::stdout(), MoveTo(0, 0), Clear(ClearType::All));
    drop(guard);

    match result? {
        Exit::Quit => println!("Goodbye!"),
        Exit::Abort => println!("C-c hit, exiting."),
    }
    Ok(())
}
