//! Looptune - main entry point
//!
//! Command-line front end for editing saved playlists and playing them with
//! keyboard control.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use looptune_common::config::{Config, LoggingConfig};
use looptune_player::audio::{DeviceSink, SystemBackend};
use looptune_player::console::{self, ConsoleObserver};
use looptune_player::input::TerminalInput;
use looptune_player::playback::{EngineSettings, Mode, PlaybackEngine};
use looptune_player::playlist::{Playlist, PlaylistSlots, SortKey, Track};
use looptune_player::scan;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for looptune
#[derive(Parser, Debug)]
#[command(name = "looptune")]
#[command(about = "Circular playlist manager and terminal audio player")]
#[command(version)]
struct Args {
    /// Config file path (overrides LOOPTUNE_CONFIG and the platform default)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Folder scanned for audio files
    #[arg(long, env = "LOOPTUNE_MUSIC_DIR")]
    music_dir: Option<PathBuf>,

    /// Folder holding saved playlists
    #[arg(long, env = "LOOPTUNE_PLAYLIST_DIR")]
    playlist_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the tracks of a saved playlist
    Show { file: PathBuf },

    /// Create a playlist file from TRACK:ARTIST pairs
    Create {
        file: PathBuf,
        #[arg(long)]
        name: String,
        entries: Vec<String>,
    },

    /// Add a track (at the end unless --at or --front is given)
    Add {
        file: PathBuf,
        source: String,
        artist: String,
        #[arg(long, conflicts_with = "front")]
        at: Option<usize>,
        #[arg(long)]
        front: bool,
    },

    /// Remove a track (the last one unless --at or --front is given)
    Remove {
        file: PathBuf,
        #[arg(long, conflicts_with_all = ["front", "back"])]
        at: Option<usize>,
        #[arg(long, conflicts_with = "back")]
        front: bool,
        #[arg(long)]
        back: bool,
    },

    /// Sort a playlist by title or artist
    Sort {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = SortField::Title)]
        by: SortField,
    },

    /// Find tracks whose title contains a term (case-insensitive)
    Search { file: PathBuf, term: String },

    /// Rename a playlist
    Rename { file: PathBuf, name: String },

    /// Play a playlist
    Play {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = ModeArg::Sequential)]
        mode: ModeArg,
        /// Track position for single mode
        #[arg(long, default_value_t = 1)]
        track: usize,
        /// Number of passes for repeat mode
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        rounds: i64,
    },

    /// List saved playlist slots
    Slots,

    /// List playable files in the music folder
    Scan,

    /// List audio output devices (`*` marks the default)
    Devices,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortField {
    Title,
    Artist,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Single,
    Sequential,
    Reverse,
    Repeat,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = args.music_dir {
        config.music_dir = dir;
    }
    if let Some(dir) = args.playlist_dir {
        config.playlist_dir = dir;
    }

    init_logging(&config.logging)?;
    info!("Starting looptune v{}", env!("CARGO_PKG_VERSION"));

    run(args.command, &config)
}

/// Initialize tracing; `RUST_LOG` overrides the configured level
fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, stderr_layer) = match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(layer), None)
        }
        None => (
            None,
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
    Ok(())
}

fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Show { file } => {
            let list = open_playlist(config, &file)?;
            print!("{}", console::render_listing(&list));
        }
        Command::Create { file, name, entries } => {
            let mut list = Playlist::with_name(name);
            for entry in &entries {
                let (source, artist) = entry
                    .rsplit_once(':')
                    .with_context(|| format!("Expected TRACK:ARTIST, got '{}'", entry))?;
                list.insert_back(Track::new(source, artist));
            }
            save_playlist(config, &file, &list)?;
            println!("Created '{}' with {} tracks", list.name(), list.len());
        }
        Command::Add {
            file,
            source,
            artist,
            at,
            front,
        } => {
            let mut list = open_playlist(config, &file)?;
            let track = Track::new(source, artist);
            match (at, front) {
                (Some(position), _) => list.insert_at(track, position)?,
                (None, true) => list.insert_front(track),
                (None, false) => list.insert_back(track),
            }
            save_playlist(config, &file, &list)?;
            println!("'{}' now has {} tracks", list.name(), list.len());
        }
        Command::Remove {
            file,
            at,
            front,
            back: _,
        } => {
            let mut list = open_playlist(config, &file)?;
            let removed = match (at, front) {
                (Some(position), _) => list.remove_at(position)?,
                (None, true) => list.remove_front()?,
                (None, false) => list.remove_back()?,
            };
            save_playlist(config, &file, &list)?;
            println!("Removed {} - {}", removed.title(), removed.artist);
        }
        Command::Sort { file, by } => {
            let mut list = open_playlist(config, &file)?;
            list.sort_by(match by {
                SortField::Title => SortKey::Title,
                SortField::Artist => SortKey::Artist,
            });
            save_playlist(config, &file, &list)?;
            print!("{}", console::render_listing(&list));
        }
        Command::Search { file, term } => {
            check_search_term(&term)?;
            let list = open_playlist(config, &file)?;
            print!("{}", console::render_matches(&list.search(&term)));
        }
        Command::Rename { file, name } => {
            let mut list = open_playlist(config, &file)?;
            list.set_name(name);
            save_playlist(config, &file, &list)?;
            println!("Renamed to '{}'", list.name());
        }
        Command::Play {
            file,
            mode,
            track,
            rounds,
        } => {
            let list = open_playlist(config, &file)?;
            let mode = match mode {
                ModeArg::Single => Mode::Single(track),
                ModeArg::Sequential => Mode::Sequential,
                ModeArg::Reverse => Mode::Reverse,
                ModeArg::Repeat => Mode::Repeat(rounds),
            };
            let mut engine = PlaybackEngine::new(
                SystemBackend::new(&config.playback),
                TerminalInput::new(),
                ConsoleObserver::new(),
                EngineSettings::from(&config.playback),
            );
            engine.play(&list, mode).context("Playback failed")?;
        }
        Command::Slots => {
            let mut slots = PlaylistSlots::new(config.playlist_slots);
            let loaded = slots.load_all(&config.playlist_dir);
            println!(
                "{} of {} slots in use ({})",
                loaded,
                slots.capacity(),
                config.playlist_dir.display()
            );
            for index in 0..slots.capacity() {
                match slots.get(index) {
                    Some(list) if list.is_active() => println!(
                        "{:>2}. {} ({} tracks)",
                        index + 1,
                        slots.display_name(index),
                        list.len()
                    ),
                    _ => println!("{:>2}. (empty)", index + 1),
                }
            }
        }
        Command::Scan => {
            let files = scan::scan_music_dir(&config.music_dir)
                .with_context(|| format!("Failed to scan {}", config.music_dir.display()))?;
            if files.is_empty() {
                println!("No audio files in {}", config.music_dir.display());
            }
            for (i, path) in files.iter().enumerate() {
                println!("{:>4}. {}", i + 1, path.display());
            }
        }
        Command::Devices => {
            let devices = DeviceSink::list_devices().context("Failed to list output devices")?;
            print!("{}", console::render_devices(&devices));
            if let Some(name) = &config.playback.device {
                println!("Configured device: {}", name);
            }
        }
    }
    Ok(())
}

/// Only the empty term is refused; whitespace is a valid search
fn check_search_term(term: &str) -> Result<()> {
    if term.is_empty() {
        bail!("Search term must not be empty");
    }
    Ok(())
}

fn playlist_path(config: &Config, file: &Path) -> PathBuf {
    config.playlist_dir.join(file)
}

fn open_playlist(config: &Config, file: &Path) -> Result<Playlist> {
    let path = playlist_path(config, file);
    let mut list = Playlist::new();
    if !list.load(&path)? {
        bail!("Playlist not found: {}", path.display());
    }
    Ok(list)
}

fn save_playlist(config: &Config, file: &Path, list: &Playlist) -> Result<()> {
    let path = playlist_path(config, file);
    list.save(&path)?;
    Ok(())
}
