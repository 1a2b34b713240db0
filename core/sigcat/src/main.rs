//! sigcat: command line front end for the catalog registry.
//!
//! Opens the registry under `~/.sigcat` (or `--root` / `SIGCAT_HOME`), loads
//! every catalog, runs one subcommand and syncs if the subcommand changed
//! anything.
//!
//! ## Subcommands
//!
//! - `bookmarks`: list, add and remove frequency bookmarks
//! - `locations`, `qth`: observer locations and the home site
//! - `tle`: TLE sources, element set import, known satellites
//! - `units`: spectrum units and conversions
//! - `recent`: most recently used profiles
//! - `sync`: write everything back

mod commands;
mod error;
mod logging;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sigcat_core::{Registry, StorageConfig};

#[derive(Parser)]
#[command(name = "sigcat")]
#[command(about = "Signal catalog registry")]
#[command(version)]
struct Cli {
    /// Data directory (default: $SIGCAT_HOME or ~/.sigcat)
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Frequency bookmarks
    #[command(subcommand)]
    Bookmarks(BookmarkCommand),

    /// Observer locations
    #[command(subcommand)]
    Locations(LocationCommand),

    /// Home site (QTH)
    #[command(subcommand)]
    Qth(QthCommand),

    /// TLE sources and satellites
    #[command(subcommand)]
    Tle(TleCommand),

    /// Spectrum units
    #[command(subcommand)]
    Units(UnitCommand),

    /// Recently used profiles
    #[command(subcommand)]
    Recent(RecentCommand),

    /// Write every modified catalog back to disk
    Sync,
}

#[derive(Subcommand)]
enum BookmarkCommand {
    /// List bookmarks in frequency order
    List {
        /// Only show bookmarks at or above this frequency (Hz)
        #[arg(long, value_name = "HZ")]
        from: Option<i64>,
    },

    /// Add a bookmark
    Add(BookmarkArgs),

    /// Remove the bookmark at a frequency
    Remove {
        #[arg(value_name = "HZ")]
        frequency: i64,
    },
}

#[derive(Args)]
struct BookmarkArgs {
    name: String,

    #[arg(value_name = "HZ")]
    frequency: i64,

    /// Display color
    #[arg(long, default_value = "#ffffff")]
    color: String,

    #[arg(long, default_value = "")]
    modulation: String,

    /// Lower filter edge relative to the carrier (Hz)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    low_cut: i32,

    /// Upper filter edge relative to the carrier (Hz)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    high_cut: i32,

    /// Overwrite an existing bookmark at the same frequency
    #[arg(long)]
    replace: bool,
}

#[derive(Subcommand)]
enum LocationCommand {
    /// List known locations
    List,

    /// Add a user location
    Add(SiteArgs),
}

#[derive(Args)]
struct SiteArgs {
    name: String,

    /// Latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Height above sea level in meters
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    alt: f64,

    #[arg(long, default_value = "")]
    country: String,
}

#[derive(Subcommand)]
enum QthCommand {
    /// Show the home site
    Show,

    /// Set the home site to a known location
    Set {
        /// Location name
        name: String,
    },
}

#[derive(Subcommand)]
enum TleCommand {
    /// List TLE sources
    Sources,

    /// Add a user TLE source
    AddSource { name: String, url: String },

    /// Remove a user TLE source
    RemoveSource { name: String },

    /// Import an element set file into the user TLE directory
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List known satellites
    Satellites,
}

#[derive(Subcommand)]
enum UnitCommand {
    /// List spectrum units
    List,

    /// Register a unit for this invocation and print the table
    Add {
        name: String,

        #[arg(allow_hyphen_values = true)]
        db_per_unit: f32,

        #[arg(allow_hyphen_values = true)]
        zero_point: f32,
    },

    /// Convert a value between a unit and dB
    Convert {
        unit: String,

        #[arg(allow_hyphen_values = true)]
        value: f32,

        /// Treat VALUE as dB and convert into the unit
        #[arg(long)]
        from_db: bool,
    },
}

#[derive(Subcommand)]
enum RecentCommand {
    /// List recent profiles, newest first
    List,

    /// Mark a profile as just used
    Touch { name: String },
}

fn main() {
    let cli = Cli::parse();

    let storage = match cli.root {
        Some(root) => StorageConfig::with_root(root),
        None => StorageConfig::default(),
    };
    let logging_guard = logging::init(&storage.logs_dir());

    if let Err(e) = open_and_run(storage, cli.command) {
        tracing::error!(error = %e, "sigcat command failed");
        eprintln!("sigcat: {}", e);
        drop(logging_guard);
        std::process::exit(1);
    }
}

fn open_and_run(storage: StorageConfig, command: Commands) -> error::Result<()> {
    let mut registry = Registry::open(storage)?;
    registry.load_all();
    commands::run(&mut registry, command)
}
