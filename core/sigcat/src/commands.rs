//! Subcommand handlers. Each one works on an already loaded registry and
//! syncs it when it changed something.

use sigcat_core::{BookmarkInfo, Location, Registry, Site, SpectrumUnit, TleSource};

use crate::error::{CliError, Result};
use crate::{
    BookmarkArgs, BookmarkCommand, Commands, LocationCommand, QthCommand, RecentCommand,
    SiteArgs, TleCommand, UnitCommand,
};

pub fn run(registry: &mut Registry, command: Commands) -> Result<()> {
    match command {
        Commands::Bookmarks(cmd) => bookmarks(registry, cmd),
        Commands::Locations(cmd) => locations(registry, cmd),
        Commands::Qth(cmd) => qth(registry, cmd),
        Commands::Tle(cmd) => tle(registry, cmd),
        Commands::Units(cmd) => units(registry, cmd),
        Commands::Recent(cmd) => recent(registry, cmd),
        Commands::Sync => {
            registry.sync()?;
            println!("Synced.");
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bookmarks
// ─────────────────────────────────────────────────────────────────────────────

fn bookmarks(registry: &mut Registry, cmd: BookmarkCommand) -> Result<()> {
    match cmd {
        BookmarkCommand::List { from } => {
            for bm in registry.bookmarks_from(from.unwrap_or(i64::MIN)) {
                let info = &bm.info;
                println!(
                    "{:>14} Hz  {:<24} {:<6} {} [{}, {}]",
                    info.frequency,
                    info.name,
                    info.modulation,
                    info.color,
                    info.low_freq_cut,
                    info.high_freq_cut
                );
            }
            Ok(())
        }
        BookmarkCommand::Add(args) => {
            let replace = args.replace;
            let info = bookmark_info(args);
            let frequency = info.frequency;

            if replace {
                registry.replace_bookmark(info);
            } else if !registry.register_bookmark(info) {
                return Err(CliError::Rejected(format!(
                    "A bookmark already exists at {} Hz (use --replace)",
                    frequency
                )));
            }
            registry.sync()?;
            println!("Bookmark saved at {} Hz.", frequency);
            Ok(())
        }
        BookmarkCommand::Remove { frequency } => {
            if !registry.remove_bookmark(frequency) {
                return Err(CliError::Rejected(format!(
                    "No bookmark at {} Hz",
                    frequency
                )));
            }
            registry.sync()?;
            println!("Bookmark at {} Hz removed.", frequency);
            Ok(())
        }
    }
}

fn bookmark_info(args: BookmarkArgs) -> BookmarkInfo {
    BookmarkInfo {
        name: args.name,
        color: args.color,
        frequency: args.frequency,
        low_freq_cut: args.low_cut,
        high_freq_cut: args.high_cut,
        modulation: args.modulation,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Locations and QTH
// ─────────────────────────────────────────────────────────────────────────────

fn print_location(loc: &Location) {
    println!(
        "{:<24} {:<4} {:>9.4} {:>10.4} {:>7.1} m{}",
        loc.name,
        loc.country,
        loc.site.lat,
        loc.site.lon,
        loc.site.height_meters,
        if loc.user_location { "  (user)" } else { "" }
    );
}

fn locations(registry: &mut Registry, cmd: LocationCommand) -> Result<()> {
    match cmd {
        LocationCommand::List => {
            registry.locations().for_each(print_location);
            Ok(())
        }
        LocationCommand::Add(args) => {
            let name = args.name.clone();
            if !registry.register_location(location_from(args)) {
                return Err(CliError::Rejected(format!("Location {} already exists", name)));
            }
            registry.sync()?;
            println!("Location {} added.", name);
            Ok(())
        }
    }
}

fn location_from(args: SiteArgs) -> Location {
    Location::new(
        args.name,
        args.country,
        Site {
            lat: args.lat,
            lon: args.lon,
            height_meters: args.alt,
        },
    )
}

fn qth(registry: &mut Registry, cmd: QthCommand) -> Result<()> {
    match cmd {
        QthCommand::Show => {
            match registry.qth() {
                Some(loc) => print_location(loc),
                None => println!("No QTH set."),
            }
            Ok(())
        }
        QthCommand::Set { name } => {
            let loc = registry
                .location(&name)
                .cloned()
                .ok_or_else(|| CliError::UnknownLocation(name.clone()))?;
            registry.set_qth(loc);
            registry.sync()?;
            println!("QTH set to {}.", name);
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TLE
// ─────────────────────────────────────────────────────────────────────────────

fn tle(registry: &mut Registry, cmd: TleCommand) -> Result<()> {
    match cmd {
        TleCommand::Sources => {
            for src in registry.tle_sources() {
                println!(
                    "{:<24} {}{}",
                    src.name,
                    src.url,
                    if src.user { "  (user)" } else { "" }
                );
            }
            Ok(())
        }
        TleCommand::AddSource { name, url } => {
            if !registry.register_tle_source(TleSource::new(name.as_str(), url)) {
                return Err(CliError::Rejected(format!("TLE source {} already exists", name)));
            }
            registry.sync()?;
            println!("TLE source {} added.", name);
            Ok(())
        }
        TleCommand::RemoveSource { name } => {
            if !registry.remove_tle_source(&name) {
                return Err(CliError::Rejected(format!(
                    "TLE source {} does not exist or is not a user source",
                    name
                )));
            }
            registry.sync()?;
            println!("TLE source {} removed.", name);
            Ok(())
        }
        TleCommand::Import { file } => {
            let text = fs_err::read_to_string(&file)?;
            if !registry.register_tle(&text) {
                return Err(CliError::Rejected(format!(
                    "Could not import {} (see log for details)",
                    file.display()
                )));
            }
            println!("Imported {}.", file.display());
            Ok(())
        }
        TleCommand::Satellites => {
            for orbit in registry.satellites() {
                println!(
                    "{:<24} {:>6}  epoch {}  inc {:>8.4}  {:>11.8} rev/day",
                    orbit.name,
                    orbit.catalog_number,
                    orbit.epoch.format("%Y-%m-%d %H:%M:%S"),
                    orbit.inclination_deg,
                    orbit.mean_motion_rev_per_day
                );
            }
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Spectrum Units
// ─────────────────────────────────────────────────────────────────────────────

fn print_units(registry: &Registry) {
    for unit in registry.spectrum_units() {
        println!(
            "{:<12} {:>8.3} dB/unit  {:>+10.4} dB",
            unit.name, unit.db_per_unit, unit.zero_point
        );
    }
}

fn units(registry: &mut Registry, cmd: UnitCommand) -> Result<()> {
    match cmd {
        UnitCommand::List => {
            print_units(registry);
            Ok(())
        }
        UnitCommand::Add {
            name,
            db_per_unit,
            zero_point,
        } => {
            if db_per_unit == 0.0 {
                return Err(CliError::Rejected("dB per unit must not be zero".to_string()));
            }
            if !registry.register_spectrum_unit(SpectrumUnit::new(name.as_str(), db_per_unit, zero_point)) {
                return Err(CliError::Rejected(format!("Unit {} already exists", name)));
            }
            print_units(registry);
            Ok(())
        }
        UnitCommand::Convert {
            unit,
            value,
            from_db,
        } => {
            let unit = registry
                .spectrum_unit(&unit)
                .ok_or_else(|| CliError::UnknownUnit(unit.clone()))?;
            if from_db {
                println!("{} dB = {} {}", value, unit.from_db(value), unit.name);
            } else {
                println!("{} {} = {} dB", value, unit.name, unit.to_db(value));
            }
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Recent
// ─────────────────────────────────────────────────────────────────────────────

fn recent(registry: &mut Registry, cmd: RecentCommand) -> Result<()> {
    match cmd {
        RecentCommand::List => {
            for (i, name) in registry.recent().enumerate() {
                println!("{:>2}. {}", i + 1, name);
            }
            Ok(())
        }
        RecentCommand::Touch { name } => {
            registry.notify_recent(&name);
            registry.sync()?;
            Ok(())
        }
    }
}
