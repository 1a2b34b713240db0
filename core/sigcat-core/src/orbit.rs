//! Two-line element set parsing.
//!
//! Only the record is extracted here; propagation is someone else's job.
//!
//! # Accepted input
//!
//! ```text
//! ISS (ZARYA)                                  <- optional name line ("0 " prefix allowed)
//! 1 25544U 98067A   24001.50000000  .00016717  00000-0  10270-3 0  9005
//! 2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
//! ```
//!
//! Both element lines must carry a valid modulo-10 checksum in column 69.
//! Sets without a name line are named after their catalog number.

use std::path::Path;

use chrono::{DateTime, Duration, TimeZone, Utc};
use fs_err as fs;

use crate::error::{CatalogError, Result};

const LINE_LEN: usize = 69;

#[derive(Debug, Clone, PartialEq)]
pub struct Orbit {
    pub name: String,
    pub catalog_number: u32,
    pub epoch: DateTime<Utc>,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub eccentricity: f64,
    pub arg_perigee_deg: f64,
    pub mean_anomaly_deg: f64,
    pub mean_motion_rev_per_day: f64,
    pub line1: String,
    pub line2: String,
}

/// Turns TLE text into [`Orbit`] records.
pub trait OrbitParser: Send {
    fn parse_text(&self, text: &str) -> Result<Orbit>;

    fn parse_file(&self, path: &Path) -> Result<Orbit> {
        let text = fs::read_to_string(path)
            .map_err(|e| CatalogError::io(format!("reading {}", path.display()), e))?;
        self.parse_text(&text)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TleParser;

impl TleParser {
    pub fn new() -> Self {
        Self
    }
}

impl OrbitParser for TleParser {
    fn parse_text(&self, text: &str) -> Result<Orbit> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.trim().is_empty())
            .collect();

        let (name, line1, line2) = match lines.as_slice() {
            [l1, l2, ..] if l1.starts_with("1 ") && l2.starts_with("2 ") => (None, *l1, *l2),
            [name, l1, l2, ..] => (Some(*name), *l1, *l2),
            _ => return Err(parse_err("expected two or three lines")),
        };

        check_line(line1, '1')?;
        check_line(line2, '2')?;

        let catalog_number: u32 = field(line1, 2, 7)?;
        let catalog_number_2: u32 = field(line2, 2, 7)?;
        if catalog_number != catalog_number_2 {
            return Err(parse_err("catalog numbers of both lines differ"));
        }

        let name = match name {
            Some(n) => n.trim().trim_start_matches("0 ").trim().to_string(),
            None => format!("NORAD {}", catalog_number),
        };
        if name.is_empty() {
            return Err(parse_err("empty satellite name"));
        }

        let eccentricity: u32 = field(line2, 26, 33)?;

        Ok(Orbit {
            name,
            catalog_number,
            epoch: parse_epoch(&line1[18..32])?,
            inclination_deg: field(line2, 8, 16)?,
            raan_deg: field(line2, 17, 25)?,
            eccentricity: eccentricity as f64 * 1e-7,
            arg_perigee_deg: field(line2, 34, 42)?,
            mean_anomaly_deg: field(line2, 43, 51)?,
            mean_motion_rev_per_day: field(line2, 52, 63)?,
            line1: line1.to_string(),
            line2: line2.to_string(),
        })
    }
}

fn parse_err(msg: impl Into<String>) -> CatalogError {
    CatalogError::TleParse(msg.into())
}

fn check_line(line: &str, number: char) -> Result<()> {
    if !line.is_ascii() || line.len() < LINE_LEN {
        return Err(parse_err(format!("line {} is too short", number)));
    }
    if !line.starts_with(number) {
        return Err(parse_err(format!("expected line {}", number)));
    }

    let expected = line.as_bytes()[LINE_LEN - 1];
    let sum: u32 = line[..LINE_LEN - 1]
        .chars()
        .map(|c| match c {
            '-' => 1,
            c => c.to_digit(10).unwrap_or(0),
        })
        .sum();

    if expected != b'0' + (sum % 10) as u8 {
        return Err(parse_err(format!("bad checksum on line {}", number)));
    }
    Ok(())
}

fn field<T: std::str::FromStr>(line: &str, start: usize, end: usize) -> Result<T> {
    let raw = line[start..end].trim();
    raw.parse()
        .map_err(|_| parse_err(format!("bad field `{}` at columns {}-{}", raw, start + 1, end)))
}

/// Epoch as `YYDDD.DDDDDDDD`: two-digit year (57-99 → 19xx) and fractional
/// day of year, day 1 being January 1st.
fn parse_epoch(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.len() < 3 {
        return Err(parse_err("bad epoch"));
    }
    let yy: i32 = raw[..2].parse().map_err(|_| parse_err("bad epoch year"))?;
    let day: f64 = raw[2..].parse().map_err(|_| parse_err("bad epoch day"))?;
    if !(1.0..367.0).contains(&day) {
        return Err(parse_err("epoch day out of range"));
    }

    let year = if yy < 57 { 2000 + yy } else { 1900 + yy };
    let start = Utc
        .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| parse_err("bad epoch year"))?;

    Ok(start + Duration::microseconds(((day - 1.0) * 86_400e6).round() as i64))
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_three_line_set() {
        let orbit = TleParser::new().parse_text(ISS_TLE).unwrap();

        assert_eq!(orbit.name, "ISS (ZARYA)");
        assert_eq!(orbit.catalog_number, 25544);
        assert_eq!(orbit.inclination_deg, 51.6416);
        assert_eq!(orbit.raan_deg, 247.4627);
        assert!((orbit.eccentricity - 0.0006703).abs() < 1e-12);
        assert_eq!(orbit.mean_motion_rev_per_day, 15.72125391);
        assert_eq!(orbit.epoch.year(), 2008);
        assert_eq!(orbit.epoch.ordinal(), 264);
    }

    #[test]
    fn test_parse_two_line_set_is_named_by_catalog_number() {
        let two_lines: String = ISS_TLE.lines().skip(1).collect::<Vec<_>>().join("\n");
        let orbit = TleParser::new().parse_text(&two_lines).unwrap();
        assert_eq!(orbit.name, "NORAD 25544");
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let corrupted = ISS_TLE.replace("2927", "2928");
        assert!(matches!(
            TleParser::new().parse_text(&corrupted),
            Err(CatalogError::TleParse(_))
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        let parser = TleParser::new();
        assert!(parser.parse_text("").is_err());
        assert!(parser.parse_text("hello\nworld\n").is_err());
        assert!(parser.parse_text("NAME\n1 short\n2 short\n").is_err());
    }

    #[test]
    fn test_second_fixture_parses() {
        let orbit = TleParser::new().parse_text(NOAA_TLE).unwrap();
        assert_eq!(orbit.name, "NOAA 19 [+]");
        assert_eq!(orbit.epoch.year(), 2024);
    }
}
