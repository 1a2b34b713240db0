//! Compiled regex patterns, built once on first use.

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters not allowed in a TLE file name stem.
pub static RE_TLE_NAME_UNSAFE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^-a-zA-Z0-9()]").unwrap());
