//! Time zone resolution for schedule anchors.
//!
//! Uses ICU4X for Windows time zone ID to IANA mapping and alias
//! canonicalization.

use chrono_tz::Tz;
use icu::time::zone::WindowsParser;
use icu::time::zone::iana::IanaParserExtended;
use std::collections::HashMap;
use std::str::FromStr;

/// Error during time zone resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ZoneError {
    /// Unknown or invalid time zone identifier.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

/// ## Summary
/// Resolves a time zone name to a `chrono_tz::Tz`.
///
/// Accepts IANA names, their aliases, Windows names such as
/// `Eastern Standard Time`, `/mozilla.org/`-prefixed IDs and `Z`.
///
/// ## Errors
/// Returns `ZoneError::UnknownTimezone` if the name cannot be resolved.
pub fn resolve_zone(name: &str) -> Result<Tz, ZoneError> {
    let normalized = normalize_zone_name(name);
    Tz::from_str(&normalized).map_err(|_e| ZoneError::UnknownTimezone(name.to_string()))
}

/// Resolver that caches zone lookups by their original name.
///
/// Useful when many schedules share a handful of zones.
#[derive(Debug, Default)]
pub struct ZoneResolver {
    cache: HashMap<String, Tz>,
}

impl ZoneResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Resolves `name`, consulting the cache first.
    ///
    /// ## Errors
    /// Returns `ZoneError::UnknownTimezone` if the name cannot be resolved.
    ///
    /// ## Side Effects
    /// Caches successful resolutions.
    pub fn resolve(&mut self, name: &str) -> Result<Tz, ZoneError> {
        if let Some(tz) = self.cache.get(name) {
            return Ok(*tz);
        }

        let tz = resolve_zone(name)?;
        tracing::debug!(name, zone = %tz, "Resolved timezone");
        self.cache.insert(name.to_string(), tz);
        Ok(tz)
    }
}

/// Maps non-IANA zone names onto IANA names chrono-tz knows.
fn normalize_zone_name(name: &str) -> String {
    let trimmed = name.trim();
    let stripped = trimmed
        .strip_prefix("/mozilla.org/")
        .or_else(|| trimmed.strip_prefix("/softwarestudio.org/"))
        .unwrap_or(trimmed);

    if stripped.eq_ignore_ascii_case("Z") || stripped.eq_ignore_ascii_case("UTC") {
        return "UTC".to_string();
    }

    let windows_parser = WindowsParser::new();
    if let Some(tz) = windows_parser.parse(stripped, None) {
        let iana_parser = IanaParserExtended::new();
        for entry in iana_parser.iter() {
            if entry.time_zone == tz {
                return entry.canonical.to_string();
            }
        }
    }

    // Handles renamed zones such as Europe/Kiev -> Europe/Kyiv.
    let iana_parser = IanaParserExtended::new();
    let parsed = iana_parser.parse(stripped);
    if parsed.time_zone != icu::time::TimeZone::UNKNOWN {
        return parsed.canonical.to_string();
    }

    stripped.to_string()
}
