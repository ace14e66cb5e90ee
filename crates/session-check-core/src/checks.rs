// crates/session-check-core/src/checks.rs
// ============================================================================
// Module: Format Checks
// Description: Stateless string and list checks shared by domain contracts.
// Purpose: Validate RGBA colors, pixel sizes, URLs, dates, and coordinates.
// Dependencies: serde_json, thiserror, time, url
// ============================================================================

//! ## Overview
//! Each check returns `Ok(())` or a [`FormatError`] whose display text is the
//! diagnostic message. Checks never touch the log; callers decide where the
//! message is anchored (see [`crate::PathTracker::report_at`]). No check
//! performs I/O: URL validation is purely syntactic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;
use time::Date;
use time::PrimitiveDateTime;
use time::Time;
use time::macros::format_description;
use url::Host;
use url::Url;

use crate::contract::FieldKind;
use crate::contract::value_kind_label;
use crate::diagnostics::preview_list;
use crate::diagnostics::quote_list;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum number of accepted values printed in a subset violation.
pub const ACCEPTED_PREVIEW_LIMIT: usize = 6;

/// URL schemes accepted by [`check_url`].
pub const URL_SCHEMES: [&str; 4] = ["http", "https", "ftp", "ftps"];

/// Upper bound for altitudes, in meters.
pub const MAX_ALTITUDE: f64 = 10_000.0;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// A value failed a format check.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Malformed RGBA color string.
    #[error(
        "Invalid RGBA string ({value}). Must be in the format 'rgba(255, 255, 255, 0.5)' where \
         each color channel is an integer between 0 and 255 and alpha is between 0 and 1."
    )]
    Rgba {
        /// Offending value.
        value: String,
    },
    /// Malformed pixel size string.
    #[error(
        "Invalid pixel string ({value}). Must be in the format '5px' where the value portion is \
         a whole number."
    )]
    Pixel {
        /// Offending value.
        value: String,
    },
    /// Malformed URL.
    #[error("Invalid url ({value}): {reason}")]
    Url {
        /// Offending value.
        value: String,
        /// Failure detail.
        reason: String,
    },
    /// Malformed date, time, or datetime string.
    #[error("Invalid {variant} value ({value}). Expected the format {pattern}.")]
    Date {
        /// Date variant name.
        variant: &'static str,
        /// Offending value.
        value: String,
        /// Expected pattern.
        pattern: &'static str,
    },
    /// Coordinate outside its range.
    #[error("`{field}` has a {axis} outside of the range {min} to {max}.")]
    Coordinate {
        /// Field holding the coordinates.
        field: String,
        /// Coordinate axis.
        axis: Axis,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// Malformed coordinate path.
    #[error(
        "`{field}` must be a list of paths where each path holds at least two [longitude, \
         latitude] or [longitude, latitude, altitude] points."
    )]
    CoordinatePath {
        /// Field holding the paths.
        field: String,
    },
    /// List element of an unexpected kind.
    #[error(
        "Invalid list item type at index: {index} with type: {found}. Expected one of {}",
        quote_list(.expected)
    )]
    ListItem {
        /// Index of the first offending element.
        index: usize,
        /// Accepted kind labels.
        expected: Vec<&'static str>,
        /// Kind actually found.
        found: &'static str,
    },
    /// Value kind outside the accepted union.
    #[error("({field}) Invalid Type: expected one of {} but received {found}", quote_list(.expected))]
    Kind {
        /// Offending field.
        field: String,
        /// Accepted kind labels.
        expected: Vec<&'static str>,
        /// Kind actually found.
        found: &'static str,
    },
    /// Values outside an allow-list.
    #[error(
        "Invalid value(s) selected: {}. Accepted values are: {}",
        quote_list(.invalid),
        preview_list(.accepted, ACCEPTED_PREVIEW_LIMIT)
    )]
    Subset {
        /// Values not in the allow-list, in input order.
        invalid: Vec<String>,
        /// The allow-list.
        accepted: Vec<String>,
    },
}

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Latitude, within +/-90.
    Latitude,
    /// Longitude, within +/-180.
    Longitude,
    /// Altitude, within 0 and [`MAX_ALTITUDE`].
    Altitude,
}

impl Axis {
    /// Returns the inclusive range of the axis.
    #[must_use]
    pub const fn bounds(self) -> (f64, f64) {
        match self {
            Self::Latitude => (-90.0, 90.0),
            Self::Longitude => (-180.0, 180.0),
            Self::Altitude => (0.0, MAX_ALTITUDE),
        }
    }

    /// Infers the axis from a location field name (e.g. `startLatitude`).
    #[must_use]
    pub fn from_field(field: &str) -> Option<Self> {
        let lowered = field.to_ascii_lowercase();
        if lowered.contains("latitude") {
            Some(Self::Latitude)
        } else if lowered.contains("longitude") {
            Some(Self::Longitude)
        } else if lowered.contains("altitude") {
            Some(Self::Altitude)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::Altitude => "altitude",
        })
    }
}

/// Date value layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateVariant {
    /// `YYYY-MM-DD`.
    Date,
    /// `HH:MM:SS`.
    Time,
    /// `YYYY-MM-DDTHH:MM:SS`.
    DateTime,
}

impl DateVariant {
    /// Parses a prop variant name; unknown names fall back to [`DateVariant::Date`].
    #[must_use]
    pub fn from_variant(variant: Option<&str>) -> Self {
        match variant {
            Some("time") => Self::Time,
            Some("datetime") => Self::DateTime,
            _ => Self::Date,
        }
    }

    /// Returns the variant name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
        }
    }

    /// Returns the human-readable pattern.
    #[must_use]
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::Date => "YYYY-MM-DD",
            Self::Time => "HH:MM:SS",
            Self::DateTime => "YYYY-MM-DDTHH:MM:SS",
        }
    }
}

// ============================================================================
// SECTION: String Checks
// ============================================================================

/// Validates an `rgba(r, g, b, a)` color string.
///
/// # Errors
///
/// Returns [`FormatError::Rgba`] when the layout or a channel is invalid.
pub fn check_rgba(value: &str) -> Result<(), FormatError> {
    let invalid = || FormatError::Rgba {
        value: value.to_string(),
    };
    let inner = value
        .strip_prefix("rgba(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(invalid)?;
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    let [red, green, blue, alpha] = parts.as_slice() else {
        return Err(invalid());
    };
    for channel in [red, green, blue] {
        if channel.is_empty() || !channel.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(invalid());
        }
        match channel.parse::<u16>() {
            Ok(level) if level <= 255 => {}
            _ => return Err(invalid()),
        }
    }
    if alpha.is_empty() || !alpha.bytes().all(|byte| byte.is_ascii_digit() || byte == b'.') {
        return Err(invalid());
    }
    match alpha.parse::<f64>() {
        Ok(level) if (0.0 ..= 1.0).contains(&level) => Ok(()),
        _ => Err(invalid()),
    }
}

/// Validates a `<non-negative integer>px` size string.
///
/// # Errors
///
/// Returns [`FormatError::Pixel`] when the unit or magnitude is invalid.
pub fn check_pixel(value: &str) -> Result<(), FormatError> {
    let magnitude = value.strip_suffix("px").unwrap_or_default();
    if magnitude.is_empty() || !magnitude.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(FormatError::Pixel {
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Validates a URL syntactically.
///
/// # Errors
///
/// Returns [`FormatError::Url`] when the URL cannot be parsed, uses another
/// scheme, or lacks a dotted domain, `localhost`, or IPv4 host.
pub fn check_url(value: &str) -> Result<(), FormatError> {
    let fail = |reason: &str| FormatError::Url {
        value: value.to_string(),
        reason: reason.to_string(),
    };
    if value.chars().any(char::is_whitespace) {
        return Err(fail("whitespace is not allowed"));
    }
    let parsed = Url::parse(value).map_err(|err| fail(&err.to_string()))?;
    if !URL_SCHEMES.contains(&parsed.scheme()) {
        return Err(fail("scheme must be one of http, https, ftp, ftps"));
    }
    match parsed.host() {
        Some(Host::Domain(domain)) if domain == "localhost" || is_dotted_domain(domain) => Ok(()),
        Some(Host::Ipv4(_)) => Ok(()),
        _ => Err(fail("host must be a domain name, localhost, or an IPv4 address")),
    }
}

/// Returns true for `label(.label)+` hosts with alphanumeric or hyphen labels.
fn is_dotted_domain(domain: &str) -> bool {
    let trimmed = domain.strip_suffix('.').unwrap_or(domain);
    let labels: Vec<&str> = trimmed.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.bytes().all(|byte| byte.is_ascii_alphanumeric() || byte == b'-')
        })
}

/// Validates a date, time, or datetime string.
///
/// # Errors
///
/// Returns [`FormatError::Date`] when the string does not match the variant.
pub fn check_date(value: &str, variant: DateVariant) -> Result<(), FormatError> {
    let parsed = match variant {
        DateVariant::Date => {
            Date::parse(value, format_description!("[year]-[month]-[day]")).is_ok()
        }
        DateVariant::Time => {
            Time::parse(value, format_description!("[hour]:[minute]:[second]")).is_ok()
        }
        DateVariant::DateTime => PrimitiveDateTime::parse(
            value,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        )
        .is_ok(),
    };
    if parsed {
        Ok(())
    } else {
        Err(FormatError::Date {
            variant: variant.as_str(),
            value: value.to_string(),
            pattern: variant.pattern(),
        })
    }
}

// ============================================================================
// SECTION: Collection Checks
// ============================================================================

/// Validates that `value` has one of `kinds`.
///
/// # Errors
///
/// Returns [`FormatError::Kind`] naming `field` when it does not.
pub fn check_kind(field: &str, value: &Value, kinds: &[FieldKind]) -> Result<(), FormatError> {
    if FieldKind::any_matches(kinds, value) {
        return Ok(());
    }
    Err(FormatError::Kind {
        field: field.to_string(),
        expected: FieldKind::labels(kinds),
        found: value_kind_label(value),
    })
}

/// Validates that every element of `items` has one of `kinds`.
///
/// # Errors
///
/// Returns [`FormatError::ListItem`] for the first offending element.
pub fn check_list_kinds(items: &[Value], kinds: &[FieldKind]) -> Result<(), FormatError> {
    match items.iter().position(|item| !FieldKind::any_matches(kinds, item)) {
        None => Ok(()),
        Some(index) => Err(FormatError::ListItem {
            index,
            expected: FieldKind::labels(kinds),
            found: items.get(index).map_or("null", value_kind_label),
        }),
    }
}

/// Validates that every selected value appears in `accepted`.
///
/// # Errors
///
/// Returns [`FormatError::Subset`] listing the values outside the allow-list.
pub fn check_subset<S: AsRef<str>>(selected: &[S], accepted: &[String]) -> Result<(), FormatError> {
    let mut invalid: Vec<String> = Vec::new();
    for value in selected {
        let value = value.as_ref();
        let known = accepted.iter().any(|candidate| candidate == value);
        if !known && !invalid.iter().any(|seen| seen == value) {
            invalid.push(value.to_string());
        }
    }
    if invalid.is_empty() {
        return Ok(());
    }
    Err(FormatError::Subset {
        invalid,
        accepted: accepted.to_vec(),
    })
}

/// Validates a list of numeric coordinates along one axis.
///
/// # Errors
///
/// Returns [`FormatError::Coordinate`] when any value is out of range.
pub fn check_coordinates(field: &str, axis: Axis, values: &[f64]) -> Result<(), FormatError> {
    let (min, max) = axis.bounds();
    if values.iter().all(|value| (min ..= max).contains(value)) {
        return Ok(());
    }
    Err(FormatError::Coordinate {
        field: field.to_string(),
        axis,
        min,
        max,
    })
}

/// Validates a list of coordinate paths: `[[[lon, lat(, alt)], ...], ...]`.
///
/// # Errors
///
/// Returns [`FormatError::CoordinatePath`] when the nesting is wrong and
/// [`FormatError::Coordinate`] when a point is out of range.
pub fn check_coordinate_paths(field: &str, paths: &[Value]) -> Result<(), FormatError> {
    let malformed = || FormatError::CoordinatePath {
        field: field.to_string(),
    };
    let mut longitudes = Vec::new();
    let mut latitudes = Vec::new();
    let mut altitudes = Vec::new();
    for path in paths {
        let points = path.as_array().ok_or_else(malformed)?;
        if points.len() < 2 {
            return Err(malformed());
        }
        for point in points {
            let coords = point.as_array().ok_or_else(malformed)?;
            let numbers: Vec<f64> = coords.iter().filter_map(Value::as_f64).collect();
            if numbers.len() != coords.len() {
                return Err(malformed());
            }
            match numbers.as_slice() {
                [longitude, latitude] => {
                    longitudes.push(*longitude);
                    latitudes.push(*latitude);
                }
                [longitude, latitude, altitude] => {
                    longitudes.push(*longitude);
                    latitudes.push(*latitude);
                    altitudes.push(*altitude);
                }
                _ => return Err(malformed()),
            }
        }
    }
    check_coordinates(field, Axis::Latitude, &latitudes)?;
    check_coordinates(field, Axis::Longitude, &longitudes)?;
    check_coordinates(field, Axis::Altitude, &altitudes)
}

// ============================================================================
// SECTION: Selections
// ============================================================================

/// Flattens a field value into the list checked against an allow-list.
///
/// Strings become one entry, other scalars their JSON text, mappings their
/// keys, and sequences their elements. Returns `None` for `null`.
#[must_use]
pub fn selection_of(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(vec![text.clone()]),
        Value::Bool(_) | Value::Number(_) => Some(vec![value.to_string()]),
        Value::Object(map) => Some(map.keys().cloned().collect()),
        Value::Array(items) => Some(items.iter().map(scalar_text).collect()),
    }
}

/// Returns the text of a scalar: strings as-is, anything else as JSON.
#[must_use]
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
