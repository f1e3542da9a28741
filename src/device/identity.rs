//! Build identity records and the OTA metadata file format
//!
//! A metadata file is a flat JSON object:
//!
//! ```json
//! {"otaid": "nightly-x", "otaver": "1.2", "otadate": "20230101-0930"}
//! ```
//!
//! All three keys must be present. A document that is not a JSON object, or
//! lacks one of the keys, is treated as if the file did not exist. A date that
//! does not follow [`DATE_FORMAT`] only drops the date.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Timestamp layout used by OTA metadata (`yyyyMMdd-HHmm`, 24-hour clock)
pub const DATE_FORMAT: &str = "%Y%m%d-%H%M";

/// Identity of one build; any field may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildIdentity {
    pub id: Option<String>,
    pub version: Option<String>,
    #[serde(serialize_with = "serialize_date")]
    pub date: Option<NaiveDateTime>,
}

impl BuildIdentity {
    /// An identity with every field absent
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn is_absent(&self) -> bool {
        self.id.is_none() && self.version.is_none() && self.date.is_none()
    }
}

impl fmt::Display for BuildIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id={} version={} date={}",
            self.id.as_deref().unwrap_or("-"),
            self.version.as_deref().unwrap_or("-"),
            self.date.map(format_date).as_deref().unwrap_or("-"),
        )
    }
}

fn serialize_date<S: Serializer>(date: &Option<NaiveDateTime>, s: S) -> Result<S::Ok, S::Error> {
    match date {
        Some(d) => s.serialize_some(&format_date(*d)),
        None => s.serialize_none(),
    }
}

/// Parse an OTA timestamp; malformed text yields `None`
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

/// Format a timestamp in the OTA layout
pub fn format_date(date: NaiveDateTime) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Why a metadata read produced no identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsentReason {
    /// Source flag is off (metadata file not on the device)
    Disabled,
    /// The read command produced no output
    NoOutput,
    /// Output was not a JSON object carrying every metadata key
    Malformed,
}

impl fmt::Display for AbsentReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Disabled => "source disabled",
            Self::NoOutput => "no output",
            Self::Malformed => "malformed metadata",
        };
        write!(f, "{}", reason)
    }
}

/// Result of reading a metadata source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataOutcome {
    Parsed(BuildIdentity),
    Absent(AbsentReason),
}

impl MetadataOutcome {
    /// Collapse to the caller-facing identity (all-absent when not parsed)
    pub fn into_identity(self) -> BuildIdentity {
        match self {
            Self::Parsed(identity) => identity,
            Self::Absent(_) => BuildIdentity::absent(),
        }
    }
}

/// Parse the text of a metadata file
pub fn parse_metadata(text: &str) -> MetadataOutcome {
    if text.trim().is_empty() {
        return MetadataOutcome::Absent(AbsentReason::NoOutput);
    }

    let map = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => map,
        _ => return MetadataOutcome::Absent(AbsentReason::Malformed),
    };
    if !METADATA_KEYS.iter().all(|key| map.contains_key(*key)) {
        return MetadataOutcome::Absent(AbsentReason::Malformed);
    }

    MetadataOutcome::Parsed(BuildIdentity {
        id: string_field(&map, "otaid"),
        version: string_field(&map, "otaver"),
        date: string_field(&map, "otadate").and_then(|d| parse_date(&d)),
    })
}

const METADATA_KEYS: [&str; 3] = ["otaid", "otaver", "otadate"];

pub(crate) fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
