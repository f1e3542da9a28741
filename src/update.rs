//! Update detection
//!
//! A candidate build is an update when it names a different version than the
//! installed one, or carries a strictly later build date. Either condition is
//! enough. A candidate with neither a version nor a date is never an update,
//! and `id` is informational only.

use crate::device::identity::{parse_date, string_field, BuildIdentity};
use crate::error::{OtaError, OtaResult};
use serde::Serialize;
use serde_json::{Map, Value};

/// Decide whether `candidate` is newer than `installed`
///
/// A missing installed version or date counts as "no baseline", so any
/// candidate that supplies that field is reported as an update.
pub fn is_update_available(
    candidate: Option<&BuildIdentity>,
    installed: Option<&BuildIdentity>,
) -> bool {
    let Some(candidate) = candidate else {
        return false;
    };
    let installed_version = installed.and_then(|i| i.version.as_deref());
    let installed_date = installed.and_then(|i| i.date);

    let version_changed = match (candidate.version.as_deref(), installed_version) {
        (Some(_), None) => true,
        (Some(offered), Some(current)) => !eq_ignore_case(offered, current),
        (None, _) => false,
    };
    let date_newer = match (candidate.date, installed_date) {
        (Some(_), None) => true,
        (Some(offered), Some(current)) => offered > current,
        (None, _) => false,
    };

    version_changed | date_newer
}

/// Char-by-char case-insensitive match; each char folds to a single char
fn eq_ignore_case(a: &str, b: &str) -> bool {
    let (mut left, mut right) = (a.chars(), b.chars());
    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) if chars_match(x, y) => {}
            _ => return false,
        }
    }
}

fn chars_match(x: char, y: char) -> bool {
    if x == y {
        return true;
    }
    let (ux, uy) = (upper(x), upper(y));
    ux == uy || lower(ux) == lower(uy)
}

fn upper(c: char) -> char {
    let mut mapped = c.to_uppercase();
    match (mapped.next(), mapped.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

// 'İ' lowercases to "i\u{307}"; its single-char form is the leading 'i'
fn lower(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// A candidate update as described by externally obtained metadata
///
/// Accepts both the short keys (`id`, `version`, `date`) and the on-device
/// spelling (`otaid`, `otaver`, `otadate`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateInfo {
    pub name: Option<String>,
    #[serde(flatten)]
    pub identity: BuildIdentity,
    pub url: Option<String>,
    pub md5: Option<String>,
    pub changelog: Option<String>,
}

impl UpdateInfo {
    /// Parse candidate metadata; a malformed date leaves `date` unset
    pub fn from_json(text: &str) -> OtaResult<Self> {
        let map = match serde_json::from_str::<Value>(text)? {
            Value::Object(map) => map,
            other => {
                return Err(OtaError::MetadataInvalid(format!(
                    "expected a JSON object, found {}",
                    json_kind(&other)
                )))
            }
        };

        Ok(Self {
            name: field(&map, &["name"]),
            identity: BuildIdentity {
                id: field(&map, &["id", "otaid"]),
                version: field(&map, &["version", "otaver"]),
                date: field(&map, &["date", "otadate"]).and_then(|d| parse_date(&d)),
            },
            url: field(&map, &["url"]),
            md5: field(&map, &["md5"]).map(|h| h.to_lowercase()),
            changelog: field(&map, &["changelog"]),
        })
    }

    pub fn identity(&self) -> &BuildIdentity {
        &self.identity
    }

    /// Label used for notifications and the downloaded file name
    pub fn label(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.identity.id.clone())
            .or_else(|| self.identity.version.clone())
            .unwrap_or_else(|| "update".to_string())
    }
}

fn field(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| string_field(map, key))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn version(v: &str) -> BuildIdentity {
        BuildIdentity {
            version: Some(v.to_string()),
            ..Default::default()
        }
    }

    fn dated(date: NaiveDateTime) -> BuildIdentity {
        BuildIdentity {
            date: Some(date),
            ..Default::default()
        }
    }

    #[test]
    fn version_compare_ignores_case() {
        assert!(!is_update_available(Some(&version("A1")), Some(&version("a1"))));
        assert!(is_update_available(Some(&version("A1")), Some(&version("a2"))));
    }

    #[test]
    fn case_folding_is_per_char() {
        assert!(eq_ignore_case("\u{130}", "i"));
        assert!(eq_ignore_case("RC-\u{3a3}", "rc-\u{3c2}"));
        assert!(!eq_ignore_case("stra\u{df}e", "STRASSE"));
        assert!(!eq_ignore_case("1.0", "1.0a"));
    }

    #[test]
    fn older_version_string_still_counts_as_update() {
        // Versions are compared for equality only
        assert!(is_update_available(Some(&version("1.0")), Some(&version("2.0"))));
    }

    #[test]
    fn date_must_be_strictly_after() {
        let installed = dated(noon());
        assert!(!is_update_available(Some(&dated(noon())), Some(&installed)));
        assert!(is_update_available(
            Some(&dated(noon() + Duration::minutes(1))),
            Some(&installed)
        ));
        assert!(!is_update_available(
            Some(&dated(noon() - Duration::days(1))),
            Some(&installed)
        ));
    }

    #[test]
    fn missing_baseline_reports_update() {
        let absent = BuildIdentity::absent();
        assert!(is_update_available(Some(&version("1.0")), Some(&absent)));
        assert!(is_update_available(Some(&dated(noon())), Some(&absent)));
        assert!(is_update_available(Some(&version("1.0")), None));
    }

    #[test]
    fn either_condition_is_sufficient() {
        let installed = BuildIdentity {
            id: None,
            version: Some("1.0".to_string()),
            date: Some(noon()),
        };
        // same version, later date
        let later = BuildIdentity {
            id: None,
            version: Some("1.0".to_string()),
            date: Some(noon() + Duration::hours(1)),
        };
        // different version, older date
        let renamed = BuildIdentity {
            id: None,
            version: Some("1.0-hotfix".to_string()),
            date: Some(noon() - Duration::hours(1)),
        };
        assert!(is_update_available(Some(&later), Some(&installed)));
        assert!(is_update_available(Some(&renamed), Some(&installed)));
    }

    #[test]
    fn nothing_to_compare_is_no_update() {
        let id_only = BuildIdentity {
            id: Some("different".to_string()),
            ..Default::default()
        };
        let installed = BuildIdentity {
            id: Some("installed".to_string()),
            ..Default::default()
        };
        assert!(!is_update_available(Some(&id_only), Some(&installed)));
        assert!(!is_update_available(
            Some(&BuildIdentity::absent()),
            Some(&BuildIdentity::absent())
        ));
        assert!(!is_update_available(None, Some(&installed)));
        assert!(!is_update_available(None, None));
    }

    #[test]
    fn update_info_accepts_both_key_styles() {
        let short = UpdateInfo::from_json(
            r#"{"id":"x","version":"1.2","date":"20230101-0930","url":"http://h/x.zip"}"#,
        )
        .unwrap();
        let device = UpdateInfo::from_json(
            r#"{"otaid":"x","otaver":"1.2","otadate":"20230101-0930","url":"http://h/x.zip"}"#,
        )
        .unwrap();
        assert_eq!(short, device);
        assert_eq!(short.identity().version.as_deref(), Some("1.2"));
        assert!(short.identity().date.is_some());
    }

    #[test]
    fn update_info_bad_date_is_absent() {
        let info = UpdateInfo::from_json(r#"{"version":"1","date":"soon"}"#).unwrap();
        assert!(info.identity().date.is_none());
    }

    #[test]
    fn update_info_rejects_non_object() {
        assert!(matches!(
            UpdateInfo::from_json("[]"),
            Err(OtaError::MetadataInvalid(_))
        ));
        assert!(matches!(UpdateInfo::from_json("{"), Err(OtaError::Json(_))));
    }

    #[test]
    fn update_info_label_fallbacks() {
        let named = UpdateInfo::from_json(r#"{"name":"MyRom","id":"x"}"#).unwrap();
        assert_eq!(named.label(), "MyRom");
        let versioned = UpdateInfo::from_json(r#"{"version":"4.1"}"#).unwrap();
        assert_eq!(versioned.label(), "4.1");
        assert_eq!(UpdateInfo::default().label(), "update");
    }

    #[test]
    fn update_info_md5_lowercased() {
        let info = UpdateInfo::from_json(r#"{"md5":"D41D8CD98F00B204E9800998ECF8427E"}"#).unwrap();
        assert_eq!(info.md5.as_deref(), Some("d41d8cd98f00b204e9800998ecf8427e"));
    }
}
