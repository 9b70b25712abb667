//! Behavioral signal bundle and CRM field normalization
//!
//! Person records come back from the CRM loosely typed: counts may be JSON
//! numbers, numeric strings, junk, or missing entirely. Everything is folded
//! into a [`SignalBundle`] here so the decision components only ever see
//! non-negative counts and optional timestamps.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// CRM FIELD NAMES
// ============================================================================

pub const FIELD_FELLO_SCORE: &str = "customFelloLeadScore";
pub const FIELD_FELLO_EMAIL_CLICKS: &str = "customFelloEmailClicks";
pub const FIELD_FELLO_FORM_SUBMISSIONS: &str = "customFelloFormSubmissions";
pub const FIELD_FELLO_LAST_EMAIL_CLICK: &str = "customFelloLastEmailClick";
pub const FIELD_CLOUD_CMA_REQUESTS: &str = "customCloudCMARequestCount";
pub const FIELD_CLOUD_CMA_LAST_REQUEST: &str = "customCloudCMALastRequest";
pub const FIELD_SIERRA_PROPERTY_VIEWS: &str = "customSierraPropertyViews";
pub const FIELD_SIERRA_SAVED_LISTINGS: &str = "customSierraSavedListings";

// ============================================================================
// SIGNAL BUNDLE
// ============================================================================

/// Normalized behavioral signals for one lead.
///
/// Every field is optional on the wire and defaults to zero / absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignalBundle {
    pub fello_score: u32,
    pub fello_email_clicks: u32,
    pub fello_form_submissions: u32,
    pub fello_last_email_click: Option<DateTime<Utc>>,
    pub cloud_cma_request_count: u32,
    pub cloud_cma_last_request: Option<DateTime<Utc>>,
    pub sierra_property_views: u32,
    pub sierra_saved_listings: u32,
}

impl SignalBundle {
    /// Build a bundle from a raw CRM person object (already unwrapped).
    pub fn from_person(person: &Value) -> Self {
        Self {
            fello_score: lenient_count(person.get(FIELD_FELLO_SCORE)),
            fello_email_clicks: lenient_count(person.get(FIELD_FELLO_EMAIL_CLICKS)),
            fello_form_submissions: lenient_count(person.get(FIELD_FELLO_FORM_SUBMISSIONS)),
            fello_last_email_click: lenient_timestamp(person.get(FIELD_FELLO_LAST_EMAIL_CLICK)),
            cloud_cma_request_count: lenient_count(person.get(FIELD_CLOUD_CMA_REQUESTS)),
            cloud_cma_last_request: lenient_timestamp(person.get(FIELD_CLOUD_CMA_LAST_REQUEST)),
            sierra_property_views: lenient_count(person.get(FIELD_SIERRA_PROPERTY_VIEWS)),
            sierra_saved_listings: lenient_count(person.get(FIELD_SIERRA_SAVED_LISTINGS)),
        }
    }
}

/// Signals plus the lead facts the response echoes back as `rawData`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSignals {
    #[serde(flatten)]
    pub bundle: SignalBundle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl PersonSignals {
    /// Normalize a CRM person response.
    ///
    /// Accepts both `{ "person": {...} }` and the bare person object.
    pub fn from_record(record: &Value) -> Self {
        let person = unwrap_person(record);
        Self {
            bundle: SignalBundle::from_person(person),
            address: primary_address(person),
        }
    }
}

fn unwrap_person(record: &Value) -> &Value {
    match record.get("person") {
        Some(inner) if inner.is_object() => inner,
        _ => record,
    }
}

/// First address on the person, formatted as `street, city, state code`.
pub fn primary_address(person: &Value) -> Option<String> {
    let first = person.get("addresses")?.as_array()?.first()?;
    let part = |key: &str| {
        first
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    let street = part("street")?;
    let mut formatted = street.to_string();
    if let Some(city) = part("city") {
        formatted.push_str(", ");
        formatted.push_str(city);
    }
    match (part("state"), part("code")) {
        (Some(state), Some(code)) => formatted.push_str(&format!(", {} {}", state, code)),
        (Some(state), None) => formatted.push_str(&format!(", {}", state)),
        (None, Some(code)) => formatted.push_str(&format!(" {}", code)),
        (None, None) => {}
    }
    Some(formatted)
}

// ============================================================================
// LENIENT PARSING
// ============================================================================

/// Parse a count the way the CRM widgets do: integers, floats (truncated),
/// and strings with a leading integer (`"12abc"` -> 12). Everything else,
/// including negatives, becomes 0.
pub fn lenient_count(value: Option<&Value>) -> u32 {
    let parsed = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => leading_integer(s),
        _ => None,
    };

    match parsed {
        Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
        Some(_) => 0,
        None => {
            if let Some(raw) = value.filter(|v| !v.is_null()) {
                tracing::debug!(raw = %raw, "unparsable count normalized to 0");
            }
            0
        }
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let trimmed = s.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse an RFC 3339 timestamp, a `YYYY-MM-DD HH:MM:SS` stamp or a bare date.
pub fn lenient_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let raw = value?.as_str()?.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    tracing::debug!(raw, "unparsable timestamp dropped");
    None
}
