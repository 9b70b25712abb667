//! Property record normalization
//!
//! ATTOM responses wrap matches in a `property` array; the first entry is
//! the record for the requested address. Lot size and assessed value feed
//! the protocol selector, the remaining facts are echoed to agents as
//! property intelligence.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::PropertyGeo;

/// Half-width of the displayed value range.
pub const VALUE_RANGE_SPREAD: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyRecord {
    pub lot_size_acres: Option<f64>,
    pub market_value: Option<f64>,
    pub year_built: Option<u32>,
    pub beds: Option<u32>,
    pub baths: Option<u32>,
}

impl PropertyRecord {
    /// Extract the first property of a lookup response. `None` means the
    /// provider answered without a usable record.
    pub fn from_lookup(response: &Value) -> Option<Self> {
        let property = response.get("property")?.as_array()?.first()?;
        if !property.is_object() {
            return None;
        }

        Some(Self {
            lot_size_acres: number_at(property, &["lot", "lotSize2"]).filter(|a| *a >= 0.0),
            market_value: number_at(property, &["assessment", "market", "mktTtlValue"])
                .filter(|v| *v >= 0.0),
            year_built: whole_at(property, &["summary", "yearBuilt"]),
            beds: whole_at(property, &["building", "rooms", "beds"]),
            baths: whole_at(property, &["building", "rooms", "bathsFull"]),
        })
    }

    pub fn geo(&self) -> PropertyGeo {
        PropertyGeo {
            lot_size_acres: self.lot_size_acres,
            // ceil keeps the strict `> threshold` comparison exact for fractional values
            assessed_value: self.market_value.map(|v| v.ceil() as u64),
        }
    }

    pub fn intelligence(&self) -> PropertyIntelligence {
        let estimated_value = self.market_value.map(|v| v.round() as u64);
        PropertyIntelligence {
            lot_size: self.lot_size_acres,
            year_built: self.year_built,
            estimated_value,
            beds: self.beds,
            baths: self.baths,
            value_range: estimated_value.filter(|v| *v > 0).map(ValueRange::around),
        }
    }
}

/// Property facts shown next to the CMA defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyIntelligence {
    pub lot_size: Option<f64>,
    pub year_built: Option<u32>,
    pub estimated_value: Option<u64>,
    pub beds: Option<u32>,
    pub baths: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_range: Option<ValueRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub low: u64,
    pub high: u64,
}

impl ValueRange {
    /// Estimated value +/- 5%, rounded to whole dollars.
    pub fn around(value: u64) -> Self {
        let v = value as f64;
        Self {
            low: (v * (1.0 - VALUE_RANGE_SPREAD)).round() as u64,
            high: (v * (1.0 + VALUE_RANGE_SPREAD)).round() as u64,
        }
    }
}

fn value_at<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, key| node.get(*key))
}

fn number_at(root: &Value, path: &[&str]) -> Option<f64> {
    let number = match value_at(root, path)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_number(s),
        _ => None,
    };
    number.filter(|f| f.is_finite())
}

/// Leading decimal number of a string, so `"5.5 acres"` reads as 5.5.
/// Exponents are not recognized.
fn leading_number(s: &str) -> Option<f64> {
    let trimmed = s.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'-' | b'+')));
    let mut seen_digit = false;
    let mut seen_dot = false;
    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return None;
    }
    trimmed[..end].parse::<f64>().ok()
}

fn whole_at(root: &Value, path: &[&str]) -> Option<u32> {
    number_at(root, path)
        .filter(|f| *f >= 0.0)
        .map(|f| f.trunc().min(f64::from(u32::MAX)) as u32)
}
