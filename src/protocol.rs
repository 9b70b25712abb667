//! Market protocol selection for CMA generation
//!
//! Lot size decides the base protocol (large lots are rural, everything else
//! urban). A luxury override then replaces the lookback window, variance and
//! comparable count for high-value properties, independent of the protocol.
//! When the property lookup fails the selector still answers, with the urban
//! base set under the FALLBACK protocol.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lots at or above this size use the rural protocol.
pub const RURAL_MIN_LOT_ACRES: f64 = 5.0;
/// Assessed values strictly above this trigger the luxury override.
pub const LUXURY_MIN_VALUE: u64 = 750_000;

/// Property facts the selector needs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyGeo {
    pub lot_size_acres: Option<f64>,
    pub assessed_value: Option<u64>,
}

impl PropertyGeo {
    pub fn is_rural(&self) -> bool {
        matches!(self.lot_size_acres, Some(acres) if acres >= RURAL_MIN_LOT_ACRES)
    }

    pub fn is_luxury(&self) -> bool {
        matches!(self.assessed_value, Some(value) if value > LUXURY_MIN_VALUE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CmaProtocol {
    /// Dense markets
    Urban,
    /// Large lots, sparse comparable data
    Rural,
    /// Property data unavailable; conservative urban parameters
    Fallback,
}

impl CmaProtocol {
    pub fn as_str(self) -> &'static str {
        match self {
            CmaProtocol::Urban => "URBAN",
            CmaProtocol::Rural => "RURAL",
            CmaProtocol::Fallback => "FALLBACK",
        }
    }
}

impl fmt::Display for CmaProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CMA search parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmaDefaults {
    #[serde(rename = "radius")]
    pub radius_miles: u32,
    pub days_back: u32,
    pub max_comparables: u32,
    #[serde(rename = "priceVariance")]
    pub price_variance_pct: u32,
}

impl CmaDefaults {
    pub const URBAN: CmaDefaults = CmaDefaults {
        radius_miles: 1,
        days_back: 365,
        max_comparables: 20,
        price_variance_pct: 10,
    };

    pub const RURAL: CmaDefaults = CmaDefaults {
        radius_miles: 3,
        days_back: 545,
        max_comparables: 15,
        price_variance_pct: 15,
    };

    /// Replace lookback, variance and comparable count; radius is kept.
    pub fn with_luxury_override(self) -> Self {
        Self {
            days_back: 730,
            price_variance_pct: 20,
            max_comparables: 12,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolSelection {
    pub protocol: CmaProtocol,
    pub defaults: CmaDefaults,
}

impl ProtocolSelection {
    pub fn fallback() -> Self {
        Self {
            protocol: CmaProtocol::Fallback,
            defaults: CmaDefaults::URBAN,
        }
    }
}

/// Derive protocol and CMA parameters from property geodata.
pub fn select_protocol(geo: &PropertyGeo) -> ProtocolSelection {
    let (protocol, base) = if geo.is_rural() {
        (CmaProtocol::Rural, CmaDefaults::RURAL)
    } else {
        (CmaProtocol::Urban, CmaDefaults::URBAN)
    };

    let defaults = if geo.is_luxury() {
        base.with_luxury_override()
    } else {
        base
    };

    ProtocolSelection { protocol, defaults }
}

/// Select from a lookup that may have produced nothing usable.
pub fn select_or_fallback(geo: Option<&PropertyGeo>) -> ProtocolSelection {
    geo.map(select_protocol)
        .unwrap_or_else(ProtocolSelection::fallback)
}

// ============================================================================
// CMA GENERATION REQUEST
// ============================================================================

/// Agent-adjusted parameters for a CMA draft; unset or non-positive values
/// fall back to the urban base set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmaOverrides {
    pub radius: Option<f64>,
    pub days_back: Option<u32>,
    pub max_comparables: Option<u32>,
    pub price_variance: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmaRequest {
    pub address: String,
    pub radius: f64,
    pub days_back: u32,
    pub max_comparables: u32,
    pub price_variance: u32,
}

impl CmaRequest {
    pub fn new(address: impl Into<String>, overrides: CmaOverrides) -> Self {
        let base = CmaDefaults::URBAN;
        let positive = |v: Option<u32>| v.filter(|n| *n > 0);
        Self {
            address: address.into(),
            radius: overrides
                .radius
                .filter(|r| r.is_finite() && *r > 0.0)
                .unwrap_or_else(|| f64::from(base.radius_miles)),
            days_back: positive(overrides.days_back).unwrap_or(base.days_back),
            max_comparables: positive(overrides.max_comparables).unwrap_or(base.max_comparables),
            price_variance: positive(overrides.price_variance).unwrap_or(base.price_variance_pct),
        }
    }
}
