// crates/trato-providers/src/env.rs
// ============================================================================
// Module: Environment Location Source
// Description: Location source reading coordinates from the process environment.
// Purpose: Serve deployment-configured coordinates with fail-closed validation.
// Dependencies: trato-core, serde
// ============================================================================

//! ## Overview
//! The environment source resolves coordinates from configured environment
//! keys, with an optional override map for deterministic lookups in tests.
//! Environment values are untrusted: missing keys, unparsable numbers, and
//! out-of-range coordinates all resolve as denials rather than fixes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::mpsc;

use serde::Deserialize;
use trato_core::FixOutcome;
use trato_core::Geolocation;
use trato_core::LocationSource;
use trato_core::PendingFix;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default environment key for the latitude value.
const DEFAULT_LATITUDE_KEY: &str = "TRATO_FIX_LATITUDE";

/// Default environment key for the longitude value.
const DEFAULT_LONGITUDE_KEY: &str = "TRATO_FIX_LONGITUDE";

/// Configuration for the environment location source.
///
/// # Invariants
/// - `overrides` take precedence over process environment reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnvLocationConfig {
    /// Environment key holding the latitude in decimal degrees.
    pub latitude_key: String,
    /// Environment key holding the longitude in decimal degrees.
    pub longitude_key: String,
    /// Optional override map used for deterministic lookups.
    pub overrides: Option<BTreeMap<String, String>>,
}

impl Default for EnvLocationConfig {
    fn default() -> Self {
        Self {
            latitude_key: DEFAULT_LATITUDE_KEY.to_string(),
            longitude_key: DEFAULT_LONGITUDE_KEY.to_string(),
            overrides: None,
        }
    }
}

// ============================================================================
// SECTION: Location Source
// ============================================================================

/// Location source backed by environment variables.
#[derive(Debug, Clone)]
pub struct EnvLocationSource {
    /// Source configuration, including keys and override policy.
    config: EnvLocationConfig,
}

impl EnvLocationSource {
    /// Creates a new environment source with the given configuration.
    #[must_use]
    pub const fn new(config: EnvLocationConfig) -> Self {
        Self {
            config,
        }
    }
}

impl LocationSource for EnvLocationSource {
    fn request_fix(&self) -> PendingFix {
        let (sender, receiver) = mpsc::channel();
        let _ = sender.send(read_outcome(&self.config));
        PendingFix::new(receiver)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves one configured key from overrides or the process environment.
fn lookup(config: &EnvLocationConfig, key: &str) -> Option<String> {
    if let Some(overrides) = &config.overrides {
        return overrides.get(key).cloned();
    }
    std::env::var(key).ok()
}

/// Parses one coordinate value, rejecting non-finite numbers.
fn parse_coordinate(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Reads and validates both coordinates, failing closed to a denial.
fn read_outcome(config: &EnvLocationConfig) -> FixOutcome {
    let Some(raw_latitude) = lookup(config, &config.latitude_key) else {
        return FixOutcome::Denied(format!("missing env key: {}", config.latitude_key));
    };
    let Some(raw_longitude) = lookup(config, &config.longitude_key) else {
        return FixOutcome::Denied(format!("missing env key: {}", config.longitude_key));
    };
    let Some(latitude) = parse_coordinate(&raw_latitude) else {
        return FixOutcome::Denied(format!("invalid latitude value: {raw_latitude}"));
    };
    let Some(longitude) = parse_coordinate(&raw_longitude) else {
        return FixOutcome::Denied(format!("invalid longitude value: {raw_longitude}"));
    };

    let fix = Geolocation {
        latitude,
        longitude,
    };
    if !fix.in_range() {
        return FixOutcome::Denied("coordinates out of range".to_string());
    }
    FixOutcome::Fix(fix)
}
