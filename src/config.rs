//! TOML-based depot configuration and preset definitions.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;

use crate::sim::compare::ScenarioSpec;
use crate::sim::tariff::Tariff;

/// Longest horizon a single run may cover (one week).
pub const MAX_HORIZON_HOURS: u32 = 168;

/// Top-level depot configuration parsed from TOML.
///
/// All fields have defaults matching the `depot` preset. Load from TOML with
/// [`DepotConfig::from_toml_file`] or use [`DepotConfig::depot`] for the
/// built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DepotConfig {
    /// Width of one time bin in minutes (1-60).
    pub time_bin_minutes: u32,
    /// Length of the simulated horizon in hours.
    pub horizon_hours: u32,
    /// Number of chargers that may be active in the same bin.
    pub max_concurrent_chargers: u32,
    /// Cap used by scenarios that do not set their own (kW).
    pub depot_power_cap_kw: f64,
    /// Energy and demand pricing.
    pub tariff: Tariff,
    /// Named power-cap scenarios to compare against the baseline.
    pub savings_scenarios: BTreeMap<String, ScenarioOverride>,
    /// Synthetic session generator parameters.
    pub synthetic: SyntheticConfig,
}

/// Per-scenario overrides of the top-level settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioOverride {
    /// Depot power cap for this scenario; falls back to the top-level cap.
    pub depot_power_cap_kw: Option<f64>,
}

impl ScenarioOverride {
    fn cap(kw: f64) -> Self {
        Self {
            depot_power_cap_kw: Some(kw),
        }
    }
}

/// Synthetic session generator parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyntheticConfig {
    /// Number of sessions to generate.
    pub sessions: usize,
    /// Random seed.
    pub seed: u64,
    /// Start of the generated day (`YYYY-MM-DD HH:MM:SS`).
    pub start: String,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            sessions: 140,
            seed: 7,
            start: "2026-02-17 00:00:00".to_string(),
        }
    }
}

impl SyntheticConfig {
    /// Parses [`SyntheticConfig::start`].
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the timestamp is malformed.
    pub fn start_time(&self) -> Result<NaiveDateTime, ConfigError> {
        crate::io::sessions::parse_timestamp(&self.start).ok_or_else(|| ConfigError {
            field: "synthetic.start".into(),
            message: format!("invalid timestamp \"{}\"", self.start),
        })
    }
}

impl Default for DepotConfig {
    fn default() -> Self {
        Self::depot()
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"tariff.demand_charge_per_kw"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl DepotConfig {
    /// Returns the default depot: TOU tariff with an evening peak and three
    /// progressively tighter power caps.
    pub fn depot() -> Self {
        Self {
            time_bin_minutes: 15,
            horizon_hours: 24,
            max_concurrent_chargers: 40,
            depot_power_cap_kw: 450.0,
            tariff: Tariff::depot_tou(),
            savings_scenarios: BTreeMap::from([
                ("conservative".to_string(), ScenarioOverride::cap(400.0)),
                ("expected".to_string(), ScenarioOverride::cap(320.0)),
                ("aggressive".to_string(), ScenarioOverride::cap(250.0)),
            ]),
            synthetic: SyntheticConfig::default(),
        }
    }

    /// Returns the flat-tariff preset: one energy rate, savings come from the
    /// demand charge alone.
    pub fn flat_tariff() -> Self {
        Self {
            tariff: Tariff::flat(0.25, 16.0),
            ..Self::depot()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["depot", "flat_tariff"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "depot" => Ok(Self::depot()),
            "flat_tariff" => Ok(Self::flat_tariff()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Resolved scenarios, with missing caps filled from the top-level cap.
    pub fn scenarios(&self) -> Vec<ScenarioSpec> {
        self.savings_scenarios
            .iter()
            .map(|(name, o)| ScenarioSpec {
                name: name.clone(),
                depot_power_cap_kw: o.depot_power_cap_kw.unwrap_or(self.depot_power_cap_kw),
            })
            .collect()
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !(1..=60).contains(&self.time_bin_minutes) {
            errors.push(ConfigError {
                field: "time_bin_minutes".into(),
                message: "must be in [1, 60]".into(),
            });
        }
        if !(1..=MAX_HORIZON_HOURS).contains(&self.horizon_hours) {
            errors.push(ConfigError {
                field: "horizon_hours".into(),
                message: format!("must be in [1, {MAX_HORIZON_HOURS}]"),
            });
        }
        if self.max_concurrent_chargers == 0 {
            errors.push(ConfigError {
                field: "max_concurrent_chargers".into(),
                message: "must be >= 1".into(),
            });
        }
        if !(self.depot_power_cap_kw.is_finite() && self.depot_power_cap_kw > 0.0) {
            errors.push(ConfigError {
                field: "depot_power_cap_kw".into(),
                message: "must be > 0".into(),
            });
        }

        let t = &self.tariff;
        if !non_negative(t.flat_energy_rate_per_kwh) {
            errors.push(ConfigError {
                field: "tariff.flat_energy_rate_per_kwh".into(),
                message: "must be >= 0".into(),
            });
        }
        if !non_negative(t.demand_charge_per_kw) {
            errors.push(ConfigError {
                field: "tariff.demand_charge_per_kw".into(),
                message: "must be >= 0".into(),
            });
        }
        for (i, block) in t.tou_blocks.iter().enumerate() {
            let in_day = |h: f64| (0.0..=24.0).contains(&h);
            if !(in_day(block.start_hour) && in_day(block.end_hour))
                || block.start_hour >= block.end_hour
            {
                errors.push(ConfigError {
                    field: format!("tariff.tou_blocks[{i}]"),
                    message: "hours must satisfy 0 <= start_hour < end_hour <= 24".into(),
                });
            }
            if !non_negative(block.rate_per_kwh) {
                errors.push(ConfigError {
                    field: format!("tariff.tou_blocks[{i}].rate_per_kwh"),
                    message: "must be >= 0".into(),
                });
            }
        }

        if self.savings_scenarios.is_empty() {
            errors.push(ConfigError {
                field: "savings_scenarios".into(),
                message: "at least one scenario is required".into(),
            });
        }
        for (name, o) in &self.savings_scenarios {
            if o.depot_power_cap_kw.is_some_and(|kw| !(kw.is_finite() && kw > 0.0)) {
                errors.push(ConfigError {
                    field: format!("savings_scenarios.{name}.depot_power_cap_kw"),
                    message: "must be > 0".into(),
                });
            }
        }

        if let Err(e) = self.synthetic.start_time() {
            errors.push(e);
        }

        errors
    }
}

fn non_negative(x: f64) -> bool {
    x.is_finite() && x >= 0.0
}
