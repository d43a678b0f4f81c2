//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::climate::ClimateProfile;
use crate::engine::time_grid::Frequency;

/// Top-level scenario configuration parsed from TOML.
///
/// Missing sections take the baseline defaults. The `[climate]` section
/// is all-or-nothing: if present, every field must be given. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or start from
/// [`ScenarioConfig::baseline`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Time range, sampling, seed and fan-out parameters.
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Regional climate driving weather and seasonal factors.
    #[serde(default)]
    pub climate: ClimateProfile,
    /// Ceilings checked before any work starts.
    #[serde(default)]
    pub limits: ResourceLimits,
}

/// Time range, sampling and run parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// First day of the range (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the range (inclusive).
    pub end_date: NaiveDate,
    /// Sampling interval, e.g. `"15T"`, `"1H"`, `"D"`.
    pub frequency: Frequency,
    /// Master seed; drawn from the OS when absent.
    pub seed: Option<u64>,
    /// Number of synthetic weather stations.
    pub weather_stations: u32,
    /// Generate the water series alongside electricity.
    pub include_water: bool,
    /// Buildings handed to the worker pool per chunk.
    pub chunk_buildings: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap_or_default(),
            frequency: Frequency::HOURLY,
            seed: None,
            weather_stations: 5,
            include_water: true,
            chunk_buildings: 32,
        }
    }
}

/// Resource ceilings for a single run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResourceLimits {
    pub max_buildings: usize,
    pub max_span_days: u64,
    pub max_weather_stations: u32,
    /// Buildings × timestamps × utilities.
    pub max_consumption_points: u64,
    /// Stations × timestamps.
    pub max_weather_points: u64,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_buildings: 50_000,
            max_span_days: 365,
            max_weather_stations: 50,
            max_consumption_points: 10_000_000,
            max_weather_points: 1_000_000,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"generation.weather_stations"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

fn error(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError {
        field: field.to_string(),
        message: message.into(),
    }
}

impl ScenarioConfig {
    /// One week of January in Kuala Lumpur at hourly resolution.
    pub fn baseline() -> Self {
        Self {
            generation: GenerationConfig {
                seed: Some(42),
                ..GenerationConfig::default()
            },
            climate: ClimateProfile::kuala_lumpur(),
            limits: ResourceLimits::default(),
        }
    }

    /// Two weeks of the northeast monsoon at half-hourly resolution.
    pub fn monsoon() -> Self {
        Self {
            generation: GenerationConfig {
                start_date: NaiveDate::from_ymd_opt(2024, 11, 18).unwrap_or_default(),
                end_date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap_or_default(),
                frequency: Frequency::from_minutes(30).unwrap_or(Frequency::HOURLY),
                seed: Some(42),
                weather_stations: 8,
                ..GenerationConfig::default()
            },
            climate: ClimateProfile::monsoon(),
            limits: ResourceLimits::default(),
        }
    }

    /// A dry-season week in a cool highland town.
    pub fn highland() -> Self {
        Self {
            generation: GenerationConfig {
                start_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap_or_default(),
                end_date: NaiveDate::from_ymd_opt(2024, 7, 7).unwrap_or_default(),
                seed: Some(42),
                weather_stations: 3,
                ..GenerationConfig::default()
            },
            climate: ClimateProfile::highland(),
            limits: ResourceLimits::default(),
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "monsoon", "highland"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "monsoon" => Ok(Self::monsoon()),
            "highland" => Ok(Self::highland()),
            _ => Err(error(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            error(
                "scenario",
                format!("cannot read \"{}\": {e}", path.display()),
            )
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid, incomplete, or
    /// contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| error("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let g = &self.generation;
        let l = &self.limits;

        if g.end_date < g.start_date {
            errors.push(error(
                "generation.end_date",
                "must not be before generation.start_date",
            ));
        } else {
            let span_days = (g.end_date - g.start_date).num_days().unsigned_abs() + 1;
            if span_days > l.max_span_days {
                errors.push(error(
                    "generation.end_date",
                    format!(
                        "range covers {span_days} days, limit is {}",
                        l.max_span_days
                    ),
                ));
            }
        }
        if g.weather_stations == 0 || g.weather_stations > l.max_weather_stations {
            errors.push(error(
                "generation.weather_stations",
                format!("must be in 1..={}", l.max_weather_stations),
            ));
        }
        if g.chunk_buildings == 0 {
            errors.push(error("generation.chunk_buildings", "must be > 0"));
        }

        if l.max_buildings == 0 {
            errors.push(error("limits.max_buildings", "must be > 0"));
        }
        if l.max_span_days == 0 {
            errors.push(error("limits.max_span_days", "must be > 0"));
        }
        if l.max_consumption_points == 0 {
            errors.push(error("limits.max_consumption_points", "must be > 0"));
        }
        if l.max_weather_points == 0 {
            errors.push(error("limits.max_weather_points", "must be > 0"));
        }

        validate_climate(&self.climate, &mut errors);
        errors
    }
}

fn validate_climate(c: &ClimateProfile, errors: &mut Vec<ConfigError>) {
    let finite = [
        ("climate.base_temperature_c", c.base_temperature_c),
        ("climate.base_pressure_hpa", c.base_pressure_hpa),
        ("climate.elevation_m", c.elevation_m),
    ];
    for (field, value) in finite {
        if !value.is_finite() {
            errors.push(error(field, "must be finite"));
        }
    }

    let non_negative = [
        ("climate.diurnal_amplitude_c", c.diurnal_amplitude_c),
        ("climate.seasonal_amplitude_c", c.seasonal_amplitude_c),
        ("climate.temperature_noise_c", c.temperature_noise_c),
        ("climate.diurnal_humidity_amplitude", c.diurnal_humidity_amplitude),
        ("climate.humidity_noise", c.humidity_noise),
        ("climate.pressure_noise_hpa", c.pressure_noise_hpa),
        ("climate.mean_precipitation_mm", c.mean_precipitation_mm),
        ("climate.mean_wind_speed_ms", c.mean_wind_speed_ms),
    ];
    for (field, value) in non_negative {
        if !(value >= 0.0 && value.is_finite()) {
            errors.push(error(field, "must be a finite value >= 0"));
        }
    }

    if !(c.base_humidity > 0.0 && c.base_humidity <= 1.0) {
        errors.push(error("climate.base_humidity", "must be in (0.0, 1.0]"));
    }
    if !(c.radiation_ceiling_w_m2 > 0.0 && c.radiation_ceiling_w_m2 <= 1400.0) {
        errors.push(error(
            "climate.radiation_ceiling_w_m2",
            "must be in (0, 1400]",
        ));
    }
    if let Some(hour) = c
        .precipitation_probability
        .iter()
        .position(|p| !(0.0..=1.0).contains(p))
    {
        errors.push(error(
            "climate.precipitation_probability",
            format!("hour {hour} must be in [0.0, 1.0]"),
        ));
    }

    for (field, months) in [
        ("climate.dry_season_months", &c.dry_season_months),
        ("climate.wet_season_months", &c.wet_season_months),
    ] {
        if months.iter().any(|m| !(1..=12).contains(m)) {
            errors.push(error(field, "months must be in 1..=12"));
        }
    }
    if c
        .dry_season_months
        .iter()
        .any(|m| c.wet_season_months.contains(m))
    {
        errors.push(error(
            "climate.wet_season_months",
            "must not overlap climate.dry_season_months",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name).expect("preset exists");
            let errors = cfg.validate();
            assert!(errors.is_empty(), "{name} should be valid: {errors:?}");
            assert_eq!(cfg.generation.seed, Some(42));
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent").expect_err("unknown preset");
        assert!(err.message.contains("unknown preset"));
    }

    #[test]
    fn empty_toml_uses_defaults_without_seed() {
        let cfg = ScenarioConfig::from_toml_str("").expect("empty is valid");
        assert!(cfg.generation.seed.is_none());
        assert_eq!(cfg.generation.weather_stations, 5);
        assert_eq!(cfg.climate, ClimateProfile::kuala_lumpur());
    }

    #[test]
    fn generation_section_parses() {
        let toml = r#"
[generation]
start_date = "2024-03-01"
end_date = "2024-03-03"
frequency = "15T"
seed = 7
weather_stations = 2
include_water = false
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).expect("valid");
        assert_eq!(cfg.generation.frequency.minutes(), 15);
        assert_eq!(cfg.generation.seed, Some(7));
        assert!(!cfg.generation.include_water);
        assert_eq!(cfg.generation.chunk_buildings, 32);
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn complete_climate_file_parses() {
        let cfg = ScenarioConfig::from_toml_str(include_str!("../scenarios/highland_estate.toml"))
            .expect("scenario file is valid");
        assert_eq!(cfg.climate.base_temperature_c, 19.0);
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn partial_climate_section_is_rejected() {
        let toml = r#"
[climate]
base_temperature_c = 30.0
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let toml = r#"
[generation]
stations = 3
"#;
        let err = ScenarioConfig::from_toml_str(toml).expect_err("unknown field");
        assert_eq!(err.field, "toml");
    }

    #[test]
    fn bad_frequency_is_rejected() {
        let toml = r#"
[generation]
frequency = "0H"
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_collects_every_problem() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.generation.end_date = NaiveDate::from_ymd_opt(2023, 12, 1).expect("valid");
        cfg.generation.weather_stations = 0;
        cfg.climate.precipitation_probability[15] = 1.5;
        cfg.climate.wet_season_months.push(7);
        let fields: Vec<String> = cfg.validate().into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"generation.end_date".to_string()));
        assert!(fields.contains(&"generation.weather_stations".to_string()));
        assert!(fields.contains(&"climate.precipitation_probability".to_string()));
        assert!(fields.contains(&"climate.wet_season_months".to_string()));
    }

    #[test]
    fn span_over_limit_is_reported() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.generation.end_date = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid");
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.message.contains("limit is 365")));
    }
}
