//! Climate parameters shared by the weather generator and the factor model.

use serde::{Deserialize, Serialize};

/// Position in the tropical wet/dry calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Dry,
    Wet,
    Shoulder,
}

/// Regional climate parameters.
///
/// Every field is required when supplied from a scenario file; the
/// built-in profiles below are the only source of defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClimateProfile {
    /// Mean air temperature (°C).
    pub base_temperature_c: f64,
    /// Half-range of the daily temperature cycle (°C).
    pub diurnal_amplitude_c: f64,
    /// Half-range of the annual temperature cycle (°C).
    pub seasonal_amplitude_c: f64,
    /// Standard deviation of temperature noise (°C).
    pub temperature_noise_c: f64,
    /// Mean relative humidity as a fraction.
    pub base_humidity: f64,
    /// Half-range of the daily humidity cycle (fraction).
    pub diurnal_humidity_amplitude: f64,
    /// Standard deviation of humidity noise (fraction).
    pub humidity_noise: f64,
    /// Mean sea-level pressure (hPa).
    pub base_pressure_hpa: f64,
    /// Standard deviation of pressure noise (hPa).
    pub pressure_noise_hpa: f64,
    /// Station elevation above sea level (m).
    pub elevation_m: f64,
    /// Probability of precipitation for each hour of the day.
    pub precipitation_probability: [f64; 24],
    /// Mean precipitation of a wet observation (mm).
    pub mean_precipitation_mm: f64,
    /// Mean 10 m wind speed (m/s).
    pub mean_wind_speed_ms: f64,
    /// Clear-sky shortwave radiation at solar noon (W/m²).
    pub radiation_ceiling_w_m2: f64,
    /// Months (1-12) of the dry season.
    pub dry_season_months: Vec<u32>,
    /// Months (1-12) of the wet season.
    pub wet_season_months: Vec<u32>,
}

/// Precipitation curve with an afternoon convective peak.
fn afternoon_peak(peak: f64, background: f64) -> [f64; 24] {
    let mut curve = [background; 24];
    for p in &mut curve[14..=18] {
        *p = peak;
    }
    curve
}

impl ClimateProfile {
    /// Humid tropical lowland profile calibrated on Kuala Lumpur.
    pub fn kuala_lumpur() -> Self {
        Self {
            base_temperature_c: 27.0,
            diurnal_amplitude_c: 5.0,
            seasonal_amplitude_c: 2.0,
            temperature_noise_c: 1.0,
            base_humidity: 0.8,
            diurnal_humidity_amplitude: 0.1,
            humidity_noise: 0.05,
            base_pressure_hpa: 1013.25,
            pressure_noise_hpa: 2.0,
            elevation_m: 42.0,
            precipitation_probability: afternoon_peak(0.3, 0.1),
            mean_precipitation_mm: 5.0,
            mean_wind_speed_ms: 3.0,
            radiation_ceiling_w_m2: 800.0,
            dry_season_months: vec![6, 7, 8],
            wet_season_months: vec![11, 12, 1, 2],
        }
    }

    /// Northeast-monsoon profile: wetter, cloudier, longer wet season.
    pub fn monsoon() -> Self {
        Self {
            base_humidity: 0.86,
            precipitation_probability: afternoon_peak(0.5, 0.2),
            mean_precipitation_mm: 8.0,
            mean_wind_speed_ms: 4.0,
            dry_season_months: vec![6, 7],
            wet_season_months: vec![10, 11, 12, 1, 2, 3],
            ..Self::kuala_lumpur()
        }
    }

    /// Cool tropical highland profile (around 1,500 m).
    pub fn highland() -> Self {
        Self {
            base_temperature_c: 18.0,
            diurnal_amplitude_c: 4.0,
            seasonal_amplitude_c: 1.0,
            base_humidity: 0.85,
            elevation_m: 1500.0,
            precipitation_probability: afternoon_peak(0.4, 0.15),
            radiation_ceiling_w_m2: 900.0,
            ..Self::kuala_lumpur()
        }
    }

    /// Classifies a calendar month (1-12).
    pub fn season(&self, month: u32) -> Season {
        if self.dry_season_months.contains(&month) {
            Season::Dry
        } else if self.wet_season_months.contains(&month) {
            Season::Wet
        } else {
            Season::Shoulder
        }
    }

    /// Station pressure derived from sea-level pressure (≈1 hPa per 8.3 m).
    pub fn surface_pressure(&self, msl_hpa: f64) -> f64 {
        msl_hpa - self.elevation_m / 8.3
    }
}

impl Default for ClimateProfile {
    fn default() -> Self {
        Self::kuala_lumpur()
    }
}
