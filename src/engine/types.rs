//! Output records produced by a generation run.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::stats::SessionSummary;
use crate::building::BuildingProfile;

/// One consumption value; the unit follows the series utility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumptionPoint {
    pub building_id: Arc<str>,
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// Column names of a weather record, in export order.
pub const WEATHER_COLUMNS: [&str; 33] = [
    "timestamp",
    "temperature_2m",
    "relative_humidity_2m",
    "dew_point_2m",
    "apparent_temperature",
    "precipitation",
    "rain",
    "snowfall",
    "snow_depth",
    "weather_code",
    "pressure_msl",
    "surface_pressure",
    "cloud_cover",
    "cloud_cover_low",
    "cloud_cover_mid",
    "cloud_cover_high",
    "et0_fao_evapotranspiration",
    "vapour_pressure_deficit",
    "wind_speed_10m",
    "wind_direction_10m",
    "wind_gusts_10m",
    "soil_temperature_0_to_7cm",
    "soil_temperature_7_to_28cm",
    "soil_moisture_0_to_7cm",
    "soil_moisture_7_to_28cm",
    "is_day",
    "sunshine_duration",
    "shortwave_radiation",
    "direct_radiation",
    "diffuse_radiation",
    "direct_normal_irradiance",
    "terrestrial_radiation",
    "location_id",
];

/// One synthetic weather observation for a station.
///
/// Temperatures in °C, humidity as a fraction, precipitation in mm,
/// pressure in hPa, cloud cover in %, wind in m/s and degrees, radiation
/// in W/m², sunshine in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherObservation {
    pub station_id: u32,
    pub timestamp: NaiveDateTime,
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
    pub dew_point_2m: f64,
    pub apparent_temperature: f64,
    pub precipitation: f64,
    pub rain: f64,
    pub snowfall: f64,
    pub snow_depth: f64,
    pub weather_code: u8,
    pub pressure_msl: f64,
    pub surface_pressure: f64,
    pub cloud_cover: f64,
    pub cloud_cover_low: f64,
    pub cloud_cover_mid: f64,
    pub cloud_cover_high: f64,
    pub et0_fao_evapotranspiration: f64,
    pub vapour_pressure_deficit: f64,
    pub wind_speed_10m: f64,
    pub wind_direction_10m: f64,
    pub wind_gusts_10m: f64,
    pub soil_temperature_0_to_7cm: f64,
    pub soil_temperature_7_to_28cm: f64,
    pub soil_moisture_0_to_7cm: f64,
    pub soil_moisture_7_to_28cm: f64,
    pub is_day: bool,
    pub sunshine_duration: f64,
    pub shortwave_radiation: f64,
    pub direct_radiation: f64,
    pub diffuse_radiation: f64,
    pub direct_normal_irradiance: f64,
    pub terrestrial_radiation: f64,
}

impl WeatherObservation {
    /// Numeric fields between `timestamp` and `location_id`, in column order.
    pub fn measurements(&self) -> [f64; 31] {
        [
            self.temperature_2m,
            self.relative_humidity_2m,
            self.dew_point_2m,
            self.apparent_temperature,
            self.precipitation,
            self.rain,
            self.snowfall,
            self.snow_depth,
            f64::from(self.weather_code),
            self.pressure_msl,
            self.surface_pressure,
            self.cloud_cover,
            self.cloud_cover_low,
            self.cloud_cover_mid,
            self.cloud_cover_high,
            self.et0_fao_evapotranspiration,
            self.vapour_pressure_deficit,
            self.wind_speed_10m,
            self.wind_direction_10m,
            self.wind_gusts_10m,
            self.soil_temperature_0_to_7cm,
            self.soil_temperature_7_to_28cm,
            self.soil_moisture_0_to_7cm,
            self.soil_moisture_7_to_28cm,
            if self.is_day { 1.0 } else { 0.0 },
            self.sunshine_duration,
            self.shortwave_radiation,
            self.direct_radiation,
            self.diffuse_radiation,
            self.direct_normal_irradiance,
            self.terrestrial_radiation,
        ]
    }
}

/// A building or station left out of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedUnit {
    pub id: String,
    pub reason: String,
}

/// Everything a materialized run produced.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationSession {
    pub summary: SessionSummary,
    pub buildings: Vec<BuildingProfile>,
    pub electricity: Vec<ConsumptionPoint>,
    pub water: Vec<ConsumptionPoint>,
    pub weather: Vec<WeatherObservation>,
}
