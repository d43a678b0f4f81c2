//! Synthetic station weather.
//!
//! Each observation is drawn independently from its own random stream,
//! so stations and timestamps can be generated in any order.

use std::f64::consts::PI;

use chrono::{Datelike, NaiveDateTime, Timelike};
use rand::Rng;
use rand::rngs::StdRng;
use rand_distr::{Exp1, StandardNormal};

use crate::climate::ClimateProfile;
use crate::engine::time_grid::{TimeGrid, TimeGridIter};
use crate::engine::types::WeatherObservation;
use crate::random::{RandomSource, Stream, StreamKey};

/// Relative-humidity floor for humid tropical stations.
const MIN_HUMIDITY: f64 = 0.5;
/// Hours (inclusive) treated as daylight.
const DAYLIGHT: std::ops::RangeInclusive<u32> = 6..=18;

/// Produces weather observations for synthetic stations.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherGenerator;

impl WeatherGenerator {
    /// Lazily generates one observation per grid timestamp for a station.
    pub fn generate<'a>(
        &self,
        station_id: u32,
        grid: &TimeGrid,
        climate: &'a ClimateProfile,
        source: &'a dyn RandomSource,
    ) -> WeatherSeries<'a> {
        WeatherSeries {
            station_id,
            climate,
            source,
            step_hours: grid.frequency().hours(),
            timestamps: grid.iter(),
        }
    }

    /// Draws a single observation.
    pub fn observation(
        &self,
        station_id: u32,
        timestamp: NaiveDateTime,
        step_hours: f64,
        climate: &ClimateProfile,
        rng: &mut StdRng,
    ) -> WeatherObservation {
        let hour = timestamp.hour();
        let fractional_hour = f64::from(hour) + f64::from(timestamp.minute()) / 60.0;
        let month = f64::from(timestamp.month());
        let normal = |rng: &mut StdRng| -> f64 { rng.sample(StandardNormal) };

        let temperature = climate.base_temperature_c
            + climate.diurnal_amplitude_c * ((fractional_hour - 6.0) * PI / 12.0).sin()
            + climate.seasonal_amplitude_c * ((month - 1.0) * PI / 6.0).sin()
            + normal(rng) * climate.temperature_noise_c;

        let humidity = (climate.base_humidity
            + climate.diurnal_humidity_amplitude * ((fractional_hour - 12.0) * PI / 12.0).sin()
            + normal(rng) * climate.humidity_noise)
            .clamp(MIN_HUMIDITY, 1.0);

        let wet = rng.random::<f64>() < climate.precipitation_probability[hour as usize];
        let precipitation = if wet {
            let draw: f64 = rng.sample(Exp1);
            draw * climate.mean_precipitation_mm
        } else {
            0.0
        };

        let cloud_cover = if precipitation > 0.0 {
            rng.random_range(80.0..=100.0)
        } else {
            rng.random_range(20.0..=70.0)
        };

        let pressure_msl = climate.base_pressure_hpa + normal(rng) * climate.pressure_noise_hpa;

        let wind_draw: f64 = rng.sample(Exp1);
        let wind_speed = wind_draw * climate.mean_wind_speed_ms;
        let wind_direction = rng.random_range(0.0..360.0);
        let wind_gusts = wind_speed * rng.random_range(1.2..=2.0);

        let soil_temperature_shallow = temperature + normal(rng);
        let soil_temperature_deep = temperature - 1.0 + normal(rng) * 0.5;
        let soil_moisture_shallow = rng.random_range(0.3..=0.6);
        let soil_moisture_deep = rng.random_range(0.4..=0.7);
        let et0 = rng.random_range(4.0..=8.0);

        let is_day = DAYLIGHT.contains(&hour);
        let sunshine_duration = if is_day && precipitation == 0.0 {
            rng.random_range(0.0..=3600.0) * step_hours.min(1.0)
        } else {
            0.0
        };

        let shortwave = if is_day {
            let elevation = ((fractional_hour - 6.0) * PI / 12.0).sin().max(0.0);
            climate.radiation_ceiling_w_m2 * elevation * (100.0 - cloud_cover) / 100.0
        } else {
            0.0
        };
        let direct = shortwave * 0.7;
        let terrestrial = 400.0 + normal(rng) * 20.0;

        WeatherObservation {
            station_id,
            timestamp,
            temperature_2m: temperature,
            relative_humidity_2m: humidity,
            dew_point_2m: temperature - (100.0 - humidity * 100.0) / 5.0,
            apparent_temperature: apparent_temperature(temperature, humidity * 100.0),
            precipitation,
            rain: precipitation,
            snowfall: 0.0,
            snow_depth: 0.0,
            weather_code: weather_code(precipitation, humidity, cloud_cover),
            pressure_msl,
            surface_pressure: climate.surface_pressure(pressure_msl),
            cloud_cover,
            cloud_cover_low: cloud_cover * 0.6,
            cloud_cover_mid: cloud_cover * 0.3,
            cloud_cover_high: cloud_cover * 0.1,
            et0_fao_evapotranspiration: et0,
            vapour_pressure_deficit: (2.0 * (1.0 - humidity)).max(0.0),
            wind_speed_10m: wind_speed,
            wind_direction_10m: wind_direction,
            wind_gusts_10m: wind_gusts,
            soil_temperature_0_to_7cm: soil_temperature_shallow,
            soil_temperature_7_to_28cm: soil_temperature_deep,
            soil_moisture_0_to_7cm: soil_moisture_shallow,
            soil_moisture_7_to_28cm: soil_moisture_deep,
            is_day,
            sunshine_duration,
            shortwave_radiation: shortwave,
            direct_radiation: direct,
            diffuse_radiation: shortwave * 0.3,
            direct_normal_irradiance: direct * 1.2,
            terrestrial_radiation: terrestrial,
        }
    }
}

/// Iterator over a station's observations.
pub struct WeatherSeries<'a> {
    station_id: u32,
    climate: &'a ClimateProfile,
    source: &'a dyn RandomSource,
    step_hours: f64,
    timestamps: TimeGridIter,
}

impl Iterator for WeatherSeries<'_> {
    type Item = WeatherObservation;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, timestamp) = self.timestamps.next()?;
        let mut rng = self.source.rng(StreamKey::new(
            Stream::Weather,
            u64::from(self.station_id),
            index as u64,
        ));
        Some(WeatherGenerator.observation(
            self.station_id,
            timestamp,
            self.step_hours,
            self.climate,
            &mut rng,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.timestamps.size_hint()
    }
}

impl ExactSizeIterator for WeatherSeries<'_> {}

/// Apparent temperature (°C) from the NWS heat index.
///
/// Uses the simple Steadman form below 80 °F and the Rothfusz regression
/// with its low- and high-humidity adjustments above.
pub fn apparent_temperature(temperature_c: f64, humidity_pct: f64) -> f64 {
    let t = temperature_c * 9.0 / 5.0 + 32.0;
    let rh = humidity_pct;
    let simple = 0.5 * (t + 61.0 + (t - 68.0) * 1.2 + rh * 0.094);

    let index_f = if (simple + t) / 2.0 < 80.0 {
        simple
    } else {
        let mut hi = -42.379 + 2.049_015_23 * t + 10.143_331_27 * rh
            - 0.224_755_41 * t * rh
            - 0.006_837_83 * t * t
            - 0.054_817_17 * rh * rh
            + 0.001_228_74 * t * t * rh
            + 0.000_852_82 * t * rh * rh
            - 0.000_001_99 * t * t * rh * rh;
        if rh < 13.0 && (80.0..=112.0).contains(&t) {
            hi -= ((13.0 - rh) / 4.0) * ((17.0 - (t - 95.0).abs()) / 17.0).sqrt();
        } else if rh > 85.0 && (80.0..=87.0).contains(&t) {
            hi += ((rh - 85.0) / 10.0) * ((87.0 - t) / 5.0);
        }
        hi
    };

    (index_f - 32.0) * 5.0 / 9.0
}

/// WMO weather code from precipitation, humidity and cloud cover.
pub fn weather_code(precipitation_mm: f64, humidity: f64, cloud_cover_pct: f64) -> u8 {
    if precipitation_mm > 20.0 {
        95
    } else if precipitation_mm > 10.0 {
        63
    } else if precipitation_mm > 0.0 {
        61
    } else if humidity > 0.9 {
        45
    } else if cloud_cover_pct >= 50.0 {
        2
    } else if cloud_cover_pct >= 25.0 {
        1
    } else {
        0
    }
}
