//! Run statistics accumulated while chunks stream out.

use std::fmt;
use std::time::Duration;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::time_grid::Frequency;
use super::types::{ConsumptionPoint, SkippedUnit};
use crate::building::{BuildingProfile, FloorSource};

/// Aggregate of one consumption series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SeriesStats {
    pub count: u64,
    pub total: f64,
    pub peak: f64,
    pub min: f64,
}

impl SeriesStats {
    /// Computes statistics over a slice of points.
    pub fn from_points(points: &[ConsumptionPoint]) -> Self {
        let mut stats = Self::default();
        for p in points {
            stats.record(p.value);
        }
        stats
    }

    pub fn record(&mut self, value: f64) {
        if self.count == 0 {
            self.peak = value;
            self.min = value;
        } else {
            self.peak = self.peak.max(value);
            self.min = self.min.min(value);
        }
        self.count += 1;
        self.total += value;
    }

    pub fn merge(&mut self, other: &SeriesStats) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        self.count += other.count;
        self.total += other.total;
        self.peak = self.peak.max(other.peak);
        self.min = self.min.min(other.min);
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Building-stock statistics over processed buildings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StockStats {
    pub buildings: u64,
    pub total_footprint_m2: f64,
    pub total_floor_area_m2: f64,
    pub total_floors: u64,
    pub with_precise_geometry: u64,
    pub with_floor_data: u64,
    pub multi_floor: u64,
    pub quality_sum: f64,
}

impl StockStats {
    pub fn record(&mut self, profile: &BuildingProfile) {
        self.buildings += 1;
        self.total_footprint_m2 += profile.geometry.area_m2;
        self.total_floor_area_m2 += profile.total_floor_area_m2();
        self.total_floors += u64::from(profile.floors.floors);
        if profile.geometry.has_precise_geometry {
            self.with_precise_geometry += 1;
        }
        if profile.floors.source != FloorSource::Sampled {
            self.with_floor_data += 1;
        }
        if profile.floors.floors > 1 {
            self.multi_floor += 1;
        }
        self.quality_sum += profile.quality_score;
    }

    pub fn average_floors(&self) -> f64 {
        if self.buildings == 0 {
            0.0
        } else {
            self.total_floors as f64 / self.buildings as f64
        }
    }

    pub fn mean_quality(&self) -> f64 {
        if self.buildings == 0 {
            0.0
        } else {
            self.quality_sum / self.buildings as f64
        }
    }
}

/// Metadata and aggregates describing one generation run.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub generation_id: String,
    pub seed: u64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub frequency: Frequency,
    pub timestamps: usize,
    pub buildings_requested: usize,
    pub buildings_processed: usize,
    pub skipped: Vec<SkippedUnit>,
    pub weather_stations: u32,
    pub weather_observations: u64,
    pub electricity: SeriesStats,
    pub water: Option<SeriesStats>,
    pub stock: StockStats,
    /// Count of estimated or corrected inputs (type fallbacks, clamped areas).
    pub data_quality_events: u64,
    pub elapsed: Duration,
    pub cancelled: bool,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Generation {} ---", self.generation_id)?;
        writeln!(
            f,
            "Period:                {} to {} ({} steps of {})",
            self.start, self.end, self.timestamps, self.frequency
        )?;
        writeln!(f, "Seed:                  {}", self.seed)?;
        writeln!(
            f,
            "Buildings:             {} processed, {} skipped of {}",
            self.buildings_processed,
            self.skipped.len(),
            self.buildings_requested
        )?;
        writeln!(
            f,
            "Building stock:        {:.0} m² footprint, {:.1} avg floors, {:.2} mean quality",
            self.stock.total_footprint_m2,
            self.stock.average_floors(),
            self.stock.mean_quality()
        )?;
        writeln!(
            f,
            "Electricity:           {:.1} kWh total, {:.2} kWh mean, {:.2} kWh peak",
            self.electricity.total,
            self.electricity.mean(),
            self.electricity.peak
        )?;
        if let Some(water) = &self.water {
            writeln!(
                f,
                "Water:                 {:.0} L total, {:.1} L mean, {:.1} L peak",
                water.total,
                water.mean(),
                water.peak
            )?;
        }
        writeln!(
            f,
            "Weather:               {} observations from {} stations",
            self.weather_observations, self.weather_stations
        )?;
        writeln!(f, "Data-quality events:   {}", self.data_quality_events)?;
        write!(f, "Elapsed:               {:.2?}", self.elapsed)?;
        if self.cancelled {
            write!(f, "\nRun was cancelled; output is partial.")?;
        }
        Ok(())
    }
}
