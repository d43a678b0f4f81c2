//! CSV export for generated series.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::NaiveDateTime;

use crate::building::BuildingProfile;
use crate::engine::sink::SeriesSink;
use crate::engine::types::{ConsumptionPoint, WEATHER_COLUMNS, WeatherObservation};
use crate::error::EngineError;
use crate::factors::Utility;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column header of a consumption file.
const CONSUMPTION_HEADER: [&str; 3] = ["building_id", "timestamp", "y"];

/// Column header of the building metadata file.
const BUILDINGS_HEADER: [&str; 11] = [
    "building_id",
    "building_type",
    "area_m2",
    "perimeter_m",
    "shape_factor",
    "compactness",
    "floors",
    "floor_source",
    "total_floor_area_m2",
    "has_precise_geometry",
    "quality_score",
];

pub const ELECTRICITY_FILE: &str = "electricity_consumption.csv";
pub const WATER_FILE: &str = "water_consumption.csv";
pub const WEATHER_FILE: &str = "weather.csv";
pub const BUILDINGS_FILE: &str = "buildings_metadata.csv";

fn timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Streams chunks into four CSV writers.
///
/// Headers are written on construction, so a run that emits no rows still
/// leaves well-formed files behind.
pub struct CsvSink<W: Write> {
    buildings: csv::Writer<W>,
    electricity: csv::Writer<W>,
    water: csv::Writer<W>,
    weather: csv::Writer<W>,
}

impl CsvSink<BufWriter<File>> {
    /// Creates `dir` if needed and opens the four output files in it.
    ///
    /// # Errors
    ///
    /// Returns an I/O or CSV error if a file cannot be created.
    pub fn create(dir: &Path) -> Result<Self, EngineError> {
        fs::create_dir_all(dir)?;
        let open = |name: &str| -> Result<BufWriter<File>, EngineError> {
            Ok(BufWriter::new(File::create(dir.join(name))?))
        };
        Self::new(
            open(BUILDINGS_FILE)?,
            open(ELECTRICITY_FILE)?,
            open(WATER_FILE)?,
            open(WEATHER_FILE)?,
        )
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps four writers and emits their headers.
    ///
    /// # Errors
    ///
    /// Returns a CSV error if a header cannot be written.
    pub fn new(buildings: W, electricity: W, water: W, weather: W) -> Result<Self, EngineError> {
        let writer = |w: W| csv::WriterBuilder::new().from_writer(w);
        let mut sink = Self {
            buildings: writer(buildings),
            electricity: writer(electricity),
            water: writer(water),
            weather: writer(weather),
        };
        sink.buildings.write_record(BUILDINGS_HEADER)?;
        sink.electricity.write_record(CONSUMPTION_HEADER)?;
        sink.water.write_record(CONSUMPTION_HEADER)?;
        sink.weather.write_record(WEATHER_COLUMNS)?;
        Ok(sink)
    }

    /// Flushes and returns the inner writers.
    ///
    /// # Errors
    ///
    /// Returns an error if a buffered writer cannot be flushed.
    pub fn into_inner(self) -> Result<[W; 4], EngineError> {
        let inner = |w: csv::Writer<W>| w.into_inner().map_err(|e| EngineError::Io(e.into_error()));
        Ok([
            inner(self.buildings)?,
            inner(self.electricity)?,
            inner(self.water)?,
            inner(self.weather)?,
        ])
    }
}

impl<W: Write> SeriesSink for CsvSink<W> {
    fn buildings(&mut self, profiles: &[BuildingProfile]) -> Result<(), EngineError> {
        for p in profiles {
            self.buildings.write_record(&[
                p.id.to_string(),
                p.building_type.to_string(),
                format!("{:.2}", p.geometry.area_m2),
                format!("{:.2}", p.geometry.perimeter_m),
                format!("{:.4}", p.geometry.shape_factor),
                format!("{:.4}", p.geometry.compactness),
                p.floors.floors.to_string(),
                format!("{:?}", p.floors.source).to_lowercase(),
                format!("{:.2}", p.total_floor_area_m2()),
                p.geometry.has_precise_geometry.to_string(),
                format!("{:.2}", p.quality_score),
            ])?;
        }
        Ok(())
    }

    fn consumption(
        &mut self,
        utility: Utility,
        points: Vec<ConsumptionPoint>,
    ) -> Result<(), EngineError> {
        let writer = match utility {
            Utility::Electricity => &mut self.electricity,
            Utility::Water => &mut self.water,
        };
        for p in &points {
            writer.write_record(&[
                p.building_id.to_string(),
                timestamp(p.timestamp),
                format!("{:.4}", p.value),
            ])?;
        }
        Ok(())
    }

    fn weather(&mut self, observations: Vec<WeatherObservation>) -> Result<(), EngineError> {
        for o in &observations {
            let mut record = Vec::with_capacity(WEATHER_COLUMNS.len());
            record.push(timestamp(o.timestamp));
            record.extend(o.measurements().iter().map(|v| format!("{v:.4}")));
            record.push(o.station_id.to_string());
            self.weather.write_record(&record)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), EngineError> {
        self.buildings.flush()?;
        self.electricity.flush()?;
        self.water.flush()?;
        self.weather.flush()?;
        Ok(())
    }
}
