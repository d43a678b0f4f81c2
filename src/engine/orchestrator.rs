//! Session orchestration: validation, parallel fan-out, and streaming.

use std::sync::Arc;
use std::time::Instant;

use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use super::cancel::CancelToken;
use super::sink::{CollectingSink, SeriesSink};
use super::stats::{SeriesStats, SessionSummary, StockStats};
use super::time_grid::TimeGrid;
use super::types::{ConsumptionPoint, GenerationSession, SkippedUnit, WeatherObservation};
use crate::building::{Building, BuildingProfile, RawBuilding};
use crate::climate::ClimateProfile;
use crate::config::{ResourceLimits, ScenarioConfig};
use crate::error::EngineError;
use crate::factors::Utility;
use crate::generators::{ConsumptionModel, ElectricityGenerator, WaterGenerator, WeatherGenerator};
use crate::random::{RandomSource, SeededSource, Stream, StreamKey};

/// Stations handed to the worker pool per chunk.
const STATION_CHUNK: usize = 8;

/// Per-run parameters independent of the building set.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub grid: TimeGrid,
    pub weather_stations: u32,
    pub include_water: bool,
    pub chunk_buildings: usize,
}

struct BuildingOutput {
    profile: BuildingProfile,
    electricity: Vec<ConsumptionPoint>,
    water: Option<Vec<ConsumptionPoint>>,
}

/// Drives the generators over a building set and a station set.
pub struct Orchestrator {
    settings: GenerationSettings,
    climate: ClimateProfile,
    limits: ResourceLimits,
    source: Arc<dyn RandomSource>,
}

impl Orchestrator {
    /// A `chunk_buildings` of zero is treated as one.
    pub fn new(
        mut settings: GenerationSettings,
        climate: ClimateProfile,
        limits: ResourceLimits,
        source: Arc<dyn RandomSource>,
    ) -> Self {
        settings.chunk_buildings = settings.chunk_buildings.max(1);
        Self {
            settings,
            climate,
            limits,
            source,
        }
    }

    /// Builds an orchestrator from a scenario.
    ///
    /// The seed comes from the scenario or, if absent, from the OS once.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidTimeRange`] for a reversed date range
    /// and [`EngineError::RandomSource`] if no seed can be obtained.
    pub fn from_config(cfg: &ScenarioConfig) -> Result<Self, EngineError> {
        let g = &cfg.generation;
        let grid = TimeGrid::from_dates(g.start_date, g.end_date, g.frequency)?;
        let source = match g.seed {
            Some(seed) => SeededSource::new(seed),
            None => SeededSource::from_os()?,
        };
        Ok(Self::new(
            GenerationSettings {
                grid,
                weather_stations: g.weather_stations,
                include_water: g.include_water,
                chunk_buildings: g.chunk_buildings,
            },
            cfg.climate.clone(),
            cfg.limits.clone(),
            Arc::new(source),
        ))
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.source.seed()
    }

    /// Checks a planned run against the resource limits.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RangeExceeded`] naming the first limit hit,
    /// or [`EngineError::InvalidInput`] when no weather station is requested.
    pub fn check_limits(&self, building_count: usize) -> Result<(), EngineError> {
        let l = &self.limits;
        let s = &self.settings;
        let steps = s.grid.len() as u64;
        let utilities: u64 = if s.include_water { 2 } else { 1 };

        let exceeded = |what, requested: u64, limit: u64| {
            if requested > limit {
                Err(EngineError::RangeExceeded {
                    what,
                    requested,
                    limit,
                })
            } else {
                Ok(())
            }
        };

        if s.weather_stations == 0 {
            return Err(EngineError::InvalidInput(
                "at least one weather station is required".to_string(),
            ));
        }
        exceeded(
            "building count",
            building_count as u64,
            l.max_buildings as u64,
        )?;
        exceeded("time span in days", s.grid.span_days(), l.max_span_days)?;
        exceeded(
            "weather station count",
            u64::from(s.weather_stations),
            u64::from(l.max_weather_stations),
        )?;
        exceeded(
            "consumption point count",
            (building_count as u64)
                .saturating_mul(steps)
                .saturating_mul(utilities),
            l.max_consumption_points,
        )?;
        exceeded(
            "weather point count",
            u64::from(s.weather_stations).saturating_mul(steps),
            l.max_weather_points,
        )
    }

    /// Runs a session and keeps all output in memory.
    ///
    /// # Errors
    ///
    /// See [`Orchestrator::run`].
    pub fn generate(&self, raw: Vec<RawBuilding>) -> Result<GenerationSession, EngineError> {
        let mut sink = CollectingSink::default();
        let summary = self.run(raw, &mut sink, &CancelToken::new())?;
        Ok(GenerationSession {
            summary,
            buildings: sink.buildings,
            electricity: sink.electricity,
            water: sink.water,
            weather: sink.weather,
        })
    }

    /// Runs a session, streaming chunks to `sink` in input order.
    ///
    /// Buildings with unusable footprints are skipped and listed in the
    /// summary. Cancellation is honored between chunks; a cancelled run
    /// returns normally with `cancelled` set.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RangeExceeded`] before any work if a limit
    /// is exceeded, and propagates sink errors.
    #[instrument(skip_all, fields(buildings = raw.len()))]
    pub fn run(
        &self,
        raw: Vec<RawBuilding>,
        sink: &mut dyn SeriesSink,
        cancel: &CancelToken,
    ) -> Result<SessionSummary, EngineError> {
        let started = Instant::now();
        self.check_limits(raw.len())?;

        let generation_id = self.generation_id();
        let grid = &self.settings.grid;
        info!(
            %generation_id,
            steps = grid.len(),
            frequency = %grid.frequency(),
            stations = self.settings.weather_stations,
            "starting generation"
        );

        let buildings_requested = raw.len();
        let buildings: Vec<Building> = raw.into_iter().map(Building::from_raw).collect();

        let mut skipped = Vec::new();
        let mut electricity = SeriesStats::default();
        let mut water = self.settings.include_water.then(SeriesStats::default);
        let mut stock = StockStats::default();
        let mut data_quality_events = 0_u64;
        let mut cancelled = false;

        for (chunk_index, chunk) in buildings.chunks(self.settings.chunk_buildings).enumerate() {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            let outputs: Vec<Result<BuildingOutput, SkippedUnit>> =
                chunk.par_iter().map(|b| self.process_building(b)).collect();

            let mut profiles = Vec::with_capacity(outputs.len());
            let mut series = Vec::with_capacity(outputs.len());
            for output in outputs {
                match output {
                    Ok(out) => {
                        stock.record(&out.profile);
                        if out.profile.type_fallback {
                            data_quality_events += 1;
                        }
                        if out.profile.geometry.area_clamped {
                            data_quality_events += 1;
                        }
                        profiles.push(out.profile);
                        series.push((out.electricity, out.water));
                    }
                    Err(unit) => {
                        warn!(building_id = %unit.id, reason = %unit.reason, "skipping building");
                        skipped.push(unit);
                    }
                }
            }

            sink.buildings(&profiles)?;
            for (elec, wat) in series {
                electricity.merge(&SeriesStats::from_points(&elec));
                sink.consumption(Utility::Electricity, elec)?;
                if let (Some(points), Some(stats)) = (wat, water.as_mut()) {
                    stats.merge(&SeriesStats::from_points(&points));
                    sink.consumption(Utility::Water, points)?;
                }
            }
            debug!(chunk = chunk_index, buildings = chunk.len(), "building chunk done");
        }

        let station_ids: Vec<u32> = (1..=self.settings.weather_stations).collect();
        let mut weather_observations = 0_u64;
        for chunk in station_ids.chunks(STATION_CHUNK) {
            if cancelled || cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            let outputs: Vec<Vec<WeatherObservation>> = chunk
                .par_iter()
                .map(|&station| {
                    WeatherGenerator
                        .generate(station, grid, &self.climate, self.source.as_ref())
                        .collect()
                })
                .collect();
            for observations in outputs {
                weather_observations += observations.len() as u64;
                sink.weather(observations)?;
            }
        }

        sink.finish()?;

        let summary = SessionSummary {
            generation_id,
            seed: self.source.seed(),
            start: grid.start(),
            end: grid.end().unwrap_or_else(|| grid.start()),
            frequency: grid.frequency(),
            timestamps: grid.len(),
            buildings_requested,
            buildings_processed: stock.buildings as usize,
            skipped,
            weather_stations: self.settings.weather_stations,
            weather_observations,
            electricity,
            water,
            stock,
            data_quality_events,
            elapsed: started.elapsed(),
            cancelled,
        };
        info!(
            generation_id = %summary.generation_id,
            processed = summary.buildings_processed,
            skipped = summary.skipped.len(),
            cancelled,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "generation finished"
        );
        Ok(summary)
    }

    fn process_building(&self, building: &Building) -> Result<BuildingOutput, SkippedUnit> {
        let source = self.source.as_ref();
        let profile = building.profile(source).map_err(|e| SkippedUnit {
            id: building.id().to_string(),
            reason: e.to_string(),
        })?;
        let grid = &self.settings.grid;
        let electricity = ElectricityGenerator
            .generate(&profile, grid, &self.climate, source)
            .collect();
        let water = self.settings.include_water.then(|| {
            WaterGenerator
                .generate(&profile, grid, &self.climate, source)
                .collect()
        });
        Ok(BuildingOutput {
            profile,
            electricity,
            water,
        })
    }

    fn generation_id(&self) -> String {
        let mut rng = self.source.rng(StreamKey::new(Stream::Session, 0, 0));
        format!("gen_{:08X}", rng.random::<u32>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::sample_district;
    use chrono::NaiveDate;

    fn orchestrator(days: u64, stations: u32, include_water: bool) -> Orchestrator {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid");
        let end = start + chrono::Days::new(days - 1);
        let grid = TimeGrid::from_dates(start, end, crate::engine::Frequency::HOURLY)
            .expect("valid range");
        Orchestrator::new(
            GenerationSettings {
                grid,
                weather_stations: stations,
                include_water,
                chunk_buildings: 4,
            },
            ClimateProfile::default(),
            ResourceLimits::default(),
            Arc::new(SeededSource::new(42)),
        )
    }

    #[test]
    fn sample_district_produces_full_series() {
        let orch = orchestrator(2, 3, true);
        let session = orch.generate(sample_district()).expect("run succeeds");
        let n = sample_district().len();
        assert_eq!(session.summary.buildings_processed, n);
        assert_eq!(session.electricity.len(), n * 48);
        assert_eq!(session.water.len(), n * 48);
        assert_eq!(session.weather.len(), 3 * 48);
        assert_eq!(session.summary.weather_observations, 3 * 48);
        assert!(session.summary.generation_id.starts_with("gen_"));
        assert_eq!(session.summary.generation_id.len(), 12);
    }

    #[test]
    fn zero_chunk_size_still_runs() {
        let reference = orchestrator(1, 1, true);
        let zero = Orchestrator::new(
            GenerationSettings {
                chunk_buildings: 0,
                ..reference.settings().clone()
            },
            ClimateProfile::default(),
            ResourceLimits::default(),
            Arc::new(SeededSource::new(42)),
        );
        assert_eq!(zero.settings().chunk_buildings, 1);
        let a = zero.generate(sample_district()).expect("run succeeds");
        let b = reference.generate(sample_district()).expect("run succeeds");
        assert_eq!(a.electricity, b.electricity);
    }

    #[test]
    fn water_can_be_disabled() {
        let session = orchestrator(1, 1, false)
            .generate(sample_district())
            .expect("run succeeds");
        assert!(session.water.is_empty());
        assert!(session.summary.water.is_none());
    }

    #[test]
    fn degenerate_buildings_are_skipped_not_fatal() {
        let mut raw = sample_district();
        raw.push(RawBuilding {
            source_id: "way/bad".into(),
            building_type: Some("house".into()),
            footprint: vec![[3.0, 101.0], [3.0, 101.001], [3.0, 101.002]],
            ..RawBuilding::default()
        });
        let session = orchestrator(1, 1, true).generate(raw).expect("run succeeds");
        assert_eq!(session.summary.skipped.len(), 1);
        assert!(session.summary.skipped[0].reason.contains("zero area"));
        assert_eq!(
            session.summary.buildings_processed,
            session.summary.buildings_requested - 1
        );
    }

    #[test]
    fn limits_are_checked_before_work() {
        let mut orch = orchestrator(1, 1, true);
        orch.limits.max_buildings = 3;
        let err = orch.generate(sample_district()).err();
        assert!(matches!(
            err,
            Some(EngineError::RangeExceeded {
                what: "building count",
                ..
            })
        ));
    }

    #[test]
    fn point_budget_counts_both_utilities() {
        let mut orch = orchestrator(1, 1, true);
        orch.limits.max_consumption_points = 24 * 12;
        assert!(orch.check_limits(12).is_err());
        orch.settings.include_water = false;
        assert!(orch.check_limits(12).is_ok());
    }

    #[test]
    fn cancelled_run_emits_nothing() {
        let orch = orchestrator(1, 2, true);
        let token = CancelToken::new();
        token.cancel();
        let mut sink = CollectingSink::default();
        let summary = orch
            .run(sample_district(), &mut sink, &token)
            .expect("cancellation is not an error");
        assert!(summary.cancelled);
        assert!(sink.electricity.is_empty());
        assert!(sink.weather.is_empty());
    }

    #[test]
    fn unsupported_types_count_as_quality_events() {
        let session = orchestrator(1, 1, false)
            .generate(sample_district())
            .expect("run succeeds");
        // "hangar" falls back to the generic table.
        assert!(session.summary.data_quality_events >= 1);
        assert!(session.buildings.iter().any(|b| b.type_fallback));
    }
}
