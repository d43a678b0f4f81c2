//! Destinations for streamed output chunks.

use super::types::{ConsumptionPoint, WeatherObservation};
use crate::building::BuildingProfile;
use crate::error::EngineError;
use crate::factors::Utility;

/// Receives output chunks in input order.
///
/// The orchestrator calls these from a single thread; chunks for one
/// building or station always arrive whole.
pub trait SeriesSink {
    /// Resolved profiles of the buildings in the next chunk.
    fn buildings(&mut self, profiles: &[BuildingProfile]) -> Result<(), EngineError> {
        let _ = profiles;
        Ok(())
    }

    /// One building's full series for a utility.
    fn consumption(
        &mut self,
        utility: Utility,
        points: Vec<ConsumptionPoint>,
    ) -> Result<(), EngineError>;

    /// One station's full weather series.
    fn weather(&mut self, observations: Vec<WeatherObservation>) -> Result<(), EngineError>;

    /// Called once after the last chunk.
    fn finish(&mut self) -> Result<(), EngineError> {
        Ok(())
    }
}

/// Keeps every chunk in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub buildings: Vec<BuildingProfile>,
    pub electricity: Vec<ConsumptionPoint>,
    pub water: Vec<ConsumptionPoint>,
    pub weather: Vec<WeatherObservation>,
}

impl SeriesSink for CollectingSink {
    fn buildings(&mut self, profiles: &[BuildingProfile]) -> Result<(), EngineError> {
        self.buildings.extend_from_slice(profiles);
        Ok(())
    }

    fn consumption(
        &mut self,
        utility: Utility,
        mut points: Vec<ConsumptionPoint>,
    ) -> Result<(), EngineError> {
        match utility {
            Utility::Electricity => self.electricity.append(&mut points),
            Utility::Water => self.water.append(&mut points),
        }
        Ok(())
    }

    fn weather(&mut self, mut observations: Vec<WeatherObservation>) -> Result<(), EngineError> {
        self.weather.append(&mut observations);
        Ok(())
    }
}
