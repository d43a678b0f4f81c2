pub mod cancel;
pub mod orchestrator;
pub mod sink;
pub mod stats;
pub mod time_grid;
pub mod types;

pub use cancel::CancelToken;
pub use orchestrator::{GenerationSettings, Orchestrator};
pub use sink::{CollectingSink, SeriesSink};
pub use stats::{SeriesStats, SessionSummary, StockStats};
pub use time_grid::{Frequency, TimeGrid};
pub use types::{ConsumptionPoint, GenerationSession, SkippedUnit, WeatherObservation};
