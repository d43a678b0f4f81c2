pub mod electricity;
pub mod types;
pub mod water;
pub mod weather;

pub use electricity::ElectricityGenerator;
pub use types::{ConsumptionModel, ConsumptionSeries};
pub use water::WaterGenerator;
pub use weather::{WeatherGenerator, WeatherSeries};
