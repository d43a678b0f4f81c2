//! Synthetic building consumption and weather series from footprints.
//!
//! Building footprints go in; hourly (or finer) electricity and water
//! series per building and weather series per synthetic station come out.
//! Every value is a deterministic function of the session seed, so runs
//! are reproducible regardless of thread count.

pub mod building;
pub mod climate;
pub mod config;
pub mod engine;
pub mod error;
pub mod factors;
pub mod generators;
pub mod io;
pub mod random;
pub mod reporting;

pub use error::EngineError;
