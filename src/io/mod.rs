pub mod export;

pub use export::CsvSink;
