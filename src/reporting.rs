//! Console and JSON reporting of a finished session.

use std::fs;
use std::path::Path;

use crate::engine::SessionSummary;
use crate::error::EngineError;

/// Skipped buildings listed individually before the list is elided.
const MAX_LISTED_SKIPS: usize = 10;

pub fn print_session_report(summary: &SessionSummary) {
    println!("\n{summary}");
    if summary.skipped.is_empty() {
        return;
    }
    println!("\nSkipped buildings:");
    for unit in summary.skipped.iter().take(MAX_LISTED_SKIPS) {
        println!("  {}: {}", unit.id, unit.reason);
    }
    if summary.skipped.len() > MAX_LISTED_SKIPS {
        println!("  ... and {} more", summary.skipped.len() - MAX_LISTED_SKIPS);
    }
}

/// Writes `summary` to `path` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_summary_json(path: &Path, summary: &SessionSummary) -> Result<(), EngineError> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;
    use crate::engine::Orchestrator;
    use crate::building::sample_district;

    #[test]
    fn summary_json_has_core_fields() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.generation.end_date = cfg.generation.start_date;
        cfg.generation.weather_stations = 1;
        let session = Orchestrator::from_config(&cfg)
            .and_then(|o| o.generate(sample_district()))
            .expect("run succeeds");

        let path = std::env::temp_dir().join(format!(
            "footprint-synth-summary-{}.json",
            std::process::id()
        ));
        write_summary_json(&path, &session.summary).expect("write succeeds");
        let text = fs::read_to_string(&path).expect("read back");
        let _ = fs::remove_file(&path);

        let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
        assert_eq!(value["seed"], 42);
        assert_eq!(value["timestamps"], 24);
        assert_eq!(value["frequency"], "1H");
        assert!(value["generation_id"].as_str().unwrap_or("").starts_with("gen_"));
    }
}
