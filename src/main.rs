//! Command-line entry point: scenario loading, generation, and export.

mod cli;

use std::process;

use tracing_subscriber::EnvFilter;

use footprint_synth::building::{load_buildings_json, sample_district};
use footprint_synth::config::ScenarioConfig;
use footprint_synth::engine::{CancelToken, CollectingSink, Orchestrator, SeriesSink};
use footprint_synth::io::CsvSink;
use footprint_synth::reporting::{print_session_report, write_summary_json};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(opts: &cli::CliOptions) -> ScenarioConfig {
    let loaded = match (&opts.scenario, &opts.preset) {
        (Some(path), _) => ScenarioConfig::from_toml_file(path),
        (None, Some(name)) => ScenarioConfig::from_preset(name),
        (None, None) => Ok(ScenarioConfig::baseline()),
    };
    let mut cfg = loaded.unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    if let Some(seed) = opts.seed {
        cfg.generation.seed = Some(seed);
    }

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    cfg
}

fn main() {
    init_tracing();

    let opts = cli::parse_args().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        cli::print_usage();
        process::exit(1);
    });

    let cfg = load_config(&opts);

    let buildings = match &opts.buildings {
        Some(path) => load_buildings_json(path).unwrap_or_else(|e| {
            eprintln!("error: {}: {e}", path.display());
            process::exit(1);
        }),
        None => sample_district(),
    };

    let orchestrator = Orchestrator::from_config(&cfg).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });

    let mut sink: Box<dyn SeriesSink> = match &opts.out_dir {
        Some(dir) => match CsvSink::create(dir) {
            Ok(sink) => Box::new(sink),
            Err(e) => {
                eprintln!("error: {}: {e}", dir.display());
                process::exit(1);
            }
        },
        None => Box::new(CollectingSink::default()),
    };

    let summary = orchestrator
        .run(buildings, sink.as_mut(), &CancelToken::new())
        .unwrap_or_else(|e| {
            eprintln!("error: {e}");
            process::exit(1);
        });

    print_session_report(&summary);

    if let Some(dir) = &opts.out_dir {
        println!("\nSeries written to {}", dir.display());
    }

    if let Some(path) = &opts.summary_out {
        if let Err(e) = write_summary_json(path, &summary) {
            eprintln!("error: {}: {e}", path.display());
            process::exit(1);
        }
        println!("Summary written to {}", path.display());
    }
}
