use std::env;
use std::path::PathBuf;

pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub buildings: Option<PathBuf>,
    pub seed: Option<u64>,
    pub out_dir: Option<PathBuf>,
    pub summary_out: Option<PathBuf>,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    if args.len() == 1 && (args[0] == "--help" || args[0] == "-h") {
        print_usage();
        std::process::exit(0);
    }
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut scenario = None;
    let mut preset = None;
    let mut buildings = None;
    let mut seed = None;
    let mut out_dir = None;
    let mut summary_out = None;

    while i < args.len() {
        match args[i].as_str() {
            "--scenario" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --scenario (expected a TOML file path)",
                )?;
                if scenario.replace(PathBuf::from(path)).is_some() {
                    return Err("--scenario provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name =
                    args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--buildings" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --buildings (expected a JSON file path)",
                )?;
                if buildings.replace(PathBuf::from(path)).is_some() {
                    return Err("--buildings provided more than once".to_string());
                }
            }
            "--seed" => {
                i += 1;
                let value = args.next_or_err(i, "missing value for --seed (expected a u64)")?;
                let parsed = value
                    .parse::<u64>()
                    .map_err(|_| format!("--seed value \"{value}\" is not a valid u64"))?;
                if seed.replace(parsed).is_some() {
                    return Err("--seed provided more than once".to_string());
                }
            }
            "--out-dir" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --out-dir (expected a directory path)",
                )?;
                if out_dir.replace(PathBuf::from(path)).is_some() {
                    return Err("--out-dir provided more than once".to_string());
                }
            }
            "--summary-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --summary-out (expected a file path)",
                )?;
                if summary_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--summary-out provided more than once".to_string());
                }
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if scenario.is_some() && preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    if scenario.is_none() && preset.is_none() {
        preset = Some("baseline".to_string());
    }

    Ok(CliOptions {
        scenario,
        preset,
        buildings,
        seed,
        out_dir,
        summary_out,
    })
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("footprint-synth: synthetic building consumption and weather series");
    eprintln!();
    eprintln!("Usage:");
    eprintln!(
        "  footprint-synth [--scenario <path> | --preset <name>] [--buildings <path>] \
         [--seed <u64>] [--out-dir <dir>] [--summary-out <path>]"
    );
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>      Load scenario from TOML config file");
    eprintln!("  --preset <name>        Use a built-in preset (baseline, monsoon, highland)");
    eprintln!("  --buildings <path>     JSON building footprints (default: sample district)");
    eprintln!("  --seed <u64>           Override random seed");
    eprintln!("  --out-dir <dir>        Write CSV series into this directory");
    eprintln!("  --summary-out <path>   Write the session summary as JSON");
    eprintln!("  --help                 Show this help message");
}
