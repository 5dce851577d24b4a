//! Entry point: CLI wiring and config-driven scenario run.

use std::process;

use tracing::{error, info};

use pv_battery_sim::cli::{self, CliOptions};
use pv_battery_sim::config::ScenarioConfig;
use pv_battery_sim::io::export::export_csv;
use pv_battery_sim::runner::run_scenario;
use pv_battery_sim::telemetry::init_tracing;

/// Resolves the scenario: `--scenario` first, then `--preset`, then the exercise.
fn load_scenario(opts: &CliOptions) -> ScenarioConfig {
    let loaded = if let Some(ref path) = opts.scenario {
        ScenarioConfig::from_toml_file(path)
    } else if let Some(ref name) = opts.preset {
        ScenarioConfig::from_preset(name)
    } else {
        Ok(ScenarioConfig::exercise())
    };

    match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}

fn main() {
    init_tracing();

    let opts = match cli::parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };
    if opts.help {
        cli::print_usage();
        return;
    }

    let mut scenario = load_scenario(&opts);
    if let Some(seed) = opts.seed {
        scenario.demand.seed = seed;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("{e}");
        }
        process::exit(1);
    }

    let report = match run_scenario(&scenario) {
        Ok(r) => r,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    println!("{}", report.sizing);
    println!();
    for step in &report.trace.steps {
        println!("{step}");
    }
    println!("\n{}", report.summary);

    if let Some(ref path) = opts.telemetry_out {
        if let Err(e) = export_csv(&report.trace.steps, path) {
            error!("failed to write CSV: {e}");
            process::exit(1);
        }
        info!(path = %path.display(), "dispatch trace written");
    }
}
