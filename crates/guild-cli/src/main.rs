use std::env;

use contracts::SimConfig;
use guild_core::era::run_simulation;

fn print_usage() {
    println!("guild-cli <command>");
    println!("commands:");
    println!("  run [seed] [eras] [cycles] [population]");
    println!("    runs the simulation and prints one report line per era");
    println!("  run-json [seed] [eras] [cycles] [population]");
    println!("    same, emitting the reports as a json array");
    println!("  config");
    println!("    prints the default configuration as json");
}

fn parse_u64(value: &String, label: &str) -> Result<u64, String> {
    value
        .parse::<u64>()
        .map_err(|_| format!("invalid {label}: {value}"))
}

fn parse_u32(value: &String, label: &str) -> Result<u32, String> {
    value
        .parse::<u32>()
        .map_err(|_| format!("invalid {label}: {value}"))
}

fn config_from_args(args: &[String]) -> Result<SimConfig, String> {
    let mut config = SimConfig::default();
    if let Some(seed) = args.get(2) {
        config.seed = parse_u64(seed, "seed")?;
    }
    if let Some(eras) = args.get(3) {
        config.era_count = parse_u32(eras, "eras")?;
    }
    if let Some(cycles) = args.get(4) {
        config.cycles_per_era = parse_u32(cycles, "cycles")?;
    }
    if let Some(population) = args.get(5) {
        config.population_size = parse_u64(population, "population")? as usize;
    }
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

fn run(args: &[String], as_json: bool) -> Result<(), String> {
    let config = config_from_args(args)?;
    let reports = run_simulation(config).map_err(|err| err.to_string())?;
    if as_json {
        let encoded =
            serde_json::to_string_pretty(&reports).map_err(|err| err.to_string())?;
        println!("{encoded}");
    } else {
        for report in &reports {
            println!("{report}");
        }
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str);

    let result = match command {
        Some("run") => run(&args, false),
        Some("run-json") => run(&args, true),
        Some("config") => serde_json::to_string_pretty(&SimConfig::default())
            .map_err(|err| err.to_string())
            .map(|encoded| println!("{encoded}")),
        _ => {
            print_usage();
            return;
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        print_usage();
        std::process::exit(2);
    }
}
