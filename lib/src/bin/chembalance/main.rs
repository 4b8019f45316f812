use std::process::ExitCode;

use anyhow::{Context, Result};
use chembalance::{BalanceRequest, Balancer, BalancerConfig};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

mod cli;

fn main() -> ExitCode {
    let cli = cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        },
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    // fails only if a logger is already installed
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto);
}

fn load_config(cli: &cli::Cli) -> Result<BalancerConfig> {
    let config = match &cli.config {
        Some(path) => BalancerConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => BalancerConfig::default(),
    };
    config.validate().context("invalid balancer config")?;
    Ok(config)
}

/// Runs the selected command, returns whether the input was valid
fn run(cli: cli::Cli) -> Result<bool> {
    let balancer = Balancer::new(load_config(&cli)?);

    match cli.command {
        cli::Command::Balance(args) => {
            let request = BalanceRequest::new(args.equation).with_method(args.method);
            let result = balancer.balance(&request);

            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                for (i, step) in result.steps.iter().enumerate() {
                    println!("{:>3}. {}", i + 1, step);
                }
                match &result.error {
                    None => println!("{}", result.balanced_equation),
                    Some(error) => eprintln!("cannot balance '{}': {}", result.original_equation, error),
                }
            }
            Ok(result.is_valid)
        },
        cli::Command::Formula(args) => {
            let parsed = balancer.parse_formula(&args.formula);

            if args.json {
                println!("{}", serde_json::to_string_pretty(&parsed)?);
            } else if let Some(error) = &parsed.error {
                eprintln!("invalid formula '{}': {}", args.formula, error);
            } else {
                println!("{}", parsed.formula);
                for (symbol, count) in parsed.element_counts() {
                    println!("  {:<3}{:>6}", symbol, count);
                }
                if let Ok(mass) = balancer.molar_mass(&args.formula) {
                    println!("molar mass: {:.3} g/mol", mass);
                }
            }
            Ok(parsed.is_valid)
        },
    }
}
