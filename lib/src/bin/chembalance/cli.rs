use std::path::PathBuf;

use chembalance::BalanceMethod;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "chembalance",
    about = "Chemical formula parser and equation balancer",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// JSON file with balancer limits (missing fields keep their defaults)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Balance a chemical equation (e.g. "Fe + O2 = Fe2O3")
    #[command(visible_alias = "b")]
    Balance(BalanceArgs),

    /// Parse a chemical formula and print its element counts and molar mass
    #[command(visible_alias = "f")]
    Formula(FormulaArgs),
}

#[derive(Args)]
pub struct BalanceArgs {
    /// Equation with one arrow (→, -> or =)
    #[arg(value_name = "EQUATION")]
    pub equation: String,

    /// Balancing method (trial-and-error or algebraic)
    #[arg(short, long, value_name = "METHOD", default_value = "trial-and-error")]
    pub method: BalanceMethod,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct FormulaArgs {
    /// Formula such as Ca(OH)2 or K4[Fe(CN)6]
    #[arg(value_name = "FORMULA")]
    pub formula: String,

    /// Print the parsed formula as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
