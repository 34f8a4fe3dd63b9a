use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use sift_core::{BalancesPayload, Budget, Transaction};
use sift_rules::file::format_rules;
use sift_rules::RulesFormat;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "sift", version, about = "Categorize bank transactions and track budgets")]
struct Cli {
    /// Config file (defaults to ./sift.toml)
    #[arg(long, global = true, env = "SIFT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply rules to a JSON list of transactions and print the result
    Categorize {
        transactions: PathBuf,
        #[arg(long)]
        rules: Option<PathBuf>,
    },
    /// Print rules in another format
    Rules {
        #[arg(long)]
        rules: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Format::Hledger)]
        to: Format,
    },
    /// Append the rules from one file to another
    MergeRules { target: PathBuf, source: PathBuf },
    /// Print monthly activity per category from a balances payload
    Expenses { balances: PathBuf },
    /// Print the budget report for the current month
    Budgets {
        budgets: PathBuf,
        /// JSON object of account name to period activity
        activity: PathBuf,
        /// Report date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Toml,
    Json,
    Hledger,
}

impl From<Format> for RulesFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Toml => RulesFormat::Toml,
            Format::Json => RulesFormat::Json,
            Format::Hledger => RulesFormat::Hledger,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Categorize {
            transactions,
            rules,
        } => {
            let store = commands::rules_store(&config, rules.as_deref())?;
            let transactions: Vec<Transaction> = commands::read_json(&transactions)?;
            println!("{}", commands::categorize(&store, transactions)?);
        }
        Commands::Rules { rules, to } => {
            let store = commands::rules_store(&config, rules.as_deref())?;
            print!("{}", format_rules(&store, to.into())?);
        }
        Commands::MergeRules { target, source } => {
            let outcome = commands::merge_rules_file(&target, &source)?;
            for (index, reason) in outcome.failed() {
                warn!(rule = index, "skipped: {reason}");
            }
            println!("Added {} rule(s)", outcome.applied().count());
        }
        Commands::Expenses { balances } => {
            let payload: BalancesPayload = commands::read_json(&balances)?;
            print!("{}", commands::expenses_table(&config, &payload)?);
        }
        Commands::Budgets {
            budgets,
            activity,
            date,
        } => {
            let budgets: Vec<Budget> = commands::read_json(&budgets)?;
            let activity: BTreeMap<String, Decimal> = commands::read_json(&activity)
                .context("Activity must map account names to amounts")?;
            let today = date.unwrap_or_else(|| Local::now().date_naive());
            print!("{}", commands::budget_report(&config, budgets, &activity, today)?);
        }
    }
    Ok(())
}
