//! Command line runner for the query engine

mod args;

use anyhow::{Context, Result};
use args::{Cli, Command};
use clap::Parser;
use engine_core::{
    aggregate, apply_filters, list_records, validate_aggregate_limit, validate_aggregate_options, validate_filters, validate_list_options,
    validate_search_options, AggregateLimits, AggregateOptions, EngineConfig, FilterCondition, ListOptions, Record,
    SearchEngine, SearchLimits, SearchOptions,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    info!("Configuration loaded successfully");

    match cli.command {
        Command::Filter { records, filters, strict } => {
            let records: Vec<Record> = read_json(&records)?;
            let filters: Vec<FilterCondition> = read_json(&filters)?;

            let mut filter_config = config.filter.clone();
            filter_config.reject_unknown_operators |= strict;
            validate_filters(&filters, &filter_config)?;

            let matched = apply_filters(&records, &filters);
            info!("{} of {} records matched", matched.len(), records.len());
            print_json(&matched)
        }
        Command::Aggregate { records, options, limits } => {
            let records: Vec<Record> = read_json(&records)?;
            let options: AggregateOptions = read_json(&options)?;

            match limits {
                Some(path) => {
                    let mut limits: AggregateLimits = read_json(&path)?;
                    limits.max_limit = limits.max_limit.min(config.aggregation.max_limit);
                    validate_aggregate_options(&options, &limits)?;
                }
                None => validate_aggregate_limit(&options, &config.aggregation)?,
            }

            print_json(&aggregate(&records, &options))
        }
        Command::Search { records, options, filters, limits } => {
            let records: Vec<Record> = read_json(&records)?;
            let options: SearchOptions = read_json(&options)?;
            let filters: Vec<FilterCondition> = match filters {
                Some(path) => read_json(&path)?,
                None => Vec::new(),
            };

            let limits = match limits {
                Some(path) => read_json(&path)?,
                None => SearchLimits::from_config(&config.search),
            };
            validate_search_options(&options, &limits)?;

            let engine = SearchEngine::new(config.search.clone());
            print_json(&engine.search(&records, &options, &filters))
        }
        Command::List { records, options } => {
            let records: Vec<Record> = read_json(&records)?;
            let options: ListOptions = read_json(&options)?;

            validate_list_options(&options, &config.pagination)?;
            print_json(&list_records(&records, &options, &config.pagination)?)
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let default_level = if cfg!(debug_assertions) { "debug" } else { "info" };

        format!(
            "{}={},engine_core={}",
            env!("CARGO_CRATE_NAME").replace('-', "_"),
            default_level,
            default_level
        )
        .into()
    });

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let is_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    if is_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    }
}
