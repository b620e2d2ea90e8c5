//! Health-dashboard data CLI.
//!
//! Presentation glue over the aggregation layer:
//! 1. Resolves the selectable country universe (region/income scoping)
//! 2. Fetches indicator tables through the cached World Bank client
//! 3. Pairs two indicators at one year for correlation views
//! 4. Exports tables as CSV

mod config;

use std::path::{Path, PathBuf};

use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use aggregator::{join_at_year, DataHub, ScopeFilter};
use common::{
    summarize_latest, sort_for_display, Catalog, CountryDirectory, Error, IndicatorRecord,
};

/// Global health indicator explorer over the World Bank API.
#[derive(Parser)]
#[command(name = "health-dashboard", about = "Global health indicator explorer")]
struct Cli {
    /// Path to the config file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List known indicators and their upstream codes.
    Indicators,

    /// List selectable countries, optionally scoped.
    Countries {
        /// Region label or code (e.g. "South Asia" or SAS).
        #[arg(long)]
        region: Option<String>,

        /// Income-group label or code (e.g. "Low Income" or LIC).
        #[arg(long)]
        income: Option<String>,
    },

    /// Fetch one indicator table and print or export it.
    Series {
        /// Indicator display name or upstream code.
        #[arg(long)]
        indicator: String,

        /// Comma-separated country names or ISO alpha-3 codes.
        #[arg(long, value_delimiter = ',')]
        countries: Vec<String>,

        #[arg(long, default_value_t = 2000)]
        start: i32,

        /// Defaults to last year.
        #[arg(long)]
        end: Option<i32>,

        #[arg(long)]
        region: Option<String>,

        #[arg(long)]
        income: Option<String>,

        /// Write the table to this CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Pair two indicators at one year for correlation.
    Correlate {
        /// Primary indicator (x axis), name or code.
        #[arg(long)]
        primary: String,

        /// Secondary indicator (y axis), name or code.
        #[arg(long)]
        secondary: String,

        #[arg(long, value_delimiter = ',')]
        countries: Vec<String>,

        /// Defaults to last year.
        #[arg(long)]
        year: Option<i32>,

        #[arg(long)]
        region: Option<String>,

        #[arg(long)]
        income: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let config = config::load(&cli.config)?;
    let hub = DataHub::new(&config);

    match cli.command {
        Command::Indicators => {
            for entry in &hub.catalog().indicators {
                println!("{:<55} {}", entry.name, entry.code);
            }
            Ok(())
        }

        Command::Countries { region, income } => {
            let filter = scope_filter(hub.catalog(), region.as_deref(), income.as_deref());
            let directory = hub.resolve_directory(&filter).await;
            for (name, code) in &directory {
                println!("{code}  {name}");
            }
            info!("{} countries", directory.len());
            Ok(())
        }

        Command::Series {
            indicator,
            countries,
            start,
            end,
            region,
            income,
            csv,
        } => {
            let code = indicator_code(hub.catalog(), &indicator);
            let end = end.unwrap_or_else(last_year);
            let filter = scope_filter(hub.catalog(), region.as_deref(), income.as_deref());
            let codes = select_countries(&hub, &filter, &countries, config.max_countries).await;

            let mut table = hub.fetch_series(&code, &codes, start, end).await;
            if table.is_empty() {
                println!(
                    "No data available for the selected parameters. \
                     Try different countries or time period."
                );
                return Ok(());
            }

            if let Some(summary) = summarize_latest(&table) {
                println!(
                    "Latest year {}: mean {:.2}, max {:.2}, min {:.2} ({} countries)",
                    summary.latest_year, summary.mean, summary.max, summary.min, summary.count
                );
                println!();
            }

            sort_for_display(&mut table);
            for record in &table {
                println!(
                    "{:<35} {:<4} {:>5} {:>14.2}",
                    record.country, record.country_code, record.year, record.value
                );
            }

            if let Some(path) = csv {
                export_csv(&path, &table)?;
                info!("wrote {} records to {}", table.len(), path.display());
            }
            Ok(())
        }

        Command::Correlate {
            primary,
            secondary,
            countries,
            year,
            region,
            income,
        } => {
            let primary_code = indicator_code(hub.catalog(), &primary);
            let secondary_code = indicator_code(hub.catalog(), &secondary);
            let year = year.unwrap_or_else(last_year);
            let filter = scope_filter(hub.catalog(), region.as_deref(), income.as_deref());
            let codes = select_countries(&hub, &filter, &countries, config.max_countries).await;

            // Sequential fetches; the second may well hit the cache on
            // repeated exploration of the same selection.
            let table_x = hub.fetch_series(&primary_code, &codes, year, year).await;
            let table_y = hub.fetch_series(&secondary_code, &codes, year, year).await;

            let joined = join_at_year(&table_x, &table_y, year);
            if joined.is_empty() {
                println!("Not enough overlapping data to correlate at {year}.");
                return Ok(());
            }

            println!("{:<35} {:>14} {:>14}", "country", primary_code, secondary_code);
            for obs in &joined {
                println!("{:<35} {:>14.2} {:>14.2}", obs.country, obs.x, obs.y);
            }
            Ok(())
        }
    }
}

/// Most recent complete year; upstream data lags the calendar.
fn last_year() -> i32 {
    Utc::now().year() - 1
}

/// Map an indicator argument to its upstream code: catalog display name
/// first, otherwise the argument is taken as a code verbatim.
fn indicator_code(catalog: &Catalog, arg: &str) -> String {
    match catalog.indicator_code(arg) {
        Some(code) => code.to_string(),
        None => arg.to_string(),
    }
}

/// Build the scope filter from CLI args, accepting either catalog
/// labels or raw upstream codes. Region beats income when both given.
fn scope_filter(catalog: &Catalog, region: Option<&str>, income: Option<&str>) -> ScopeFilter {
    ScopeFilter {
        region: region.map(|arg| {
            catalog
                .region_code(arg)
                .map(str::to_string)
                .unwrap_or_else(|| arg.to_string())
        }),
        income: income.map(|arg| {
            catalog
                .income_code(arg)
                .map(str::to_string)
                .unwrap_or_else(|| arg.to_string())
        }),
    }
}

/// Turn CLI country arguments into ISO codes against the resolved
/// directory. With no arguments, the catalog's default selection is
/// used. Oversized selections are truncated to `max`.
async fn select_countries(
    hub: &DataHub,
    filter: &ScopeFilter,
    requested: &[String],
    max: usize,
) -> Vec<String> {
    let directory = hub.resolve_directory(filter).await;

    let mut codes: Vec<String> = if requested.is_empty() {
        hub.catalog()
            .default_selection
            .iter()
            .filter_map(|name| directory.get(name).cloned())
            .collect()
    } else {
        requested
            .iter()
            .filter_map(|arg| lookup_country(&directory, arg))
            .collect()
    };

    if codes.len() > max {
        warn!("selection capped at {max} countries ({} requested)", codes.len());
        codes.truncate(max);
    }
    codes
}

fn lookup_country(directory: &CountryDirectory, arg: &str) -> Option<String> {
    if let Some(code) = directory.get(arg) {
        return Some(code.clone());
    }
    // Accept a bare ISO alpha-3 code even if the name lookup missed.
    if arg.len() == 3 && arg.chars().all(|c| c.is_ascii_alphabetic()) {
        return Some(arg.to_ascii_uppercase());
    }
    warn!("unknown country {arg:?}, skipping");
    None
}

fn export_csv(path: &Path, table: &[IndicatorRecord]) -> Result<(), Error> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| Error::Other(format!("CSV export failed: {e}")))?;
    for record in table {
        writer
            .serialize(record)
            .map_err(|e| Error::Other(format!("CSV export failed: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| Error::Other(format!("CSV export failed: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_code_accepts_name_or_code() {
        let catalog = Catalog::default();
        assert_eq!(
            indicator_code(&catalog, "Life Expectancy at Birth"),
            "SP.DYN.LE00.IN"
        );
        assert_eq!(indicator_code(&catalog, "SH.DYN.MORT"), "SH.DYN.MORT");
    }

    #[test]
    fn test_scope_filter_maps_labels_to_codes() {
        let catalog = Catalog::default();
        let filter = scope_filter(&catalog, Some("South Asia"), Some("Low Income"));
        assert_eq!(filter.region.as_deref(), Some("SAS"));
        assert_eq!(filter.income.as_deref(), Some("LIC"));

        let raw = scope_filter(&catalog, Some("SSF"), None);
        assert_eq!(raw.region.as_deref(), Some("SSF"));
    }

    #[test]
    fn test_lookup_country_name_code_and_unknown() {
        let directory: CountryDirectory = [("India".to_string(), "IND".to_string())]
            .into_iter()
            .collect();

        assert_eq!(lookup_country(&directory, "India").as_deref(), Some("IND"));
        assert_eq!(lookup_country(&directory, "usa").as_deref(), Some("USA"));
        assert_eq!(lookup_country(&directory, "Atlantis"), None);
    }

    #[test]
    fn test_export_csv_round_trip() {
        let dir = std::env::temp_dir();
        let path = dir.join("health_dashboard_export_test.csv");

        let table = vec![IndicatorRecord {
            country: "United States".into(),
            country_code: "USA".into(),
            year: 2016,
            value: 78.8,
        }];
        export_csv(&path, &table).expect("export succeeds");

        let written = std::fs::read_to_string(&path).expect("file readable");
        assert!(written.starts_with("country,country_code,year,value"));
        assert!(written.contains("United States,USA,2016,78.8"));

        std::fs::remove_file(&path).ok();
    }
}
