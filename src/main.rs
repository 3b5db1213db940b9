use clap::{Parser, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL};
use configuration::ConfigArgs;
use core_types::{DailySpread, PeriodUnit, SpreadResult, StatsResult};
use service::{DynQueryService, ErrorKind, QueryError};
use std::process::ExitCode;

/// The main entry point for the cryptostats application.
#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // `.env` is optional; it only feeds `CRYPTOSTATS__*` overrides.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = cli.config.load()?;
    let _log_guard = configuration::init_tracing(&config.logging)?;

    match cli.command {
        Commands::Serve => {
            web_server::run_server(config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Query(query) => {
            let service = DynQueryService::from_settings(&config.data);
            match run_query(&service, query, cli.json) {
                Ok(()) => Ok(ExitCode::SUCCESS),
                Err(e) => {
                    eprintln!("{e}");
                    Ok(exit_code(&e))
                }
            }
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Price statistics over historical crypto price files.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Print results as JSON instead of a table.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the query API over HTTP.
    Serve,
    #[command(flatten)]
    Query(QueryCommand),
}

#[derive(Subcommand)]
enum QueryCommand {
    /// List the symbols that have a price file.
    Symbols,
    /// Rank all symbols by normalized range over their whole history.
    Ranking,
    /// Oldest, newest, min and max price of one symbol.
    Stats(StatsArgs),
    /// Like `stats`, restricted to a trailing window.
    Period(PeriodArgs),
    /// The symbol with the widest normalized range on one day.
    Best(BestArgs),
}

#[derive(Parser)]
struct StatsArgs {
    /// The symbol to summarize (e.g., "BTC"). Case-insensitive.
    symbol: String,
}

#[derive(Parser)]
struct PeriodArgs {
    /// The symbol to summarize (e.g., "BTC"). Case-insensitive.
    symbol: String,

    /// How many units the window reaches back.
    #[arg(long, allow_negative_numbers = true)]
    amount: i64,

    /// The window unit (e.g., "DAYS", "MONTHS", "YEARS").
    #[arg(long)]
    unit: PeriodUnit,
}

#[derive(Parser)]
struct BestArgs {
    /// The day to look at (format: YYYY-MM-DD).
    date: String,
}

// ==============================================================================
// Query Commands
// ==============================================================================

fn run_query(service: &DynQueryService, command: QueryCommand, json: bool) -> Result<(), QueryError> {
    match command {
        QueryCommand::Symbols => {
            let symbols: Vec<String> = service.symbols().into_iter().collect();
            if json {
                print_json(&symbols);
            } else {
                for symbol in symbols {
                    println!("{symbol}");
                }
            }
        }
        QueryCommand::Ranking => {
            let ranked = service.ranked_spread();
            if json {
                print_json(&ranked);
            } else {
                println!("{}", ranking_table(&ranked));
            }
        }
        QueryCommand::Stats(args) => {
            let stats = service.stats(&args.symbol)?;
            print_stats(&stats, json);
        }
        QueryCommand::Period(args) => {
            let stats = service.stats_for_period(&args.symbol, args.amount, args.unit)?;
            print_stats(&stats, json);
        }
        QueryCommand::Best(args) => {
            let best = service.best_for_date(&args.date)?;
            if json {
                print_json(&best);
            } else {
                match best {
                    Some(best) => println!("{}", daily_table(&best)),
                    None => println!("No observations on {}.", args.date.trim()),
                }
            }
        }
    }
    Ok(())
}

/// Exit codes a wrapping script can branch on.
fn exit_code(error: &QueryError) -> ExitCode {
    match error.kind() {
        ErrorKind::InvalidDate => ExitCode::from(2),
        ErrorKind::SymbolNotFound => ExitCode::from(3),
        ErrorKind::NoData => ExitCode::from(4),
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => tracing::error!(error = %e, "Failed to serialize result."),
    }
}

fn print_stats(stats: &StatsResult, json: bool) {
    if json {
        print_json(stats);
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Symbol", "Oldest", "Newest", "Min", "Max"])
        .add_row(vec![
            stats.symbol.clone(),
            stats.oldest_price.to_string(),
            stats.newest_price.to_string(),
            stats.min_price.to_string(),
            stats.max_price.to_string(),
        ]);
    println!("{table}");
}

fn ranking_table(ranked: &[SpreadResult]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["#", "Symbol", "Normalized range"]);
    for (position, entry) in ranked.iter().enumerate() {
        table.add_row(vec![
            (position + 1).to_string(),
            entry.symbol.clone(),
            format!("{:.6}", entry.normalized_range),
        ]);
    }
    table
}

fn daily_table(best: &DailySpread) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Date", "Symbol", "Normalized range"])
        .add_row(vec![
            best.date.to_string(),
            best.symbol.clone(),
            format!("{:.6}", best.normalized_range),
        ]);
    table
}
