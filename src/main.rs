use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;
use nse_straddle::error::AnalyzerError;
use nse_straddle::models::{
    parse_spot_input, ContractSpec, DateRange, HistoricalSeries, OptionType, StraddleSnapshot,
};
use nse_straddle::{api_server, config, history, logging, straddle, NSEClient};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("serve") => {
            let port = args
                .get(1)
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or_else(config::get_port);
            api_server::start_server(port).await
        }
        Some(_) if args.len() >= 4 => run_fetch(&args).await,
        _ => {
            print_usage();
            Ok(())
        }
    }
}

/// One-shot fetch: historical table, then a single best-effort live poll.
async fn run_fetch(args: &[String]) -> Result<()> {
    println!("{}", "=".repeat(60).blue());
    println!("{}", "Nifty Options Analyzer".green().bold());
    println!("{}", "=".repeat(60).blue());
    println!();

    let spot = match parse_spot_input(&args[0]) {
        Ok(spot) => spot,
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            return Ok(());
        }
    };

    let expiry = match NaiveDate::parse_from_str(&args[1], config::EXPIRY_DATE_FMT) {
        Ok(date) => date,
        Err(_) => {
            println!("{} Invalid expiry {:?} (expected e.g. 30-Dec-2025)", "✗".red(), args[1]);
            return Ok(());
        }
    };

    let range = match parse_range(&args[2], &args[3]) {
        Ok(range) => range,
        Err(message) => {
            println!("{} {}", "✗".red(), message);
            return Ok(());
        }
    };

    let selection = args.get(4).map(String::as_str).unwrap_or("straddle");
    let option_types = match OptionType::parse_selection(selection) {
        Some(types) => types,
        None => {
            println!(
                "{} Unknown option type {:?} (use CE, PE, or straddle)",
                "✗".red(),
                selection
            );
            return Ok(());
        }
    };

    let spec = ContractSpec {
        symbol: config::DEFAULT_SYMBOL.to_string(),
        strike_price: straddle::atm_strike(spot),
        expiry,
        option_types,
    };

    println!(
        "{} Spot {} → ATM strike {}",
        "ℹ".blue(),
        spot,
        spec.strike_price
    );
    println!();

    let client = NSEClient::new()?;

    println!("{}", "Step 1: Fetching historical data...".cyan());
    match history::assemble_series(&client, &spec, &range).await {
        Ok(series) => {
            println!("{} {} trading days", "✓".green(), series.len());
            println!();
            print_series_table(&series);
        }
        Err(e) => {
            println!("{} {}", "✗".red(), e);
        }
    }
    println!();

    println!("{}", "Step 2: Live ATM straddle (latest)...".cyan());
    match fetch_live_straddle(&client).await {
        Ok(snap) => {
            println!(
                "{} Spot: {}, ATM Strike: {}, CE: {}, PE: {}, Straddle: {}",
                "✓".green(),
                snap.spot,
                snap.atm_strike,
                snap.ce_price,
                snap.pe_price,
                snap.straddle
            );
        }
        Err(e) => {
            // A blocked live endpoint is routine; one attempt, no retry.
            println!("{} {}", "⚠".yellow(), e);
        }
    }

    Ok(())
}

async fn fetch_live_straddle(client: &NSEClient) -> Result<StraddleSnapshot, AnalyzerError> {
    let chain = client.fetch_option_chain(config::DEFAULT_SYMBOL).await?;
    straddle::compute_snapshot(&chain)
}

fn parse_range(from: &str, to: &str) -> Result<DateRange, String> {
    let start = NaiveDate::parse_from_str(from, config::RANGE_DATE_FMT)
        .map_err(|_| format!("Invalid from date {:?} (expected e.g. 01-11-2025)", from))?;
    let end = NaiveDate::parse_from_str(to, config::RANGE_DATE_FMT)
        .map_err(|_| format!("Invalid to date {:?} (expected e.g. 30-11-2025)", to))?;
    Ok(DateRange { start, end })
}

fn print_series_table(series: &HistoricalSeries) {
    let mut header = format!("{:<12}", "Date");
    for option_type in &series.option_types {
        header.push_str(&format!("{:>12}", option_type.column_label()));
    }
    println!("{}", header.bold());

    for point in &series.points {
        let mut line = format!("{:<12}", point.date.format(config::EXPIRY_DATE_FMT));
        for option_type in &series.option_types {
            match point.prices.get(option_type).copied().flatten() {
                Some(price) => line.push_str(&format!("{:>12.2}", price)),
                None => line.push_str(&format!("{:>12}", "-")),
            }
        }
        println!("{}", line);
    }
}

fn print_usage() {
    println!("Usage:");
    println!("  nse-straddle <spot> <expiry> <from> <to> [CE|PE|straddle]");
    println!("  nse-straddle serve [port]");
    println!();
    println!("Dates: expiry as 30-Dec-2025, from/to as 01-11-2025");
}
