use std::time::Duration;

// -----------------------------------------------
// NSE API ENDPOINTS
// -----------------------------------------------
pub const NSE_BASE_URL: &str = "https://www.nseindia.com";

/// Live option chain for an index underlying.
pub fn nse_option_chain_url(symbol: &str) -> String {
    format!(
        "{}/api/option-chain-indices?symbol={}",
        NSE_BASE_URL,
        urlencoding::encode(symbol)
    )
}

/// Historical daily data for a single index option contract (foCPV).
///
/// NSE expects the expiry as `30-Dec-2025` and the from/to dates as
/// `06-11-2025`; the strike must carry two decimals.
pub fn nse_option_history_url(
    symbol: &str,
    option_type: &str,
    strike_price: f64,
    expiry: &str,
    from_date: &str,
    to_date: &str,
) -> String {
    format!(
        "{}/api/historical/foCPV?from={}&to={}&instrumentType=OPTIDX&symbol={}&expiryDate={}&optionType={}&strikePrice={}",
        NSE_BASE_URL,
        urlencoding::encode(from_date),
        urlencoding::encode(to_date),
        urlencoding::encode(symbol),
        urlencoding::encode(expiry),
        urlencoding::encode(option_type),
        urlencoding::encode(&format!("{:.2}", strike_price))
    )
}

// -----------------------------------------------
// CONTRACT GRID
// -----------------------------------------------
pub const DEFAULT_SYMBOL: &str = "NIFTY";

/// Nifty strikes are listed on a 50-point grid.
pub const STRIKE_STEP: f64 = 50.0;

// -----------------------------------------------
// DATE FORMATS (NSE wire formats)
// -----------------------------------------------
pub const EXPIRY_DATE_FMT: &str = "%d-%b-%Y";
pub const RANGE_DATE_FMT: &str = "%d-%m-%Y";

// -----------------------------------------------
// HTTP CLIENT CONFIG
// -----------------------------------------------
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                               AppleWebKit/537.36 (KHTML, like Gecko) \
                               Chrome/131.0.0.0 Safari/537.36";

pub const ACCEPT_LANGUAGES: &[&str] = &[
    "en-US,en;q=0.9",
    "en-GB,en;q=0.8",
    "en-IN,en;q=0.9",
];

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

// -----------------------------------------------
// SESSION WARMUP
// -----------------------------------------------
pub const WARMUP_DELAY_MS: u64 = 200;

// -----------------------------------------------
// HTTP HEADERS
// -----------------------------------------------
pub const HEADER_REFERER: &str = "https://www.nseindia.com/";
pub const HEADER_X_REQUESTED_WITH: &str = "XMLHttpRequest";
pub const HEADER_ACCEPT_HTML: &str = "text/html";

// -----------------------------------------------
// API SERVER
// -----------------------------------------------
pub const DEFAULT_PORT: u16 = 3001;

pub fn get_port() -> u16 {
    std::env::var("NSE_PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}
