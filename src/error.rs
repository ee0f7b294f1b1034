use chrono::NaiveDate;
use std::fmt;

#[derive(Debug)]
pub enum AnalyzerError {
    /// Requested range has start after end.
    InvalidRange { start: NaiveDate, end: NaiveDate },
    /// Contract invariant violated (empty leg set, off-grid strike, ...).
    InvalidContract(String),
    /// Manually entered spot value is not a usable number.
    InvalidSpotInput(String),
    /// Historical provider call failed or returned malformed data.
    UpstreamFetch(String),
    /// Every provider call succeeded but the range covered no trading day.
    EmptyResult,
    /// Computed ATM strike is absent from the chain snapshot.
    StrikeNotFound(f64),
    /// Live option-chain endpoint unreachable, blocked, or non-JSON.
    /// The detail is logged, not displayed; NSE blocks are routine.
    LiveFetchBlocked(String),
}

impl fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AnalyzerError::InvalidRange { start, end } => {
                write!(f, "Invalid date range: start {} is after end {}", start, end)
            }
            AnalyzerError::InvalidContract(msg) => write!(f, "Invalid contract: {}", msg),
            AnalyzerError::InvalidSpotInput(raw) => {
                write!(f, "Invalid spot input: {:?} is not a positive number", raw)
            }
            AnalyzerError::UpstreamFetch(detail) => {
                write!(f, "Historical data fetch failed: {}", detail)
            }
            AnalyzerError::EmptyResult => {
                write!(f, "No trading data for the requested range")
            }
            AnalyzerError::StrikeNotFound(strike) => {
                write!(f, "Strike {} not present in the option chain", strike)
            }
            AnalyzerError::LiveFetchBlocked(_) => {
                write!(f, "Unable to fetch live data right now")
            }
        }
    }
}

impl std::error::Error for AnalyzerError {}
