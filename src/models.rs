use crate::config;
use crate::error::AnalyzerError;
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// -----------------------------------------------
// CONTRACT PARAMETERS
// -----------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionType {
    CE,
    PE,
}

impl OptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::CE => "CE",
            OptionType::PE => "PE",
        }
    }

    /// Display column header for the series table.
    pub fn column_label(&self) -> String {
        format!("{} Price", self)
    }

    /// Parse a user-facing selection: a single leg or "straddle" for both.
    pub fn parse_selection(raw: &str) -> Option<BTreeSet<OptionType>> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CE" => Some(BTreeSet::from([OptionType::CE])),
            "PE" => Some(BTreeSet::from([OptionType::PE])),
            "STRADDLE" => Some(BTreeSet::from([OptionType::CE, OptionType::PE])),
            _ => None,
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One option contract (or CE/PE pair at the same strike and expiry).
#[derive(Debug, Clone, Serialize)]
pub struct ContractSpec {
    pub symbol: String,
    pub strike_price: f64,
    pub expiry: NaiveDate,
    pub option_types: BTreeSet<OptionType>,
}

impl ContractSpec {
    pub fn validate(&self) -> Result<(), AnalyzerError> {
        if self.option_types.is_empty() {
            return Err(AnalyzerError::InvalidContract(
                "at least one option type is required".to_string(),
            ));
        }
        if self.strike_price <= 0.0 {
            return Err(AnalyzerError::InvalidContract(format!(
                "strike price must be positive, got {}",
                self.strike_price
            )));
        }
        if self.strike_price % config::STRIKE_STEP != 0.0 {
            return Err(AnalyzerError::InvalidContract(format!(
                "strike price {} is not on the {}-point grid",
                self.strike_price,
                config::STRIKE_STEP
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn validate(&self) -> Result<(), AnalyzerError> {
        if self.start > self.end {
            return Err(AnalyzerError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// The spot box accepts free text; reject anything that is not a usable
/// positive number before a contract is built from it.
pub fn parse_spot_input(raw: &str) -> Result<f64, AnalyzerError> {
    let spot: f64 = raw
        .trim()
        .parse()
        .map_err(|_| AnalyzerError::InvalidSpotInput(raw.to_string()))?;
    if !spot.is_finite() || spot <= 0.0 {
        return Err(AnalyzerError::InvalidSpotInput(raw.to_string()));
    }
    Ok(spot)
}

// -----------------------------------------------
// HISTORICAL SERIES
// -----------------------------------------------

/// Closing prices for one trading day, one entry per requested leg.
/// A leg the provider had no row for stays `None` rather than zero.
#[derive(Debug, Clone, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub prices: BTreeMap<OptionType, Option<f64>>,
}

/// Per-day closing prices ordered by ascending date, no duplicate dates,
/// no synthesized rows for non-trading days.
#[derive(Debug, Clone, Serialize)]
pub struct HistoricalSeries {
    pub option_types: Vec<OptionType>,
    pub points: Vec<PricePoint>,
}

impl HistoricalSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// -----------------------------------------------
// LIVE OPTION CHAIN (NSE response shape)
// -----------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionChain {
    pub records: ChainRecords,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainRecords {
    pub timestamp: String,

    #[serde(rename = "underlyingValue")]
    pub underlying_value: f64,

    pub data: Vec<StrikeRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrikeRow {
    #[serde(rename = "strikePrice")]
    pub strike_price: f64,

    #[serde(rename = "CE")]
    pub call: Option<OptionQuote>,

    #[serde(rename = "PE")]
    pub put: Option<OptionQuote>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionQuote {
    // NSE omits lastPrice on strikes that never traded; read as 0.
    #[serde(rename = "lastPrice", default)]
    pub last_price: f64,
}

// -----------------------------------------------
// STRADDLE SNAPSHOT
// -----------------------------------------------

/// One live ATM straddle estimate. Built fresh on every poll and handed
/// straight to the display layer; never mutated, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct StraddleSnapshot {
    pub captured_at: DateTime<Local>,
    /// Market timestamp as reported by the chain payload.
    pub market_timestamp: String,
    pub spot: f64,
    pub atm_strike: f64,
    pub ce_price: f64,
    pub pe_price: f64,
    pub straddle: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spot_input() {
        assert_eq!(parse_spot_input("17823").unwrap(), 17823.0);
        assert_eq!(parse_spot_input(" 17823.45 ").unwrap(), 17823.45);

        assert!(matches!(
            parse_spot_input("abc"),
            Err(AnalyzerError::InvalidSpotInput(_))
        ));
        assert!(matches!(
            parse_spot_input(""),
            Err(AnalyzerError::InvalidSpotInput(_))
        ));
        assert!(matches!(
            parse_spot_input("0"),
            Err(AnalyzerError::InvalidSpotInput(_))
        ));
        assert!(matches!(
            parse_spot_input("-50"),
            Err(AnalyzerError::InvalidSpotInput(_))
        ));
        assert!(matches!(
            parse_spot_input("NaN"),
            Err(AnalyzerError::InvalidSpotInput(_))
        ));
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(
            OptionType::parse_selection("CE"),
            Some(BTreeSet::from([OptionType::CE]))
        );
        assert_eq!(
            OptionType::parse_selection("pe"),
            Some(BTreeSet::from([OptionType::PE]))
        );
        assert_eq!(
            OptionType::parse_selection("Straddle"),
            Some(BTreeSet::from([OptionType::CE, OptionType::PE]))
        );
        assert_eq!(OptionType::parse_selection("CE+PE"), None);
    }

    #[test]
    fn test_contract_spec_validation() {
        let valid = ContractSpec {
            symbol: "NIFTY".to_string(),
            strike_price: 17800.0,
            expiry: NaiveDate::from_ymd_opt(2025, 12, 30).unwrap(),
            option_types: BTreeSet::from([OptionType::CE]),
        };
        assert!(valid.validate().is_ok());

        let mut no_legs = valid.clone();
        no_legs.option_types.clear();
        assert!(matches!(
            no_legs.validate(),
            Err(AnalyzerError::InvalidContract(_))
        ));

        let mut off_grid = valid.clone();
        off_grid.strike_price = 17823.0;
        assert!(matches!(
            off_grid.validate(),
            Err(AnalyzerError::InvalidContract(_))
        ));

        let mut negative = valid;
        negative.strike_price = -17800.0;
        assert!(matches!(
            negative.validate(),
            Err(AnalyzerError::InvalidContract(_))
        ));
    }

    #[test]
    fn test_quote_missing_last_price_reads_as_zero() {
        let quote: OptionQuote = serde_json::from_str("{}").unwrap();
        assert_eq!(quote.last_price, 0.0);
    }

    #[test]
    fn test_date_range_validation() {
        let d1 = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 11, 30).unwrap();

        assert!(DateRange { start: d1, end: d2 }.validate().is_ok());
        assert!(DateRange { start: d1, end: d1 }.validate().is_ok());
        assert!(matches!(
            DateRange { start: d2, end: d1 }.validate(),
            Err(AnalyzerError::InvalidRange { .. })
        ));
    }
}
