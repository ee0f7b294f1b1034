use crate::error::AnalyzerError;
use crate::models::{ContractSpec, DateRange, HistoricalSeries, OptionType, PricePoint};
use chrono::NaiveDate;
use std::collections::BTreeMap;

// -----------------------------------------------
// PROVIDER SEAM
// -----------------------------------------------

/// One daily closing price as returned by the historical provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: f64,
}

/// Source of daily closing prices for a single option contract leg.
///
/// The production implementation is `NSEClient`; tests substitute an
/// in-memory table. One call per leg, no retry; the first failure is
/// surfaced to the caller as-is.
#[allow(async_fn_in_trait)]
pub trait HistoryProvider {
    async fn fetch_close_history(
        &self,
        symbol: &str,
        option_type: OptionType,
        strike_price: f64,
        expiry: NaiveDate,
        range: &DateRange,
    ) -> Result<Vec<DailyClose>, AnalyzerError>;
}

// -----------------------------------------------
// SERIES ASSEMBLY
// -----------------------------------------------

/// Fetch per-leg closing prices and align them on date.
///
/// The per-leg rows are merged with an outer join: a date present for one
/// leg but not the other still appears, with the missing leg left `None`.
/// The result is ordered by ascending date with no duplicates.
pub async fn assemble_series<P: HistoryProvider>(
    provider: &P,
    spec: &ContractSpec,
    range: &DateRange,
) -> Result<HistoricalSeries, AnalyzerError> {
    spec.validate()?;
    range.validate()?;

    let mut merged: BTreeMap<NaiveDate, BTreeMap<OptionType, f64>> = BTreeMap::new();

    for &option_type in &spec.option_types {
        let rows = provider
            .fetch_close_history(
                &spec.symbol,
                option_type,
                spec.strike_price,
                spec.expiry,
                range,
            )
            .await?;

        for row in rows {
            merged.entry(row.date).or_default().insert(option_type, row.close);
        }
    }

    // Every leg succeeded but the range covered no trading day.
    if merged.is_empty() {
        return Err(AnalyzerError::EmptyResult);
    }

    let option_types: Vec<OptionType> = spec.option_types.iter().copied().collect();
    let points = merged
        .into_iter()
        .map(|(date, closes)| PricePoint {
            date,
            prices: option_types
                .iter()
                .map(|&t| (t, closes.get(&t).copied()))
                .collect(),
        })
        .collect();

    Ok(HistoricalSeries { option_types, points })
}
