use crate::config;
use crate::error::AnalyzerError;
use crate::models::{OptionChain, StraddleSnapshot};
use chrono::Local;

/// Snap a spot price to the nearest strike on the 50-point grid.
///
/// Halfway values round away from zero (`f64::round`): spot 17825 snaps
/// up to 17850.
pub fn atm_strike(spot: f64) -> f64 {
    (spot / config::STRIKE_STEP).round() * config::STRIKE_STEP
}

/// Extract an ATM straddle estimate from one chain payload.
///
/// Scans every row for the computed ATM strike rather than trusting the
/// provider's sort order. A matched row missing a CE or PE leg (or a leg
/// that never traded) contributes 0; the straddle is understated, not
/// an error. An absent strike is `StrikeNotFound`.
pub fn compute_snapshot(chain: &OptionChain) -> Result<StraddleSnapshot, AnalyzerError> {
    let spot = chain.records.underlying_value;
    let atm = atm_strike(spot);

    let row = chain
        .records
        .data
        .iter()
        .find(|row| row.strike_price == atm)
        .ok_or(AnalyzerError::StrikeNotFound(atm))?;

    let ce_price = row.call.as_ref().map(|q| q.last_price).unwrap_or(0.0);
    let pe_price = row.put.as_ref().map(|q| q.last_price).unwrap_or(0.0);

    Ok(StraddleSnapshot {
        captured_at: Local::now(),
        market_timestamp: chain.records.timestamp.clone(),
        spot,
        atm_strike: atm,
        ce_price,
        pe_price,
        straddle: ce_price + pe_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChainRecords, OptionQuote, StrikeRow};

    fn chain(underlying_value: f64, data: Vec<StrikeRow>) -> OptionChain {
        OptionChain {
            records: ChainRecords {
                timestamp: "06-Aug-2026 15:30:00".to_string(),
                underlying_value,
                data,
            },
        }
    }

    fn row(strike: f64, ce: Option<f64>, pe: Option<f64>) -> StrikeRow {
        StrikeRow {
            strike_price: strike,
            call: ce.map(|last_price| OptionQuote { last_price }),
            put: pe.map(|last_price| OptionQuote { last_price }),
        }
    }

    #[test]
    fn test_atm_strike_rounding() {
        // 17823 / 50 = 356.46 → 356 → 17800
        assert_eq!(atm_strike(17823.0), 17800.0);
        // 17849.9 is nearer 17850
        assert_eq!(atm_strike(17849.9), 17850.0);
        // Exact multiples stay put
        assert_eq!(atm_strike(17800.0), 17800.0);
    }

    #[test]
    fn test_atm_strike_halfway_rounds_away_from_zero() {
        // 17825 / 50 = 356.5 → 357 → 17850
        assert_eq!(atm_strike(17825.0), 17850.0);
        assert_eq!(atm_strike(17775.0), 17800.0);
    }

    #[test]
    fn test_snapshot_sums_both_legs() {
        let chain = chain(
            17823.0,
            vec![row(17800.0, Some(120.0), Some(95.0))],
        );

        let snap = compute_snapshot(&chain).unwrap();
        assert_eq!(snap.spot, 17823.0);
        assert_eq!(snap.atm_strike, 17800.0);
        assert_eq!(snap.ce_price, 120.0);
        assert_eq!(snap.pe_price, 95.0);
        assert_eq!(snap.straddle, 215.0);
    }

    #[test]
    fn test_snapshot_scans_unsorted_rows() {
        let chain = chain(
            17823.0,
            vec![
                row(17900.0, Some(40.0), Some(170.0)),
                row(17750.0, Some(160.0), Some(60.0)),
                row(17800.0, Some(120.0), Some(95.0)),
            ],
        );

        let snap = compute_snapshot(&chain).unwrap();
        assert_eq!(snap.atm_strike, 17800.0);
        assert_eq!(snap.straddle, 215.0);
    }

    #[test]
    fn test_missing_atm_strike_is_an_error() {
        let chain = chain(
            17823.0,
            vec![row(17750.0, Some(160.0), Some(60.0)), row(17850.0, None, None)],
        );

        let err = compute_snapshot(&chain).unwrap_err();
        assert!(matches!(err, AnalyzerError::StrikeNotFound(atm) if atm == 17800.0));
    }

    #[test]
    fn test_missing_leg_reads_as_zero_not_error() {
        let chain = chain(17823.0, vec![row(17800.0, Some(120.0), None)]);

        let snap = compute_snapshot(&chain).unwrap();
        assert_eq!(snap.ce_price, 120.0);
        assert_eq!(snap.pe_price, 0.0);
        assert_eq!(snap.straddle, 120.0);
    }

    #[test]
    fn test_both_legs_missing_is_zero_straddle_not_error() {
        // Distinct from StrikeNotFound: the strike row exists.
        let chain = chain(17823.0, vec![row(17800.0, None, None)]);

        let snap = compute_snapshot(&chain).unwrap();
        assert_eq!(snap.straddle, 0.0);
    }
}
