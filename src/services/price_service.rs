use crate::models::OhlcvRow;

/// Headline numbers for the selected coin's price series
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSummary {
    pub latest_close: f64,
    pub previous_close: f64,
    pub change: f64,
    /// 0 when the previous close is not positive
    pub change_percent: f64,
    pub latest_candle: OhlcvRow,
}

/// Summarize a series ordered oldest first. None for an empty series.
pub fn summarize(series: &[OhlcvRow]) -> Option<PriceSummary> {
    let latest = series.last()?;
    let previous_close = match series.len() {
        0 | 1 => latest.close,
        n => series[n - 2].close,
    };

    let change = latest.close - previous_close;
    let change_percent = if previous_close > 0.0 {
        change / previous_close * 100.0
    } else {
        0.0
    };

    Some(PriceSummary {
        latest_close: latest.close,
        previous_close,
        change,
        change_percent,
        latest_candle: latest.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(close: f64) -> OhlcvRow {
        OhlcvRow {
            timestamp: "2025-11-07T09:00:00".to_string(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 10.0,
            value: close * 10.0,
        }
    }

    #[test]
    fn test_change_against_previous_close() {
        let summary = summarize(&[candle(50.0), candle(100.0), candle(110.0)])
            .expect("non-empty series");
        assert_eq!(summary.latest_close, 110.0);
        assert_eq!(summary.previous_close, 100.0);
        assert_eq!(summary.change, 10.0);
        assert!((summary.change_percent - 10.0).abs() < 1e-9);
        assert_eq!(summary.latest_candle.high, 111.0);
    }

    #[test]
    fn test_single_candle_has_no_change() {
        let summary = summarize(&[candle(100.0)]).expect("non-empty series");
        assert_eq!(summary.change, 0.0);
        assert_eq!(summary.change_percent, 0.0);
    }

    #[test]
    fn test_zero_previous_close() {
        let summary = summarize(&[candle(0.0), candle(5.0)]).expect("non-empty series");
        assert_eq!(summary.change, 5.0);
        assert_eq!(summary.change_percent, 0.0);
        assert!(summarize(&[]).is_none());
    }
}
