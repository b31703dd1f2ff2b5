use super::types::RsiMacdBbTuple;

/// MACD axis validity: the fast EMA period must be strictly shorter
/// than the slow one.
pub fn macd_axis_valid(fast: usize, slow: usize) -> bool {
    fast < slow
}

/// MA-cross axis validity: `short < long` and `long/short` at least
/// `min_ratio` (default 1.5), so crossovers aren't driven by noise
/// between two nearly-equal windows.
pub fn ma_cross_axis_valid(short: usize, long: usize, min_ratio: f64) -> bool {
    short > 0 && short < long && (long as f64 / short as f64) >= min_ratio
}

/// Cartesian-mode lookback: the indicator-specific minimum plus a
/// safety margin (default 50 bars, floor 60), rejected outright if
/// `lookback + 100` exceeds the available series length.
pub fn lookback_for_cartesian(tuple: &RsiMacdBbTuple, margin_bars: usize, available_len: usize) -> Option<usize> {
    if !macd_axis_valid(tuple.macd_fast, tuple.macd_slow) {
        return None;
    }
    let indicator_min = (tuple.rsi_period + 1).max(tuple.macd_slow + tuple.macd_signal).max(tuple.bb_period);
    let margin = margin_bars.max(60 - indicator_min.min(60));
    let lookback = indicator_min + margin;
    if lookback + 100 > available_len {
        return None;
    }
    Some(lookback)
}

/// Structural-plan (L18) lookback: a floor of 100 bars regardless of
/// indicator minima, distinct from the Cartesian-mode margin rule.
pub fn lookback_for_structural(tuple: &RsiMacdBbTuple) -> usize {
    (tuple.macd_slow + tuple.macd_signal)
        .max(tuple.rsi_period + 1)
        .max(tuple.bb_period)
        .max(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuple() -> RsiMacdBbTuple {
        RsiMacdBbTuple {
            rsi_period: 14,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bb_period: 20,
            bb_std_dev: 2.0,
            stop_loss: None,
        }
    }

    #[test]
    fn macd_fast_must_be_strictly_less_than_slow() {
        assert!(macd_axis_valid(12, 26));
        assert!(!macd_axis_valid(26, 26));
        assert!(!macd_axis_valid(30, 26));
    }

    #[test]
    fn ma_cross_enforces_minimum_ratio() {
        assert!(ma_cross_axis_valid(10, 20, 1.5));
        assert!(!ma_cross_axis_valid(10, 12, 1.5));
        assert!(!ma_cross_axis_valid(20, 10, 1.5));
    }

    #[test]
    fn structural_lookback_floors_at_100() {
        assert_eq!(lookback_for_structural(&tuple()), 100);
        let mut wide = tuple();
        wide.macd_slow = 150;
        assert_eq!(lookback_for_structural(&wide), 159);
    }

    #[test]
    fn cartesian_lookback_rejects_when_data_too_short() {
        let t = tuple();
        assert!(lookback_for_cartesian(&t, 50, 50).is_none());
        assert!(lookback_for_cartesian(&t, 50, 10_000).is_some());
    }

    #[test]
    fn cartesian_rejects_invalid_macd_axis() {
        let mut t = tuple();
        t.macd_fast = 30;
        assert!(lookback_for_cartesian(&t, 50, 10_000).is_none());
    }
}
