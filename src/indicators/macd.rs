use super::ema::ema_series;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Macd {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD evaluated at the most-recent aligned sample only: the caller
/// never needs the full macd/signal history, just the latest triple.
pub fn macd(prices: &[f64], fast: usize, slow: usize, signal: usize) -> Option<Macd> {
    if prices.len() < slow + signal {
        return None;
    }
    let fast_ema = ema_series(prices, fast)?;
    let slow_ema = ema_series(prices, slow)?;
    let offset = fast_ema.len().checked_sub(slow_ema.len())?;
    let macd_line: Vec<f64> = slow_ema
        .iter()
        .enumerate()
        .map(|(i, slow_v)| fast_ema[offset + i] - slow_v)
        .collect();
    if macd_line.len() < signal {
        return None;
    }
    let signal_line = ema_series(&macd_line, signal)?;
    let last_macd = *macd_line.last().unwrap();
    let last_signal = *signal_line.last().unwrap();
    Some(Macd {
        macd: last_macd,
        signal: last_signal,
        histogram: last_macd - last_signal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_short_is_none() {
        let prices = vec![1.0; 10];
        assert_eq!(macd(&prices, 3, 6, 9), None);
    }

    #[test]
    fn computes_on_monotonic_series() {
        let prices: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let result = macd(&prices, 12, 26, 9).unwrap();
        assert!(result.macd.is_finite());
        assert!(result.signal.is_finite());
        assert!((result.histogram - (result.macd - result.signal)).abs() < 1e-12);
    }
}
