use super::assert_finite;

/// Full exponential-moving-average series. The seed value is the SMA
/// of the first `period` prices; each subsequent element is
/// `alpha*price + (1-alpha)*prev` with `alpha = 2/(period+1)`. The
/// first output element corresponds to input index `period-1`.
pub fn ema_series(prices: &[f64], period: usize) -> Option<Vec<f64>> {
    if period == 0 || prices.len() < period {
        return None;
    }
    let alpha = 2.0 / (period as f64 + 1.0);
    let seed = prices[..period].iter().sum::<f64>() / period as f64;
    let mut out = Vec::with_capacity(prices.len() - period + 1);
    out.push(seed);
    for &price in &prices[period..] {
        let prev = *out.last().unwrap();
        let next = alpha * price + (1.0 - alpha) * prev;
        assert_finite(next, "ema");
        out.push(next);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_plain_sma() {
        let prices = [1.0, 2.0, 3.0];
        let series = ema_series(&prices, 3).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0], 2.0);
    }

    #[test]
    fn recurses_after_the_seed() {
        let prices = [2.0, 4.0, 6.0, 8.0];
        let series = ema_series(&prices, 2).unwrap();
        let alpha = 2.0 / 3.0;
        assert_eq!(series[0], 3.0); // mean(2, 4)
        let expected = alpha * 6.0 + (1.0 - alpha) * 3.0;
        assert!((series[1] - expected).abs() < 1e-12);
    }
}
