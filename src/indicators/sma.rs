use super::assert_finite;

/// Arithmetic mean of the last `period` values. `None` if `prices` is
/// shorter than `period`.
pub fn sma(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period {
        return None;
    }
    let window = &prices[prices.len() - period..];
    let mean = window.iter().sum::<f64>() / period as f64;
    assert_finite(mean, "sma");
    Some(mean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_mean_of_last_period_values() {
        let prices = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(sma(&prices, 3), Some(4.0));
    }

    #[test]
    fn undefined_for_short_input() {
        let prices = [1.0, 2.0];
        assert_eq!(sma(&prices, 3), None);
    }
}
