use super::{assert_finite, sma::sma};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub middle: f64,
    pub upper: f64,
    pub lower: f64,
    pub bandwidth: f64,
}

/// Population-variance Bollinger bands over the last `period` closes.
pub fn bollinger_bands(prices: &[f64], period: usize, k: f64) -> Option<BollingerBands> {
    let middle = sma(prices, period)?;
    let window = &prices[prices.len() - period..];
    let variance = window.iter().map(|p| (p - middle).powi(2)).sum::<f64>() / period as f64;
    let std = variance.sqrt();
    let upper = middle + k * std;
    let lower = middle - k * std;
    let bandwidth = if middle > 0.0 { (upper - lower) / middle } else { 0.0 };
    assert_finite(upper, "bollinger upper");
    assert_finite(lower, "bollinger lower");
    Some(BollingerBands { middle, upper, lower, bandwidth })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_series_has_zero_width() {
        let prices = vec![100.0; 20];
        let bands = bollinger_bands(&prices, 20, 2.0).unwrap();
        assert_eq!(bands.middle, 100.0);
        assert_eq!(bands.upper, 100.0);
        assert_eq!(bands.lower, 100.0);
        assert_eq!(bands.bandwidth, 0.0);
    }

    #[test]
    fn widens_with_dispersion() {
        let mut prices = vec![100.0; 19];
        prices.push(120.0);
        let bands = bollinger_bands(&prices, 20, 2.0).unwrap();
        assert!(bands.upper > bands.middle);
        assert!(bands.lower < bands.middle);
    }
}
