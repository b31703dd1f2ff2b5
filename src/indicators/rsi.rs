use super::assert_finite;

/// Seed-window RSI: the mean of the last `period` gains and losses,
/// not Wilder's recursive smoothing. This is a deliberate, verbatim
/// reproduction of an upstream simplification — changing it to
/// Wilder's form would silently break numeric parity with existing
/// baselines.
pub fn rsi(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period + 1 {
        return None;
    }
    let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let recent = &deltas[deltas.len() - period..];
    let avg_gain = recent.iter().map(|&d| if d > 0.0 { d } else { 0.0 }).sum::<f64>() / period as f64;
    let avg_loss = recent.iter().map(|&d| if d < 0.0 { -d } else { 0.0 }).sum::<f64>() / period as f64;
    let value = if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };
    assert_finite(value, "rsi");
    Some(value)
}
