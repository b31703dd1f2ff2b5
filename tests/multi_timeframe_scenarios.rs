use chrono::{TimeZone, Utc};

use btc_gridtrader::domain::Bar;
use btc_gridtrader::simulation::align;

fn bar(minute: i64, price: f64) -> Bar {
    Bar::new(Utc.timestamp_opt(0, 0).unwrap() + chrono::Duration::minutes(minute), price)
}

/// Scenario 4 — multi-timeframe alignment.
#[test]
fn scenario_four_multi_timeframe_alignment() {
    let slow = vec![bar(0, 1.0), bar(60, 2.0)];
    let fast = vec![bar(0, 10.0), bar(15, 11.0), bar(30, 12.0), bar(45, 13.0), bar(60, 14.0), bar(75, 15.0)];

    let rows = align(&fast, &slow);
    assert_eq!(rows.len(), 6);

    let ks: Vec<usize> = rows.iter().map(|r| r.k).collect();
    assert_eq!(ks, vec![1, 1, 1, 1, 2, 2]);
    assert!(ks.iter().all(|&k| k != 0), "no aligned row should ever carry a zero-length slow prefix");
}
