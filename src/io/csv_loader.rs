use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::Bar;

const FALLBACK_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Maps the columns this loader understands to their position in a
/// given file's header row, resolved once per file rather than
/// trusting a fixed column order.
struct ColumnIndex {
    timestamp: usize,
    price: usize,
    volume: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    open: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> anyhow::Result<Self> {
        let by_name: HashMap<&str, usize> =
            headers.iter().enumerate().map(|(i, name)| (name.trim(), i)).collect();

        let timestamp = *by_name
            .get("timestamp")
            .ok_or_else(|| anyhow::anyhow!("CSV header is missing a `timestamp` column"))?;
        let price = *by_name
            .get("price")
            .or_else(|| by_name.get("close"))
            .ok_or_else(|| anyhow::anyhow!("CSV header is missing a `price` (or `close`) column"))?;

        Ok(Self {
            timestamp,
            price,
            volume: by_name.get("volume").copied(),
            high: by_name.get("high").copied(),
            low: by_name.get("low").copied(),
            open: by_name.get("open").copied(),
        })
    }
}

/// Loads bars from a UTF-8 CSV file with a header row naming at least
/// `timestamp` and `price` (or `close`) columns, in any order;
/// `volume`, `high`, `low`, `open` are picked up by name when present.
/// Malformed rows are skipped with a warning rather than aborting the
/// load; an empty or header-only file yields an empty vector, not an
/// error — the caller decides whether that is fatal.
pub fn load_bars_csv(path: impl AsRef<Path>) -> anyhow::Result<Vec<Bar>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| anyhow::anyhow!("failed to open CSV bar file {}: {e}", path.display()))?;

    let columns = ColumnIndex::resolve(
        reader.headers().map_err(|e| anyhow::anyhow!("failed to read CSV header in {}: {e}", path.display()))?,
    )?;

    let mut bars = Vec::new();
    for (row_index, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(row = row_index, error = %e, "skipping malformed CSV row");
                continue;
            }
        };

        let Some(bar) = parse_row(&record, &columns) else {
            tracing::warn!(row = row_index, "skipping row with unparseable timestamp or price");
            continue;
        };
        bars.push(bar);
    }

    bars.sort();
    Ok(bars)
}

fn parse_row(record: &csv::StringRecord, columns: &ColumnIndex) -> Option<Bar> {
    let timestamp = parse_timestamp(record.get(columns.timestamp)?)?;
    let price: f64 = record.get(columns.price)?.trim().parse().ok()?;
    if !(price.is_finite() && price > 0.0) {
        return None;
    }

    let field = |idx: Option<usize>| -> Option<f64> { record.get(idx?)?.trim().parse().ok() };
    let volume = field(columns.volume);
    let high = field(columns.high);
    let low = field(columns.low);
    let open = field(columns.open);

    Some(Bar {
        timestamp,
        price,
        volume,
        high,
        low,
        open,
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // RFC 3339 rejects a space separator; retry with `T` substituted.
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw.replacen(' ', "T", 1)) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, FALLBACK_FORMAT) {
        return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp_csv(contents: &str) -> tempfile_path::TempCsv {
        tempfile_path::TempCsv::new(contents)
    }

    // Minimal self-contained temp-file helper so the loader test does
    // not need an extra dev-dependency for a single use site.
    mod tempfile_path {
        use std::fs::File;
        use std::io::Write;
        use std::path::PathBuf;

        pub struct TempCsv {
            pub path: PathBuf,
        }

        impl TempCsv {
            pub fn new(contents: &str) -> Self {
                let mut path = std::env::temp_dir();
                path.push(format!("btc-gridtrader-test-{}.csv", std::process::id()));
                let mut file = File::create(&path).unwrap();
                file.write_all(contents.as_bytes()).unwrap();
                Self { path }
            }
        }

        impl Drop for TempCsv {
            fn drop(&mut self) {
                let _ = std::fs::remove_file(&self.path);
            }
        }
    }

    #[test]
    fn parses_rfc3339_and_space_separated_rows() {
        let csv = "timestamp,price\n2024-01-01T00:00:00Z,100.0\n2024-01-01 00:01:00,101.0\n";
        let temp = write_temp_csv(csv);
        let bars = load_bars_csv(&temp.path).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].price, 100.0);
        assert_eq!(bars[1].price, 101.0);
    }

    #[test]
    fn skips_rows_with_bad_price_or_timestamp() {
        let csv = "timestamp,price\nnot-a-date,100.0\n2024-01-01T00:00:00Z,not-a-price\n2024-01-01T00:00:00Z,-5.0\n2024-01-01T00:01:00Z,99.0\n";
        let temp = write_temp_csv(csv);
        let bars = load_bars_csv(&temp.path).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].price, 99.0);
    }

    #[test]
    fn empty_file_yields_empty_vec_not_error() {
        let csv = "timestamp,price\n";
        let temp = write_temp_csv(csv);
        let bars = load_bars_csv(&temp.path).unwrap();
        assert!(bars.is_empty());
    }

    #[test]
    fn rows_are_sorted_ascending() {
        let csv = "timestamp,price\n2024-01-01T00:02:00Z,102.0\n2024-01-01T00:00:00Z,100.0\n2024-01-01T00:01:00Z,101.0\n";
        let temp = write_temp_csv(csv);
        let bars = load_bars_csv(&temp.path).unwrap();
        assert_eq!(bars.iter().map(|b| b.price).collect::<Vec<_>>(), vec![100.0, 101.0, 102.0]);
    }

    #[test]
    fn columns_are_resolved_by_header_name_not_position() {
        // An OHLCV-style header with `price` renamed to `close` and a
        // column order that does not match the loader's own field
        // order; `open`/`high` must not be mistaken for `price`/`volume`.
        let csv = "timestamp,open,high,low,close,volume\n2024-01-01T00:00:00Z,10.0,20.0,5.0,15.0,1000.0\n";
        let temp = write_temp_csv(csv);
        let bars = load_bars_csv(&temp.path).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].price, 15.0);
        assert_eq!(bars[0].open, Some(10.0));
        assert_eq!(bars[0].high, Some(20.0));
        assert_eq!(bars[0].low, Some(5.0));
        assert_eq!(bars[0].volume, Some(1000.0));
    }

    #[test]
    fn missing_timestamp_or_price_column_is_an_error() {
        let csv = "time,value\n2024-01-01T00:00:00Z,100.0\n";
        let temp = write_temp_csv(csv);
        assert!(load_bars_csv(&temp.path).is_err());
    }
}
