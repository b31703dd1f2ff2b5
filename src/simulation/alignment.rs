use crate::domain::Bar;

/// One fast-series bar paired with the length of the slow-series
/// prefix causally available to it (the count of slow bars whose
/// timestamp is `<= fast_bar.timestamp`, i.e. `slow[..k]`).
#[derive(Debug, Clone, Copy)]
pub struct AlignedRow {
    pub fast_bar: Bar,
    pub k: usize,
}

/// Pairs every fast bar with the slow-series prefix length `k` such
/// that `slow[..k]` are exactly the slow bars not newer than it. Fast
/// bars preceding the first slow bar (`k == 0`) are dropped — there is
/// no slow context for them yet.
///
/// Implemented with an upper-bound binary search (`partition_point`)
/// against each fast timestamp.
pub fn align(fast: &[Bar], slow: &[Bar]) -> Vec<AlignedRow> {
    if slow.is_empty() {
        return Vec::new();
    }

    let mut rows = Vec::with_capacity(fast.len());
    for &fast_bar in fast {
        let k = slow.partition_point(|s| s.timestamp <= fast_bar.timestamp);
        if k == 0 {
            continue;
        }
        rows.push(AlignedRow { fast_bar, k });
    }
    rows
}
