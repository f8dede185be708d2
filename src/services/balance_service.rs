use chrono::NaiveDateTime;
use tracing::warn;

use crate::models::BalanceSnapshot;

/// One point of the account value chart
#[derive(Debug, Clone, PartialEq)]
pub struct BalancePoint {
    pub recorded_at: NaiveDateTime,
    pub total: f64,
}

/// Snapshots oldest first, whatever order the pages arrived in.
///
/// Sorting happens here, on a copy, so the feed's own append order is never
/// disturbed. Rows with unreadable timestamps are left out.
pub fn sorted_snapshots(snapshots: &[BalanceSnapshot]) -> Vec<(NaiveDateTime, &BalanceSnapshot)> {
    let mut dated: Vec<(NaiveDateTime, &BalanceSnapshot)> = snapshots
        .iter()
        .filter_map(|snapshot| match snapshot.created_at_time() {
            Some(at) => Some((at, snapshot)),
            None => {
                warn!(
                    "skipping balance snapshot {} with bad timestamp '{}'",
                    snapshot.id, snapshot.created_at
                );
                None
            }
        })
        .collect();

    // Stable: equal timestamps keep arrival order
    dated.sort_by_key(|(at, _)| *at);
    dated
}

/// Snapshots whose timestamp cannot be read, in feed order.
/// They have no place on the chart but are still listed.
pub fn undated_snapshots(snapshots: &[BalanceSnapshot]) -> Vec<&BalanceSnapshot> {
    snapshots
        .iter()
        .filter(|snapshot| snapshot.created_at_time().is_none())
        .collect()
}

pub fn chart_points(snapshots: &[BalanceSnapshot]) -> Vec<BalancePoint> {
    sorted_snapshots(snapshots)
        .into_iter()
        .map(|(recorded_at, snapshot)| BalancePoint {
            recorded_at,
            total: snapshot.total_amount,
        })
        .collect()
}
