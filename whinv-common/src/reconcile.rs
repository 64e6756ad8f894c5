//! Reconciliation classifier
//!
//! Derives an item's status from its planned and actual quantity. The status
//! is recomputed on every read and is never stored, so it cannot drift from
//! the quantities it describes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reconciliation status of a storage slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Planned quantity recorded and matched by the actual count
    Match,
    /// Planned quantity recorded but the actual count differs
    Mismatch,
    /// Nothing stored at the slot
    Empty,
    /// Something stored but no planned quantity was ever recorded
    Unplanned,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 4] = [
        ItemStatus::Match,
        ItemStatus::Mismatch,
        ItemStatus::Empty,
        ItemStatus::Unplanned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Match => "match",
            ItemStatus::Mismatch => "mismatch",
            ItemStatus::Empty => "empty",
            ItemStatus::Unplanned => "unplanned",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown status: {}", s))
    }
}

/// Status plus signed variance (`actual - planned`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub status: ItemStatus,
    pub variance: Option<i64>,
}

impl Reconciliation {
    pub fn of(planned: Option<u32>, actual: u32, present: bool) -> Self {
        Self {
            status: classify(planned, actual, present),
            variance: variance(planned, actual),
        }
    }
}

/// Classify a slot.
///
/// `present` says whether an item name is recorded at the location. A slot
/// with no item but a non-zero count has no defined status of its own; it is
/// reported as `Unplanned` since nothing was expected there.
pub fn classify(planned: Option<u32>, actual: u32, present: bool) -> ItemStatus {
    match (present, planned) {
        (false, _) if actual == 0 => ItemStatus::Empty,
        (false, _) => ItemStatus::Unplanned,
        (true, None) => ItemStatus::Unplanned,
        (true, Some(p)) if p == actual => ItemStatus::Match,
        (true, Some(_)) => ItemStatus::Mismatch,
    }
}

/// Positive is surplus, negative is shortage; `None` when nothing was planned
pub fn variance(planned: Option<u32>, actual: u32) -> Option<i64> {
    planned.map(|p| i64::from(actual) - i64::from(p))
}

/// Per-status tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: usize,
    #[serde(rename = "match")]
    pub matched: usize,
    #[serde(rename = "mismatch")]
    pub mismatched: usize,
    pub empty: usize,
    pub unplanned: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: ItemStatus) {
        self.total += 1;
        match status {
            ItemStatus::Match => self.matched += 1,
            ItemStatus::Mismatch => self.mismatched += 1,
            ItemStatus::Empty => self.empty += 1,
            ItemStatus::Unplanned => self.unplanned += 1,
        }
    }

    pub fn get(&self, status: ItemStatus) -> usize {
        match status {
            ItemStatus::Match => self.matched,
            ItemStatus::Mismatch => self.mismatched,
            ItemStatus::Empty => self.empty,
            ItemStatus::Unplanned => self.unplanned,
        }
    }
}

impl FromIterator<ItemStatus> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = ItemStatus>>(iter: I) -> Self {
        let mut counts = StatusCounts::default();
        for status in iter {
            counts.record(status);
        }
        counts
    }
}
