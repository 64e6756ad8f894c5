//! Location codec
//!
//! Maps a spreadsheet cell (row, column, level label) to a canonical
//! location code such as `PE-03-07`.
//!
//! The aisle mapping sheets pair their columns: odd columns carry the item
//! name, the even column to the right carries a free-text note for it. Two
//! raw columns therefore make up one rack. Rows are grouped into bands, each
//! band describing a different run of physical racks along the aisle.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A contiguous band of sheet rows sharing the same base rack offset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowBand {
    /// Zero-based row indices covered by this band (after header rows are stripped)
    pub rows: Range<usize>,
    /// Number of racks preceding this band
    pub base_rack: u32,
}

impl RowBand {
    pub fn new(rows: Range<usize>, base_rack: u32) -> Self {
        Self { rows, base_rack }
    }
}

/// Physical shelving layout of one aisle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RackLayout {
    /// Prefix of every location code in this aisle (e.g. `PE`)
    pub aisle_prefix: String,
    /// Human-readable aisle name used in generated details (e.g. `E`)
    pub aisle_name: String,
    /// Row bands, checked in order
    pub bands: Vec<RowBand>,
    /// Base rack offset for rows outside every band
    pub fallback_base: u32,
}

/// A resolved item slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub code: String,
    pub rack: u32,
}

impl RackLayout {
    /// Aisle E: racks 1-5, 6-10 and 11-15 stacked down the sheet
    pub fn aisle_e() -> Self {
        Self {
            aisle_prefix: "PE".to_string(),
            aisle_name: "E".to_string(),
            bands: vec![
                RowBand::new(0..35, 0),
                RowBand::new(35..87, 5),
                RowBand::new(87..130, 10),
            ],
            fallback_base: 0,
        }
    }

    /// Base rack offset for a row
    pub fn base_rack(&self, row: usize) -> u32 {
        self.bands
            .iter()
            .find(|band| band.rows.contains(&row))
            .map(|band| band.base_rack)
            .unwrap_or(self.fallback_base)
    }

    /// One-based rack number for a cell
    pub fn rack_number(&self, row: usize, col: usize) -> u32 {
        self.base_rack(row) + (col / 2) as u32 + 1
    }

    /// Location code for a cell, regardless of whether the column holds items
    pub fn location_code(&self, row: usize, col: usize, level: &str) -> String {
        format!(
            "{}-{:02}-{}",
            self.aisle_prefix,
            self.rack_number(row, col),
            pad_level(level)
        )
    }

    /// Resolve an item slot. Even columns are note columns and never hold an item.
    pub fn locate(&self, row: usize, col: usize, level: &str) -> Option<Location> {
        if !is_value_column(col) {
            return None;
        }

        Some(Location {
            code: self.location_code(row, col, level),
            rack: self.rack_number(row, col),
        })
    }
}

impl Default for RackLayout {
    fn default() -> Self {
        Self::aisle_e()
    }
}

/// Odd columns hold item names
pub fn is_value_column(col: usize) -> bool {
    col % 2 == 1
}

/// Left-pad a level label with zeros to width 2 (longer labels are kept as-is)
pub fn pad_level(level: &str) -> String {
    format!("{:0>2}", level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_rack_bands() {
        let layout = RackLayout::aisle_e();

        for row in 0..35 {
            assert_eq!(layout.base_rack(row), 0, "row {}", row);
        }
        for row in 35..87 {
            assert_eq!(layout.base_rack(row), 5, "row {}", row);
        }
        for row in 87..130 {
            assert_eq!(layout.base_rack(row), 10, "row {}", row);
        }
    }

    #[test]
    fn test_base_rack_falls_back_outside_bands() {
        let layout = RackLayout::aisle_e();
        assert_eq!(layout.base_rack(130), 0);
        assert_eq!(layout.base_rack(500), 0);
        assert_eq!(layout.base_rack(usize::MAX), 0);
    }

    #[test]
    fn test_rack_number_pairs_columns() {
        let layout = RackLayout::aisle_e();
        assert_eq!(layout.rack_number(0, 1), 1);
        assert_eq!(layout.rack_number(0, 2), 2);
        assert_eq!(layout.rack_number(0, 3), 2);
        assert_eq!(layout.rack_number(0, 9), 5);
        assert_eq!(layout.rack_number(40, 1), 6);
        assert_eq!(layout.rack_number(100, 9), 15);
    }

    #[test]
    fn test_location_code_format() {
        let layout = RackLayout::aisle_e();
        assert_eq!(layout.location_code(0, 1, "1"), "PE-01-01");
        assert_eq!(layout.location_code(0, 5, "01"), "PE-03-01");
        assert_eq!(layout.location_code(36, 3, "7"), "PE-07-07");
        assert_eq!(layout.location_code(90, 7, "12"), "PE-14-12");
    }

    #[test]
    fn test_level_longer_than_two_kept() {
        assert_eq!(pad_level("123"), "123");
        assert_eq!(pad_level(""), "00");
        assert_eq!(pad_level("A"), "0A");
    }

    #[test]
    fn test_even_columns_never_locate() {
        let layout = RackLayout::aisle_e();
        for col in (0..40).step_by(2) {
            assert!(layout.locate(3, col, "02").is_none(), "col {}", col);
        }
        for col in (1..40).step_by(2) {
            assert!(layout.locate(3, col, "02").is_some(), "col {}", col);
        }
    }

    #[test]
    fn test_locate_is_deterministic() {
        let layout = RackLayout::aisle_e();
        let first = layout.locate(50, 7, "4");
        let second = layout.locate(50, 7, "4");
        assert_eq!(first, second);
        assert_eq!(
            first,
            Some(Location {
                code: "PE-09-04".to_string(),
                rack: 9,
            })
        );
    }

    #[test]
    fn test_custom_layout_table() {
        let layout = RackLayout {
            aisle_prefix: "PF".to_string(),
            aisle_name: "F".to_string(),
            bands: vec![RowBand::new(0..10, 0), RowBand::new(10..20, 20)],
            fallback_base: 40,
        };
        assert_eq!(layout.location_code(12, 1, "3"), "PF-21-03");
        assert_eq!(layout.location_code(25, 1, "3"), "PF-41-03");
    }
}
