//! whinv-import library - one-shot aisle spreadsheet import
//!
//! Reads an aisle mapping sheet, turns every filled item cell into a
//! location-coded item, and reloads the aisle's rows in the repository.

pub mod cell;
pub mod error;
pub mod pipeline;
pub mod source;

pub use cell::Cell;
pub use error::ImportError;
pub use pipeline::{plan_items, run_import, ImportPlan, ImportReport, PlannedItem};
pub use source::{open_source, CsvSource, GridSource, XlsxSource};
