//! # whinv Common Library
//!
//! Shared code for the warehouse inventory binaries:
//! - Item model and the SQLite-backed item repository
//! - Location codec (spreadsheet cell position to rack/level code)
//! - Reconciliation classifier (planned vs. actual quantity)
//! - Configuration loading and logging setup

pub mod config;
pub mod db;
pub mod error;
pub mod location;
pub mod logging;
pub mod models;
pub mod reconcile;

pub use error::{Error, Result};
pub use location::{Location, RackLayout, RowBand};
pub use models::{Item, ItemFields, ItemView};
pub use reconcile::{ItemStatus, Reconciliation, StatusCounts};
