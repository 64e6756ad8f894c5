//! HTTP API handlers for whinv-server

pub mod health;
pub mod items;
pub mod ui;

pub use health::health_routes;
pub use items::{create_item, delete_item, get_item, get_stats, list_items, update_item};
pub use ui::{serve_app_js, serve_index};
