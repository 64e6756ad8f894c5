//! whinv-console library - terminal front-end for the inventory API
//!
//! `client` talks to a running whinv-server; `view` holds the screen state
//! (fetched list, search, filter, sort, notifications) on top of any
//! [`ItemsApi`] implementation.

pub mod client;
pub mod view;

pub use client::{ClientError, HttpItemsApi, ItemsApi};
pub use view::{
    DialogOutcome, Notification, NotificationLevel, Row, SortDirection, SortKey, WarehouseView,
};
