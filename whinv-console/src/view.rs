//! Warehouse view state
//!
//! One `WarehouseView` owns everything the screen shows: the last fetched
//! list, the search term, the status filter, the sort order and the pending
//! notifications. The list is only replaced by a successful fetch, and every
//! successful mutation is followed by an explicit refetch.

use crate::client::{ClientError, ItemsApi};
use clap::ValueEnum;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use whinv_common::{Item, ItemFields, ItemStatus, ItemView, StatusCounts};

/// Column the visible rows are ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    #[default]
    Position,
    Name,
    Quantity,
    Planned,
    Status,
    Variance,
    Updated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// What an add/edit/delete dialog should do after submitting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    /// Action succeeded; close the dialog
    Close,
    /// Action failed; keep the dialog open with the user's input
    KeepOpen,
    /// Another action was still running; this one was ignored
    Busy,
}

/// A visible row: the item plus its derived status and variance
pub type Row = ItemView;

#[derive(Debug, Default)]
struct ViewState {
    items: Vec<Item>,
    search: String,
    status_filter: Option<ItemStatus>,
    sort_key: SortKey,
    sort_direction: SortDirection,
    notifications: Vec<Notification>,
}

impl ViewState {
    fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification {
            level,
            message: message.into(),
        });
    }
}

/// Clears the in-flight flag when the action finishes
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, AtomicOrdering::AcqRel, AtomicOrdering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, AtomicOrdering::Release);
    }
}

/// Screen state over an [`ItemsApi`]
pub struct WarehouseView<A: ItemsApi> {
    api: A,
    state: Mutex<ViewState>,
    in_flight: AtomicBool,
}

impl<A: ItemsApi> WarehouseView<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: Mutex::new(ViewState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Refetch with the current search term; returns whether the list was replaced
    pub async fn refresh(&self) -> bool {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            debug!("Refresh ignored: another action is in flight");
            return false;
        };
        self.reload().await
    }

    /// Set the search term and refetch
    pub async fn search(&self, term: &str) -> bool {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            debug!("Search ignored: another action is in flight");
            return false;
        };
        self.state.lock().await.search = term.trim().to_string();
        self.reload().await
    }

    pub async fn create(&self, fields: &ItemFields) -> DialogOutcome {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            return DialogOutcome::Busy;
        };

        match self.api.create(fields).await {
            Ok(item) => {
                debug!("Created item {} at {}", item.id, item.position);
                self.state
                    .lock()
                    .await
                    .notify(NotificationLevel::Success, "Item created successfully");
                self.reload().await;
                DialogOutcome::Close
            }
            Err(e) => {
                warn!("Create failed: {}", e);
                self.state
                    .lock()
                    .await
                    .notify(NotificationLevel::Error, "Failed to create item");
                DialogOutcome::KeepOpen
            }
        }
    }

    pub async fn update(&self, id: &str, fields: &ItemFields) -> DialogOutcome {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            return DialogOutcome::Busy;
        };

        match self.api.update(id, fields).await {
            Ok(item) => {
                debug!("Updated item {}", item.id);
                self.state
                    .lock()
                    .await
                    .notify(NotificationLevel::Success, "Item updated successfully");
                self.reload().await;
                DialogOutcome::Close
            }
            Err(e) => {
                warn!("Update of {} failed: {}", id, e);
                self.state
                    .lock()
                    .await
                    .notify(NotificationLevel::Error, "Failed to update item");
                DialogOutcome::KeepOpen
            }
        }
    }

    /// Delete an item; an item that is already gone counts as deleted
    pub async fn delete(&self, id: &str) -> DialogOutcome {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            return DialogOutcome::Busy;
        };

        match self.api.delete(id).await {
            Ok(()) | Err(ClientError::NotFound(_)) => {
                self.state
                    .lock()
                    .await
                    .notify(NotificationLevel::Success, "Item deleted successfully");
                self.reload().await;
                DialogOutcome::Close
            }
            Err(e) => {
                warn!("Delete of {} failed: {}", id, e);
                self.state
                    .lock()
                    .await
                    .notify(NotificationLevel::Error, "Failed to delete item");
                DialogOutcome::KeepOpen
            }
        }
    }

    pub async fn set_status_filter(&self, status: Option<ItemStatus>) {
        self.state.lock().await.status_filter = status;
    }

    pub async fn set_sort(&self, key: SortKey, direction: SortDirection) {
        let mut state = self.state.lock().await;
        state.sort_key = key;
        state.sort_direction = direction;
    }

    pub async fn search_term(&self) -> String {
        self.state.lock().await.search.clone()
    }

    /// Visible rows: fetched items filtered by status, then sorted
    pub async fn rows(&self) -> Vec<Row> {
        let state = self.state.lock().await;
        let mut rows: Vec<Row> = state
            .items
            .iter()
            .cloned()
            .map(ItemView::from)
            .filter(|row| state.status_filter.map_or(true, |s| row.status == s))
            .collect();

        rows.sort_by(|a, b| {
            let ordering = compare_rows(a, b, state.sort_key);
            match state.sort_direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        rows
    }

    /// Tallies over the whole fetched list, ignoring the status filter
    pub async fn counts(&self) -> StatusCounts {
        self.state
            .lock()
            .await
            .items
            .iter()
            .map(Item::status)
            .collect()
    }

    /// Drain pending notifications, oldest first
    pub async fn take_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut self.state.lock().await.notifications)
    }

    async fn reload(&self) -> bool {
        let search = self.state.lock().await.search.clone();
        let term = (!search.is_empty()).then_some(search.as_str());

        match self.api.list(term).await {
            Ok(items) => {
                debug!("Fetched {} items", items.len());
                self.state.lock().await.items = items;
                true
            }
            Err(e) => {
                warn!("Fetch failed: {}", e);
                self.state
                    .lock()
                    .await
                    .notify(NotificationLevel::Error, "Failed to fetch items");
                false
            }
        }
    }
}

fn compare_rows(a: &Row, b: &Row, key: SortKey) -> Ordering {
    match key {
        SortKey::Position => a.item.position.cmp(&b.item.position),
        SortKey::Name => a
            .item
            .name
            .to_lowercase()
            .cmp(&b.item.name.to_lowercase()),
        SortKey::Quantity => a.item.quantity.cmp(&b.item.quantity),
        SortKey::Planned => a.item.planned_quantity.cmp(&b.item.planned_quantity),
        SortKey::Status => a.status.cmp(&b.status),
        SortKey::Variance => a.variance.cmp(&b.variance),
        SortKey::Updated => a.item.last_updated.cmp(&b.item.last_updated),
    }
}
