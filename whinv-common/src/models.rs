//! Item models

use crate::reconcile::{ItemStatus, Reconciliation};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored inventory item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Opaque unique identifier (UUIDv4 text), immutable
    pub id: String,
    pub name: String,
    pub details: String,
    /// Canonical location code, e.g. `PE-03-07`
    pub position: String,
    /// Actual on-hand count
    pub quantity: u32,
    /// Expected count; `None` when never recorded
    #[serde(default)]
    pub planned_quantity: Option<u32>,
    pub last_updated: DateTime<Utc>,
}

impl Item {
    /// Status and variance derived from the current quantities
    pub fn reconciliation(&self) -> Reconciliation {
        Reconciliation::of(
            self.planned_quantity,
            self.quantity,
            !self.name.trim().is_empty(),
        )
    }

    pub fn status(&self) -> ItemStatus {
        self.reconciliation().status
    }
}

/// Item as exposed over the API, with derived fields attached
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    #[serde(flatten)]
    pub item: Item,
    pub status: ItemStatus,
    pub variance: Option<i64>,
}

impl From<Item> for ItemView {
    fn from(item: Item) -> Self {
        let Reconciliation { status, variance } = item.reconciliation();
        Self {
            item,
            status,
            variance,
        }
    }
}

/// Mutable fields of an item (create body and full-replace update body)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFields {
    pub name: String,
    #[serde(default)]
    pub details: String,
    pub position: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub planned_quantity: Option<u32>,
}

impl ItemFields {
    pub fn new(name: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
            ..Default::default()
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_planned_quantity(mut self, planned: Option<u32>) -> Self {
        self.planned_quantity = planned;
        self
    }

    /// Check required fields and return the normalized copy to persist
    pub fn validated(&self) -> Result<ItemFields> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::Validation("name is required".to_string()));
        }

        let position = self.position.trim();
        if position.is_empty() {
            return Err(Error::Validation("position is required".to_string()));
        }

        Ok(ItemFields {
            name: name.to_string(),
            details: self.details.clone(),
            position: position.to_string(),
            quantity: self.quantity,
            planned_quantity: self.planned_quantity,
        })
    }
}

impl From<&Item> for ItemFields {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            details: item.details.clone(),
            position: item.position.clone(),
            quantity: item.quantity,
            planned_quantity: item.planned_quantity,
        }
    }
}
