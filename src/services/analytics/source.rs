use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::models::{Asset, InventoryItem, User, WorkOrder};

/// Reporting window and tenant for one dashboard call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportScope {
    /// Inclusive lower bound on work-order creation time (RFC 3339)
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on work-order creation time (RFC 3339)
    pub end_date: Option<DateTime<Utc>>,
    pub organization_id: Option<Uuid>,
}

impl ReportScope {
    pub fn validate(&self) -> Result<(), ServiceError> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start > end => Err(ServiceError::ValidationError(
                "start_date must not be after end_date".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Whether `instant` lies inside the window; open ends are unbounded.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start_date.map_or(true, |start| instant >= start)
            && self.end_date.map_or(true, |end| instant <= end)
    }

    pub fn includes_organization(&self, organization_id: Option<Uuid>) -> bool {
        match self.organization_id {
            Some(wanted) => organization_id == Some(wanted),
            None => true,
        }
    }

    /// Work orders created inside the window.
    pub fn work_orders_in_window(&self, work_orders: Vec<WorkOrder>) -> Vec<WorkOrder> {
        work_orders
            .into_iter()
            .filter(|wo| self.contains(wo.created_at))
            .collect()
    }
}

/// Read-only access to the records the analytics engine aggregates.
///
/// Implementations apply the organization filter; the engine applies date windows.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn work_orders(&self, scope: &ReportScope) -> Result<Vec<WorkOrder>, ServiceError>;
    async fn assets(&self, scope: &ReportScope) -> Result<Vec<Asset>, ServiceError>;
    async fn inventory_items(&self, scope: &ReportScope) -> Result<Vec<InventoryItem>, ServiceError>;
    async fn users(&self, scope: &ReportScope) -> Result<Vec<User>, ServiceError>;
}

/// A point-in-time snapshot held in memory. Records come back in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordSource {
    pub work_orders: Vec<WorkOrder>,
    pub assets: Vec<Asset>,
    pub inventory_items: Vec<InventoryItem>,
    pub users: Vec<User>,
}

impl InMemoryRecordSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_work_orders(mut self, work_orders: Vec<WorkOrder>) -> Self {
        self.work_orders = work_orders;
        self
    }

    pub fn with_assets(mut self, assets: Vec<Asset>) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_inventory_items(mut self, items: Vec<InventoryItem>) -> Self {
        self.inventory_items = items;
        self
    }

    pub fn with_users(mut self, users: Vec<User>) -> Self {
        self.users = users;
        self
    }
}

#[async_trait]
impl RecordSource for InMemoryRecordSource {
    async fn work_orders(&self, scope: &ReportScope) -> Result<Vec<WorkOrder>, ServiceError> {
        Ok(self
            .work_orders
            .iter()
            .filter(|wo| scope.includes_organization(wo.organization_id))
            .cloned()
            .collect())
    }

    async fn assets(&self, scope: &ReportScope) -> Result<Vec<Asset>, ServiceError> {
        Ok(self
            .assets
            .iter()
            .filter(|a| scope.includes_organization(a.organization_id))
            .cloned()
            .collect())
    }

    async fn inventory_items(&self, scope: &ReportScope) -> Result<Vec<InventoryItem>, ServiceError> {
        Ok(self
            .inventory_items
            .iter()
            .filter(|i| scope.includes_organization(i.organization_id))
            .cloned()
            .collect())
    }

    async fn users(&self, scope: &ReportScope) -> Result<Vec<User>, ServiceError> {
        Ok(self
            .users
            .iter()
            .filter(|u| scope.includes_organization(u.organization_id))
            .cloned()
            .collect())
    }
}
