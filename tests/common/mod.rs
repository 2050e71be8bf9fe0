#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use cmms_analytics::{
    clock::FixedClock,
    config::AnalyticsConfig,
    errors::ServiceError,
    models::{
        Asset, AssetStatus, InventoryItem, User, UserStatus, WorkOrder, WorkOrderStatus,
        WorkOrderType,
    },
    services::analytics::{AnalyticsService, InMemoryRecordSource, RecordSource, ReportScope},
};
use serde_json::Value;
use tower::ServiceExt;

/// Instant every fixture is positioned relative to.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
}

/// A small plant: three assets, four users, six work orders and three stock items.
pub struct Plant {
    pub pump: Asset,
    pub chiller: Asset,
    pub conveyor: Asset,
    pub ada: User,
    pub bo: User,
    pub snapshot: InMemoryRecordSource,
}

fn work_order(
    title: &str,
    status: WorkOrderStatus,
    kind: WorkOrderType,
    asset: &Asset,
    created_days_ago: i64,
) -> WorkOrder {
    let mut wo = WorkOrder::new(title, status, kind, now() - Duration::days(created_days_ago));
    wo.asset_id = Some(asset.id);
    wo
}

pub fn plant() -> Plant {
    let pump = Asset::new("Pump P-1", Some("Pumps"), AssetStatus::Active);
    let mut chiller = Asset::new("Chiller C-1", Some("HVAC"), AssetStatus::Active);
    chiller.warranty_expiry = Some(now() + Duration::days(10));
    let conveyor = Asset::new("Conveyor", None, AssetStatus::UnderMaintenance);

    let ada = User::new("Ada", UserStatus::Active, Some("Technician"));
    let bo = User::new("Bo", UserStatus::Active, Some("Maintenance Lead"));
    let cy = User::new("Cy", UserStatus::Active, Some("Plant Manager"));
    let mut dee = User::new("Dee", UserStatus::Invited, None);
    dee.invitation_token = Some("invite-123".into());

    let mut seal = work_order("Pump seal leak", WorkOrderStatus::Completed, WorkOrderType::Corrective, &pump, 10);
    seal.actual_start = Some(now() - Duration::days(9));
    seal.actual_end = Some(now() - Duration::days(9) + Duration::hours(4));
    seal.due_date = Some(now() - Duration::days(8));
    seal.actual_cost = Some(250.0);
    seal.assigned_to_id = Some(ada.id);

    let mut bearing = work_order("Pump bearing", WorkOrderStatus::Completed, WorkOrderType::Corrective, &pump, 5);
    bearing.actual_start = Some(now() - Duration::days(4));
    bearing.actual_end = Some(now() - Duration::days(4) + Duration::hours(2));
    bearing.due_date = Some(now() - Duration::days(5));
    bearing.actual_cost = Some(120.5);
    bearing.assigned_to_id = Some(ada.id);

    let mut fault = work_order("Chiller fault", WorkOrderStatus::InProgress, WorkOrderType::Corrective, &chiller, 2);
    fault.due_date = Some(now() - Duration::days(1));
    fault.assigned_to_id = Some(bo.id);

    let mut pm = work_order("Monthly PM chiller", WorkOrderStatus::Completed, WorkOrderType::Preventive, &chiller, 20);
    pm.actual_start = Some(now() - Duration::days(16));
    pm.actual_end = Some(now() - Duration::days(16) + Duration::hours(1));
    pm.due_date = Some(now() - Duration::days(15));
    pm.actual_cost = Some(80.0);
    pm.assigned_to_id = Some(bo.id);

    let inspection = work_order("Conveyor inspection", WorkOrderStatus::Open, WorkOrderType::Inspection, &conveyor, 1);

    let mut old = work_order("Old failure", WorkOrderStatus::Closed, WorkOrderType::Corrective, &pump, 60);
    old.updated_at = now() - Duration::days(59);

    let mut seal_kit = InventoryItem::new("Seal kit", 3, 5, 12.5);
    seal_kit.category = Some("Seals".into());
    let bearing_stock = InventoryItem::new("Bearing 6204", 0, 4, 30.0);
    let filters = InventoryItem::new("Filter", 40, 10, 2.25);

    let snapshot = InMemoryRecordSource::new()
        .with_assets(vec![pump.clone(), chiller.clone(), conveyor.clone()])
        .with_users(vec![ada.clone(), bo.clone(), cy, dee])
        .with_work_orders(vec![seal, bearing, fault, pm, inspection, old])
        .with_inventory_items(vec![seal_kit, bearing_stock, filters]);

    Plant {
        pump,
        chiller,
        conveyor,
        ada,
        bo,
        snapshot,
    }
}

pub fn service(source: impl RecordSource + 'static) -> AnalyticsService {
    service_with_config(source, AnalyticsConfig::default())
}

pub fn service_with_config(source: impl RecordSource + 'static, config: AnalyticsConfig) -> AnalyticsService {
    AnalyticsService::new(Arc::new(source), config).with_clock(Arc::new(FixedClock(now())))
}

/// Wraps a snapshot and makes chosen tables fail or respond slowly.
pub struct FlakySource {
    inner: InMemoryRecordSource,
    failing: Vec<&'static str>,
    slow: Vec<&'static str>,
    delay: StdDuration,
}

impl FlakySource {
    pub fn new(inner: InMemoryRecordSource) -> Self {
        Self {
            inner,
            failing: Vec::new(),
            slow: Vec::new(),
            delay: StdDuration::from_millis(0),
        }
    }

    pub fn failing(mut self, table: &'static str) -> Self {
        self.failing.push(table);
        self
    }

    pub fn slow(mut self, table: &'static str, delay: StdDuration) -> Self {
        self.slow.push(table);
        self.delay = delay;
        self
    }

    async fn gate(&self, table: &'static str) -> Result<(), ServiceError> {
        if self.slow.contains(&table) {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing.contains(&table) {
            return Err(ServiceError::DataSourceUnavailable(format!("{table} offline")));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordSource for FlakySource {
    async fn work_orders(&self, scope: &ReportScope) -> Result<Vec<WorkOrder>, ServiceError> {
        self.gate("work_orders").await?;
        self.inner.work_orders(scope).await
    }

    async fn assets(&self, scope: &ReportScope) -> Result<Vec<Asset>, ServiceError> {
        self.gate("assets").await?;
        self.inner.assets(scope).await
    }

    async fn inventory_items(&self, scope: &ReportScope) -> Result<Vec<InventoryItem>, ServiceError> {
        self.gate("inventory_items").await?;
        self.inner.inventory_items(scope).await
    }

    async fn users(&self, scope: &ReportScope) -> Result<Vec<User>, ServiceError> {
        self.gate("users").await?;
        self.inner.users(scope).await
    }
}

/// Issues a GET against the router and decodes the JSON body.
pub async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}
