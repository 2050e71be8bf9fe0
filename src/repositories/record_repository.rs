use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QueryTrait};
use tracing::{debug, warn};

use crate::entities::{assets, inventory_items, roles, users, work_orders};
use crate::errors::ServiceError;
use crate::models::{parse_canonical, Asset, InventoryItem, User, WorkOrder};
use crate::repositories::{BaseRepository, Repository};
use crate::services::analytics::{RecordSource, ReportScope};

/// Record source backed by the relational store.
///
/// Rows come back ordered by `created_at, id`. Rows whose status, priority or
/// type column holds a value outside the known set are skipped with a warning.
#[derive(Debug, Clone)]
pub struct SeaOrmRecordSource {
    base: BaseRepository,
}

impl SeaOrmRecordSource {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

fn parse_column<E: FromStr>(column: &'static str, raw: &str) -> Result<E, ServiceError> {
    parse_canonical(raw).ok_or_else(|| ServiceError::InvalidStatus(format!("{column} = {raw:?}")))
}

/// NaN and infinite amounts are stored by some backends but never reach the engine.
fn finite(amount: f64) -> Option<f64> {
    amount.is_finite().then_some(amount)
}

/// Converts rows, dropping the ones that do not map to a domain record.
fn convert_rows<M, T, F>(table: &'static str, rows: Vec<M>, convert: F) -> Vec<T>
where
    F: Fn(M) -> Result<T, ServiceError>,
{
    let total = rows.len();
    let records: Vec<T> = rows
        .into_iter()
        .filter_map(|row| match convert(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(table, error = %e, "Skipping unparseable row");
                None
            }
        })
        .collect();
    debug!(table, loaded = records.len(), skipped = total - records.len(), "Loaded records");
    records
}

fn work_order_from_row(row: work_orders::Model) -> Result<WorkOrder, ServiceError> {
    Ok(WorkOrder {
        id: row.id,
        organization_id: row.organization_id,
        status: parse_column("status", &row.status)?,
        priority: parse_column("priority", &row.priority)?,
        work_order_type: parse_column("work_order_type", &row.work_order_type)?,
        title: row.title,
        created_at: row.created_at,
        updated_at: row.updated_at,
        scheduled_date: row.scheduled_date,
        due_date: row.due_date,
        actual_start: row.actual_start,
        actual_end: row.actual_end,
        assigned_to_id: row.assigned_to_id,
        asset_id: row.asset_id,
        actual_cost: row.actual_cost.and_then(finite),
    })
}

fn asset_from_row(row: assets::Model) -> Result<Asset, ServiceError> {
    Ok(Asset {
        id: row.id,
        organization_id: row.organization_id,
        status: parse_column("status", &row.status)?,
        name: row.name,
        asset_type: row.asset_type,
        warranty_expiry: row.warranty_expiry,
    })
}

fn inventory_item_from_row(row: inventory_items::Model) -> Result<InventoryItem, ServiceError> {
    Ok(InventoryItem {
        id: row.id,
        organization_id: row.organization_id,
        status: parse_column("status", &row.status)?,
        name: row.name,
        category: row.category,
        quantity: row.quantity,
        min_quantity: row.min_quantity,
        max_quantity: row.max_quantity,
        unit_price: finite(row.unit_price).unwrap_or(0.0),
    })
}

fn user_from_row(row: users::Model, role_name: Option<String>) -> Result<User, ServiceError> {
    Ok(User {
        id: row.id,
        organization_id: row.organization_id,
        status: parse_column("status", &row.status)?,
        name: row.name,
        role_name,
        invitation_token: row.invitation_token,
        invitation_accepted: row.invitation_accepted,
    })
}

#[async_trait]
impl RecordSource for SeaOrmRecordSource {
    async fn work_orders(&self, scope: &ReportScope) -> Result<Vec<WorkOrder>, ServiceError> {
        let rows = work_orders::Entity::find()
            .apply_if(scope.organization_id, |query, org| {
                query.filter(work_orders::Column::OrganizationId.eq(org))
            })
            .order_by_asc(work_orders::Column::CreatedAt)
            .order_by_asc(work_orders::Column::Id)
            .all(self.base.get_db())
            .await?;
        Ok(convert_rows("work_orders", rows, work_order_from_row))
    }

    async fn assets(&self, scope: &ReportScope) -> Result<Vec<Asset>, ServiceError> {
        let rows = assets::Entity::find()
            .apply_if(scope.organization_id, |query, org| {
                query.filter(assets::Column::OrganizationId.eq(org))
            })
            .order_by_asc(assets::Column::CreatedAt)
            .order_by_asc(assets::Column::Id)
            .all(self.base.get_db())
            .await?;
        Ok(convert_rows("assets", rows, asset_from_row))
    }

    async fn inventory_items(&self, scope: &ReportScope) -> Result<Vec<InventoryItem>, ServiceError> {
        let rows = inventory_items::Entity::find()
            .apply_if(scope.organization_id, |query, org| {
                query.filter(inventory_items::Column::OrganizationId.eq(org))
            })
            .order_by_asc(inventory_items::Column::CreatedAt)
            .order_by_asc(inventory_items::Column::Id)
            .all(self.base.get_db())
            .await?;
        Ok(convert_rows("inventory_items", rows, inventory_item_from_row))
    }

    async fn users(&self, scope: &ReportScope) -> Result<Vec<User>, ServiceError> {
        let rows = users::Entity::find()
            .find_also_related(roles::Entity)
            .apply_if(scope.organization_id, |query, org| {
                query.filter(users::Column::OrganizationId.eq(org))
            })
            .order_by_asc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .all(self.base.get_db())
            .await?;

        Ok(convert_rows("users", rows, |(row, role)| {
            user_from_row(row, role.map(|r| r.name))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkOrderStatus;
    use assert_matches::assert_matches;
    use chrono::Utc;
    use uuid::Uuid;

    fn row(status: &str) -> work_orders::Model {
        let now = Utc::now();
        work_orders::Model {
            id: Uuid::new_v4(),
            organization_id: None,
            title: "Replace bearing".into(),
            status: status.into(),
            priority: "HIGH".into(),
            work_order_type: "corrective".into(),
            scheduled_date: None,
            due_date: None,
            actual_start: None,
            actual_end: None,
            assigned_to_id: None,
            asset_id: None,
            actual_cost: Some(12.5),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn work_order_rows_parse_loose_enum_spellings() {
        let wo = work_order_from_row(row("In-Progress")).unwrap();
        assert_eq!(wo.status, WorkOrderStatus::InProgress);
        assert_eq!(wo.actual_cost, Some(12.5));
    }

    #[test]
    fn non_finite_costs_are_dropped() {
        let mut nan = row("completed");
        nan.actual_cost = Some(f64::NAN);
        assert_eq!(work_order_from_row(nan).unwrap().actual_cost, None);

        let mut infinite = row("completed");
        infinite.actual_cost = Some(f64::INFINITY);
        assert_eq!(work_order_from_row(infinite).unwrap().actual_cost, None);
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_matches!(work_order_from_row(row("exploded")), Err(ServiceError::InvalidStatus(_)));
    }

    #[test]
    fn conversion_skips_bad_rows() {
        let rows = vec![row("open"), row("bogus"), row("closed")];
        assert_eq!(convert_rows("work_orders", rows, work_order_from_row).len(), 2);
    }
}
