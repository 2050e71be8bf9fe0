use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status, priority and type are stored as free text and parsed on load.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Option<Uuid>,
    pub title: String,
    pub status: String,
    pub priority: String,
    pub work_order_type: String,
    pub scheduled_date: Option<DateTimeUtc>,
    pub due_date: Option<DateTimeUtc>,
    pub actual_start: Option<DateTimeUtc>,
    pub actual_end: Option<DateTimeUtc>,
    pub assigned_to_id: Option<Uuid>,
    pub asset_id: Option<Uuid>,
    pub actual_cost: Option<f64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assets::Entity",
        from = "Column::AssetId",
        to = "super::assets::Column::Id"
    )]
    Asset,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AssignedToId",
        to = "super::users::Column::Id"
    )]
    AssignedTo,
}

impl ActiveModelBehavior for ActiveModel {}
