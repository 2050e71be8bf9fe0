//! Pure builders for each dashboard panel. The service fetches records and
//! hands them here; nothing in this module performs I/O or reads the clock.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::aggregation::{count_by_enum, count_by_label, sum_by_enum, sum_by_label};
use super::buckets::{count_per_bucket, sum_per_bucket, trailing_days, trailing_months};
use super::dto::*;
use super::kpi::{self, CostSplit};
use super::ranking::top_n;
use super::{average, percent, round2};
use crate::config::AnalyticsConfig;
use crate::models::{
    asset_type_category, Asset, InventoryItem, User, WorkOrder, UNKNOWN_LABEL,
};

const UNCLASSIFIED_ROLE: &str = "Unclassified";

pub fn work_order_stats(work_orders: &[WorkOrder], now: DateTime<Utc>) -> WorkOrderStats {
    WorkOrderStats {
        total: work_orders.len() as u64,
        open: work_orders.iter().filter(|wo| !wo.is_resolved()).count() as u64,
        completed: work_orders.iter().filter(|wo| wo.is_completed()).count() as u64,
        overdue: work_orders.iter().filter(|wo| wo.is_overdue(now)).count() as u64,
        by_status: count_by_enum(work_orders, |wo| wo.status),
        by_priority: count_by_enum(work_orders, |wo| wo.priority),
        by_type: count_by_enum(work_orders, |wo| wo.work_order_type),
        avg_completion_hours: average(work_orders.iter().filter_map(WorkOrder::resolution_hours)),
    }
}

pub fn asset_stats(assets: &[Asset], now: DateTime<Utc>, warranty_horizon_days: u32) -> AssetStats {
    let horizon = now + Duration::days(warranty_horizon_days as i64);
    AssetStats {
        total: assets.len() as u64,
        active: assets.iter().filter(|a| a.is_active()).count() as u64,
        under_maintenance: assets
            .iter()
            .filter(|a| a.status == crate::models::AssetStatus::UnderMaintenance)
            .count() as u64,
        warranty_expiring_soon: assets
            .iter()
            .filter(|a| a.warranty_expiry.is_some_and(|exp| exp >= now && exp <= horizon))
            .count() as u64,
        by_status: count_by_enum(assets, |a| a.status),
        by_type: count_by_label(assets, Asset::category),
    }
}

fn inventory_category(item: &InventoryItem) -> String {
    asset_type_category(item.category.as_deref())
}

pub fn inventory_stats(items: &[InventoryItem]) -> InventoryStats {
    InventoryStats {
        total_items: items.len() as u64,
        total_value: round2(items.iter().map(InventoryItem::value).sum()),
        low_stock: items.iter().filter(|i| i.is_low_stock()).count() as u64,
        out_of_stock: items.iter().filter(|i| i.is_out_of_stock()).count() as u64,
        by_category: count_by_label(items, inventory_category),
        by_status: count_by_enum(items, |i| i.status),
    }
}

fn role_label(user: &User) -> String {
    match user.role_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => UNCLASSIFIED_ROLE.to_string(),
    }
}

pub fn user_stats(users: &[User]) -> UserStats {
    UserStats {
        total: users.len() as u64,
        active: users
            .iter()
            .filter(|u| u.status == crate::models::UserStatus::Active)
            .count() as u64,
        pending_invitations: users.iter().filter(|u| u.has_pending_invitation()).count() as u64,
        by_status: count_by_enum(users, |u| u.status),
        by_role: count_by_label(users, role_label),
    }
}

/// Most recently updated work orders first.
pub fn recent_activity(work_orders: Vec<WorkOrder>, limit: usize) -> Vec<ActivityItem> {
    top_n(
        work_orders,
        limit,
        |wo| wo.updated_at.timestamp_millis() as f64,
        |wo| wo.id,
    )
    .into_iter()
    .map(|wo| ActivityItem {
        work_order_id: wo.id,
        title: wo.title,
        status: wo.status,
        priority: wo.priority,
        updated_at: wo.updated_at,
    })
    .collect()
}

/// Created and completed counts per day over the trailing `days`.
pub fn daily_trend(work_orders: &[WorkOrder], now: DateTime<Utc>, days: u32) -> Vec<TrendPoint> {
    let buckets = trailing_days(now, days);
    let created = count_per_bucket(&buckets, work_orders, |wo| Some(wo.created_at));
    let completed = count_per_bucket(&buckets, work_orders, WorkOrder::completed_at);

    buckets
        .iter()
        .zip(created)
        .zip(completed)
        .map(|((bucket, created), completed)| TrendPoint {
            date: bucket.day_key(),
            created,
            completed,
        })
        .collect()
}

pub fn work_order_metrics(
    work_orders: &[WorkOrder],
    now: DateTime<Utc>,
    cfg: &AnalyticsConfig,
) -> WorkOrderMetrics {
    let stats = work_order_stats(work_orders, now);
    let completion_rate = if work_orders.is_empty() {
        0
    } else {
        percent(stats.completed as usize, work_orders.len())
    };

    let costed: Vec<&WorkOrder> = work_orders.iter().filter(|wo| wo.actual_cost.is_some()).collect();
    let highest_cost = top_n(costed, cfg.top_n, |wo| wo.cost(), |wo| wo.id)
        .into_iter()
        .map(|wo| CostlyWorkOrder {
            work_order_id: wo.id,
            title: wo.title.clone(),
            asset_id: wo.asset_id,
            cost: round2(wo.cost()),
        })
        .collect();

    WorkOrderMetrics {
        total: stats.total,
        open: stats.open,
        completed: stats.completed,
        overdue: stats.overdue,
        completion_rate,
        sla_compliance: kpi::sla_compliance(work_orders),
        avg_resolution_hours: stats.avg_completion_hours,
        by_status: stats.by_status,
        by_priority: stats.by_priority,
        by_type: stats.by_type,
        trend: daily_trend(work_orders, now, cfg.trend_days),
        highest_cost,
        degraded_sections: Vec::new(),
        generated_at: now,
    }
}

pub fn asset_performance(
    assets: &[Asset],
    work_orders: &[WorkOrder],
    now: DateTime<Utc>,
    cfg: &AnalyticsConfig,
) -> AssetPerformance {
    let mut by_asset: HashMap<Uuid, Vec<&WorkOrder>> = HashMap::new();
    for wo in work_orders {
        if let Some(asset_id) = wo.asset_id {
            by_asset.entry(asset_id).or_default().push(wo);
        }
    }

    let rows: Vec<AssetReliability> = assets
        .iter()
        .map(|asset| {
            let history = by_asset.get(&asset.id).map(Vec::as_slice).unwrap_or_default();
            let failures = history.iter().filter(|wo| wo.is_corrective()).count() as u64;
            let reliability = kpi::asset_reliability(failures, cfg);
            AssetReliability {
                asset_id: asset.id,
                name: asset.name.clone(),
                category: asset.category(),
                status: asset.status,
                failures,
                reliability_score: reliability.score,
                mtbf_proxy_hours: reliability.mtbf_proxy_hours,
                downtime_hours: round2(history.iter().map(|wo| wo.downtime_hours()).sum()),
                total_cost: round2(history.iter().map(|wo| wo.cost()).sum()),
                utilization_rate: None,
            }
        })
        .collect();

    let category_of: HashMap<Uuid, String> =
        assets.iter().map(|a| (a.id, a.category())).collect();
    let failed: Vec<&WorkOrder> = work_orders.iter().filter(|wo| wo.is_corrective()).collect();
    let categories = count_by_label(&failed, |wo| {
        wo.asset_id
            .and_then(|id| category_of.get(&id).cloned())
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
    });
    let failure_categories = top_n(
        categories
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect(),
        cfg.top_n,
        |c| c.count as f64,
        |c| c.category.clone(),
    );

    AssetPerformance {
        top_failures: top_n(rows.clone(), cfg.top_n, |r| r.failures as f64, |r| r.asset_id),
        top_downtime: top_n(rows.clone(), cfg.top_n, |r| r.downtime_hours, |r| r.asset_id),
        average_reliability: average(rows.iter().map(|r| r.reliability_score)),
        availability: kpi::asset_availability(assets),
        assets: rows,
        failure_categories,
        degraded_sections: Vec::new(),
        generated_at: now,
    }
}

fn stock_alerts<'a>(items: impl Iterator<Item = &'a InventoryItem>, limit: usize) -> Vec<StockAlert> {
    let alerts: Vec<StockAlert> = items
        .map(|item| StockAlert {
            item_id: item.id,
            name: item.name.clone(),
            quantity: item.quantity,
            min_quantity: item.min_quantity,
            shortfall: (item.min_quantity - item.quantity).max(0),
        })
        .collect();
    top_n(alerts, limit, |a| a.shortfall as f64, |a| a.item_id)
}

pub fn inventory_metrics(
    items: &[InventoryItem],
    now: DateTime<Utc>,
    cfg: &AnalyticsConfig,
) -> InventoryMetrics {
    let stats = inventory_stats(items);
    InventoryMetrics {
        total_items: stats.total_items,
        total_value: stats.total_value,
        low_stock_count: stats.low_stock,
        out_of_stock_count: stats.out_of_stock,
        overstock_count: items.iter().filter(|i| i.is_overstocked()).count() as u64,
        by_category: stats.by_category,
        value_by_category: sum_by_label(items, inventory_category, InventoryItem::value),
        by_status: stats.by_status,
        low_stock_items: stock_alerts(items.iter().filter(|i| i.is_low_stock()), cfg.top_n),
        out_of_stock_items: stock_alerts(items.iter().filter(|i| i.is_out_of_stock()), cfg.top_n),
        turnover: kpi::inventory_turnover(items, cfg.inventory_turnover_factor),
        degraded_sections: Vec::new(),
        generated_at: now,
    }
}

fn budget_line(category: &str, actual: f64, budgeted: Option<f64>) -> BudgetLine {
    BudgetLine {
        category: category.to_string(),
        budgeted,
        actual,
        variance: budgeted.map(|b| round2(b - actual)),
    }
}

pub fn budget_vs_actual(split: &CostSplit, cfg: &AnalyticsConfig) -> Vec<BudgetLine> {
    vec![
        budget_line("labor", split.labor, cfg.labor_budget),
        budget_line("parts", split.parts, cfg.parts_budget),
        budget_line("contractors", split.contractors, cfg.contractors_budget),
        budget_line("misc", split.misc, cfg.misc_budget),
    ]
}

pub fn cost_metrics(
    work_orders: &[WorkOrder],
    assets: &[Asset],
    now: DateTime<Utc>,
    cfg: &AnalyticsConfig,
) -> CostMetrics {
    let completed: Vec<&WorkOrder> = work_orders.iter().filter(|wo| wo.is_completed()).collect();
    let total_cost = round2(completed.iter().map(|wo| wo.cost()).sum());
    let average_cost = if completed.is_empty() {
        None
    } else {
        Some(round2(total_cost / completed.len() as f64))
    };
    let split = kpi::cost_split(total_cost, cfg);

    let months = trailing_months(now, 12);
    let monthly = months
        .iter()
        .zip(sum_per_bucket(&months, &completed, |wo| wo.completed_at(), |wo| wo.cost()))
        .map(|(bucket, cost)| MonthlyCost {
            month: bucket.month_key(),
            cost: round2(cost),
        })
        .collect();

    let name_of: HashMap<Uuid, &str> = assets.iter().map(|a| (a.id, a.name.as_str())).collect();
    let mut cost_by_asset: HashMap<Uuid, f64> = HashMap::new();
    for wo in &completed {
        if let Some(asset_id) = wo.asset_id {
            *cost_by_asset.entry(asset_id).or_insert(0.0) += wo.cost();
        }
    }
    let asset_costs: Vec<AssetCost> = cost_by_asset
        .into_iter()
        .map(|(asset_id, cost)| AssetCost {
            asset_id,
            name: name_of.get(&asset_id).unwrap_or(&UNKNOWN_LABEL).to_string(),
            cost: round2(cost),
        })
        .collect();

    CostMetrics {
        total_cost,
        average_cost,
        split,
        monthly,
        by_type: sum_by_enum(&completed, |wo| wo.work_order_type, |wo| wo.cost()),
        top_assets: top_n(asset_costs, cfg.top_n, |c| c.cost, |c| c.asset_id),
        budget: budget_vs_actual(&split, cfg),
        degraded_sections: Vec::new(),
        generated_at: now,
    }
}

pub fn technician_productivity(
    users: &[User],
    work_orders: &[WorkOrder],
    now: DateTime<Utc>,
    cfg: &AnalyticsConfig,
) -> TechnicianProductivity {
    let mut by_assignee: HashMap<Uuid, Vec<&WorkOrder>> = HashMap::new();
    for wo in work_orders {
        if let Some(user_id) = wo.assigned_to_id {
            by_assignee.entry(user_id).or_default().push(wo);
        }
    }

    let stats: Vec<TechnicianStats> = users
        .iter()
        .filter(|u| u.is_active_technician())
        .map(|tech| {
            let assigned = by_assignee.get(&tech.id).map(Vec::as_slice).unwrap_or_default();
            let completed = assigned.iter().filter(|wo| wo.is_completed()).count();
            TechnicianStats {
                user_id: tech.id,
                name: tech.name.clone(),
                assigned: assigned.len() as u64,
                completed: completed as u64,
                completion_rate: if assigned.is_empty() {
                    0
                } else {
                    percent(completed, assigned.len())
                },
                avg_resolution_hours: average(assigned.iter().filter_map(|wo| wo.resolution_hours())),
            }
        })
        .collect();

    TechnicianProductivity {
        technician_count: stats.len() as u64,
        total_assigned: stats.iter().map(|s| s.assigned).sum(),
        utilization: kpi::technician_utilization(users, work_orders, cfg.technician_monthly_capacity),
        technicians: top_n(stats, cfg.top_n, |s| s.completed as f64, |s| s.user_id),
        degraded_sections: Vec::new(),
        generated_at: now,
    }
}
