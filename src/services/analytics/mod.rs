//! CMMS analytics: KPI formulas, breakdowns and dashboard composition over
//! work orders, assets, inventory and users.

pub mod aggregation;
pub mod buckets;
pub mod dto;
pub mod fallback;
pub mod kpi;
pub mod panels;
pub mod ranking;
pub mod source;

use std::sync::Arc;

use tracing::{info, instrument};

pub use dto::*;
pub use source::{InMemoryRecordSource, RecordSource, ReportScope};

use self::fallback::{degraded_names, isolate};
use crate::{
    clock::{Clock, SystemClock},
    config::AnalyticsConfig,
    errors::ServiceError,
    models::WorkOrder,
};

/// Rounds a monetary or fractional figure to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds an hour figure to the nearest whole hour.
pub fn round_hours(hours: f64) -> i64 {
    hours.round() as i64
}

/// `numerator / denominator` as a whole percentage. Callers guard against a zero denominator.
pub(crate) fn percent(numerator: usize, denominator: usize) -> i64 {
    (numerator as f64 / denominator as f64 * 100.0).round() as i64
}

/// Mean rounded to two decimals; `None` for an empty input.
pub(crate) fn average(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| round2(sum / count as f64))
}

/// Analytics service for CMMS dashboards
#[derive(Clone)]
pub struct AnalyticsService {
    source: Arc<dyn RecordSource>,
    clock: Arc<dyn Clock>,
    config: AnalyticsConfig,
}

impl AnalyticsService {
    pub fn new(source: Arc<dyn RecordSource>, config: AnalyticsConfig) -> Self {
        Self {
            source,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    async fn windowed_work_orders(&self, scope: &ReportScope) -> Result<Vec<WorkOrder>, ServiceError> {
        let work_orders = self.source.work_orders(scope).await?;
        Ok(scope.work_orders_in_window(work_orders))
    }

    /// Overview dashboard: counts and breakdowns per record kind, recent
    /// activity and a daily trend. Each panel degrades independently.
    #[instrument(skip(self))]
    pub async fn get_dashboard_analytics(
        &self,
        scope: &ReportScope,
    ) -> Result<DashboardAnalytics, ServiceError> {
        scope.validate()?;
        info!("Generating dashboard analytics");
        metrics::counter!("analytics.dashboard.requests", 1, "dashboard" => "overview");

        let now = self.clock.now();
        let timeout = self.config.branch_timeout();
        let cfg = &self.config;

        let (work_orders, assets, inventory, users, recent_activity, trends) = tokio::join!(
            isolate("work_orders", timeout, async {
                let wos = self.windowed_work_orders(scope).await?;
                Ok::<_, ServiceError>(panels::work_order_stats(&wos, now))
            }),
            isolate("assets", timeout, async {
                let assets = self.source.assets(scope).await?;
                Ok::<_, ServiceError>(panels::asset_stats(&assets, now, cfg.warranty_horizon_days))
            }),
            isolate("inventory", timeout, async {
                let items = self.source.inventory_items(scope).await?;
                Ok::<_, ServiceError>(panels::inventory_stats(&items))
            }),
            isolate("users", timeout, async {
                let users = self.source.users(scope).await?;
                Ok::<_, ServiceError>(panels::user_stats(&users))
            }),
            isolate("recent_activity", timeout, async {
                let wos = self.windowed_work_orders(scope).await?;
                Ok::<_, ServiceError>(panels::recent_activity(wos, cfg.top_n))
            }),
            // the trend has its own trailing window, so only the organization filter applies
            isolate("trends", timeout, async {
                let wos = self.source.work_orders(scope).await?;
                Ok::<_, ServiceError>(panels::daily_trend(&wos, now, cfg.trend_days))
            }),
        );

        let degraded_sections = degraded_names(&[
            ("work_orders", work_orders.degraded),
            ("assets", assets.degraded),
            ("inventory", inventory.degraded),
            ("users", users.degraded),
            ("recent_activity", recent_activity.degraded),
            ("trends", trends.degraded),
        ]);

        Ok(DashboardAnalytics {
            work_orders: work_orders.value,
            assets: assets.value,
            inventory: inventory.value,
            users: users.value,
            recent_activity: recent_activity.value,
            trends: if trends.degraded {
                panels::daily_trend(&[], now, cfg.trend_days)
            } else {
                trends.value
            },
            degraded_sections,
            generated_at: now,
        })
    }

    /// Headline maintenance KPIs.
    #[instrument(skip(self))]
    pub async fn get_kpi_dashboard(&self, scope: &ReportScope) -> Result<KpiDashboard, ServiceError> {
        scope.validate()?;
        info!("Generating KPI dashboard");
        metrics::counter!("analytics.dashboard.requests", 1, "dashboard" => "kpis");

        let now = self.clock.now();
        let timeout = self.config.branch_timeout();
        let cfg = &self.config;

        let (work_orders, assets, inventory, users) = tokio::join!(
            isolate("work_orders", timeout, self.windowed_work_orders(scope)),
            isolate("assets", timeout, self.source.assets(scope)),
            isolate("inventory", timeout, self.source.inventory_items(scope)),
            isolate("users", timeout, self.source.users(scope)),
        );

        let wos = &work_orders.value;
        Ok(KpiDashboard {
            mtbf_hours: kpi::mtbf_hours(wos),
            mttr_hours: kpi::mttr_hours(wos),
            oee_percent: kpi::oee_percent(&assets.value, wos, cfg.oee_quality_factor),
            pm_compliance: kpi::pm_compliance(wos, now, cfg.pm_window_days),
            first_time_fix_rate: kpi::first_time_fix_rate(wos, cfg.first_time_fix_rate),
            technician_utilization: kpi::technician_utilization(
                &users.value,
                wos,
                cfg.technician_monthly_capacity,
            ),
            inventory_turnover: kpi::inventory_turnover(&inventory.value, cfg.inventory_turnover_factor),
            backlog: wos.iter().filter(|wo| !wo.is_resolved()).count() as u64,
            asset_availability: kpi::asset_availability(&assets.value),
            degraded_sections: degraded_names(&[
                ("work_orders", work_orders.degraded),
                ("assets", assets.degraded),
                ("inventory", inventory.degraded),
                ("users", users.degraded),
            ]),
            generated_at: now,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_work_order_metrics(
        &self,
        scope: &ReportScope,
    ) -> Result<WorkOrderMetrics, ServiceError> {
        scope.validate()?;
        info!("Generating work order metrics");
        metrics::counter!("analytics.dashboard.requests", 1, "dashboard" => "work_orders");

        let now = self.clock.now();
        let work_orders = isolate(
            "work_orders",
            self.config.branch_timeout(),
            self.windowed_work_orders(scope),
        )
        .await;

        let mut metrics = panels::work_order_metrics(&work_orders.value, now, &self.config);
        metrics.degraded_sections = degraded_names(&[("work_orders", work_orders.degraded)]);
        Ok(metrics)
    }

    /// Per-asset reliability, downtime and cost, with top-N rankings.
    #[instrument(skip(self))]
    pub async fn get_asset_performance(
        &self,
        scope: &ReportScope,
    ) -> Result<AssetPerformance, ServiceError> {
        scope.validate()?;
        info!("Generating asset performance");
        metrics::counter!("analytics.dashboard.requests", 1, "dashboard" => "assets");

        let now = self.clock.now();
        let timeout = self.config.branch_timeout();
        let (assets, work_orders) = tokio::join!(
            isolate("assets", timeout, self.source.assets(scope)),
            isolate("work_orders", timeout, self.windowed_work_orders(scope)),
        );

        let mut performance =
            panels::asset_performance(&assets.value, &work_orders.value, now, &self.config);
        performance.degraded_sections = degraded_names(&[
            ("assets", assets.degraded),
            ("work_orders", work_orders.degraded),
        ]);
        Ok(performance)
    }

    #[instrument(skip(self))]
    pub async fn get_inventory_metrics(
        &self,
        scope: &ReportScope,
    ) -> Result<InventoryMetrics, ServiceError> {
        scope.validate()?;
        info!("Generating inventory metrics");
        metrics::counter!("analytics.dashboard.requests", 1, "dashboard" => "inventory");

        let now = self.clock.now();
        let items = isolate(
            "inventory",
            self.config.branch_timeout(),
            self.source.inventory_items(scope),
        )
        .await;

        let mut metrics = panels::inventory_metrics(&items.value, now, &self.config);
        metrics.degraded_sections = degraded_names(&[("inventory", items.degraded)]);
        Ok(metrics)
    }

    /// Maintenance spend over completed work orders: split, monthly trend and budget.
    #[instrument(skip(self))]
    pub async fn get_cost_metrics(&self, scope: &ReportScope) -> Result<CostMetrics, ServiceError> {
        scope.validate()?;
        info!("Generating cost metrics");
        metrics::counter!("analytics.dashboard.requests", 1, "dashboard" => "costs");

        let now = self.clock.now();
        let timeout = self.config.branch_timeout();
        let (work_orders, assets) = tokio::join!(
            isolate("work_orders", timeout, self.windowed_work_orders(scope)),
            isolate("assets", timeout, self.source.assets(scope)),
        );

        let mut costs = panels::cost_metrics(&work_orders.value, &assets.value, now, &self.config);
        costs.degraded_sections = degraded_names(&[
            ("work_orders", work_orders.degraded),
            ("assets", assets.degraded),
        ]);
        Ok(costs)
    }

    #[instrument(skip(self))]
    pub async fn get_technician_productivity(
        &self,
        scope: &ReportScope,
    ) -> Result<TechnicianProductivity, ServiceError> {
        scope.validate()?;
        info!("Generating technician productivity");
        metrics::counter!("analytics.dashboard.requests", 1, "dashboard" => "technicians");

        let now = self.clock.now();
        let timeout = self.config.branch_timeout();
        let (users, work_orders) = tokio::join!(
            isolate("users", timeout, self.source.users(scope)),
            isolate("work_orders", timeout, self.windowed_work_orders(scope)),
        );

        let mut report =
            panels::technician_productivity(&users.value, &work_orders.value, now, &self.config);
        report.degraded_sections = degraded_names(&[
            ("users", users.degraded),
            ("work_orders", work_orders.degraded),
        ]);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::{Asset, AssetStatus, WorkOrderStatus, WorkOrderType};
    use assert_matches::assert_matches;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn service(source: InMemoryRecordSource) -> AnalyticsService {
        AnalyticsService::new(Arc::new(source), AnalyticsConfig::default())
            .with_clock(Arc::new(FixedClock(now())))
    }

    #[test]
    fn rounding_helpers() {
        assert_eq!(round2(12.005 * 3.0), 36.02);
        assert_eq!(round2(1.0 / 3.0), 0.33);
        assert_eq!(round_hours(14.5), 15);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(average(std::iter::empty()), None);
        assert_eq!(average([1.0, 2.0].into_iter()), Some(1.5));
    }

    #[tokio::test]
    async fn inverted_scope_is_rejected_before_fetching() {
        let scope = ReportScope {
            start_date: Some(now()),
            end_date: Some(now() - Duration::days(1)),
            organization_id: None,
        };
        let svc = service(InMemoryRecordSource::new());
        assert_matches!(
            svc.get_kpi_dashboard(&scope).await,
            Err(ServiceError::ValidationError(_))
        );
        assert_matches!(
            svc.get_dashboard_analytics(&scope).await,
            Err(ServiceError::ValidationError(_))
        );
    }

    #[tokio::test]
    async fn empty_kpi_dashboard_reports_sentinels() {
        let kpis = service(InMemoryRecordSource::new())
            .get_kpi_dashboard(&ReportScope::default())
            .await
            .unwrap();

        assert_eq!(kpis.mtbf_hours, None);
        assert_eq!(kpis.mttr_hours, None);
        assert_eq!(kpis.oee_percent, None);
        assert_eq!(kpis.pm_compliance, 100);
        assert_eq!(kpis.first_time_fix_rate, 100);
        assert_eq!(kpis.technician_utilization, 0);
        assert_eq!(kpis.inventory_turnover, 0.0);
        assert_eq!(kpis.backlog, 0);
        assert!(kpis.degraded_sections.is_empty());
        assert_eq!(kpis.generated_at, now());
    }

    #[tokio::test]
    async fn date_window_limits_work_orders() {
        let recent = WorkOrder::new("recent", WorkOrderStatus::Open, WorkOrderType::Corrective, now() - Duration::days(2));
        let old = WorkOrder::new("old", WorkOrderStatus::Open, WorkOrderType::Corrective, now() - Duration::days(60));
        let svc = service(InMemoryRecordSource::new().with_work_orders(vec![recent, old]));

        let scope = ReportScope {
            start_date: Some(now() - Duration::days(7)),
            ..Default::default()
        };
        let metrics = svc.get_work_order_metrics(&scope).await.unwrap();
        assert_eq!(metrics.total, 1);

        let all = svc.get_work_order_metrics(&ReportScope::default()).await.unwrap();
        assert_eq!(all.total, 2);
    }

    #[tokio::test]
    async fn overview_trend_is_dense() {
        let svc = service(
            InMemoryRecordSource::new()
                .with_assets(vec![Asset::new("Pump", Some("Pumps"), AssetStatus::Active)])
                .with_work_orders(vec![WorkOrder::new(
                    "today",
                    WorkOrderStatus::Open,
                    WorkOrderType::Inspection,
                    now(),
                )]),
        );
        let overview = svc.get_dashboard_analytics(&ReportScope::default()).await.unwrap();

        assert_eq!(overview.trends.len(), 30);
        assert_eq!(overview.trends[29].created, 1);
        assert_eq!(overview.trends[29].date, "2024-06-30");
        assert_eq!(overview.assets.total, 1);
        assert_eq!(overview.recent_activity.len(), 1);
        assert!(overview.degraded_sections.is_empty());
    }
}
