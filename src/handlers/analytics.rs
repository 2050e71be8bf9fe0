use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};

use crate::{
    errors::ServiceError,
    services::analytics::{
        AssetPerformance, CostMetrics, DashboardAnalytics, InventoryMetrics, KpiDashboard,
        ReportScope, TechnicianProductivity, WorkOrderMetrics,
    },
    ApiResponse, AppState,
};

/// Build the analytics Router scoped under `/api/v1/analytics`.
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard_analytics))
        .route("/kpis", get(get_kpi_dashboard))
        .route("/work-orders", get(get_work_order_metrics))
        .route("/assets", get(get_asset_performance))
        .route("/inventory", get(get_inventory_metrics))
        .route("/costs", get(get_cost_metrics))
        .route("/technicians", get(get_technician_productivity))
}

/// Overview dashboard
#[utoipa::path(
    get,
    path = "/api/v1/analytics/dashboard",
    params(ReportScope),
    responses(
        (status = 200, description = "Dashboard analytics retrieved successfully", body = ApiResponse<DashboardAnalytics>),
        (status = 400, description = "Invalid reporting window", body = crate::errors::ErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn get_dashboard_analytics(
    State(state): State<AppState>,
    Query(scope): Query<ReportScope>,
) -> Result<Json<ApiResponse<DashboardAnalytics>>, ServiceError> {
    let analytics = state.analytics.get_dashboard_analytics(&scope).await?;
    Ok(Json(ApiResponse::success(analytics)))
}

/// Headline maintenance KPIs
#[utoipa::path(
    get,
    path = "/api/v1/analytics/kpis",
    params(ReportScope),
    responses(
        (status = 200, description = "KPI dashboard retrieved successfully", body = ApiResponse<KpiDashboard>),
        (status = 400, description = "Invalid reporting window", body = crate::errors::ErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn get_kpi_dashboard(
    State(state): State<AppState>,
    Query(scope): Query<ReportScope>,
) -> Result<Json<ApiResponse<KpiDashboard>>, ServiceError> {
    let kpis = state.analytics.get_kpi_dashboard(&scope).await?;
    Ok(Json(ApiResponse::success(kpis)))
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/work-orders",
    params(ReportScope),
    responses(
        (status = 200, description = "Work order metrics retrieved successfully", body = ApiResponse<WorkOrderMetrics>),
        (status = 400, description = "Invalid reporting window", body = crate::errors::ErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn get_work_order_metrics(
    State(state): State<AppState>,
    Query(scope): Query<ReportScope>,
) -> Result<Json<ApiResponse<WorkOrderMetrics>>, ServiceError> {
    let metrics = state.analytics.get_work_order_metrics(&scope).await?;
    Ok(Json(ApiResponse::success(metrics)))
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/assets",
    params(ReportScope),
    responses(
        (status = 200, description = "Asset performance retrieved successfully", body = ApiResponse<AssetPerformance>),
        (status = 400, description = "Invalid reporting window", body = crate::errors::ErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn get_asset_performance(
    State(state): State<AppState>,
    Query(scope): Query<ReportScope>,
) -> Result<Json<ApiResponse<AssetPerformance>>, ServiceError> {
    let performance = state.analytics.get_asset_performance(&scope).await?;
    Ok(Json(ApiResponse::success(performance)))
}

/// Stock levels, alerts and value
#[utoipa::path(
    get,
    path = "/api/v1/analytics/inventory",
    params(ReportScope),
    responses(
        (status = 200, description = "Inventory metrics retrieved successfully", body = ApiResponse<InventoryMetrics>),
        (status = 400, description = "Invalid reporting window", body = crate::errors::ErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn get_inventory_metrics(
    State(state): State<AppState>,
    Query(scope): Query<ReportScope>,
) -> Result<Json<ApiResponse<InventoryMetrics>>, ServiceError> {
    let metrics = state.analytics.get_inventory_metrics(&scope).await?;
    Ok(Json(ApiResponse::success(metrics)))
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/costs",
    params(ReportScope),
    responses(
        (status = 200, description = "Cost metrics retrieved successfully", body = ApiResponse<CostMetrics>),
        (status = 400, description = "Invalid reporting window", body = crate::errors::ErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn get_cost_metrics(
    State(state): State<AppState>,
    Query(scope): Query<ReportScope>,
) -> Result<Json<ApiResponse<CostMetrics>>, ServiceError> {
    let costs = state.analytics.get_cost_metrics(&scope).await?;
    Ok(Json(ApiResponse::success(costs)))
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/technicians",
    params(ReportScope),
    responses(
        (status = 200, description = "Technician productivity retrieved successfully", body = ApiResponse<TechnicianProductivity>),
        (status = 400, description = "Invalid reporting window", body = crate::errors::ErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn get_technician_productivity(
    State(state): State<AppState>,
    Query(scope): Query<ReportScope>,
) -> Result<Json<ApiResponse<TechnicianProductivity>>, ServiceError> {
    let report = state.analytics.get_technician_productivity(&scope).await?;
    Ok(Json(ApiResponse::success(report)))
}
