use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CMMS Analytics API",
        version = "0.1.0",
        description = r#"
# CMMS Analytics

Read-only dashboards over maintenance work orders, assets, inventory and technicians.

Every endpoint accepts an optional reporting window (`start_date`, `end_date`, RFC 3339) and an
`organization_id`. Sections whose data could not be loaded come back empty and are listed in
`degraded_sections`; the request itself still succeeds.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Analytics", description = "Maintenance KPI and dashboard endpoints")
    ),
    paths(
        crate::handlers::analytics::get_dashboard_analytics,
        crate::handlers::analytics::get_kpi_dashboard,
        crate::handlers::analytics::get_work_order_metrics,
        crate::handlers::analytics::get_asset_performance,
        crate::handlers::analytics::get_inventory_metrics,
        crate::handlers::analytics::get_cost_metrics,
        crate::handlers::analytics::get_technician_productivity,
    ),
    components(
        schemas(
            crate::services::analytics::ReportScope,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
