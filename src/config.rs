use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError, ValidationErrors};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";

/// Tunable constants used by the KPI calculators and dashboard composers.
///
/// Several of these stand in for figures that should eventually come from
/// historical data (quality factor, first-time-fix rate, turnover, cost split).
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_cost_split", skip_on_field_errors = false))]
pub struct AnalyticsConfig {
    /// OEE quality factor (0.0 - 1.0)
    #[serde(default = "default_oee_quality_factor")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub oee_quality_factor: f64,

    /// First-time-fix rate reported while rework is not tracked (percent)
    #[serde(default = "default_first_time_fix_rate")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub first_time_fix_rate: f64,

    /// Inventory turnover multiplier applied to total stock value
    #[serde(default = "default_inventory_turnover_factor")]
    #[validate(range(min = 0.0))]
    pub inventory_turnover_factor: f64,

    /// Work orders a technician is expected to close per month
    #[serde(default = "default_technician_monthly_capacity")]
    #[validate(range(min = 1.0))]
    pub technician_monthly_capacity: f64,

    #[serde(default = "default_labor_ratio")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub labor_ratio: f64,

    #[serde(default = "default_parts_ratio")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub parts_ratio: f64,

    #[serde(default = "default_other_ratio")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub other_ratio: f64,

    /// Length of every ranked list; dashboards never list more than ten entries
    #[serde(default = "default_top_n")]
    #[validate(range(min = 1, max = 10))]
    pub top_n: usize,

    /// Daily trend window (days)
    #[serde(default = "default_trend_days")]
    #[validate(range(min = 1, max = 365))]
    pub trend_days: u32,

    /// Trailing window for PM compliance (days)
    #[serde(default = "default_pm_window_days")]
    #[validate(range(min = 1, max = 365))]
    pub pm_window_days: u32,

    /// Reliability score lost per corrective work order
    #[serde(default = "default_failure_penalty")]
    pub failure_penalty: f64,

    /// Hours in the reliability reference period
    #[serde(default = "default_hours_per_month")]
    pub hours_per_month: f64,

    /// Warranties expiring within this many days are flagged
    #[serde(default = "default_warranty_horizon_days")]
    pub warranty_horizon_days: u32,

    /// Per-branch timeout for dashboard fan-out (milliseconds)
    #[serde(default = "default_branch_timeout_ms")]
    #[validate(range(min = 1))]
    pub branch_timeout_ms: u64,

    /// Optional monthly budgets for budget-vs-actual reporting
    #[serde(default)]
    pub labor_budget: Option<f64>,
    #[serde(default)]
    pub parts_budget: Option<f64>,
    #[serde(default)]
    pub contractors_budget: Option<f64>,
    #[serde(default)]
    pub misc_budget: Option<f64>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            oee_quality_factor: default_oee_quality_factor(),
            first_time_fix_rate: default_first_time_fix_rate(),
            inventory_turnover_factor: default_inventory_turnover_factor(),
            technician_monthly_capacity: default_technician_monthly_capacity(),
            labor_ratio: default_labor_ratio(),
            parts_ratio: default_parts_ratio(),
            other_ratio: default_other_ratio(),
            top_n: default_top_n(),
            trend_days: default_trend_days(),
            pm_window_days: default_pm_window_days(),
            failure_penalty: default_failure_penalty(),
            hours_per_month: default_hours_per_month(),
            warranty_horizon_days: default_warranty_horizon_days(),
            branch_timeout_ms: default_branch_timeout_ms(),
            labor_budget: None,
            parts_budget: None,
            contractors_budget: None,
            misc_budget: None,
        }
    }
}

impl AnalyticsConfig {
    pub fn branch_timeout(&self) -> Duration {
        Duration::from_millis(self.branch_timeout_ms)
    }
}

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,

    /// Server host address
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// DB pool: max connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    #[serde(default)]
    #[validate]
    pub analytics: AnalyticsConfig,
}

impl AppConfig {
    pub fn new(database_url: String, host: String, port: u16, environment: String) -> Self {
        Self {
            database_url,
            host,
            port,
            environment,
            log_level: default_log_level(),
            log_json: false,
            db_max_connections: default_db_max_connections(),
            analytics: AnalyticsConfig::default(),
        }
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Checks if running in production environment
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_db_max_connections() -> u32 {
    16
}

fn default_oee_quality_factor() -> f64 {
    0.95
}

fn default_first_time_fix_rate() -> f64 {
    100.0
}

fn default_inventory_turnover_factor() -> f64 {
    4.0
}

fn default_technician_monthly_capacity() -> f64 {
    40.0
}

fn default_labor_ratio() -> f64 {
    0.45
}

fn default_parts_ratio() -> f64 {
    0.40
}

fn default_other_ratio() -> f64 {
    0.15
}

fn default_top_n() -> usize {
    10
}

fn default_trend_days() -> u32 {
    30
}

fn default_pm_window_days() -> u32 {
    30
}

fn default_failure_penalty() -> f64 {
    5.0
}

fn default_hours_per_month() -> f64 {
    720.0 // 30 days
}

fn default_warranty_horizon_days() -> u32 {
    30
}

fn default_branch_timeout_ms() -> u64 {
    5_000
}

/// Validates log level values
fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

fn validate_cost_split(cfg: &AnalyticsConfig) -> Result<(), ValidationError> {
    let total = cfg.labor_ratio + cfg.parts_ratio + cfg.other_ratio;
    if (total - 1.0).abs() > 1e-6 {
        let mut err = ValidationError::new("cost_split");
        err.message = Some("labor_ratio + parts_ratio + other_ratio must equal 1.0".into());
        return Err(err);
    }
    Ok(())
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("cmms_analytics={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .json()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .try_init();
    }
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (config/default.toml)
/// 3. Environment-specific config (config/{env}.toml)
/// 4. Environment variables (APP__*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    load_config_from(CONFIG_DIR)
}

pub fn load_config_from(config_dir: &str) -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(config_dir).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            config_dir
        );
    }

    let config = Config::builder()
        .set_default("database_url", "sqlite://cmms.db?mode=rwc")?
        .set_default("host", "0.0.0.0")?
        .set_default("port", DEFAULT_PORT as i64)?
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
        .add_source(File::with_name(&format!("{}/{}", config_dir, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn analytics_defaults_match_documented_constants() {
        let cfg = AnalyticsConfig::default();
        assert_eq!(cfg.oee_quality_factor, 0.95);
        assert_eq!(cfg.first_time_fix_rate, 100.0);
        assert_eq!(cfg.inventory_turnover_factor, 4.0);
        assert_eq!(cfg.technician_monthly_capacity, 40.0);
        assert_eq!(cfg.top_n, 10);
        assert_eq!(cfg.trend_days, 30);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn cost_split_must_sum_to_one() {
        let cfg = AnalyticsConfig {
            labor_ratio: 0.5,
            ..Default::default()
        };
        let errors = cfg.validate().unwrap_err();
        assert!(errors.errors().contains_key("__all__"));
    }

    #[test]
    fn ranked_lists_are_capped_at_ten() {
        let cfg = AnalyticsConfig {
            top_n: 25,
            ..Default::default()
        };
        let errors = cfg.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("top_n"));

        let mut app = AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            8080,
            "test".into(),
        );
        app.analytics.top_n = 11;
        assert!(app.validate().is_err());
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            8080,
            "test".into(),
        );
        assert!(cfg.validate().is_ok());
        cfg.log_level = "verbose".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn loads_analytics_overrides_from_file() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join("default.toml")).unwrap();
        writeln!(
            file,
            r#"
            database_url = "sqlite::memory:"
            [analytics]
            top_n = 5
            technician_monthly_capacity = 20.0
            labor_budget = 1500.0
            "#
        )
        .unwrap();

        let cfg = load_config_from(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.database_url, "sqlite::memory:");
        assert_eq!(cfg.analytics.top_n, 5);
        assert_eq!(cfg.analytics.technician_monthly_capacity, 20.0);
        assert_eq!(cfg.analytics.labor_budget, Some(1500.0));
        assert_eq!(cfg.analytics.oee_quality_factor, 0.95);
    }
}
