use crate::services::breakdown::TIMESTAMP_FORMAT;
use chrono::NaiveDateTime;
use plm_core::config::BackendSettings;
use plm_core::PlmError;
use serde::Deserialize;
use std::path::PathBuf;
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct Settings {
    #[serde(default)]
    #[validate(nested)]
    pub backend: BackendSettings,
    #[serde(default)]
    #[validate(nested)]
    pub workflow: WorkflowSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Properties file holding `login_name`, `group_name` and `password`.
    #[serde(default = "default_properties_path")]
    pub properties_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct WorkflowSettings {
    /// EDM repository holding the projects.
    #[serde(default = "default_repository")]
    #[validate(length(min = 1))]
    pub repository: String,
    #[serde(default)]
    #[validate(nested)]
    pub search: SearchSettings,
    #[serde(default)]
    #[validate(nested)]
    pub sensor: SensorSettings,
}

fn default_repository() -> String {
    "TruePLMprojectsRep".to_string()
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            repository: default_repository(),
            search: SearchSettings::default(),
            sensor: SensorSettings::default(),
        }
    }
}

/// Property filter identifying the breakdown element that stores the sensor data.
#[derive(Debug, Deserialize, Clone, Validate)]
pub struct SearchSettings {
    #[serde(default = "default_property_name")]
    #[validate(length(min = 1))]
    pub property_name: String,
    #[serde(default = "default_property_value")]
    pub property_value: String,
    #[serde(default = "wildcard")]
    pub pattern: String,
    #[serde(default = "wildcard")]
    pub description: String,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1))]
    pub limit: u32,
}

// Both depend on the project being queried.
fn default_property_name() -> String {
    "urn:rdl:Bike:serial number".to_string()
}

fn default_property_value() -> String {
    "13483027".to_string()
}

fn wildcard() -> String {
    "*".to_string()
}

fn default_limit() -> u32 {
    10
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            property_name: default_property_name(),
            property_value: default_property_value(),
            pattern: wildcard(),
            description: wildcard(),
            limit: default_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct SensorSettings {
    /// Aggregated property holding the time series.
    #[serde(default = "default_property_uri")]
    #[validate(length(min = 1))]
    pub property_uri: String,
    /// Local time, `%Y/%m/%d %H:%M:%S`.
    #[serde(default = "default_from")]
    #[validate(custom(function = "validate_timestamp"))]
    pub from: String,
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u32,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1))]
    pub page_size: u32,
}

fn default_property_uri() -> String {
    "urn:rdl:Bike:point list".to_string()
}

fn default_from() -> String {
    "2020/04/27 00:00:00".to_string()
}

fn validate_timestamp(value: &str) -> Result<(), ValidationError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
        .map(|_| ())
        .map_err(|_| ValidationError::new("timestamp"))
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    3
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            property_uri: default_property_uri(),
            from: default_from(),
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            otlp_endpoint: None,
        }
    }
}

fn default_properties_path() -> PathBuf {
    PathBuf::from("./democli.properties")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: BackendSettings::default(),
            workflow: WorkflowSettings::default(),
            logging: LoggingSettings::default(),
            properties_path: default_properties_path(),
        }
    }
}

impl Settings {
    /// Build and validate settings from an already layered source.
    pub fn from_config(config: config::Config) -> Result<Self, PlmError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Load settings from `config/base.yaml` (optional) and `APP_*` environment variables.
pub fn get_configuration() -> Result<Settings, PlmError> {
    let base_path = std::env::current_dir()?;

    // Check if we're already in the democli directory or need to navigate to it
    let configuration_directory = if base_path.ends_with("democli") {
        base_path.join("config")
    } else {
        base_path.join("democli").join("config")
    };

    let config = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Settings::from_config(config)
}
