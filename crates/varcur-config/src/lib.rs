pub mod config;
pub mod error;
pub mod loader;

pub use config::{
    AcmgCodes, AcmgConfig, AppConfig, ClassificationConfig, ClassificationOption,
    FrequencyConfig, FrequencyThresholds,
};
pub use error::ConfigError;
pub use loader::{
    default_config, load_config, load_config_or_default, parse_json, parse_toml, validate_config,
};
