pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::LocalStorage;
pub use app::pipelines::StatusPipeline;
pub use crate::core::{
    build_profile, country_missing_count, country_percent_satisfied, engine::ReportEngine,
    is_satisfied,
};
pub use domain::model::{
    CountryStatus, IllnessEntry, IllnessProfile, RequirementRule, StatusMode, VaccinationRecord,
};
pub use utils::error::{Result, TrackerError};
