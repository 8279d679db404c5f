use crate::config::OUTPUT_FORMATS;
use crate::core::ConfigProvider;
use crate::domain::model::{StatusMode, UserId};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use chrono::NaiveDate;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "immuntrack")]
#[command(about = "Compare a vaccination history against country entry requirements")]
pub struct CliConfig {
    #[arg(long, default_value = "./data")]
    pub data_dir: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long)]
    pub user_id: UserId,

    #[arg(long, default_value = "missing", help = "missing | percent")]
    pub mode: StatusMode,

    #[arg(long, help = "Evaluation date (YYYY-MM-DD), defaults to today")]
    pub today: Option<NaiveDate>,

    #[arg(long, help = "Fetch reference data from this JSON endpoint instead of CSV files")]
    pub endpoint: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, value_delimiter = ',', default_value = "csv,json")]
    pub output_formats: Vec<String>,

    #[arg(long, help = "Bundle all outputs into this ZIP file")]
    pub archive: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn user_id(&self) -> UserId {
        self.user_id
    }

    fn status_mode(&self) -> StatusMode {
        self.mode
    }

    fn today(&self) -> Option<NaiveDate> {
        self.today
    }

    fn reference_endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    fn request_timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn archive_name(&self) -> Option<&str> {
        self.archive.as_deref()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("data_dir", &self.data_dir)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_range("user_id", self.user_id, 1, UserId::MAX)?;

        if let Some(endpoint) = &self.endpoint {
            validation::validate_url("endpoint", endpoint)?;
        }

        for format in &self.output_formats {
            validation::validate_one_of("output_formats", format, &OUTPUT_FORMATS)?;
        }

        if let Some(archive) = &self.archive {
            validation::validate_non_empty_string("archive", archive)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_flags() {
        let config = CliConfig::parse_from([
            "immuntrack",
            "--user-id",
            "7",
            "--mode",
            "percent",
            "--today",
            "2025-01-01",
            "--output-formats",
            "csv,tsv",
        ]);

        assert_eq!(config.user_id(), 7);
        assert_eq!(config.status_mode(), StatusMode::Percent);
        assert_eq!(config.today(), NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(config.output_formats(), ["csv".to_string(), "tsv".to_string()]);
        assert_eq!(config.data_dir(), "./data");
        assert!(config.reference_endpoint().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_mode() {
        let result = CliConfig::try_parse_from(["immuntrack", "--user-id", "1", "--mode", "ratio"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_catches_bad_values() {
        let mut config = CliConfig::parse_from(["immuntrack", "--user-id", "1"]);
        config.output_formats = vec!["xml".to_string()];
        assert!(config.validate().is_err());

        let mut config = CliConfig::parse_from(["immuntrack", "--user-id", "0"]);
        assert!(config.validate().is_err());

        config.user_id = 3;
        config.endpoint = Some("ftp://reference.example".to_string());
        assert!(config.validate().is_err());
    }
}
