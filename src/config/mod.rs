#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

/// 支援的輸出格式
pub const OUTPUT_FORMATS: [&str; 3] = ["csv", "tsv", "json"];

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;
