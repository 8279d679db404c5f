use crate::adapters::csv_tables;
use crate::adapters::http::HttpReferenceSource;
use crate::core::profile::{build_profile, resolve_records};
use crate::core::report::{render_checks_json, render_status_table};
use crate::core::status::{country_statuses, requirement_checks};
use crate::core::{ConfigProvider, EvaluationInput, Pipeline, Result, Storage, StatusReport};
use chrono::{Local, NaiveDate};
use reqwest::Client;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const STATUS_CSV_FILE: &str = "country_status.csv";
pub const STATUS_TSV_FILE: &str = "country_status.tsv";
pub const CHECKS_JSON_FILE: &str = "requirements.json";

/// 讀取參考資料與使用者紀錄，輸出每國入境要求狀態
pub struct StatusPipeline<S: Storage, C: ConfigProvider> {
    source: S,
    sink: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> StatusPipeline<S, C> {
    /// `source` 提供輸入 CSV，`sink` 接收輸出檔案
    pub fn new(source: S, sink: S, config: C) -> Self {
        Self {
            source,
            sink,
            config,
            client: Client::new(),
        }
    }

    /// 評估日期：設定值優先，否則使用本地今天
    pub fn evaluation_date(&self) -> NaiveDate {
        self.config
            .today()
            .unwrap_or_else(|| Local::now().date_naive())
    }

    fn outputs(&self, report: &StatusReport) -> Result<Vec<(&'static str, Vec<u8>)>> {
        let mut files = Vec::new();
        for format in self.config.output_formats() {
            match format.as_str() {
                "csv" => files.push((STATUS_CSV_FILE, report.csv_output.as_bytes().to_vec())),
                "tsv" => files.push((STATUS_TSV_FILE, report.tsv_output.as_bytes().to_vec())),
                "json" => files.push((CHECKS_JSON_FILE, render_checks_json(&report.checks)?.into_bytes())),
                other => tracing::warn!("Skipping unsupported output format: {}", other),
            }
        }
        Ok(files)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for StatusPipeline<S, C> {
    async fn extract(&self) -> Result<EvaluationInput> {
        let reference = match self.config.reference_endpoint() {
            Some(endpoint) => {
                tracing::info!("🌐 Fetching reference data from: {}", endpoint);
                let mut source = HttpReferenceSource::new(self.client.clone(), endpoint);
                if let Some(timeout) = self.config.request_timeout_seconds() {
                    source = source.with_timeout(timeout);
                }
                source.fetch().await?
            }
            None => {
                tracing::info!("📂 Reading reference tables from: {}", self.config.data_dir());
                csv_tables::read_reference(&self.source).await?
            }
        };

        let vaccinations = csv_tables::read_vaccinations(&self.source, self.config.user_id()).await?;
        tracing::debug!(
            "User {} has {} recorded vaccinations",
            self.config.user_id(),
            vaccinations.len()
        );

        Ok(EvaluationInput {
            reference,
            vaccinations,
        })
    }

    async fn transform(&self, input: EvaluationInput) -> Result<StatusReport> {
        let today = self.evaluation_date();
        let mode = self.config.status_mode();
        tracing::info!("🔧 Evaluating requirements on {} ({} mode)", today, mode);

        let records = resolve_records(&input.vaccinations, &input.reference.vaccines);
        let profile = build_profile(&records);
        tracing::debug!("Illness profile covers {} illnesses", profile.len());

        let status = country_statuses(
            &input.reference.countries,
            &input.reference.requirements,
            &profile,
            today,
            mode,
        )?;
        let checks = requirement_checks(&input.reference, &profile, today)?;

        let csv_output = render_status_table(&status, &input.reference.countries, b',')?;
        let tsv_output = render_status_table(&status, &input.reference.countries, b'\t')?;

        let satisfied = checks.iter().filter(|c| c.satisfied).count();
        tracing::info!(
            "✅ {} of {} requirements satisfied",
            satisfied,
            checks.len()
        );

        Ok(StatusReport {
            status,
            checks,
            csv_output,
            tsv_output,
        })
    }

    async fn load(&self, report: StatusReport) -> Result<String> {
        let files = self.outputs(&report)?;

        if let Some(archive) = self.config.archive_name() {
            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, data) in &files {
                    zip.start_file::<_, ()>(*name, FileOptions::default())?;
                    zip.write_all(data)?;
                }
                let cursor = zip.finish()?;
                cursor.into_inner()
            };

            self.sink.write_file(archive, &zip_data).await?;
            let output_path = format!("{}/{}", self.config.output_path(), archive);
            tracing::info!("📦 Report archive saved: {}", output_path);
            return Ok(output_path);
        }

        for (name, data) in &files {
            self.sink.write_file(name, data).await?;
            tracing::debug!("Wrote {}", name);
        }

        Ok(self.config.output_path().to_string())
    }
}
