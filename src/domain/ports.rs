use crate::domain::model::{EvaluationInput, StatusMode, StatusReport, UserId};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// 參考資料與接種紀錄 CSV 所在目錄
    fn data_dir(&self) -> &str;
    fn output_path(&self) -> &str;
    fn user_id(&self) -> UserId;
    fn status_mode(&self) -> StatusMode;
    /// 固定評估日期；`None` 時使用本地今天
    fn today(&self) -> Option<NaiveDate>;
    /// 設定時改由 HTTP 端點取得參考資料
    fn reference_endpoint(&self) -> Option<&str>;
    fn request_timeout_seconds(&self) -> Option<u64>;
    fn output_formats(&self) -> &[String];
    /// ZIP 檔名；`None` 表示不壓縮
    fn archive_name(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<EvaluationInput>;
    async fn transform(&self, input: EvaluationInput) -> Result<StatusReport>;
    async fn load(&self, report: StatusReport) -> Result<String>;
}
