use crate::domain::model::ReferenceData;
use crate::utils::error::{Result, TrackerError};
use reqwest::Client;
use std::time::Duration;

/// 從 HTTP 端點取得 JSON 格式的參考資料
#[derive(Debug, Clone)]
pub struct HttpReferenceSource {
    client: Client,
    endpoint: String,
    timeout: Option<Duration>,
}

impl HttpReferenceSource {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(Duration::from_secs(seconds));
        self
    }

    pub async fn fetch(&self) -> Result<ReferenceData> {
        let mut request = self.client.get(&self.endpoint);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        tracing::debug!("Making reference request to: {}", self.endpoint);
        let response = request.send().await?;
        tracing::debug!("Reference response status: {}", response.status());

        if !response.status().is_success() {
            return Err(TrackerError::ReferenceDataError {
                message: format!(
                    "{} answered with status {}",
                    self.endpoint,
                    response.status()
                ),
            });
        }

        let body = response.bytes().await?;
        let reference: ReferenceData = serde_json::from_slice(&body)?;

        tracing::info!(
            "🌍 Fetched {} countries, {} requirements from {}",
            reference.countries.len(),
            reference.requirements.len(),
            self.endpoint
        );
        Ok(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_fetch_reference_json() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/reference");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "countries": [{"id": 1, "iso_code": "THA", "name": "Thailand"}],
                    "illnesses": [{"id": 4, "name": "Yellow fever"}],
                    "requirements": [
                        {"country_id": 1, "illness_id": 4, "required_doses": 1, "validity_period_months": null}
                    ]
                }));
        });

        let source = HttpReferenceSource::new(Client::new(), server.url("/reference")).with_timeout(5);
        let reference = source.fetch().await.unwrap();

        api_mock.assert();
        assert_eq!(reference.countries[0].iso_code, "THA");
        assert!(reference.vaccines.is_empty());
        assert_eq!(reference.requirements[0].required_doses, Some(1));
    }

    #[tokio::test]
    async fn test_fetch_reports_http_failure() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/reference");
            then.status(503);
        });

        let source = HttpReferenceSource::new(Client::new(), server.url("/reference"));
        let err = source.fetch().await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, TrackerError::ReferenceDataError { .. }));
    }
}
