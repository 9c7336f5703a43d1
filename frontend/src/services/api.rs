use async_trait::async_trait;
use gloo::net::http::Request;
use shared::{InsertResponseResult, RecordStore, ResponseRecord, SurveyError};

/// API client for the response record store
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// Create a new API client with the default base URL
    pub fn new() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
        }
    }

    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: String) -> Self {
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Store a single survey response
    pub async fn create_response(&self, record: &ResponseRecord) -> Result<InsertResponseResult, SurveyError> {
        let url = format!("{}/api/responses", self.base_url);

        let request = Request::post(&url)
            .json(record)
            .map_err(|e| SurveyError::InsertFailed(format!("Failed to serialize request: {}", e)))?;

        match request.send().await {
            Ok(response) => {
                if response.ok() {
                    response
                        .json::<InsertResponseResult>()
                        .await
                        .map_err(|e| SurveyError::InsertFailed(format!("Failed to parse response: {}", e)))
                } else {
                    let status = response.status();
                    let error_text = response.text().await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    Err(SurveyError::InsertRejected(format!("Server error {}: {}", status, error_text)))
                }
            }
            Err(e) => Err(SurveyError::InsertFailed(format!("Network error: {}", e))),
        }
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl RecordStore for ApiClient {
    async fn insert_response(&self, record: &ResponseRecord) -> Result<(), SurveyError> {
        self.create_response(record).await.map(|_| ())
    }
}
