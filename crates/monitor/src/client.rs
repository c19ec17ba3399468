//! HTTP client for the batch prediction service.
//!
//! Wraps `POST /predict_batch` using [`reqwest`]. Every failure mode is
//! reported as a [`PredictionApiError`]; deciding what to do about it is
//! the poll loop's job.

use std::time::Duration;

use rulwatch_core::machine::{MachineRecord, PredictBatchRequest, PredictBatchResponse};

/// Errors from the prediction API layer.
#[derive(Debug, thiserror::Error)]
pub enum PredictionApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Prediction API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The service answered 2xx but the body does not match the expected shape.
    #[error("Malformed prediction response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// HTTP client bound to a single prediction endpoint.
#[derive(Debug, Clone)]
pub struct PredictionApi {
    client: reqwest::Client,
    predict_url: String,
}

impl PredictionApi {
    /// Create a client for `predict_url` with a transport-level timeout.
    pub fn new(predict_url: String, timeout: Duration) -> Result<Self, PredictionApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            predict_url,
        })
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    /// Send the full fleet and return the service's predictions.
    pub async fn predict_batch(
        &self,
        machines: &[MachineRecord],
    ) -> Result<PredictBatchResponse, PredictionApiError> {
        let response = self
            .client
            .post(&self.predict_url)
            .json(&PredictBatchRequest { machines })
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Return the response unchanged on success, or an
    /// [`PredictionApiError::ApiError`] with the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, PredictionApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(PredictionApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}
