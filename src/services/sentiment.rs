use crate::core::sentiment::{lexical_sentiment, SentimentBackend};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Wire request for the external sentiment service
#[derive(Debug, Serialize)]
struct SentimentRequest<'a> {
    comments: &'a [String],
}

/// Wire response from the external sentiment service
#[derive(Debug, Deserialize)]
struct SentimentResponse {
    #[serde(rename = "averageSentiment")]
    average_sentiment: f64,
}

/// Remote sentiment estimator with silent lexical fallback
///
/// Delegates comment scoring to an out-of-process sentiment service. Any
/// failure at all (transport error, timeout, non-2xx status, schema
/// mismatch, non-finite value) degrades to the lexical score for the same
/// input. Compatibility scoring never fails because enrichment did; the
/// fallback is logged, not surfaced. No retries, one fallback.
pub struct RemoteSentiment {
    endpoint: String,
    client: Client,
}

impl RemoteSentiment {
    pub fn new(endpoint: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { endpoint, client }
    }

    async fn call_service(&self, comments: &[String]) -> Result<f64, String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&SentimentRequest { comments })
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("sentiment service returned {}", response.status()));
        }

        let parsed: SentimentResponse = response.json().await.map_err(|e| e.to_string())?;

        if !parsed.average_sentiment.is_finite() {
            return Err("sentiment service returned a non-finite score".to_string());
        }

        Ok(parsed.average_sentiment.clamp(-1.0, 1.0))
    }
}

#[async_trait]
impl SentimentBackend for RemoteSentiment {
    async fn estimate(&self, comments: &[String]) -> f64 {
        if comments.is_empty() {
            return 0.0;
        }

        match self.call_service(comments).await {
            Ok(score) => score,
            Err(e) => {
                tracing::warn!("Sentiment service failed, using lexical fallback: {}", e);
                lexical_sentiment(comments)
            }
        }
    }
}
