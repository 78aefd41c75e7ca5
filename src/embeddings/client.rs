//! OpenAI-compatible embeddings API client

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::retry::RetryPolicy;
use crate::config::EmbeddingsConfig;
use crate::RagChatError;
use crate::Result;

/// Client for generating embeddings through an OpenAI-compatible API
pub struct EmbeddingClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_input_chars: usize,
    retry: RetryPolicy,
}

impl EmbeddingClient {
    /// Create a new embedding client
    ///
    /// # Errors
    /// - HTTP client build errors (invalid configuration)
    pub fn new(config: &EmbeddingsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_max_idle_per_host(100)
            .pool_idle_timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| RagChatError::Http(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_input_chars: config.max_input_chars,
            retry: RetryPolicy::new(
                config.retry_max_attempts,
                config.retry_backoff_floor_secs,
                config.retry_backoff_ceiling_secs,
            ),
        })
    }

    /// Generate embeddings for a batch of texts, one vector per input
    ///
    /// Inputs over the provider limit are truncated on a character boundary
    /// before sending. Rate-limited calls are retried; any other failure
    /// surfaces immediately.
    ///
    /// # Errors
    /// - API request failures (network errors, timeouts, authentication failures)
    /// - Rate limiting once retries are exhausted
    /// - Invalid API responses (malformed JSON, wrong embedding count)
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let inputs: Vec<&str> = texts
            .iter()
            .map(|text| truncate_chars(text, self.max_input_chars))
            .collect();

        let embeddings = self.retry.execute(|| self.dispatch(&inputs)).await?;

        if embeddings.len() != texts.len() {
            return Err(RagChatError::Embedding(format!(
                "Requested {} embeddings but got {}",
                texts.len(),
                embeddings.len()
            )));
        }

        Ok(embeddings)
    }

    async fn dispatch(&self, inputs: &[&str]) -> Result<Vec<Vec<f32>>> {
        #[derive(Serialize)]
        struct EmbeddingsRequest<'a> {
            input: &'a [&'a str],
            model: &'a str,
        }

        #[derive(Deserialize)]
        struct EmbeddingsResponse {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            embedding: Vec<f32>,
        }

        let url = format!("{}/embeddings", self.endpoint);
        debug!("Calling embeddings API: {} ({} inputs)", url, inputs.len());

        let request = EmbeddingsRequest {
            input: inputs,
            model: &self.model,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| RagChatError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(RagChatError::RateLimited(error_text));
            }
            return Err(RagChatError::Embedding(format!(
                "Embeddings API error ({status}): {error_text}"
            )));
        }

        let result: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| RagChatError::Embedding(format!("Failed to parse response: {e}")))?;

        Ok(result.data.into_iter().map(|d| d.embedding).collect())
    }
}

/// Truncate to at most `max_chars` characters without splitting a character
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_input_unchanged() {
        assert_eq!(truncate_chars("hello", 8191), "hello");
    }

    #[test]
    fn test_truncate_at_exact_limit_unchanged() {
        let text = "a".repeat(8191);
        assert_eq!(truncate_chars(&text, 8191), text);
    }

    #[test]
    fn test_truncate_over_limit() {
        let text = "a".repeat(8192);
        assert_eq!(truncate_chars(&text, 8191).chars().count(), 8191);
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        // Four characters, twelve bytes
        let text = "日本語文";
        let truncated = truncate_chars(text, 3);
        assert_eq!(truncated, "日本語");
    }
}
