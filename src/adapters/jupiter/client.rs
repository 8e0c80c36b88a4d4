//! Jupiter API Client
//!
//! HTTP client for the Jupiter swap API (`/quote` and `/swap`).
//! Every call is a single attempt; errors are classified and returned.

use std::time::Duration;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::ports::execution::ExecutionError;
use super::quote::{QuoteRequest, QuoteResponse};
use super::swap::{SwapTransactionRequest, SwapTransactionResponse};

/// Default Jupiter endpoint
pub const DEFAULT_API_URL: &str = "https://api.jup.ag/swap/v1";

/// Jupiter API client configuration
#[derive(Debug, Clone)]
pub struct JupiterConfig {
    /// Base URL for Jupiter API
    pub api_base_url: String,
    /// Optional API key for higher rate limits
    pub api_key: Option<String>,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for JupiterConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Jupiter DEX aggregator client
#[derive(Debug, Clone)]
pub struct JupiterClient {
    config: JupiterConfig,
    http: Client,
}

impl JupiterClient {
    /// Create a new Jupiter client with default configuration
    pub fn new() -> Result<Self, ExecutionError> {
        Self::with_config(JupiterConfig::default())
    }

    /// Create a new Jupiter client with custom configuration
    pub fn with_config(config: JupiterConfig) -> Result<Self, ExecutionError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExecutionError::ApiError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    /// Get a quote for a token swap
    pub async fn get_quote(&self, request: &QuoteRequest) -> Result<QuoteResponse, ExecutionError> {
        let url = format!("{}/quote", self.config.api_base_url);

        let mut req = self.http.get(&url).query(&[
            ("inputMint", request.input_mint.as_str()),
            ("outputMint", request.output_mint.as_str()),
            ("amount", &request.amount.to_string()),
            ("slippageBps", &request.slippage_bps.to_string()),
        ]);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("x-api-key", api_key);
        }

        let response = req.send().await.map_err(classify_transport_error)?;
        handle_response(response, Some(request)).await
    }

    /// Build the unsigned swap transaction for a quote
    pub async fn get_swap_transaction(
        &self,
        request: &SwapTransactionRequest,
    ) -> Result<SwapTransactionResponse, ExecutionError> {
        let url = format!("{}/swap", self.config.api_base_url);

        let mut req = self.http.post(&url).json(request);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("x-api-key", api_key);
        }

        let response = req.send().await.map_err(classify_transport_error)?;
        handle_response(response, None).await
    }

    /// Get the configured API base URL
    pub fn api_base_url(&self) -> &str {
        &self.config.api_base_url
    }
}

fn classify_transport_error(e: reqwest::Error) -> ExecutionError {
    if e.is_timeout() {
        ExecutionError::Timeout(e.to_string())
    } else {
        ExecutionError::ApiError(e.to_string())
    }
}

/// Handle API response and deserialize
async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
    quote: Option<&QuoteRequest>,
) -> Result<T, ExecutionError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ExecutionError::ApiError("Rate limit exceeded".into()));
    }

    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(classify_api_error(status, &error_text, quote));
    }

    response
        .json()
        .await
        .map_err(|e| ExecutionError::ApiError(format!("Failed to parse response: {}", e)))
}

/// Map a non-success response body onto the execution error kinds
pub(crate) fn classify_api_error(
    status: StatusCode,
    body: &str,
    quote: Option<&QuoteRequest>,
) -> ExecutionError {
    if body.contains("SlippageToleranceExceeded") || body.contains("6001") {
        return ExecutionError::SlippageExceeded;
    }

    if let Some(quote) = quote {
        if body.contains("COULD_NOT_FIND_ANY_ROUTE")
            || body.contains("NO_ROUTES_FOUND")
            || body.contains("No routes found")
        {
            return ExecutionError::NoRoute {
                input_mint: quote.input_mint.clone(),
                output_mint: quote.output_mint.clone(),
            };
        }
    }

    ExecutionError::ApiError(format!("API error {}: {}", status, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote() -> QuoteRequest {
        QuoteRequest::new("MintA".into(), "MintB".into(), 1_000, 50)
    }

    #[test]
    fn test_jupiter_config_default() {
        let config = JupiterConfig::default();
        assert_eq!(config.api_base_url, "https://api.jup.ag/swap/v1");
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_jupiter_client_creation() {
        let client = JupiterClient::new().unwrap();
        assert_eq!(client.api_base_url(), DEFAULT_API_URL);
    }

    #[test]
    fn test_no_route_classified() {
        let body = r#"{"error":"Could not find any route","errorCode":"COULD_NOT_FIND_ANY_ROUTE"}"#;
        let err = classify_api_error(StatusCode::BAD_REQUEST, body, Some(&quote()));
        assert!(matches!(
            err,
            ExecutionError::NoRoute { ref input_mint, ref output_mint }
                if input_mint == "MintA" && output_mint == "MintB"
        ));
    }

    #[test]
    fn test_slippage_classified() {
        let err = classify_api_error(StatusCode::BAD_REQUEST, "custom program error: 0x1771 (6001)", None);
        assert!(matches!(err, ExecutionError::SlippageExceeded));
    }

    #[test]
    fn test_other_errors_are_api_errors() {
        let err = classify_api_error(StatusCode::INTERNAL_SERVER_ERROR, "boom", Some(&quote()));
        assert!(matches!(err, ExecutionError::ApiError(msg) if msg.contains("500") && msg.contains("boom")));
    }

    #[tokio::test]
    async fn test_unreachable_api_is_error() {
        let client = JupiterClient::with_config(JupiterConfig {
            api_base_url: "http://127.0.0.1:1".into(),
            api_key: None,
            timeout: Duration::from_secs(2),
        })
        .unwrap();

        let result = client.get_quote(&quote()).await;
        assert!(matches!(result, Err(ExecutionError::ApiError(_)) | Err(ExecutionError::Timeout(_))));
    }
}
