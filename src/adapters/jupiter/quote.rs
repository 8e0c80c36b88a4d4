//! Jupiter Quote Types
//!
//! Request and response structures for the Jupiter quote API.

use serde::{Deserialize, Serialize};

/// Request parameters for getting a swap quote
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    /// Input token mint address
    pub input_mint: String,
    /// Output token mint address
    pub output_mint: String,
    /// Amount in base units (lamports for SOL)
    pub amount: u64,
    /// Slippage tolerance in basis points (1 = 0.01%)
    pub slippage_bps: u16,
}

impl QuoteRequest {
    pub fn new(input_mint: String, output_mint: String, amount: u64, slippage_bps: u16) -> Self {
        Self {
            input_mint,
            output_mint,
            amount,
            slippage_bps,
        }
    }
}

/// Response from Jupiter quote API.
///
/// Passed back verbatim to `/swap`, so unknown fields are kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub input_mint: String,
    pub output_mint: String,
    /// Input amount in base units
    pub in_amount: String,
    /// Output amount in base units
    pub out_amount: String,
    /// Minimum output amount after slippage
    pub other_amount_threshold: String,
    pub swap_mode: String,
    pub slippage_bps: u16,
    #[serde(default)]
    pub price_impact_pct: String,
    pub route_plan: Vec<RoutePlanStep>,
    #[serde(default)]
    pub context_slot: Option<u64>,
    #[serde(flatten)]
    pub extra: std::collections::HashMap<String, serde_json::Value>,
}

impl QuoteResponse {
    /// Output amount in base units; `None` if the API sent something unparsable
    pub fn output_amount(&self) -> Option<u64> {
        self.out_amount.parse().ok()
    }

    /// DEX labels along the route, in order
    pub fn route_labels(&self) -> Vec<&str> {
        self.route_plan
            .iter()
            .map(|step| step.swap_info.label.as_str())
            .collect()
    }
}

/// A step in the route plan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlanStep {
    pub swap_info: SwapInfo,
    /// Percentage of the trade going through this route
    pub percent: u8,
}

/// Information about a single swap in the route
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapInfo {
    pub amm_key: String,
    /// Label for the DEX (e.g., "Raydium", "Orca")
    pub label: String,
    pub input_mint: String,
    pub output_mint: String,
    pub in_amount: String,
    pub out_amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_mint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUOTE_JSON: &str = r#"{
        "inputMint": "So11111111111111111111111111111111111111112",
        "outputMint": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
        "inAmount": "100000000",
        "outAmount": "15000000",
        "otherAmountThreshold": "14925000",
        "swapMode": "ExactIn",
        "slippageBps": 50,
        "priceImpactPct": "0.01",
        "platformFee": null,
        "routePlan": [{
            "swapInfo": {
                "ammKey": "pool123",
                "label": "Raydium",
                "inputMint": "So11111111111111111111111111111111111111112",
                "outputMint": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
                "inAmount": "100000000",
                "outAmount": "15000000"
            },
            "percent": 100
        }],
        "contextSlot": 300000000
    }"#;

    #[test]
    fn test_quote_response_parsing() {
        let quote: QuoteResponse = serde_json::from_str(QUOTE_JSON).unwrap();
        assert_eq!(quote.output_amount(), Some(15_000_000));
        assert_eq!(quote.route_labels(), vec!["Raydium"]);
        assert_eq!(quote.context_slot, Some(300000000));
    }

    #[test]
    fn test_unknown_fields_survive_reserialization() {
        let quote: QuoteResponse = serde_json::from_str(QUOTE_JSON).unwrap();
        let value = serde_json::to_value(&quote).unwrap();
        assert!(value.get("platformFee").is_some());
        assert_eq!(value["otherAmountThreshold"], "14925000");
    }

    #[test]
    fn test_quote_request_serializes_camel_case() {
        let req = QuoteRequest::new("A".into(), "B".into(), 1_000, 50);
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["inputMint"], "A");
        assert_eq!(value["slippageBps"], 50);
    }
}
