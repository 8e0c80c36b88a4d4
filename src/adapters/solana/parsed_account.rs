//! Parsed Token Account Reader
//!
//! Fetches SPL token accounts with `getAccountInfo` and `jsonParsed` encoding,
//! exposing the mint, owner and `tokenAmount` fields the liquidation sweep needs.
//! The node does the layout decoding, so decimals and the display amount come
//! back ready to use.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use solana_sdk::commitment_config::{CommitmentConfig, CommitmentLevel};
use std::time::Duration;

use crate::domain::ParsedTokenAccount;
use crate::ports::ledger::LedgerError;

/// JSON-RPC client for jsonParsed token accounts
#[derive(Debug, Clone)]
pub struct TokenAccountReader {
    rpc_url: String,
    commitment: CommitmentConfig,
    http: Client,
}

impl TokenAccountReader {
    pub fn new(rpc_url: String, commitment: CommitmentConfig) -> Self {
        // Falls back to a default client if the builder rejects the timeout
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            rpc_url,
            commitment,
            http,
        }
    }

    /// Fetch one token account; `Ok(None)` if the account does not exist
    pub async fn get_token_account(
        &self,
        account: &str,
    ) -> Result<Option<ParsedTokenAccount>, LedgerError> {
        let request_body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getAccountInfo",
            "params": [
                account,
                {
                    "encoding": "jsonParsed",
                    "commitment": commitment_name(self.commitment.commitment),
                }
            ]
        });

        let response = self
            .http
            .post(&self.rpc_url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LedgerError::RpcError(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(LedgerError::RpcError("Rate limited (429)".into()));
        }
        if !status.is_success() {
            return Err(LedgerError::RpcError(format!("HTTP {}", status)));
        }

        let body: AccountInfoResponse = response
            .json()
            .await
            .map_err(|e| LedgerError::ParseError(format!("Failed to parse JSON: {}", e)))?;

        parse_token_account(body)
    }
}

fn commitment_name(level: CommitmentLevel) -> &'static str {
    match level {
        CommitmentLevel::Processed => "processed",
        CommitmentLevel::Confirmed => "confirmed",
        CommitmentLevel::Finalized => "finalized",
    }
}

/// Solana RPC response for getAccountInfo with jsonParsed encoding
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfoResponse {
    #[serde(default)]
    pub result: Option<AccountInfoResult>,
    #[serde(default)]
    pub error: Option<RpcErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorBody {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfoResult {
    pub value: Option<AccountInfoValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfoValue {
    pub data: AccountData,
    pub owner: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AccountData {
    Parsed(ParsedAccountData),
    Raw(Vec<String>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParsedAccountData {
    pub parsed: ParsedInfo,
    pub program: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParsedInfo {
    pub info: TokenAccountInfo,
    #[serde(rename = "type")]
    pub account_type: String,
}

/// Token account information from the SPL Token program.
/// Every field is optional; validation happens in `TokenHolding::parse`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAccountInfo {
    pub mint: Option<String>,
    pub owner: Option<String>,
    pub token_amount: Option<TokenAmount>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAmount {
    pub amount: Option<String>,
    pub decimals: Option<u8>,
    pub ui_amount_string: Option<String>,
}

/// Flatten the RPC envelope into the loosely typed token account view
pub fn parse_token_account(
    response: AccountInfoResponse,
) -> Result<Option<ParsedTokenAccount>, LedgerError> {
    if let Some(err) = response.error {
        return Err(LedgerError::RpcError(format!("{} ({})", err.message, err.code)));
    }

    let result = response
        .result
        .ok_or_else(|| LedgerError::ParseError("No result in response".into()))?;

    let Some(value) = result.value else {
        return Ok(None);
    };

    let parsed = match value.data {
        AccountData::Parsed(parsed) => parsed,
        AccountData::Raw(_) => {
            return Err(LedgerError::ParseError(format!(
                "Expected jsonParsed token account, got raw data (owner program {})",
                value.owner
            )))
        }
    };

    if parsed.parsed.account_type != "account" {
        return Err(LedgerError::ParseError(format!(
            "Account type is '{}', expected 'account'",
            parsed.parsed.account_type
        )));
    }

    let info = parsed.parsed.info;
    let amount = info.token_amount.unwrap_or_default();

    Ok(Some(ParsedTokenAccount {
        mint: info.mint,
        owner: info.owner,
        amount: amount.amount,
        decimals: amount.decimals,
        ui_amount_string: amount.ui_amount_string,
    }))
}
