// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Solana JSON-RPC broadcast client.
//!
//! Only the `sendTransaction` surface the custody engine needs. The signed
//! transaction is submitted base64-encoded; the node answers with the
//! base58 transaction signature, which callers use as the submission id.

use serde::Deserialize;
use serde_json::json;

use super::BroadcastClient;

/// Errors raised while broadcasting a transaction.
#[derive(Debug, thiserror::Error)]
pub enum BroadcastError {
    #[error("invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    /// Transport-level failure (connect, timeout, non-JSON body).
    #[error("RPC transport error: {0}")]
    Transport(String),

    /// The node accepted the request but rejected the transaction.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Response carried neither a result nor an error.
    #[error("malformed RPC response")]
    MalformedResponse,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// JSON-RPC client for a Solana node.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    rpc_url: url::Url,
}

impl RpcClient {
    /// Create a client for the given RPC endpoint.
    pub fn new(rpc_url: &str) -> Result<Self, BroadcastError> {
        let rpc_url: url::Url = rpc_url
            .parse()
            .map_err(|e: url::ParseError| BroadcastError::InvalidRpcUrl(e.to_string()))?;

        Ok(Self {
            http: reqwest::Client::new(),
            rpc_url,
        })
    }

    /// The configured endpoint.
    pub fn rpc_url(&self) -> &url::Url {
        &self.rpc_url
    }
}

impl BroadcastClient for RpcClient {
    async fn submit(&self, signed_tx_base64: &str) -> Result<String, BroadcastError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "sendTransaction",
            "params": [signed_tx_base64, { "encoding": "base64" }],
        });

        let response = self
            .http
            .post(self.rpc_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| BroadcastError::Transport(e.to_string()))?;

        let response: RpcResponse = response
            .json()
            .await
            .map_err(|e| BroadcastError::Transport(e.to_string()))?;

        if let Some(error) = response.error {
            tracing::warn!(code = error.code, "node rejected transaction");
            return Err(BroadcastError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        response.result.ok_or(BroadcastError::MalformedResponse)
    }
}
