//! JSON-RPC query client for the store's HTTP API.
//!
//! Only the one read the game needs is wrapped: "latest values of items
//! whose key matches a search string". The authority calls it with the
//! position key prefix to see every player; a client calls it with its own
//! position key and the score key, and the store's permission model limits
//! what each token can see.

use super::{ItemRecord, StoreError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct ApiClient {
    http: reqwest::Client,
    url: String,
    token: String,
    next_id: AtomicU64,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    message: String,
    #[serde(default)]
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(rename = "key_")]
    key: String,
    #[serde(default)]
    lastvalue: String,
    #[serde(default)]
    hosts: Vec<RawHost>,
}

#[derive(Debug, Deserialize)]
struct RawHost {
    host: String,
}

impl ApiClient {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            token: token.into(),
            next_id: AtomicU64::new(1),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id,
        });

        let reply: RpcEnvelope<T> = self
            .http
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if let Some(error) = reply.error {
            let detail = error.data.unwrap_or_default();
            return Err(StoreError::Rejected(format!("{} {}", error.message, detail)));
        }
        reply
            .result
            .ok_or_else(|| StoreError::Protocol("reply carries neither result nor error".into()))
    }

    /// Latest values of every item whose key matches `key_search`, together
    /// with the host identity each item belongs to.
    pub async fn latest_items(&self, key_search: &str) -> Result<Vec<ItemRecord>, StoreError> {
        let raw: Vec<RawItem> = self
            .call(
                "item.get",
                json!({
                    "search": { "key_": key_search },
                    "output": ["key_", "lastvalue"],
                    "selectHosts": ["host"],
                }),
            )
            .await?;

        Ok(raw
            .into_iter()
            .map(|item| ItemRecord {
                host: item
                    .hosts
                    .into_iter()
                    .next()
                    .map(|h| h.host)
                    .unwrap_or_default(),
                key: item.key,
                value: item.lastvalue,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_reply_deserializes() {
        let body = r#"{
            "jsonrpc": "2.0",
            "result": [
                {"key_": "player.position.abc", "lastvalue": "3 4",
                 "hosts": [{"host": "Player 1"}]},
                {"key_": "player.position.def", "lastvalue": "",
                 "hosts": [{"host": "Player 2"}]}
            ],
            "id": 1
        }"#;
        let reply: RpcEnvelope<Vec<RawItem>> = serde_json::from_str(body).unwrap();
        let items = reply.result.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].key, "player.position.abc");
        assert_eq!(items[0].lastvalue, "3 4");
        assert_eq!(items[0].hosts[0].host, "Player 1");
        assert_eq!(items[1].lastvalue, "");
    }

    #[test]
    fn error_reply_deserializes() {
        let body = r#"{
            "jsonrpc": "2.0",
            "error": {"code": -32602, "message": "Invalid params.",
                      "data": "Not authorised."},
            "id": 2
        }"#;
        let reply: RpcEnvelope<Vec<RawItem>> = serde_json::from_str(body).unwrap();
        assert!(reply.result.is_none());
        let error = reply.error.unwrap();
        assert_eq!(error.message, "Invalid params.");
        assert_eq!(error.data.as_deref(), Some("Not authorised."));
    }
}
