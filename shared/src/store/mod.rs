//! Client plumbing for the external telemetry store.
//!
//! The store is the only transport between the authority and the clients.
//! Reads go through its JSON-RPC query API ([`api`]); writes go through the
//! framed TCP push protocol ([`sender`]). Both sides authenticate with
//! static tokens provisioned out of band.

pub mod api;
pub mod sender;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed store response: {0}")]
    Protocol(String),
    #[error("store rejected request: {0}")]
    Rejected(String),
}

/// Latest known value of one store item: which host identity owns it, the
/// item key, and the last value written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub host: String,
    pub key: String,
    pub value: String,
}
