//! HTTP client for the daemon's JSON API.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// Client over the daemon's HTTP API.
pub struct DaemonClient {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
pub struct Stats {
    pub avg_temp: f64,
    pub max_temp: f64,
    pub min_temp: f64,
    pub cpu_temp: f64,
}

#[derive(Debug, Deserialize)]
pub struct StatsResponse {
    pub stats: Stats,
    pub history_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct Zone {
    #[serde(rename = "type")]
    pub zone_type: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ZonesResponse {
    pub zones: Vec<Zone>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct ZoneReading {
    pub temperature: f64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AllTemperaturesResponse {
    pub zones: HashMap<String, ZoneReading>,
}

#[derive(Debug, Deserialize)]
pub struct FanReading {
    pub speed: u32,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct FansResponse {
    pub fans: HashMap<String, FanReading>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub temperature: f64,
}

#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
}

impl DaemonClient {
    /// Creates a client against a daemon base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to reach daemon at {}", url))?
            .error_for_status()
            .with_context(|| format!("Daemon returned an error for {}", url))?;
        response
            .json()
            .await
            .with_context(|| format!("Malformed response from {}", url))
    }

    pub async fn stats(&self) -> Result<StatsResponse> {
        self.get("/api/stats").await
    }

    pub async fn zones(&self) -> Result<ZonesResponse> {
        self.get("/api/zones").await
    }

    pub async fn all_temperatures(&self) -> Result<AllTemperaturesResponse> {
        self.get("/api/all-temperatures").await
    }

    pub async fn fans(&self) -> Result<FansResponse> {
        self.get("/api/fans").await
    }

    pub async fn history(&self) -> Result<HistoryResponse> {
        self.get("/api/history").await
    }
}
