//! IP-based location lookup.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{
    error::{PipelineError, Stage},
    model::LocationInfo,
    provider::fetch_body,
};

pub const DEFAULT_LOCATION_URL: &str = "https://ipinfo.io/json";

#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    async fn locate(&self) -> Result<LocationInfo, PipelineError>;
}

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    city: Option<String>,
    country: Option<String>,
}

/// Looks up the caller's city through ipinfo.io.
#[derive(Debug, Clone)]
pub struct IpInfoLocator {
    url: String,
    http: Client,
}

impl IpInfoLocator {
    pub fn new(url: String, http: Client) -> Self {
        Self { url, http }
    }
}

#[async_trait]
impl LocationProvider for IpInfoLocator {
    async fn locate(&self) -> Result<LocationInfo, PipelineError> {
        tracing::debug!(url = %self.url, "requesting location");

        let body = fetch_body(self.http.get(&self.url), Stage::Location).await?;
        let parsed: IpInfoResponse =
            serde_json::from_str(&body).map_err(|e| PipelineError::MalformedResponse {
                stage: Stage::Location,
                reason: e.to_string(),
            })?;

        let non_empty = |v: Option<String>, field: &str| {
            v.filter(|s| !s.trim().is_empty())
                .ok_or_else(|| PipelineError::MalformedResponse {
                    stage: Stage::Location,
                    reason: format!("missing `{field}`"),
                })
        };

        Ok(LocationInfo {
            city: non_empty(parsed.city, "city")?,
            country: non_empty(parsed.country, "country")?,
        })
    }
}
