//! Forecasts endpoint client

use std::collections::BTreeMap;

use crate::error::{ClientError, Result};
use crate::storage::decode;

pub struct ForecastsClient {
    client: reqwest::Client,
    base_url: String,
}

impl ForecastsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Projected hire counts for `years` years past the recorded history
    pub async fn growth_forecast(&self, title: &str, years: u32) -> Result<BTreeMap<i32, i64>> {
        let response = self
            .client
            .get(format!("{}/forecasts/growth", self.base_url))
            .query(&[("title", title.to_string()), ("years", years.to_string())])
            .send()
            .await
            .map_err(ClientError::Connection)?;
        decode(response).await
    }
}
