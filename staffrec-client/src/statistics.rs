//! Statistics endpoints client

use std::collections::BTreeMap;

use staffrec_common::api::types::Employee;

use crate::error::{ClientError, Result};
use crate::storage::decode;

pub struct StatisticsClient {
    client: reqwest::Client,
    base_url: String,
}

impl StatisticsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub async fn longest_tenured(&self, count: u32) -> Result<Vec<Employee>> {
        let response = self
            .client
            .get(format!("{}/statistics/longest-tenured", self.base_url))
            .query(&[("count", count)])
            .send()
            .await
            .map_err(ClientError::Connection)?;
        decode(response).await
    }

    pub async fn highest_paid(&self, count: u32) -> Result<Vec<Employee>> {
        let response = self
            .client
            .get(format!("{}/statistics/highest-paid", self.base_url))
            .query(&[("count", count)])
            .send()
            .await
            .map_err(ClientError::Connection)?;
        decode(response).await
    }

    /// Per-year hire counts for a title, zero-filled between the first
    /// and last hiring year
    pub async fn growth_history(&self, title: &str) -> Result<BTreeMap<i32, i64>> {
        let response = self
            .client
            .get(format!("{}/statistics/growth-history", self.base_url))
            .query(&[("title", title)])
            .send()
            .await
            .map_err(ClientError::Connection)?;
        decode(response).await
    }
}
