//! Storage backend client
//!
//! `StorageApi` is the seam the command history works against: the GUI
//! wires in `HttpStorage`, tests wire in an in-memory fake. Batch
//! deletion is issued one request per id; the backend has no bulk
//! endpoint and the undo path wants one snapshot per deleted record
//! anyway.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use staffrec_common::api::types::{Employee, EmployeeIn, EmployeeSearch, WrongDataBody};

use crate::error::{ClientError, Result};

/// Employee storage operations the client depends on
#[async_trait]
pub trait StorageApi: Send + Sync {
    async fn add_employee(&self, employee: &EmployeeIn) -> Result<Employee>;
    async fn get_employee(&self, id: i64) -> Result<Employee>;
    async fn get_employees(&self, skip: i64, limit: i64) -> Result<Vec<Employee>>;
    async fn update_employee(&self, id: i64, employee: &EmployeeIn) -> Result<Employee>;
    /// Delete each id in order, returning the removed snapshots
    async fn delete_employees(&self, ids: &[i64]) -> Result<Vec<Employee>>;
    async fn search_employees(&self, search: &EmployeeSearch) -> Result<Vec<Employee>>;
}

/// HTTP implementation of [`StorageApi`] against the staffrec backend
pub struct HttpStorage {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl StorageApi for HttpStorage {
    async fn add_employee(&self, employee: &EmployeeIn) -> Result<Employee> {
        let response = self
            .client
            .post(format!("{}/employee", self.base_url))
            .json(employee)
            .send()
            .await
            .map_err(ClientError::Connection)?;
        decode(response).await
    }

    async fn get_employee(&self, id: i64) -> Result<Employee> {
        let response = self
            .client
            .get(format!("{}/employee/{}", self.base_url, id))
            .send()
            .await
            .map_err(ClientError::Connection)?;
        decode(response).await
    }

    async fn get_employees(&self, skip: i64, limit: i64) -> Result<Vec<Employee>> {
        let response = self
            .client
            .get(format!("{}/employees", self.base_url))
            .query(&[("skip", skip), ("limit", limit)])
            .send()
            .await
            .map_err(ClientError::Connection)?;
        decode(response).await
    }

    async fn update_employee(&self, id: i64, employee: &EmployeeIn) -> Result<Employee> {
        let response = self
            .client
            .put(format!("{}/employee/{}", self.base_url, id))
            .json(employee)
            .send()
            .await
            .map_err(ClientError::Connection)?;
        decode(response).await
    }

    async fn delete_employees(&self, ids: &[i64]) -> Result<Vec<Employee>> {
        let mut deleted = Vec::with_capacity(ids.len());
        for id in ids {
            let response = self
                .client
                .delete(format!("{}/employee/{}", self.base_url, id))
                .send()
                .await
                .map_err(ClientError::Connection)?;
            deleted.push(decode::<Employee>(response).await?);
        }
        Ok(deleted)
    }

    async fn search_employees(&self, search: &EmployeeSearch) -> Result<Vec<Employee>> {
        let response = self
            .client
            .post(format!("{}/search/employees", self.base_url))
            .json(search)
            .send()
            .await
            .map_err(ClientError::Connection)?;
        decode(response).await
    }
}

/// Map a backend response to the client error taxonomy, or decode its body
pub(crate) async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    debug!("backend replied {}", status);

    let body = response.bytes().await.map_err(ClientError::Connection)?;
    decode_body(status, &body)
}

fn decode_body<T: DeserializeOwned>(status: reqwest::StatusCode, body: &[u8]) -> Result<T> {
    if status.is_server_error() {
        return Err(ClientError::Server(status.as_u16()));
    }
    if status == reqwest::StatusCode::UNPROCESSABLE_ENTITY {
        let parsed: WrongDataBody =
            serde_json::from_slice(body).map_err(|e| ClientError::Decode(e.to_string()))?;
        return Err(ClientError::WrongData(parsed.detail));
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound(error_message(body)));
    }
    if status.is_client_error() {
        return Err(ClientError::Rejected {
            status: status.as_u16(),
            message: error_message(body),
        });
    }

    serde_json::from_slice(body).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Pull the `error` field out of a rejection body, if there is one
fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| "request rejected".to_string())
}
