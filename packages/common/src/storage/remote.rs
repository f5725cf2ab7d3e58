use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::error::StorageError;
use super::traits::NameStore;
use crate::config::RemoteStoreConfig;
use crate::flower::{FlowerName, normalize_key};
use crate::retry::RetryPolicy;

/// Name store backed by a remote record-store HTTP API.
///
/// The API exposes a single record collection with two operations:
///
/// * `GET {base_url}/records?page_size=N&page_token=T` returns a page of
///   records plus `has_more`/`page_token` for the next page.
/// * `POST {base_url}/records` creates one record.
///
/// The remote side has no uniqueness constraint, so `insert` is a
/// list-then-create. Inserts issued by this process are serialized, but two
/// processes writing the same name concurrently can still both succeed.
pub struct RemoteNameStore {
    client: Client,
    records_url: String,
    token: String,
    page_size: u32,
    retry: RetryPolicy,
    insert_lock: Mutex<()>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RecordFields {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    normalized_key: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct Record {
    fields: RecordFields,
}

#[derive(Debug, Deserialize)]
struct RecordPage {
    #[serde(default)]
    items: Vec<Record>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    page_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateRecord<'a> {
    fields: &'a RecordFields,
}

impl From<RecordFields> for FlowerName {
    fn from(fields: RecordFields) -> Self {
        let normalized_key = fields
            .normalized_key
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| normalize_key(&fields.name));
        Self {
            name: fields.name,
            normalized_key,
            created_at: fields.created_at,
        }
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StorageError::Malformed(err.to_string())
        } else {
            StorageError::Unavailable(err.to_string())
        }
    }
}

impl RemoteNameStore {
    pub fn new(config: &RemoteStoreConfig) -> Result<Self, StorageError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StorageError::Backend(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            records_url: format!("{}/records", config.base_url.trim_end_matches('/')),
            token: config.token.clone(),
            page_size: config.page_size,
            retry: config.retry_policy(),
            insert_lock: Mutex::new(()),
        })
    }

    async fn fetch_page(&self, page_token: Option<&str>) -> Result<RecordPage, StorageError> {
        let mut request = self
            .client
            .get(&self.records_url)
            .bearer_auth(&self.token)
            .query(&[("page_size", self.page_size.to_string())]);
        if let Some(token) = page_token {
            request = request.query(&[("page_token", token)]);
        }

        let response = check_status(request.send().await?).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| StorageError::Malformed(e.to_string()))
    }

    /// Fetch one page, retrying transport failures per the retry policy.
    async fn fetch_page_with_retry(
        &self,
        page_token: Option<&str>,
    ) -> Result<RecordPage, StorageError> {
        let mut attempt = 0u8;
        loop {
            match self.fetch_page(page_token).await {
                Ok(page) => return Ok(page),
                Err(e) if e.is_transient() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay = self.retry.delay(attempt);
                    warn!(attempt, ?delay, error = %e, "Remote list failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_all(&self) -> Result<Vec<FlowerName>, StorageError> {
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        loop {
            let page = self.fetch_page_with_retry(page_token.as_deref()).await?;
            names.extend(page.items.into_iter().map(|r| FlowerName::from(r.fields)));

            match page.page_token {
                Some(next) if page.has_more && !next.is_empty() => {
                    // A token seen before would make pagination cycle forever.
                    if !seen_tokens.insert(next.clone()) {
                        return Err(StorageError::Malformed(format!(
                            "page_token {next:?} did not advance"
                        )));
                    }
                    page_token = Some(next);
                }
                _ if page.has_more => {
                    return Err(StorageError::Malformed(
                        "has_more set without a page_token".into(),
                    ));
                }
                _ => break,
            }
        }

        debug!(count = names.len(), "Fetched remote records");
        Ok(names)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let detail = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            format!("remote store rejected credentials ({status})")
        }
        _ => format!("remote store returned {status}: {body}"),
    };
    Err(StorageError::Unavailable(detail))
}

#[async_trait]
impl NameStore for RemoteNameStore {
    fn backend(&self) -> &'static str {
        "remote"
    }

    async fn get_by_key(&self, normalized_key: &str) -> Result<Option<FlowerName>, StorageError> {
        Ok(self
            .fetch_all()
            .await?
            .into_iter()
            .find(|r| r.normalized_key == normalized_key))
    }

    async fn insert(&self, record: &FlowerName) -> Result<(), StorageError> {
        let _guard = self.insert_lock.lock().await;

        if self.get_by_key(&record.normalized_key).await?.is_some() {
            return Err(StorageError::Conflict(record.normalized_key.clone()));
        }

        let fields = RecordFields {
            name: record.name.clone(),
            normalized_key: Some(record.normalized_key.clone()),
            created_at: record.created_at,
        };
        let response = self
            .client
            .post(&self.records_url)
            .bearer_auth(&self.token)
            .json(&CreateRecord { fields: &fields })
            .send()
            .await?;
        check_status(response).await?;

        debug!(key = %record.normalized_key, "Created remote record");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<FlowerName>, StorageError> {
        self.fetch_all().await
    }
}
