//! HTTP implementation of the remote user source

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client, Response, StatusCode};
use tracing::{debug, warn};

use super::{
    errors::{ClientError, ClientResult},
    source::RemoteSource,
    types::{SourcePage, User},
};
use crate::config::Config;

/// Header carrying the total number of records across all pages
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Client for the user directory REST API
#[derive(Debug, Clone)]
pub struct HttpUserSource {
    client: Client,
    base_url: String,
}

impl HttpUserSource {
    /// Create a client rooted at `base_url` (e.g. `http://localhost:8000/api`)
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::ConfigError(format!(
                "base URL must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("userdeck/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Create a client from the application configuration
    pub fn from_config(config: &Config) -> ClientResult<Self> {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fail on non-2xx, mapping 404 to `NotFound`
    fn check_status(response: Response, what: &str) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(what.to_string()));
        }

        Err(ClientError::StatusError {
            status,
            url: response.url().to_string(),
        })
    }
}

/// Parse the total-count header; absent or malformed values yield `None`
pub fn parse_total_count(headers: &HeaderMap) -> Option<usize> {
    let value = headers.get(TOTAL_COUNT_HEADER)?;
    match value.to_str().ok().and_then(|v| v.trim().parse::<usize>().ok()) {
        Some(total) => Some(total),
        None => {
            warn!("Ignoring malformed {} header: {:?}", TOTAL_COUNT_HEADER, value);
            None
        }
    }
}

#[async_trait]
impl RemoteSource<User> for HttpUserSource {
    async fn fetch_page(&self, offset: usize, limit: usize) -> ClientResult<SourcePage<User>> {
        let url = self.url("/v1/users");
        debug!("Fetching users: offset={}, limit={}", offset, limit);

        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit), ("offset", offset)])
            .send()
            .await?;
        let response = Self::check_status(response, "user listing")?;

        let total_count = parse_total_count(response.headers());
        if total_count.is_none() {
            debug!("No usable {} header, relying on short batches", TOTAL_COUNT_HEADER);
        }

        let body = response.bytes().await?;
        let records: Vec<User> = serde_json::from_slice(&body)?;
        debug!("Fetched {} users at offset {}", records.len(), offset);

        Ok(SourcePage::new(records, total_count))
    }

    async fn bulk_load(&self, count: u32) -> ClientResult<()> {
        let url = self.url("/v1/users/fetch");
        debug!("Requesting bulk load of {} users", count);

        let response = self
            .client
            .post(&url)
            .query(&[("count", count)])
            .send()
            .await?;
        Self::check_status(response, "bulk load endpoint")?;

        Ok(())
    }

    async fn record(&self, id: i64) -> ClientResult<User> {
        let url = self.url(&format!("/v1/users/{}", id));
        let response = self.client.get(&url).send().await?;
        let response = Self::check_status(response, &format!("user {}", id))?;

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn random_record(&self) -> ClientResult<User> {
        let url = self.url("/v1/random");
        let response = self.client.get(&url).send().await?;
        let response = Self::check_status(response, "random user")?;

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_parse_total_count_present() {
        let mut headers = HeaderMap::new();
        headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from_static("123"));
        assert_eq!(parse_total_count(&headers), Some(123));
    }

    #[test]
    fn test_parse_total_count_absent_or_malformed() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_total_count(&headers), None);

        headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from_static("lots"));
        assert_eq!(parse_total_count(&headers), None);

        headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from_static("-4"));
        assert_eq!(parse_total_count(&headers), None);
    }

    #[test]
    fn test_base_url_is_normalized() {
        let source = HttpUserSource::new("http://localhost:8000/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(source.base_url(), "http://localhost:8000/api");
        assert_eq!(source.url("/v1/random"), "http://localhost:8000/api/v1/random");
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let err = HttpUserSource::new("localhost:8000", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, ClientError::ConfigError(_)));
    }
}
