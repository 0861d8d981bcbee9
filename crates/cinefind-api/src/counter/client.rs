//! `CounterClient` - search counter service client implementation.

use reqwest::Client;
use serde::Serialize;
use tracing::instrument;
use url::Url;

use crate::error::{ApiError, Result};
use crate::tmdb::Movie;

use super::api::LocalSearchCounterApi;
use super::types::{CounterListResponse, CounterRecord};

/// Header carrying the service API key.
const API_KEY_HEADER: &str = "x-api-key";

/// Collection path under the service base URL.
const COUNTERS_PATH: &str = "v1/counters";

/// Search counter service client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CounterClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL of the counter service.
    base_url: Url,
    /// Service API key.
    api_key: String,
}

/// Builder for `CounterClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CounterClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
}

/// Create body for a new counter record.
#[derive(Debug, Serialize)]
struct NewCounter<'a> {
    search_term: &'a str,
    movie_id: u64,
    poster_url: Option<String>,
    count: u64,
}

/// Patch body incrementing an existing counter.
#[derive(Debug, Serialize)]
struct CounterPatch {
    count: u64,
}

impl CounterClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
        }
    }

    /// Sets the service base URL (required).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the service API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `base_url` is not set.
    /// - `api_key` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<CounterClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| ApiError::config("base_url is required"))?;
        let api_key = self
            .api_key
            .ok_or_else(|| ApiError::config("api_key is required"))?;
        let user_agent = self
            .user_agent
            .ok_or_else(|| ApiError::config("user_agent is required"))?;

        let http_client = Client::builder().user_agent(&user_agent).gzip(true).build()?;

        Ok(CounterClient {
            http_client,
            base_url,
            api_key,
        })
    }
}

impl CounterClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> CounterClientBuilder {
        CounterClientBuilder::new()
    }

    /// Joins a path onto the base URL.
    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|source| ApiError::Url {
            path: String::from(path),
            source,
        })
    }

    /// Converts a non-success response into a transport failure.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<failed to read body>"));
        Err(ApiError::Transport {
            status: status.as_u16(),
            detail,
        })
    }

    /// Sends a GET request and decodes the counter list envelope.
    #[instrument(skip_all)]
    async fn list(&self, query: &[(&str, String)]) -> Result<CounterListResponse> {
        let url = self.endpoint(COUNTERS_PATH)?;
        let response = self
            .http_client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Parse {
            path: String::from(COUNTERS_PATH),
            source,
        })
    }

    /// Looks up the counter record for an exact term, if any.
    async fn lookup(&self, term: &str) -> Result<Option<CounterRecord>> {
        let query = [
            ("search_term", String::from(term)),
            ("limit", String::from("1")),
        ];
        let response = self.list(&query).await?;
        Ok(response.counters.into_iter().next())
    }

    /// Creates a new counter record with count 1.
    async fn create(&self, term: &str, top_result: &Movie) -> Result<()> {
        let url = self.endpoint(COUNTERS_PATH)?;
        let body = NewCounter {
            search_term: term,
            movie_id: top_result.id,
            poster_url: top_result.poster_url(),
            count: 1,
        };
        let response = self
            .http_client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Sets an existing counter record to the given count.
    async fn set_count(&self, id: &str, count: u64) -> Result<()> {
        let path = format!("{COUNTERS_PATH}/{id}");
        let url = self.endpoint(&path)?;
        let response = self
            .http_client
            .patch(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&CounterPatch { count })
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }
}

impl LocalSearchCounterApi for CounterClient {
    #[instrument(skip_all)]
    async fn record_search(&self, term: &str, top_result: &Movie) -> Result<()> {
        match self.lookup(term).await? {
            Some(record) => {
                self.set_count(&record.id, record.count.saturating_add(1))
                    .await
            }
            None => self.create(term, top_result).await,
        }
    }

    #[instrument(skip_all)]
    async fn top_searches(&self, limit: u32) -> Result<Vec<CounterRecord>> {
        let query = [
            ("sort", String::from("-count")),
            ("limit", limit.to_string()),
        ];
        let response = self.list(&query).await?;
        Ok(response.counters)
    }
}
