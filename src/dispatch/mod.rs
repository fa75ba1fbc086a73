//! HTTP transport for subreddit-scoped API calls.
//!
//! `Dispatch` owns request construction, bearer-token attachment, status and
//! envelope checks, and JSON mapping. Endpoint families hang off it as
//! borrowed views (`dispatch.flair(sub)`, `dispatch.widgets(sub)`).

pub mod flair;
pub mod validate;
pub mod widgets;

use crate::client::{RedditClient, RedditClientError, Result};
use log::{debug, warn};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

pub use flair::FlairApi;
pub use widgets::WidgetsApi;

/// Warn once the remaining request budget drops below this
const RATELIMIT_WARN_THRESHOLD: f64 = 10.0;

/// Shared, cheaply cloneable handle used by all controllers
#[derive(Clone)]
pub struct Dispatch {
    client: Arc<Mutex<RedditClient>>,
    http: Client,
    api_base: String,
}

impl Dispatch {
    pub fn new(client: RedditClient) -> Self {
        let http = client.client.clone();
        let api_base = client.api_base.clone();
        Self {
            client: Arc::new(Mutex::new(client)),
            http,
            api_base,
        }
    }

    /// Lock the underlying client, e.g. to authenticate or inspect tokens.
    pub async fn client(&self) -> MutexGuard<'_, RedditClient> {
        self.client.lock().await
    }

    /// Flair endpoints of `subreddit`.
    pub fn flair<'a>(&'a self, subreddit: &'a str) -> FlairApi<'a> {
        FlairApi::new(self, subreddit)
    }

    /// Widget endpoints of `subreddit`.
    pub fn widgets<'a>(&'a self, subreddit: &'a str) -> WidgetsApi<'a> {
        WidgetsApi::new(self, subreddit)
    }

    fn url(&self, subreddit: &str, path: &str) -> String {
        let subreddit = subreddit.strip_prefix("r/").unwrap_or(subreddit);
        format!("{}/r/{}/{}", self.api_base, subreddit, path)
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        subreddit: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let builder = self.http.get(self.url(subreddit, path)).query(query);
        decode(self.execute(builder).await?)
    }

    pub(crate) async fn post_form<T: DeserializeOwned>(
        &self,
        subreddit: &str,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<T> {
        let builder = self.http.post(self.url(subreddit, path)).form(form);
        decode(self.execute(builder).await?)
    }

    pub(crate) async fn send_json<T, B>(
        &self,
        method: Method,
        subreddit: &str,
        path: &str,
        body: &B,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self
            .http
            .request(method, self.url(subreddit, path))
            .json(body);
        decode(self.execute(builder).await?)
    }

    pub(crate) async fn delete(&self, subreddit: &str, path: &str) -> Result<()> {
        let builder = self.http.delete(self.url(subreddit, path));
        self.execute(builder).await.map(|_| ())
    }

    /// Authenticate, send, and return the validated JSON body (`Null` when empty).
    async fn execute(&self, builder: RequestBuilder) -> Result<Value> {
        let token = self.client.lock().await.bearer_token().await?;

        let request = builder
            .bearer_auth(token)
            .query(&[("raw_json", "1")])
            .build()?;
        debug!("{} {}", request.method(), request.url());

        let response = self.http.execute(request).await?;
        let status = response.status();
        debug!("Response status: {}", status);
        log_ratelimit(response.headers());

        let body = response.text().await?;
        debug!("Response body length: {} bytes", body.len());

        if !status.is_success() {
            // Prefer Reddit's own explanation when the body carries one
            if let Ok(value) = serde_json::from_str::<Value>(&body) {
                validate::check(&value)?;
            }
            return Err(RedditClientError::ApiError(format!(
                "Server returned error status: HTTP {}: {}",
                status, body
            )));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        let value: Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(e) => {
                debug!("Error parsing response: {}", e);
                debug!(
                    "First 100 chars: {}",
                    body.chars().take(100).collect::<String>()
                );
                return Err(RedditClientError::ParseError(e));
            }
        };

        validate::check(&value)?;
        Ok(value)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

fn log_ratelimit(headers: &reqwest::header::HeaderMap) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    let remaining = header("x-ratelimit-remaining");
    let reset = header("x-ratelimit-reset");
    if let Some(remaining) = &remaining {
        debug!(
            "Rate limit: {} remaining, resets in {}s",
            remaining,
            reset.as_deref().unwrap_or("?")
        );
        if remaining
            .parse::<f64>()
            .map_or(false, |left| left < RATELIMIT_WARN_THRESHOLD)
        {
            warn!(
                "Only {} requests left in the current rate-limit window",
                remaining
            );
        }
    }
}
