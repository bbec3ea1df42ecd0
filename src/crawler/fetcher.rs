//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building the HTTP client with a non-default user agent
//! - JSON GET requests
//! - Waiting out throttling responses according to a [`ThrottlePolicy`]
//! - Classifying everything else as an upstream failure

use crate::config::{ClientConfig, Config, LimitsConfig, PacingConfig};
use crate::SieveError;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// How a request reacts to HTTP 429
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottlePolicy {
    /// Wait before re-sending the same request
    pub cooldown: Duration,

    /// Retries allowed after the first attempt; `None` retries forever
    pub max_retries: Option<u32>,
}

impl ThrottlePolicy {
    /// Keeps retrying for as long as the source throttles
    pub fn unbounded(cooldown: Duration) -> Self {
        Self {
            cooldown,
            max_retries: None,
        }
    }

    /// A single retry after one cool-down
    pub fn retry_once(cooldown: Duration) -> Self {
        Self {
            cooldown,
            max_retries: Some(1),
        }
    }

    fn allows_retry(&self, retries_done: u32) -> bool {
        self.max_retries.map_or(true, |max| retries_done < max)
    }
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult<T> {
    /// Successfully fetched and decoded the body
    Success(T),

    /// Non-success status, including a 429 that outlasted the policy
    HttpError { status_code: u16 },

    /// Connection failure, timeout, or body read error
    NetworkError { error: String },

    /// Body was not the expected JSON shape
    Malformed { error: String },
}

/// Builds an HTTP client with proper configuration
///
/// The forum rejects requests carrying an HTTP library's default user agent,
/// so the configured one is always set.
pub fn build_http_client(config: &ClientConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// A read-only client for the forum's JSON endpoints
///
/// Listing and comment fetching are implemented on this type in the
/// `listing` and `comments` modules.
#[derive(Debug, Clone)]
pub struct ForumClient {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
    pub(crate) pacing: PacingConfig,
    pub(crate) limits: LimitsConfig,
}

impl ForumClient {
    /// Creates a client from the `[client]`, `[pacing]` and `[limits]` sections
    pub fn new(config: &Config) -> Result<Self, SieveError> {
        let client = build_http_client(&config.client)?;
        // A trailing slash makes `Url::join` append rather than replace
        let base_url = Url::parse(&format!(
            "{}/",
            config.client.base_url.trim_end_matches('/')
        ))?;

        Ok(Self {
            client,
            base_url,
            pacing: config.pacing.clone(),
            limits: config.limits.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a GET and decodes the JSON body
    ///
    /// Throttling responses are waited out per `policy`, re-sending the
    /// identical request each time. Nothing else is retried.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        policy: &ThrottlePolicy,
    ) -> FetchResult<T> {
        let mut retries = 0u32;

        loop {
            tracing::debug!("GET {}", url);

            let response = match self.client.get(url.clone()).send().await {
                Ok(response) => response,
                Err(e) => {
                    return FetchResult::NetworkError {
                        error: describe_network_error(&e),
                    }
                }
            };

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if !policy.allows_retry(retries) {
                    tracing::warn!("Still rate limited after {} retries: {}", retries, url);
                    return FetchResult::HttpError {
                        status_code: status.as_u16(),
                    };
                }
                tracing::warn!(
                    "Rate limited. Waiting {}s before retrying",
                    policy.cooldown.as_secs_f64()
                );
                tokio::time::sleep(policy.cooldown).await;
                retries += 1;
                continue;
            }

            if !status.is_success() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            let body = match response.bytes().await {
                Ok(body) => body,
                Err(e) => {
                    return FetchResult::NetworkError {
                        error: describe_network_error(&e),
                    }
                }
            };

            return match serde_json::from_slice::<T>(&body) {
                Ok(value) => FetchResult::Success(value),
                Err(e) => FetchResult::Malformed {
                    error: e.to_string(),
                },
            };
        }
    }
}

fn describe_network_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    }
}
