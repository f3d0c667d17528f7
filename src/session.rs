//! HTTP session abstraction used by the extractors.
//!
//! The extractors only need "GET this URL, give me the body as text"; the
//! [`HttpSession`] trait keeps them independent of the transport so tests can
//! drive them with canned pages.

use crate::config::Config;
use crate::cookies::load_cookie_jar;
use crate::error::ListerError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// A transport able to fetch a URL and return the decoded body.
#[async_trait]
pub trait HttpSession: Send + Sync {
    /// Performs a GET request and returns the response body as text.
    async fn get_text(&self, url: &str) -> Result<String, ListerError>;
}

/// [`HttpSession`] backed by a reqwest client.
pub struct ReqwestSession {
    client: reqwest::Client,
    delay_sec: f64,
}

impl ReqwestSession {
    /// Wraps an existing client with no delay between requests.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            delay_sec: 0.0,
        }
    }

    /// Builds a session from the configuration, loading the cookie file if set.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.site.user_agent.as_str())
            .timeout(Duration::from_secs(config.http.timeout_sec));

        builder = match &config.http.cookie_file {
            Some(path) => builder.cookie_provider(Arc::new(load_cookie_jar(path)?)),
            None => builder.cookie_store(true),
        };

        Ok(Self {
            client: builder.build()?,
            delay_sec: config.http.delay_between_requests_sec,
        })
    }
}

#[async_trait]
impl HttpSession for ReqwestSession {
    async fn get_text(&self, url: &str) -> Result<String, ListerError> {
        rate_limit(self.delay_sec).await;
        log::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ListerError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Applies rate limiting delay.
async fn rate_limit(delay_sec: f64) {
    if delay_sec > 0.0 {
        tokio::time::sleep(Duration::from_secs_f64(delay_sec)).await;
    }
}
