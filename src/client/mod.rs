use std::fmt;
use std::time::Duration;

use reqwest::{redirect, Proxy};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::pager::Page;

#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub master: String,
    pub timeout_seconds: usize,
    pub proxy: Option<String>,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid master url '{url}': {message}")]
    InvalidMasterUrl { url: String, message: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request failed: {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("server returned {status} for {url}")]
    Status { status: String, url: String },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

// the master emits numbers or preformatted strings depending on the
// field (io speeds are strings, percentages are floats), so display
// cells stay loosely typed
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum WireValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Default for WireValue {
    fn default() -> Self {
        WireValue::Null
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireValue::Null => Ok(()),
            WireValue::Bool(value) => write!(f, "{value}"),
            WireValue::Number(value) => {
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    write!(f, "{}", *value as i64)
                } else {
                    write!(f, "{value}")
                }
            }
            WireValue::Text(value) => f.write_str(value),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MasterClient {
    http: reqwest::Client,
    base: String,
}

impl MasterClient {
    pub fn new(options: &ClientOptions) -> Result<Self, ClientError> {
        let mut base = options.master.trim().trim_end_matches('/').to_string();
        if base.is_empty() {
            return Err(ClientError::InvalidMasterUrl {
                url: options.master.clone(),
                message: "empty url".to_string(),
            });
        }
        reqwest::Url::parse(&base).map_err(|e| ClientError::InvalidMasterUrl {
            url: options.master.clone(),
            message: e.to_string(),
        })?;
        base.push('/');

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("spiderdeck (terminal console)"),
        );

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .redirect(redirect::Policy::limited(10))
            .timeout(Duration::from_secs(options.timeout_seconds as u64))
            .danger_accept_invalid_hostnames(true)
            .danger_accept_invalid_certs(true);
        if let Some(proxy_url) = options.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
            let proxy = Proxy::all(proxy_url).map_err(|source| ClientError::ProxySetup {
                proxy: proxy_url.to_string(),
                source,
            })?;
            builder = builder.proxy(proxy);
        }
        let http = builder
            .build()
            .map_err(|source| ClientError::HttpClientBuild { source })?;

        Ok(Self { http, base })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    // form-encoded POST; an empty, null or {} body reads as "nothing to
    // show, try again" rather than an error
    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<Option<T>, ClientError> {
        let url = self.endpoint(path);
        let response = self
            .http
            .post(&url)
            .form(form)
            .send()
            .await
            .map_err(|source| ClientError::Request {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.to_string(),
                url,
            });
        }
        let body = response.text().await.map_err(|source| ClientError::Request {
            url: url.clone(),
            source,
        })?;
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" || trimmed == "{}" {
            return Ok(None);
        }
        serde_json::from_str(trimmed)
            .map(Some)
            .map_err(|source| ClientError::Decode { url, source })
    }

    pub async fn search(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<Option<Page<serde_json::Value>>, ClientError> {
        self.post_form(path, form).await
    }

    pub async fn fetch_status<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<Option<T>, ClientError> {
        self.post_form(path, form).await
    }

    // cascading dropdown feeds; a missing payload is just an empty list
    pub async fn option_values(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<Vec<String>, ClientError> {
        let values: Option<Vec<String>> = self.post_form(path, form).await?;
        Ok(values.unwrap_or_default())
    }

    pub async fn submit(&self, path: &str, form: &[(&str, String)]) -> Result<(), ClientError> {
        let url = self.endpoint(path);
        let response = self
            .http
            .post(&url)
            .form(form)
            .send()
            .await
            .map_err(|source| ClientError::Request {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.to_string(),
                url,
            });
        }
        Ok(())
    }

    // the destructive endpoints are plain navigable links
    pub async fn follow_link(&self, path: &str) -> Result<(), ClientError> {
        let url = self.endpoint(path);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Request {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.to_string(),
                url,
            });
        }
        Ok(())
    }

    pub async fn fetch_text(&self, path: &str) -> Result<String, ClientError> {
        let url = self.endpoint(path);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Request {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.to_string(),
                url,
            });
        }
        response.text().await.map_err(|source| ClientError::Request { url, source })
    }
}
