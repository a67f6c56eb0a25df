use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;

use crate::config::AppConfig;

#[derive(Debug)]
pub enum FetchError {
    MissingKey(&'static str),
    Http(reqwest::Error),
    Status(StatusCode),
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::MissingKey(name) => write!(f, "{} not configured", name),
            FetchError::Http(err) => write!(f, "HTTP error: {}", err),
            FetchError::Status(status) => write!(f, "Upstream returned status: {}", status),
            FetchError::Decode(err) => write!(f, "Malformed response: {}", err),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Http(err)
    }
}

/// Shared outbound client: bounded timeout and an identifying user agent.
pub fn build_client(config: &AppConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(config.request_timeout)
        .user_agent(config.user_agent.clone())
        .build()
}

/// GET `url` with form-encoded query pairs and decode a JSON body.
///
/// Transport errors, non-2xx statuses and undecodable bodies all come back
/// as `Err`; callers turn them into their own empty result.
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T, FetchError> {
    let response = client.get(url).query(query).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
}

pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
