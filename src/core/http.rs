use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::core::error::{ApiError, ApiResult};

pub const APP_USER_AGENT: &str = "minecraft-api/0.1.0";

/// `None` keeps reqwest's default of no overall request deadline.
pub fn build_http_client(
    user_agent: &str,
    timeout: Option<Duration>,
) -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let mut builder = Client::builder()
        .user_agent(user_agent)
        .default_headers(default_headers);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

/// Send `request` and decode a JSON body.
///
/// `404` is `Ok(None)`; any other non-success status becomes
/// `UpstreamUnavailable` tagged with `source`.
pub async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    source: &str,
) -> ApiResult<Option<T>> {
    let Some(resp) = send(request, source).await? else {
        return Ok(None);
    };
    let body: T = resp.json().await?;
    Ok(Some(body))
}

/// Like [`fetch_json`] but returns the raw body text.
pub async fn fetch_text(request: RequestBuilder, source: &str) -> ApiResult<Option<String>> {
    let Some(resp) = send(request, source).await? else {
        return Ok(None);
    };
    Ok(Some(resp.text().await?))
}

async fn send(request: RequestBuilder, source: &str) -> ApiResult<Option<reqwest::Response>> {
    let resp = request.send().await?;
    let status = resp.status();
    debug!("{source}: {} -> {status}", resp.url());

    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(ApiError::upstream(source, format!("HTTP {status}")));
    }
    Ok(Some(resp))
}
