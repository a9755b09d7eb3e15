//! HTTP Transport
//!
//! reqwest-backed client for the three JSON endpoints.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::StatusCode;
use serde_json::Value;

use super::{ApiRequest, Method, Transport};
use crate::config::ApiConfig;
use crate::error::{SyncError, SyncResult};

pub struct HttpTransport {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpTransport {
    pub fn new(config: ApiConfig) -> SyncResult<Self> {
        config.validate()?;
        Ok(Self {
            client: reqwest::Client::new(),
            config,
        })
    }

    /// Method, URL, `?id=` and JSON body for one request
    fn request(&self, request: &ApiRequest) -> reqwest::RequestBuilder {
        let url = self.config.url_for(request.resource);
        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
            Method::Delete => self.client.delete(url),
        };
        if let Some(id) = request.id {
            builder = builder.query(&[("id", id)]);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        builder
    }
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> SyncResult<Value> {
        debug!("[HTTP] {}", request);
        let response = self.request(&request).send().await.map_err(|e| {
            warn!("[HTTP] {} failed: {}", request, e);
            SyncError::Transport(e.to_string())
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        read_response(status, &text).inspect_err(|err| warn!("[HTTP] {} -> {}", request, err))
    }
}

/// Non-2xx becomes `Status`, an empty body `null`, anything else must be JSON
fn read_response(status: StatusCode, text: &str) -> SyncResult<Value> {
    if !status.is_success() {
        let message = error_message(text)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        return Err(SyncError::Status {
            status: status.as_u16(),
            message,
        });
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(text)?)
}

/// Pull `{"error": "..."}` out of a failure body, falling back to the raw text
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => Some(body.to_string()),
    }
}
