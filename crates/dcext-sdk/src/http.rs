//! HTTP calls tunnelled through the host.
//!
//! The extension cannot reach the API directly; it hands a request
//! descriptor to the host over `http:request` and gets back
//! `{status, data}`. Non-200 statuses are returned as-is: some of them are
//! ordinary business answers, so callers decide via [`HttpResponse::into_ok`].

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use dcext_channel::ClientConnection;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::events::HTTP_REQUEST;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request descriptor forwarded to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpRequest {
    /// Absolute URL.
    pub url: String,
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            headers: None,
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// What the host answered for an [`HttpRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status: u16,
    #[serde(default)]
    pub data: Value,
}

impl HttpResponse {
    /// The body on 200, a [`ApiError::Status`] otherwise.
    pub fn into_ok(self) -> Result<Value, ApiError> {
        if self.status == 200 {
            return Ok(self.data);
        }
        Err(ApiError::Status {
            status: self.status,
            detail: self.detail(),
        })
    }

    /// Human-readable reason for a failed call: the body when there is one,
    /// otherwise the bare status code.
    pub fn detail(&self) -> String {
        match &self.data {
            Value::Null => format!("status code {}", self.status),
            Value::String(body) if body.is_empty() => format!("status code {}", self.status),
            Value::String(body) => body.clone(),
            other => other.to_string(),
        }
    }
}

/// Anything that can carry an [`HttpRequest`] to the remote API.
pub trait HttpRequester: Send + Sync {
    fn request(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send;
}

/// [`HttpRequester`] riding on the host channel.
#[derive(Debug, Clone)]
pub struct HttpClient {
    connection: ClientConnection,
}

impl HttpClient {
    pub fn new(connection: ClientConnection) -> Self {
        Self { connection }
    }
}

impl HttpRequester for HttpClient {
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = %request.method, url = %request.url, "http bridge request");
        let payload = serde_json::to_value(&request)?;
        let answer = self.connection.request(HTTP_REQUEST, Some(payload)).await?;
        let response: HttpResponse = serde_json::from_value(answer)?;
        tracing::debug!(status = response.status, url = %request.url, "http bridge response");
        Ok(response)
    }
}
