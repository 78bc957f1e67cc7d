//! HTTP façade shared by every service client.
//!
//! A [`ServiceClient`] owns one endpoint + key pair, attaches the
//! subscription headers to each request, enforces the optional per-request
//! timeout, and maps every non-success outcome onto [`CogError`].

use std::fmt;
use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::{multipart::Form, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{CogError, CogResult};
use crate::types::ServiceCredentials;

pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
pub const SUBSCRIPTION_REGION_HEADER: &str = "Ocp-Apim-Subscription-Region";
pub const OPERATION_LOCATION_HEADER: &str = "Operation-Location";

/// One configured connection to a remote analysis service.
#[derive(Clone)]
pub struct ServiceClient {
    client: Client,
    service: String,
    endpoint: String,
    api_key: String,
    key_header: String,
    region: Option<String>,
    timeout: Option<Duration>,
}

impl fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClient")
            .field("service", &self.service)
            .field("endpoint", &self.endpoint)
            .field("api_key", &"***")
            .field("region", &self.region)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ServiceClient {
    /// Validate the endpoint and key and build a client. Performs no I/O.
    pub fn new(service: impl Into<String>, endpoint: &str, api_key: &str) -> CogResult<Self> {
        let service = service.into();
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(CogError::configuration(format!(
                "{service}:Endpoint is not configured"
            )));
        }
        if api_key.trim().is_empty() {
            return Err(CogError::configuration(format!(
                "{service}:ApiKey is not configured"
            )));
        }
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(CogError::configuration(format!(
                "{service}:Endpoint must be an http(s) URL, got '{endpoint}'"
            )));
        }

        Ok(Self {
            client: Client::new(),
            service,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            key_header: SUBSCRIPTION_KEY_HEADER.to_string(),
            region: None,
            timeout: None,
        })
    }

    pub fn from_credentials(
        service: impl Into<String>,
        credentials: &ServiceCredentials,
    ) -> CogResult<Self> {
        let client = Self::new(service, &credentials.endpoint, &credentials.api_key)?;
        Ok(match &credentials.region {
            Some(region) => client.with_region(region.clone()),
            None => client,
        })
    }

    pub fn with_key_header(mut self, header: impl Into<String>) -> Self {
        self.key_header = header.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        let region = region.into();
        self.region = (!region.trim().is_empty()).then_some(region);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Absolute URL for a path, or the input itself when already absolute
    /// (`nextLink`, `Operation-Location`).
    pub fn url(&self, path_or_url: &str) -> String {
        if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
            path_or_url.to_string()
        } else if path_or_url.starts_with('/') {
            format!("{}{}", self.endpoint, path_or_url)
        } else {
            format!("{}/{}", self.endpoint, path_or_url)
        }
    }

    /// Start a request carrying the subscription headers and timeout.
    pub fn request(&self, method: Method, path_or_url: &str) -> RequestBuilder {
        let url = self.url(path_or_url);
        debug!(service = %self.service, %method, url = %url, "Building request");
        let mut req = self
            .client
            .request(method, url)
            .header(self.key_header.as_str(), &self.api_key);
        if let Some(region) = &self.region {
            req = req.header(SUBSCRIPTION_REGION_HEADER, region);
        }
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        req
    }

    /// Send a request; non-2xx responses become [`CogError::RemoteService`].
    pub async fn send(&self, operation: &str, req: RequestBuilder) -> CogResult<Response> {
        let started = Instant::now();
        let resp = req
            .send()
            .await
            .map_err(|e| self.transport_error(operation, e))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(
                service = %self.service,
                operation,
                status = status.as_u16(),
                "Remote call failed"
            );
            return Err(remote_error(&self.service, resp).await);
        }

        info!(
            service = %self.service,
            operation,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Remote call completed"
        );
        Ok(resp)
    }

    pub async fn read_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        resp: Response,
    ) -> CogResult<T> {
        let body = self.read_bytes(operation, resp).await?;
        serde_json::from_slice(&body).map_err(|e| CogError::Decode {
            operation: operation.to_string(),
            message: e.to_string(),
        })
    }

    pub async fn read_bytes(&self, operation: &str, resp: Response) -> CogResult<Bytes> {
        resp.bytes()
            .await
            .map_err(|e| self.transport_error(operation, e))
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        path_or_url: &str,
    ) -> CogResult<T> {
        let resp = self
            .send(operation, self.request(Method::GET, path_or_url))
            .await?;
        self.read_json(operation, resp).await
    }

    pub async fn post_json<B, T>(&self, operation: &str, path: &str, body: &B) -> CogResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.post_json_response(operation, path, body).await?;
        self.read_json(operation, resp).await
    }

    /// POST JSON and hand back the raw response (status codes, headers).
    pub async fn post_json_response<B>(
        &self,
        operation: &str,
        path: &str,
        body: &B,
    ) -> CogResult<Response>
    where
        B: Serialize + ?Sized,
    {
        self.send(operation, self.request(Method::POST, path).json(body))
            .await
    }

    pub async fn patch_json_response<B>(
        &self,
        operation: &str,
        path: &str,
        body: &B,
    ) -> CogResult<Response>
    where
        B: Serialize + ?Sized,
    {
        // The blocklist API wants merge-patch semantics.
        let req = self
            .request(Method::PATCH, path)
            .header("Content-Type", "application/merge-patch+json")
            .body(serde_json::to_vec(body).map_err(anyhow::Error::from)?);
        self.send(operation, req).await
    }

    pub async fn post_bytes<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        data: Bytes,
        content_type: &str,
    ) -> CogResult<T> {
        let resp = self
            .post_bytes_response(operation, path, data, content_type)
            .await?;
        self.read_json(operation, resp).await
    }

    pub async fn post_bytes_response(
        &self,
        operation: &str,
        path: &str,
        data: Bytes,
        content_type: &str,
    ) -> CogResult<Response> {
        let req = self
            .request(Method::POST, path)
            .header("Content-Type", content_type)
            .body(data);
        self.send(operation, req).await
    }

    pub async fn post_multipart_response(
        &self,
        operation: &str,
        path: &str,
        form: Form,
    ) -> CogResult<Response> {
        self.send(operation, self.request(Method::POST, path).multipart(form))
            .await
    }

    pub async fn delete(&self, operation: &str, path: &str) -> CogResult<()> {
        self.send(operation, self.request(Method::DELETE, path))
            .await
            .map(|_| ())
    }

    fn transport_error(&self, operation: &str, source: reqwest::Error) -> CogError {
        if source.is_timeout() {
            CogError::Timeout {
                operation: operation.to_string(),
                after: self.timeout.unwrap_or_default(),
            }
        } else {
            CogError::Transport {
                operation: operation.to_string(),
                source,
            }
        }
    }
}

/// Header value of `Operation-Location`, required on 202 responses.
pub fn operation_location(operation: &str, resp: &Response) -> CogResult<String> {
    resp.headers()
        .get(OPERATION_LOCATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| CogError::Decode {
            operation: operation.to_string(),
            message: format!("response is missing the {OPERATION_LOCATION_HEADER} header"),
        })
}

/// Build a [`CogError::RemoteService`] from a failed response.
pub async fn remote_error(service: &str, resp: Response) -> CogError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let (code, message) = parse_error_envelope(&body);
    let message = message.unwrap_or_else(|| {
        if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        } else {
            body.clone()
        }
    });
    CogError::RemoteService {
        service: service.to_string(),
        status: status.as_u16(),
        code,
        message,
        body,
    }
}

/// Extract `(code, message)` from `{"error":{...}}` or a top-level `{code, message}`.
pub fn parse_error_envelope(body: &str) -> (Option<String>, Option<String>) {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return (None, None);
    };
    let inner = value
        .get("error")
        .filter(|e| e.is_object())
        .unwrap_or(&value);
    let code = inner.get("code").and_then(|c| match c {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });
    let message = inner
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string);
    (code, message)
}
