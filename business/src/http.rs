//! Platform-abstracted HTTP client with Send-safe futures.
//!
//! On native targets requests go straight through `reqwest`. On WASM,
//! `reqwest::Response` is not `Send` (it wraps JS values), so the request is
//! spawned on the JS thread with `wasm_bindgen_futures::spawn_local` and the
//! result is handed back through a `flume` channel.
//!
//! Either way the caller gets a plain [`Response`] holding only owned bytes,
//! which lets the users controller move fetch futures onto background tasks.

use std::collections::HashMap;

use thiserror::Error;

/// HTTP method for requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A simplified HTTP response that contains only Send-safe data.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers (lowercased keys)
    pub headers: HashMap<String, String>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

impl Response {
    /// Returns true if the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    /// Attempt to deserialize the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Consume the response and keep only the body.
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

/// Transport-level failure: the request never produced a response.
#[derive(Debug, Clone, Error)]
#[error("HTTP error: {message}")]
pub struct HttpError {
    pub message: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result type for HTTP operations.
pub type HttpResult<T> = Result<T, HttpError>;

/// A builder for constructing HTTP requests.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: String,
    query: Vec<(String, String)>,
    headers: HashMap<String, String>,
    body: Option<Vec<u8>>,
}

impl RequestBuilder {
    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Append a query parameter. Values are percent-encoded when sent.
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Add a header to the request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        let json_bytes = serde_json::to_vec(value)?;
        self.body = Some(json_bytes);
        Ok(self.header("content-type", "application/json"))
    }

    /// Send the request.
    pub async fn send(self) -> HttpResult<Response> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.execute().await
        }

        #[cfg(target_arch = "wasm32")]
        {
            self.send_wasm().await
        }
    }

    #[cfg(target_arch = "wasm32")]
    async fn send_wasm(self) -> HttpResult<Response> {
        let (tx, rx) = flume::bounded::<HttpResult<Response>>(1);

        // The closure is not Send; spawn_local does not need it to be.
        wasm_bindgen_futures::spawn_local(async move {
            let result = self.execute().await;
            if tx.send_async(result).await.is_err() {
                log::debug!("HTTP response dropped, receiver is gone");
            }
        });

        rx.recv_async()
            .await
            .map_err(|_| HttpError::new("Request cancelled"))?
    }

    async fn execute(self) -> HttpResult<Response> {
        let client = reqwest::Client::new();

        let mut request = match self.method {
            Method::Get => client.get(&self.url),
            Method::Post => client.post(&self.url),
        };

        if !self.query.is_empty() {
            request = request.query(&self.query);
        }

        for (name, value) in &self.headers {
            request = request.header(name, value);
        }

        if let Some(body) = self.body {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HttpError::new(e.to_string()))?;

        // Status and headers must be read before the body consumes the response.
        let status = response.status().as_u16();
        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.as_str().to_lowercase(), v.to_string());
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError::new(e.to_string()))?
            .to_vec();

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

/// HTTP client with Send-safe futures on all platforms.
///
/// ```ignore
/// use roster_business::http::Client;
///
/// let response = Client::get("https://api.example.com/user/")
///     .query("page", 1)
///     .send()
///     .await?;
/// ```
pub struct Client;

impl Client {
    /// Create a GET request.
    pub fn get(url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(Method::Post, url)
    }
}
