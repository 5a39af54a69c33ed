//! Thin HTTP request helper: one request per call, no retries, response
//! returned untouched.

use std::collections::HashMap;
use std::sync::LazyLock;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Request, Response, Url};
use tracing::info;

use crate::errors::UtilError;

static DEFAULT_ADAPTER: LazyLock<HttpAdapter> = LazyLock::new(HttpAdapter::new);

/// Sends requests through one shared `reqwest::Client`.
///
/// Caller headers are sent as given. At send time the transport still adds
/// `host`, `content-length` for bodies and reqwest's `accept: */*` unless the
/// caller supplied its own `accept`; reqwest offers no way to drop that
/// client default.
#[derive(Debug, Clone, Default)]
pub struct HttpAdapter {
    client: Client,
}

impl HttpAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Builds the request without sending it.
    ///
    /// Every header is set verbatim and logged at `info`; nothing else is
    /// added here.
    ///
    /// # Errors
    ///
    /// Returns `RequestBuild` for an unparsable URL or an invalid header.
    pub fn build_request(
        &self,
        url: &str,
        body: Option<Vec<u8>>,
        headers: &HashMap<String, String>,
        method: Method,
    ) -> Result<Request, UtilError> {
        let url = Url::parse(url)
            .map_err(|e| UtilError::RequestBuild(format!("invalid url {url}: {e}")))?;

        let mut header_map = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers {
            info!("k: {} v: {}", name, value);
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| UtilError::RequestBuild(format!("header name {name}: {e}")))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| UtilError::RequestBuild(format!("header {name} value: {e}")))?;
            header_map.insert(header_name, header_value);
        }

        let mut builder = self.client.request(method, url).headers(header_map);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        Ok(builder.build()?)
    }

    /// Builds and sends exactly one request.
    ///
    /// # Errors
    ///
    /// Returns `RequestBuild` if the request cannot be constructed (nothing is
    /// sent) or `HttpError` if the transport fails.
    pub async fn request(
        &self,
        url: &str,
        body: Option<Vec<u8>>,
        headers: &HashMap<String, String>,
        method: Method,
    ) -> Result<Response, UtilError> {
        let request = self.build_request(url, body, headers, method)?;
        Ok(self.client.execute(request).await?)
    }

    /// # Errors
    ///
    /// See [`HttpAdapter::request`].
    pub async fn post(
        &self,
        url: &str,
        body: Option<Vec<u8>>,
        headers: &HashMap<String, String>,
    ) -> Result<Response, UtilError> {
        self.request(url, body, headers, Method::POST).await
    }

    /// # Errors
    ///
    /// See [`HttpAdapter::request`].
    pub async fn get(
        &self,
        url: &str,
        body: Option<Vec<u8>>,
        headers: &HashMap<String, String>,
    ) -> Result<Response, UtilError> {
        self.request(url, body, headers, Method::GET).await
    }

    /// # Errors
    ///
    /// See [`HttpAdapter::request`].
    pub async fn put(
        &self,
        url: &str,
        body: Option<Vec<u8>>,
        headers: &HashMap<String, String>,
    ) -> Result<Response, UtilError> {
        self.request(url, body, headers, Method::PUT).await
    }

    /// # Errors
    ///
    /// See [`HttpAdapter::request`].
    pub async fn patch(
        &self,
        url: &str,
        body: Option<Vec<u8>>,
        headers: &HashMap<String, String>,
    ) -> Result<Response, UtilError> {
        self.request(url, body, headers, Method::PATCH).await
    }

    /// # Errors
    ///
    /// See [`HttpAdapter::request`].
    pub async fn delete(
        &self,
        url: &str,
        body: Option<Vec<u8>>,
        headers: &HashMap<String, String>,
    ) -> Result<Response, UtilError> {
        self.request(url, body, headers, Method::DELETE).await
    }
}

/// `POST` through the process-wide adapter.
///
/// # Errors
///
/// See [`HttpAdapter::request`].
pub async fn post(
    url: &str,
    body: Option<Vec<u8>>,
    headers: &HashMap<String, String>,
) -> Result<Response, UtilError> {
    DEFAULT_ADAPTER.post(url, body, headers).await
}

/// `GET` through the process-wide adapter.
///
/// # Errors
///
/// See [`HttpAdapter::request`].
pub async fn get(
    url: &str,
    body: Option<Vec<u8>>,
    headers: &HashMap<String, String>,
) -> Result<Response, UtilError> {
    DEFAULT_ADAPTER.get(url, body, headers).await
}

/// `PUT` through the process-wide adapter.
///
/// # Errors
///
/// See [`HttpAdapter::request`].
pub async fn put(
    url: &str,
    body: Option<Vec<u8>>,
    headers: &HashMap<String, String>,
) -> Result<Response, UtilError> {
    DEFAULT_ADAPTER.put(url, body, headers).await
}

/// `PATCH` through the process-wide adapter.
///
/// # Errors
///
/// See [`HttpAdapter::request`].
pub async fn patch(
    url: &str,
    body: Option<Vec<u8>>,
    headers: &HashMap<String, String>,
) -> Result<Response, UtilError> {
    DEFAULT_ADAPTER.patch(url, body, headers).await
}

/// `DELETE` through the process-wide adapter.
///
/// # Errors
///
/// See [`HttpAdapter::request`].
pub async fn delete(
    url: &str,
    body: Option<Vec<u8>>,
    headers: &HashMap<String, String>,
) -> Result<Response, UtilError> {
    DEFAULT_ADAPTER.delete(url, body, headers).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url_is_a_build_error() {
        let err = HttpAdapter::new()
            .build_request("not a url", None, &HashMap::new(), Method::GET)
            .unwrap_err();
        assert!(matches!(err, UtilError::RequestBuild(_)));
    }

    #[test]
    fn invalid_header_name_is_a_build_error() {
        let headers = HashMap::from([("bad header".to_string(), "v".to_string())]);
        let err = HttpAdapter::new()
            .build_request("http://localhost/", None, &headers, Method::GET)
            .unwrap_err();
        assert!(matches!(err, UtilError::RequestBuild(ref m) if m.contains("bad header")));
    }

    #[test]
    fn body_is_optional() {
        let adapter = HttpAdapter::new();
        let without = adapter
            .build_request("http://localhost/", None, &HashMap::new(), Method::GET)
            .unwrap();
        assert!(without.body().is_none());
        let with = adapter
            .build_request("http://localhost/", Some(b"{}".to_vec()), &HashMap::new(), Method::POST)
            .unwrap();
        assert_eq!(with.body().and_then(|b| b.as_bytes()), Some(&b"{}"[..]));
    }
}
