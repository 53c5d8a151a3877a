//! HTTP client wrapper: request construction, bearer injection and response normalization

use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

use crate::auth::SessionContext;
use crate::config::ClientOptions;
use crate::error::{Error, FieldError, Result};

/// Message used when a 401 carries no body of its own
const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

/// Ordered query parameters, passed through to the backend as given
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an existing value in place
    pub fn with<V: ToString>(mut self, key: &str, value: V) -> Self {
        self.set(key, value);
        self
    }

    pub fn set<V: ToString>(&mut self, key: &str, value: V) {
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    /// Free-text search filter
    pub fn search(self, text: &str) -> Self {
        self.with("search", text)
    }

    /// Status filter
    pub fn status(self, status: &str) -> Self {
        self.with("status", status)
    }

    pub fn page(self, page: u32) -> Self {
        self.with("page", page)
    }

    pub fn limit(self, limit: u32) -> Self {
        self.with("limit", limit)
    }

    /// The `page` value, if present and numeric
    pub fn page_number(&self) -> Option<u32> {
        self.get("page").and_then(|p| p.parse().ok())
    }

    /// The `limit` value, if present and numeric
    pub fn limit_number(&self) -> Option<u32> {
        self.get("limit").and_then(|l| l.parse().ok())
    }

    /// Overlay `other` on top of these params
    pub fn merge(&mut self, other: &Params) {
        for (key, value) in &other.pairs {
            self.set(key, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: ToString, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.set(&key.to_string(), value);
        }
        params
    }
}

/// Error body the backend sends with non-2xx answers
#[derive(Debug, Default)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
    errors: Vec<FieldError>,
}

impl ErrorBody {
    /// Read what can be read; a malformed `errors` entry never hides `message`
    fn parse(text: &str) -> Self {
        let text = text.trim();
        let map = match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => map,
            _ if text.is_empty() => return ErrorBody::default(),
            _ => {
                return ErrorBody {
                    message: Some(text.to_string()),
                    ..ErrorBody::default()
                }
            }
        };

        let string_at = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
        let errors = match map.get("errors") {
            Some(Value::Array(entries)) => entries.iter().filter_map(field_error).collect(),
            _ => Vec::new(),
        };

        ErrorBody {
            message: string_at("message"),
            error: string_at("error"),
            errors,
        }
    }
}

/// One `errors` entry: a bare string or an object with a message under
/// `msg`, `message` or `error`
fn field_error(entry: &Value) -> Option<FieldError> {
    match entry {
        Value::String(message) => Some(FieldError {
            field: None,
            message: message.clone(),
        }),
        Value::Object(map) => Some(FieldError {
            field: first_string(map, &["param", "path", "field"]),
            message: first_string(map, &["msg", "message", "error"])?,
        }),
        _ => None,
    }
}

fn first_string(map: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Single point of outbound request construction.
///
/// Every request gets the base URL, the configured timeout and, when the
/// session holds one, `Authorization: Bearer <token>`. A 401 answer clears the
/// session and redirects to the login route before the call returns.
#[derive(Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
    session: Arc<SessionContext>,
}

impl HttpClient {
    /// Build a client using `options` and the shared session
    pub fn new(options: &ClientOptions, session: Arc<SessionContext>) -> Result<Self> {
        let client = Client::builder().timeout(options.request_timeout).build()?;
        Ok(Self {
            base_url: options.base_url.trim_end_matches('/').to_string(),
            client,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub fn get(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::GET)
    }

    pub fn post(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::POST)
    }

    pub fn put(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::PUT)
    }

    pub fn patch(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::PATCH)
    }

    pub fn delete(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::DELETE)
    }

    /// Issue one request and return the decoded response body
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        params: Option<&Params>,
    ) -> Result<T> {
        let mut fetch = FetchBuilder::new(self, path, method);
        if let Some(params) = params {
            fetch = fetch.query(params);
        }
        if let Some(body) = body {
            fetch = fetch.json(&body)?;
        }
        fetch.execute().await
    }
}

/// Helper for building and executing one request
pub struct FetchBuilder<'a> {
    http: &'a HttpClient,
    path: String,
    segments: Vec<String>,
    method: Method,
    headers: HeaderMap,
    query_params: Params,
    body: Option<Vec<u8>>,
}

impl<'a> FetchBuilder<'a> {
    fn new(http: &'a HttpClient, path: &str, method: Method) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        Self {
            http,
            path: path.to_string(),
            segments: Vec::new(),
            method,
            headers,
            query_params: Params::new(),
            body: None,
        }
    }

    /// Add a header to the request
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => warn!("dropping invalid header {}", name),
        }
        self
    }

    /// Append one path segment; `/`, `?` and `#` inside it are percent-encoded
    pub fn segment(mut self, segment: &str) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    /// Add query parameters to the request
    pub fn query(mut self, params: &Params) -> Self {
        self.query_params.merge(params);
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    fn build(&self) -> Result<reqwest::RequestBuilder> {
        let mut url = Url::parse(&self.http.url(&self.path))?;
        if !self.segments.is_empty() {
            url.path_segments_mut()
                .map_err(|_| Error::general("base URL cannot take path segments"))?
                .pop_if_empty()
                .extend(&self.segments);
        }
        if !self.query_params.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in self.query_params.iter() {
                query_pairs.append_pair(key, value);
            }
        }

        let mut headers = self.headers.clone();
        if let Some(token) = self.http.session.token() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| Error::general("persisted token is not a valid header value"))?;
            headers.insert(AUTHORIZATION, value);
        }

        debug!("{} {}", self.method, url);
        let mut req = self.http.client.request(self.method.clone(), url.as_str());
        req = req.headers(headers);
        if let Some(body) = &self.body {
            req = req.body(body.clone());
        }
        Ok(req)
    }

    /// Send the request; non-2xx answers become errors
    pub async fn execute_raw(&self) -> Result<Response> {
        let response = self.build()?.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            let body = read_error_body(response).await;
            self.http.session.expire();
            return Err(Error::Unauthorized {
                message: body
                    .message
                    .or(body.error)
                    .unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_string()),
            });
        }

        if !status.is_success() {
            let body = read_error_body(response).await;
            return Err(Error::Api {
                status: status.as_u16(),
                message: body.message.or(body.error).unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("Request failed with status {}", status))
                }),
                errors: body.errors,
            });
        }

        Ok(response)
    }

    /// Send the request and decode the body as JSON
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<T> {
        let response = self.execute_raw().await?;
        let text = response.text().await?;

        // 204 and friends: decode as null, or as a bare success envelope
        if text.trim().is_empty() {
            return serde_json::from_value(Value::Null)
                .or_else(|_| serde_json::from_value(serde_json::json!({ "success": true })))
                .map_err(Error::from);
        }

        Ok(serde_json::from_str(&text)?)
    }
}

async fn read_error_body(response: Response) -> ErrorBody {
    let text = match response.text().await {
        Ok(text) => text,
        Err(err) => {
            warn!("failed to read error body: {}", err);
            return ErrorBody::default();
        }
    };
    ErrorBody::parse(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn params_keep_order_and_replace_in_place() {
        let mut params = Params::new().search("truck").status("active").limit(10);
        params.merge(&Params::new().status("maintenance").page(2));

        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("search", "truck"),
                ("status", "maintenance"),
                ("limit", "10"),
                ("page", "2")
            ]
        );
        assert_eq!(params.page_number(), Some(2));
        assert_eq!(params.limit_number(), Some(10));
    }

    #[test]
    fn urls_join_with_single_slash() {
        let options = ClientOptions::default().with_base_url("http://fleet.test/api/");
        let http = HttpClient::new(&options, Arc::new(SessionContext::in_memory())).unwrap();
        assert_eq!(http.url("/vehicles"), "http://fleet.test/api/vehicles");
        assert_eq!(http.url("vehicles/1"), "http://fleet.test/api/vehicles/1");
    }

    #[test]
    fn error_body_accepts_string_errors() {
        let text = json!({
            "success": false,
            "message": "Validation failed",
            "errors": ["License plate is required"]
        });
        let body = ErrorBody::parse(&text.to_string());
        assert_eq!(body.message.as_deref(), Some("Validation failed"));
        assert_eq!(body.errors.len(), 1);
        assert_eq!(body.errors[0].field, None);
        assert_eq!(body.errors[0].message, "License plate is required");
    }

    #[test]
    fn error_body_skips_unreadable_entries() {
        let text = json!({
            "message": "Validation failed",
            "errors": [{"field": "licensePlate", "error": "required"}, {"field": "vin"}, 42]
        });
        let body = ErrorBody::parse(&text.to_string());
        assert_eq!(body.message.as_deref(), Some("Validation failed"));
        assert_eq!(body.errors.len(), 1);
        assert_eq!(body.errors[0].field.as_deref(), Some("licensePlate"));
        assert_eq!(body.errors[0].message, "required");
    }

    #[test]
    fn error_body_falls_back_to_raw_text_only_for_non_json() {
        let body = ErrorBody::parse("Bad Gateway\n");
        assert_eq!(body.message.as_deref(), Some("Bad Gateway"));

        let body = ErrorBody::parse(r#"{"error":"Not allowed","errors":"oops"}"#);
        assert_eq!(body.message, None);
        assert_eq!(body.error.as_deref(), Some("Not allowed"));
        assert!(body.errors.is_empty());

        assert!(ErrorBody::parse("  ").message.is_none());
    }

    #[test]
    fn segments_are_percent_encoded() {
        let options = ClientOptions::default().with_base_url("http://fleet.test/api");
        let http = HttpClient::new(&options, Arc::new(SessionContext::in_memory())).unwrap();
        let request = http
            .patch("/trips")
            .segment("a/b?c#d")
            .segment("cancel")
            .build()
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.url().path(), "/api/trips/a%2Fb%3Fc%23d/cancel");
        assert_eq!(request.url().query(), None);
    }
}
