//! HTTP client for the StockGuard backend.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::routes::{Auth, Endpoint};
use crate::session::{SessionContext, SessionError};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Non-2xx response; `message` is what the backend said.
    #[error("{message}")]
    Http { status: u16, message: String },
    /// The request never completed.
    #[error("network error: {0}")]
    Network(String),
    /// 2xx response whose body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Backend-provided message for HTTP errors.
    pub fn http_message(&self) -> Option<&str> {
        match self {
            ApiError::Http { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// How a request body is encoded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum BodyEncoding {
    #[default]
    Json,
    Form,
}

impl core::str::FromStr for BodyEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(BodyEncoding::Json),
            "form" | "urlencoded" => Ok(BodyEncoding::Form),
            other => Err(format!("expected `json` or `form`, got `{other}`")),
        }
    }
}

/// Ordered query parameters. Blank values are kept, never dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

/// Client for the backend, bound to one session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: SessionContext) -> Self {
        Self::with_http(reqwest::Client::new(), base_url, session)
    }

    pub fn with_http(
        http: reqwest::Client,
        base_url: impl Into<String>,
        session: SessionContext,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `endpoint` with `params` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        params: &QueryParams,
    ) -> ApiResult<T> {
        let resp = self
            .execute(endpoint, endpoint.path, |req| req.query(params.as_pairs()))
            .await?;
        decode_json(resp).await
    }

    /// GET `endpoint` with `params` and return the raw body.
    pub async fn get_bytes(&self, endpoint: &Endpoint, params: &QueryParams) -> ApiResult<Vec<u8>> {
        let resp = self
            .execute(endpoint, endpoint.path, |req| req.query(params.as_pairs()))
            .await?;
        read_bytes(resp).await
    }

    /// Send `body` to `path` and return the raw reply, e.g. a generated file.
    pub async fn send_for_bytes<B>(
        &self,
        endpoint: &Endpoint,
        path: &str,
        body: &B,
        encoding: BodyEncoding,
    ) -> ApiResult<Vec<u8>>
    where
        B: Serialize + ?Sized,
    {
        let resp = self
            .execute(endpoint, path, |req| attach_body(req, body, encoding))
            .await?;
        read_bytes(resp).await
    }

    /// Send `body` to `path` (a resolved `endpoint` path) and decode the JSON reply.
    pub async fn send_json<B, T>(
        &self,
        endpoint: &Endpoint,
        path: &str,
        body: &B,
        encoding: BodyEncoding,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .execute(endpoint, path, |req| attach_body(req, body, encoding))
            .await?;
        decode_json(resp).await
    }

    /// Send an optional body and return the `message` of the reply, if any.
    ///
    /// For routes whose success body is informational (or empty).
    pub async fn send_for_message<B>(
        &self,
        endpoint: &Endpoint,
        path: &str,
        body: Option<&B>,
        encoding: BodyEncoding,
    ) -> ApiResult<Option<String>>
    where
        B: Serialize + ?Sized,
    {
        let resp = self
            .execute(endpoint, path, |req| match body {
                Some(body) => attach_body(req, body, encoding),
                None => req,
            })
            .await?;
        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(message_field(&text))
    }

    /// Build, authenticate and send a request; non-2xx becomes [`ApiError::Http`].
    async fn execute<F>(
        &self,
        endpoint: &Endpoint,
        path: &str,
        prepare: F,
    ) -> ApiResult<reqwest::Response>
    where
        F: FnOnce(reqwest::RequestBuilder) -> reqwest::RequestBuilder,
    {
        let url = self.url(path);
        let mut req = self.http.request(endpoint.method.as_reqwest(), &url);

        if endpoint.auth == Auth::OptionalBearer {
            if let Some(token) = self.session.token() {
                req = req.bearer_auth(token);
            }
        }

        tracing::debug!(method = ?endpoint.method, %url, "sending request");

        let resp = prepare(req)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_default();
        let message = message_field(&text).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
        tracing::debug!(status = status.as_u16(), %url, %message, "request rejected");
        Err(ApiError::Http {
            status: status.as_u16(),
            message,
        })
    }
}

fn attach_body<B: Serialize + ?Sized>(
    req: reqwest::RequestBuilder,
    body: &B,
    encoding: BodyEncoding,
) -> reqwest::RequestBuilder {
    match encoding {
        BodyEncoding::Json => req.json(body),
        BodyEncoding::Form => req.form(body),
    }
}

async fn read_bytes(resp: reqwest::Response) -> ApiResult<Vec<u8>> {
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    Ok(bytes.to_vec())
}

async fn decode_json<T: DeserializeOwned>(resp: reqwest::Response) -> ApiResult<T> {
    let text = resp
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}

/// `message` of a JSON body, falling back to `error`.
fn message_field(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_prefers_message_over_error() {
        assert_eq!(
            message_field(r#"{"message":"invalid token","error":"x"}"#).as_deref(),
            Some("invalid token")
        );
        assert_eq!(
            message_field(r#"{"error":"Inventory item not found"}"#).as_deref(),
            Some("Inventory item not found")
        );
        assert_eq!(message_field("<html>oops</html>"), None);
        assert_eq!(message_field(r#"{"message":42}"#), None);
    }

    #[test]
    fn query_params_keep_blank_values_in_order() {
        let params = QueryParams::new()
            .with("material", "")
            .with("product_name", "")
            .with("location", "");
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("product_name"), Some(""));
        let keys: Vec<_> = params.as_pairs().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["material", "product_name", "location"]);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:5000/", SessionContext::in_memory());
        assert_eq!(client.url("/search"), "http://localhost:5000/search");
    }

    #[test]
    fn encoding_parsing() {
        assert_eq!("JSON".parse::<BodyEncoding>().unwrap(), BodyEncoding::Json);
        assert_eq!("form".parse::<BodyEncoding>().unwrap(), BodyEncoding::Form);
        assert!("xml".parse::<BodyEncoding>().is_err());
    }
}
