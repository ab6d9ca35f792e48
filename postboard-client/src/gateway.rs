use crate::{
    config::GatewayConfig,
    error::{GatewayError, Result},
    resources::{Posts, Users},
    retry::{RetryPolicy, retry},
};
use reqwest::{
    Client, Method, Response,
    header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tokio::time::timeout;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout and retry settings of a single [`Gateway::fetch_resource`] call.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct FetchOptions {
    /// Upper bound for one attempt, from sending the request to having read the whole body.
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

/// Method, headers and optional JSON body of an outgoing request.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

impl RequestOptions {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body).map_err(GatewayError::Encode)?);
        Ok(self)
    }

    /// Whether the request creates, changes or removes something on the server.
    #[must_use]
    pub fn is_write(&self) -> bool {
        matches!(
            self.method,
            Method::POST | Method::PUT | Method::PATCH | Method::DELETE
        )
    }
}

/// A successful response body.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Payload<T> {
    /// The response declared JSON and decoded into `T`.
    Json(T),
    /// Any other content type. The body bytes are passed through untouched, whatever charset the
    /// response declared.
    Text { content_type: String, body: Vec<u8> },
}

impl<T> Payload<T> {
    /// The text body, if it is valid UTF-8. Always `None` for JSON payloads.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Payload::Json(_) => None,
            Payload::Text { body, .. } => std::str::from_utf8(body).ok(),
        }
    }

    pub fn into_json(self) -> Result<T> {
        match self {
            Payload::Json(value) => Ok(value),
            Payload::Text { content_type, body } => {
                Err(GatewayError::NotJson { content_type, body })
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Gateway {
    http: Client,
    base_url: String,
    options: FetchOptions,
    retry_writes: bool,
}

impl Gateway {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        Ok(Self::with_client(Client::builder().build()?, config))
    }

    #[must_use]
    pub fn with_client(http: Client, config: &GatewayConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            options: config.fetch_options(),
            retry_writes: config.retry_writes,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn options(&self) -> FetchOptions {
        self.options
    }

    #[must_use]
    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    #[must_use]
    pub fn posts(&self) -> Posts<'_> {
        Posts::new(self)
    }

    /// Performs the request, retrying timeouts, network failures and error statuses with
    /// exponential backoff as configured in `options`.
    ///
    /// A `content-type` containing `application/json` is decoded into `T`; every other
    /// successful body is returned as text. Decoding failures are not retried.
    pub async fn fetch_resource<T: DeserializeOwned>(
        &self,
        url: &str,
        request: &RequestOptions,
        options: FetchOptions,
    ) -> Result<Payload<T>> {
        retry(options.retry, move || async move {
            timeout(options.timeout, self.attempt(url, request))
                .await
                .unwrap_or_else(|_elapsed| Err(GatewayError::Timeout(options.timeout)))
        })
        .await
    }

    /// Calls `{base_url}{path}` with the gateway's options and requires a JSON answer. Writes
    /// only get retries if the gateway was configured with `retry_writes`.
    pub(crate) async fn fetch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestOptions,
    ) -> Result<T> {
        let mut options = self.options;
        if request.is_write() && !self.retry_writes {
            options.retry = options.retry.without_retries();
        }

        let url = format!("{}{path}", self.base_url);
        self.fetch_resource(&url, &request, options)
            .await?
            .into_json()
    }

    async fn attempt<T: DeserializeOwned>(
        &self,
        url: &str,
        request: &RequestOptions,
    ) -> Result<Payload<T>> {
        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = if body.is_empty() {
                status.canonical_reason().unwrap_or_default().to_owned()
            } else {
                body
            };
            return Err(GatewayError::HttpStatus { code: status, body });
        }

        let content_type = content_type(&response);
        if content_type.contains("application/json") {
            let bytes = response.bytes().await?;
            let value = serde_json::from_slice(&bytes).map_err(GatewayError::Decode)?;
            Ok(Payload::Json(value))
        } else {
            let body = response.bytes().await?.to_vec();
            Ok(Payload::Text { content_type, body })
        }
    }
}

fn content_type(response: &Response) -> String {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}
