//! Transport implementations
//!
//! This module handles every network fetch made for a target URL:
//! - The `Transport` trait the orchestrator talks to
//! - `HttpTransport`: plain HTTP with one client per egress proxy
//! - `RenderTransport`: pages rendered by an external headless-browser service
//! - `build_transport`: resolves the configured variant once, up front

use crate::config::{SessionConfig, TransportKind};
use crate::{ConfigError, HarvestError, TransportError, TransportResult};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Proxy};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use url::Url;

/// One fetch attempt
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub headers: HeaderMap,
    /// Egress proxy for this attempt; `None` means a direct connection
    pub proxy: Option<String>,
    pub timeout: Duration,
}

/// A successful fetch
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub body: String,
    pub elapsed: Duration,
}

/// Fetches a page body
///
/// Implementations perform exactly one attempt; retries are the caller's
/// business.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> TransportResult<FetchResponse>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Builds an HTTP client, optionally routed through `proxy`
///
/// # Arguments
///
/// * `proxy` - Proxy URL applied to all schemes
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Invalid proxy or TLS backend failure
pub fn build_http_client(proxy: Option<&str>) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = proxy {
        builder = builder.proxy(Proxy::all(proxy)?);
    }

    builder.build()
}

/// Plain HTTP transport
///
/// Clients are built once per configured proxy. Any non-2xx response is a
/// failure.
pub struct HttpTransport {
    direct: Client,
    proxied: HashMap<String, Client>,
}

impl HttpTransport {
    /// Creates a transport with a pre-built client for each proxy
    pub fn new(proxies: &[String]) -> TransportResult<Self> {
        let direct = build_http_client(None).map_err(TransportError::ClientBuild)?;

        let mut proxied = HashMap::with_capacity(proxies.len());
        for proxy in proxies {
            let client = build_http_client(Some(proxy)).map_err(TransportError::ClientBuild)?;
            proxied.insert(proxy.clone(), client);
        }

        Ok(Self { direct, proxied })
    }

    fn client_for(&self, proxy: Option<&str>) -> TransportResult<Client> {
        match proxy {
            None => Ok(self.direct.clone()),
            Some(proxy) => match self.proxied.get(proxy) {
                Some(client) => Ok(client.clone()),
                None => {
                    tracing::debug!("Building client for unconfigured proxy {}", proxy);
                    build_http_client(Some(proxy)).map_err(TransportError::ClientBuild)
                }
            },
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, request: FetchRequest) -> TransportResult<FetchResponse> {
        let client = self.client_for(request.proxy.as_deref())?;
        let started = Instant::now();

        let response = client
            .get(&request.url)
            .headers(request.headers)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&request.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: request.url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(&request.url, e))?;

        Ok(FetchResponse {
            body,
            elapsed: started.elapsed(),
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Browser-rendered transport
///
/// Asks a headless-render service for the page:
/// `GET <endpoint>?url=<target>[&proxy=<proxy>]`, forwarding the request
/// headers. The response body is the rendered HTML.
pub struct RenderTransport {
    client: Client,
    endpoint: Url,
}

impl RenderTransport {
    pub fn new(endpoint: Url) -> TransportResult<Self> {
        let client = build_http_client(None).map_err(TransportError::ClientBuild)?;
        Ok(Self { client, endpoint })
    }

    /// Builds the render-service URL for one request
    pub fn render_url(&self, target: &str, proxy: Option<&str>) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("url", target);
            if let Some(proxy) = proxy {
                query.append_pair("proxy", proxy);
            }
        }
        url
    }
}

#[async_trait]
impl Transport for RenderTransport {
    async fn fetch(&self, request: FetchRequest) -> TransportResult<FetchResponse> {
        let render_url = self.render_url(&request.url, request.proxy.as_deref());
        let started = Instant::now();

        let response = self
            .client
            .get(render_url)
            .headers(request.headers)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&request.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Render {
                url: request.url,
                message: format!("render service answered {}", status.as_u16()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(&request.url, e))?;

        Ok(FetchResponse {
            body,
            elapsed: started.elapsed(),
        })
    }

    fn name(&self) -> &'static str {
        "browser"
    }
}

/// Resolves the configured transport variant
///
/// # Arguments
///
/// * `session` - Session configuration naming the variant
/// * `proxies` - Proxy addresses clients should be prepared for
pub fn build_transport(
    session: &SessionConfig,
    proxies: &[String],
) -> Result<Box<dyn Transport>, HarvestError> {
    match session.transport {
        TransportKind::Http => Ok(Box::new(HttpTransport::new(proxies)?)),
        TransportKind::Browser => {
            let endpoint = session.render_endpoint.as_deref().ok_or_else(|| {
                ConfigError::Validation(
                    "render_endpoint is required when transport = \"browser\"".to_string(),
                )
            })?;
            let endpoint = Url::parse(endpoint).map_err(|e| {
                ConfigError::InvalidUrl(format!("Invalid render_endpoint '{}': {}", endpoint, e))
            })?;
            Ok(Box::new(RenderTransport::new(endpoint)?))
        }
    }
}
