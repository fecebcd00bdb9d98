//! Main client implementation for the FireHydrant API

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    config::{ClientConfig, RateLimitConfig},
    envelope::decode_response,
    error::{Error, Result},
    http::{HttpExecutor, RateLimitedTransport},
    observability::{RequestMetadata, RequestTimer, ResponseMetadata},
    resources::{
        Resources,
        escalation_policies::EscalationPolicies,
        on_call_schedules::OnCallSchedules,
        ping::{Actor, PingResponse},
        runbooks::Runbooks,
        services::Services,
        signal_rules::SignalRules,
        teams::Teams,
    },
};
use firehydrant_core::context::RequestContext;
use firehydrant_core::limiter::{Limiter, TokenBucket};

/// Main client for interacting with the FireHydrant API.
///
/// Cheap to clone; clones share one connection pool, one rate limiter and
/// one request queue.
///
/// # Example
///
/// ```rust,no_run
/// use firehydrant::Client;
///
/// let client = Client::new("fhb-...");
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    /// Builds requests; also the default executor
    http: reqwest::Client,
    transport: RateLimitedTransport,
    base_url: Url,
    /// Authorization, User-Agent and custom headers, applied to every request
    headers: HeaderMap,
    timeout: Duration,
}

impl Client {
    /// Create a new client with an API token.
    ///
    /// # Panics
    ///
    /// This convenience method panics if the client cannot be built with the default
    /// configuration. For fallible construction with explicit error handling, use
    /// [`Client::try_new()`] instead.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::builder()
            .api_key(api_key)
            .build()
            .expect("Failed to build client with provided API token")
    }

    /// Create a new client with an API token (fallible version).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The token contains characters not allowed in a header
    /// - HTTP client configuration fails
    pub fn try_new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Create a new client builder for advanced configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client from a configuration object.
    ///
    /// Requests go out through `reqwest` and are admitted by a token bucket
    /// sized from `config.rate_limit`.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Self::assemble(config, None, None)
    }

    /// Create a client that sends through `executor` and is admitted by
    /// `limiter` instead of the defaults.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use firehydrant::{Client, ClientConfig, Unlimited};
    /// use std::sync::Arc;
    ///
    /// let executor = Arc::new(reqwest::Client::new());
    /// let client = Client::with_transport(
    ///     ClientConfig::with_api_key("fhb-..."),
    ///     executor,
    ///     Arc::new(Unlimited),
    /// )?;
    /// # Ok::<(), firehydrant::Error>(())
    /// ```
    pub fn with_transport(
        config: ClientConfig,
        executor: Arc<dyn HttpExecutor>,
        limiter: Arc<dyn Limiter>,
    ) -> Result<Self> {
        Self::assemble(config, Some(executor), Some(limiter))
    }

    fn assemble(
        config: ClientConfig,
        executor: Option<Arc<dyn HttpExecutor>>,
        limiter: Option<Arc<dyn Limiter>>,
    ) -> Result<Self> {
        let ClientConfig {
            api_key,
            base_url,
            timeout,
            backoff,
            default_headers,
            rate_limit,
        } = config;

        let api_key = resolve_api_key(api_key)?;
        let base_url = parse_base_url(base_url)?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
            .map_err(|_| {
                Error::InvalidHeaderValue("API token is not a valid header value".to_string())
            })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!(
                "{}/{}",
                crate::USER_AGENT_PRODUCT,
                crate::VERSION
            ))
            .map_err(|e| Error::InvalidHeaderValue(e.to_string()))?,
        );
        for (key, value) in default_headers.iter() {
            headers.insert(key.clone(), value.clone());
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        let executor = executor.unwrap_or_else(|| Arc::new(http.clone()));
        let limiter = limiter.unwrap_or_else(|| token_bucket(rate_limit));
        let transport = RateLimitedTransport::new(executor, limiter).with_backoff(backoff);

        tracing::debug!(
            base_url = %base_url,
            timeout = ?timeout,
            backoff = ?backoff,
            "FireHydrant client configured"
        );

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                transport,
                base_url,
                headers,
                timeout,
            }),
        })
    }

    /// Check the token against `GET ping` and return who it belongs to.
    pub async fn ping(&self) -> Result<Actor> {
        self.ping_with_context(&RequestContext::background()).await
    }

    /// [`Client::ping`] under a caller context.
    pub async fn ping_with_context(&self, ctx: &RequestContext) -> Result<Actor> {
        let result: Result<PingResponse> = async {
            let request = self.request(Method::GET, ["ping"])?;
            self.send(ctx, request).await
        }
        .await;

        result
            .map(|ping| ping.actor)
            .map_err(|e| e.context("could not ping"))
    }

    /// Access the services catalog.
    pub fn services(&self) -> Resources<Services> {
        Resources::new(self.clone())
    }

    /// Access teams.
    pub fn teams(&self) -> Resources<Teams> {
        Resources::new(self.clone())
    }

    /// Access runbooks.
    pub fn runbooks(&self) -> Resources<Runbooks> {
        Resources::new(self.clone())
    }

    /// Access a team's signal rules.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use firehydrant::Client;
    /// # async fn example(client: Client) -> firehydrant::Result<()> {
    /// let rule = client.signal_rules("team-id").get("rule-id").await?;
    /// println!("{}", rule.expression);
    /// # Ok(())
    /// # }
    /// ```
    pub fn signal_rules(&self, team_id: &str) -> Resources<SignalRules> {
        Resources::nested(self.clone(), &["teams", team_id])
    }

    /// Access a team's escalation policies.
    pub fn escalation_policies(&self, team_id: &str) -> Resources<EscalationPolicies> {
        Resources::nested(self.clone(), &["teams", team_id])
    }

    /// Access a team's on-call schedules.
    pub fn on_call_schedules(&self, team_id: &str) -> Resources<OnCallSchedules> {
        Resources::nested(self.clone(), &["teams", team_id])
    }

    /// The base URL every path is resolved against.
    pub fn base_url(&self) -> &str {
        self.inner.base_url.as_str()
    }

    /// The transport shared by every call made through this client.
    pub fn transport(&self) -> &RateLimitedTransport {
        &self.inner.transport
    }

    /// Start a request to `segments` below the base URL.
    ///
    /// Segments are percent-encoded, so IDs may contain any character.
    pub(crate) fn request<I>(&self, method: Method, segments: I) -> Result<RequestBuilder>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(format!("{} cannot be a base URL", self.base_url())))?
            .pop_if_empty()
            .extend(segments);

        Ok(self
            .inner
            .http
            .request(method, url)
            .headers(self.inner.headers.clone())
            .timeout(self.inner.timeout))
    }

    /// Attach `body` as JSON.
    pub(crate) fn json_body<B: Serialize + ?Sized>(
        request: RequestBuilder,
        body: &B,
    ) -> Result<RequestBuilder> {
        let bytes = serde_json::to_vec(body)?;
        Ok(request
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(bytes))
    }

    /// Send through the transport and decode the result.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        request: RequestBuilder,
    ) -> Result<T> {
        let request = request
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        let mut metadata = RequestMetadata::new(request.method().as_str(), request.url().path());
        if let Some(size) = request.body().and_then(|b| b.as_bytes()).map(<[u8]>::len) {
            metadata = metadata.with_body_size(size);
        }
        metadata.log_request();

        let timer = RequestTimer::start();
        let response = self.inner.transport.execute(ctx, request).await?;
        let status = response.status().as_u16();
        let result = decode_response(response).await;

        let outcome = ResponseMetadata::new(status, timer.elapsed());
        match &result {
            Ok(_) => outcome.log_success(&metadata),
            Err(e) => outcome.log_error(&metadata, &e.to_string()),
        }

        result
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url())
            .field("timeout", &self.inner.timeout)
            .field("transport", &self.inner.transport)
            .finish_non_exhaustive()
    }
}

fn resolve_api_key(api_key: Option<SecretString>) -> Result<SecretString> {
    if let Some(api_key) = api_key {
        return Ok(api_key);
    }

    #[cfg(feature = "env")]
    if let Ok(api_key) = std::env::var("FIREHYDRANT_API_KEY") {
        return Ok(SecretString::new(api_key.into_boxed_str()));
    }

    Err(Error::MissingConfig(
        "No API token provided. Set FIREHYDRANT_API_KEY or call ClientBuilder::api_key".to_string(),
    ))
}

fn parse_base_url(base_url: Option<String>) -> Result<Url> {
    let base_url = base_url.unwrap_or_else(|| crate::DEFAULT_BASE_URL.to_string());

    if base_url.trim().is_empty() {
        return Err(Error::InvalidUrl("Base URL cannot be empty".to_string()));
    }

    let mut url: Url = base_url
        .trim()
        .parse()
        .map_err(|e| Error::InvalidUrl(format!("{base_url}: {e}")))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(Error::InvalidUrl(format!(
                "Invalid URL scheme '{scheme}'. Only 'http' and 'https' are supported."
            )));
        }
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

fn token_bucket(config: RateLimitConfig) -> Arc<dyn Limiter> {
    Arc::new(TokenBucket::new(
        config.requests_per_second,
        config.burst_size,
    ))
}

/// Builder for creating a configured Client.
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    executor: Option<Arc<dyn HttpExecutor>>,
    limiter: Option<Arc<dyn Limiter>>,
}

impl ClientBuilder {
    /// Start from an existing configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the API token.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(SecretString::new(api_key.into().into_boxed_str()));
        self
    }

    /// Set the base URL for the API.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the wait before retrying a throttled request.
    pub fn backoff(mut self, backoff: Duration) -> Self {
        self.config.backoff = backoff;
        self
    }

    /// Size the default token bucket.
    pub fn rate_limit(mut self, requests_per_second: f64, burst_size: u32) -> Self {
        self.config.rate_limit = RateLimitConfig {
            requests_per_second,
            burst_size,
        };
        self
    }

    /// Add a custom default header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid according to HTTP specifications.
    pub fn default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key: reqwest::header::HeaderName = key_str
            .parse()
            .map_err(|_| Error::InvalidHeaderName(key_str.clone()))?;
        let value: HeaderValue = value_str
            .parse()
            .map_err(|_| Error::InvalidHeaderValue(value_str.clone()))?;

        self.config.default_headers.insert(key, value);
        Ok(self)
    }

    /// Send through a custom executor instead of `reqwest`.
    pub fn executor(mut self, executor: Arc<dyn HttpExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Use a custom limiter instead of the token bucket from
    /// [`ClientBuilder::rate_limit`].
    pub fn limiter(mut self, limiter: Arc<dyn Limiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Build the client with the configured options.
    pub fn build(self) -> Result<Client> {
        Client::assemble(self.config, self.executor, self.limiter)
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .field("executor", &self.executor)
            .field("limiter", &self.limiter)
            .finish()
    }
}
