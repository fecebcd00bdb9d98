//! API resource endpoints
//!
//! Every collection in the API follows the same CRUD shape, so a single
//! generic client, [`Resources`], serves them all. Each collection only
//! declares its name, path and request/response types through
//! [`ResourceKind`].
//!
//! ```rust,no_run
//! use firehydrant::Client;
//! use firehydrant::resources::services::{CreateService, ServiceQuery};
//!
//! # async fn example() -> firehydrant::Result<()> {
//! let client = Client::new("fhb-...");
//!
//! let created = client
//!     .services()
//!     .create(&CreateService::new("checkout"))
//!     .await?;
//! let all = client.services().list(&ServiceQuery::default()).await?;
//! assert!(all.iter().any(|s| s.id == created.id));
//! # Ok(())
//! # }
//! ```

pub mod escalation_policies;
pub mod on_call_schedules;
pub mod ping;
pub mod runbooks;
pub mod services;
pub mod signal_rules;
pub mod teams;

use crate::client::Client;
use crate::error::Result;
use crate::observability::log_lookup;
use firehydrant_core::context::RequestContext;
use firehydrant_core::pagination::{Page, follow_pages};
use reqwest::Method;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Describes one API collection.
pub trait ResourceKind: Send + Sync + 'static {
    /// Singular, human-readable name used in error context ("service")
    const NAME: &'static str;

    /// Plural, human-readable name used in error context ("services")
    const PLURAL: &'static str;

    /// Path segment of the collection, relative to its parent ("services")
    const PATH: &'static str;

    /// Response body of get/create/update and the list item type
    type Item: DeserializeOwned + Send;

    /// Request body of `create`
    type CreateRequest: Serialize + Sync;

    /// Request body of `update`
    type UpdateRequest: Serialize + Sync;

    /// Query string parameters of `list`
    type Query: Serialize + Sync;
}

/// Query type for collections without list filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NoQuery {}

/// Reference to another object by type and ID, as used in targets and
/// escalation steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRef {
    /// Object type, e.g. `"User"`, `"EscalationPolicy"`
    #[serde(rename = "type")]
    pub target_type: String,
    /// Object ID
    pub id: String,
}

impl TargetRef {
    /// Create a reference.
    pub fn new(target_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            target_type: target_type.into(),
            id: id.into(),
        }
    }
}

/// Generic CRUD client for one collection.
///
/// Obtained from the accessors on [`Client`] (e.g. [`Client::services`]).
/// Every failure is wrapped with the operation, e.g.
/// `could not get service: resource not found`. Use
/// [`Error::is_not_found`](crate::Error::is_not_found) to detect a missing
/// object through that wrapping.
pub struct Resources<K: ResourceKind> {
    client: Client,
    segments: Vec<String>,
    ctx: RequestContext,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ResourceKind> Resources<K> {
    /// Top-level collection, e.g. `services`.
    pub(crate) fn new(client: Client) -> Self {
        Self::nested(client, &[])
    }

    /// Collection below a parent path, e.g. `teams/{id}/signal_rules`.
    pub(crate) fn nested(client: Client, parent: &[&str]) -> Self {
        let segments = parent
            .iter()
            .map(|s| s.to_string())
            .chain(std::iter::once(K::PATH.to_string()))
            .collect();

        Self {
            client,
            segments,
            ctx: RequestContext::background(),
            _kind: PhantomData,
        }
    }

    /// Run subsequent calls under `ctx`.
    ///
    /// The context bounds the wait for the rate limiter only; see
    /// [`RateLimitedTransport`](crate::RateLimitedTransport).
    ///
    /// ```rust,no_run
    /// # use firehydrant::{Client, RequestContext};
    /// # use std::time::Duration;
    /// # async fn example(client: Client) -> firehydrant::Result<()> {
    /// let ctx = RequestContext::background().with_timeout(Duration::from_secs(2));
    /// let team = client.teams().with_context(ctx).get("team-id").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_context(&self, ctx: RequestContext) -> Self {
        Self {
            client: self.client.clone(),
            segments: self.segments.clone(),
            ctx,
            _kind: PhantomData,
        }
    }

    /// The collection path relative to the base URL.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// Fetch one object by ID.
    pub async fn get(&self, id: &str) -> Result<K::Item> {
        log_lookup(K::NAME, id);

        let result: Result<K::Item> = async {
            let request = self.client.request(Method::GET, self.item_segments(id))?;
            self.client.send(&self.ctx, request).await
        }
        .await;

        result.map_err(|e| e.context(format!("could not get {}", K::NAME)))
    }

    /// Create an object.
    pub async fn create(&self, body: &K::CreateRequest) -> Result<K::Item> {
        let result: Result<K::Item> = async {
            let request = self.client.request(Method::POST, &self.segments)?;
            let request = Client::json_body(request, body)?;
            self.client.send(&self.ctx, request).await
        }
        .await;

        result.map_err(|e| e.context(format!("could not create {}", K::NAME)))
    }

    /// Partially update an object (`PATCH`).
    pub async fn update(&self, id: &str, body: &K::UpdateRequest) -> Result<K::Item> {
        let result: Result<K::Item> = async {
            let request = self.client.request(Method::PATCH, self.item_segments(id))?;
            let request = Client::json_body(request, body)?;
            self.client.send(&self.ctx, request).await
        }
        .await;

        result.map_err(|e| e.context(format!("could not update {}", K::NAME)))
    }

    /// Delete an object. Any 2xx is success; the body, if any, is ignored.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let result: Result<()> = async {
            let request = self.client.request(Method::DELETE, self.item_segments(id))?;
            let _: IgnoredAny = self.client.send(&self.ctx, request).await?;
            Ok(())
        }
        .await;

        result.map_err(|e| e.context(format!("could not delete {}", K::NAME)))
    }

    /// List every object matching `query`, following pagination to the end.
    ///
    /// Fails as a whole if any page fails.
    pub async fn list(&self, query: &K::Query) -> Result<Vec<K::Item>> {
        follow_pages(move |page| self.fetch_page(query, page))
            .await
            .map_err(|e| e.context(format!("could not list {}", K::PLURAL)))
    }

    /// Fetch a single page of the listing.
    pub async fn list_page(&self, query: &K::Query, page: u32) -> Result<Page<K::Item>> {
        self.fetch_page(query, page)
            .await
            .map_err(|e| e.context(format!("could not list {}", K::PLURAL)))
    }

    async fn fetch_page(&self, query: &K::Query, page: u32) -> Result<Page<K::Item>> {
        let request = self
            .client
            .request(Method::GET, &self.segments)?
            .query(query)
            .query(&[("page", page)]);

        self.client.send(&self.ctx, request).await
    }

    fn item_segments<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> {
        self.segments
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(id))
    }
}

impl<K: ResourceKind> Clone for Resources<K> {
    fn clone(&self) -> Self {
        self.with_context(self.ctx.clone())
    }
}

impl<K: ResourceKind> fmt::Debug for Resources<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resources")
            .field("kind", &K::NAME)
            .field("path", &self.path())
            .field("ctx", &self.ctx)
            .finish()
    }
}

/// Turn a not-found failure into `Ok(None)`, leaving every other outcome
/// alone.
///
/// ```rust,no_run
/// # use firehydrant::{Client, resources::optional};
/// # async fn example(client: Client) -> firehydrant::Result<()> {
/// if optional(client.runbooks().get("rb-1").await)?.is_none() {
///     println!("runbook is gone");
/// }
/// # Ok(())
/// # }
/// ```
pub fn optional<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(item) => Ok(Some(item)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
