//! # FireHydrant API client
//!
//! Rust client for the FireHydrant incident management REST API:
//! - Services, teams, runbooks
//! - Team-scoped signal rules, escalation policies and on-call schedules
//! - Token-bucket rate limiting shared by every call
//! - Automatic retry of throttled (429) requests with `Retry-After` support
//! - Transparent pagination for list endpoints
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use firehydrant::{Client, resources::services::ServiceQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("fhb-...");
//!
//!     let services = client.services().list(&ServiceQuery::default()).await?;
//!     for service in services {
//!         println!("{} {}", service.id, service.name);
//!     }
//!
//!     match client.services().get("missing").await {
//!         Err(e) if e.is_not_found() => println!("no such service"),
//!         other => println!("{:?}", other.map(|s| s.name)),
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export commonly used types
pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, ClientConfigBuilder, RateLimitConfig};
pub use envelope::{ApiErrorEnvelope, decode_body, decode_response};
pub use error::{Error, Result};
pub use crate::http::{HttpExecutor, RateLimitedTransport};
pub use resources::{ResourceKind, Resources};

// Core primitives used throughout the public API
pub use firehydrant_core::context::RequestContext;
pub use firehydrant_core::error::WaitAborted;
pub use firehydrant_core::limiter::{Limiter, TokenBucket, Unlimited};
pub use firehydrant_core::pagination::{Page, Pagination, follow_pages};
pub use firehydrant_core::retry::ThrottleBackoff;

// Module declarations
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod observability;
pub mod resources;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use firehydrant::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Client, ClientConfig, Error, RequestContext, Result,
        resources::{
            escalation_policies::EscalationPolicy, on_call_schedules::OnCallSchedule,
            runbooks::Runbook, services::Service, signal_rules::SignalRule, teams::Team,
        },
    };
}

/// Client version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.firehydrant.io/v1/";

/// Product token sent in the `User-Agent` header
pub const USER_AGENT_PRODUCT: &str = "firehydrant-rust";
