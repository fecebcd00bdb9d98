//! Common test utilities and helpers

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use firehydrant::{Client, Limiter, Unlimited};
use serde_json::{Value, json};

/// Load a response fixture
#[allow(dead_code)]
pub fn load_response_fixture(name: &str) -> Value {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = Path::new(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join("responses")
        .join(format!("{}.json", name));

    let raw = std::fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "Failed to load response fixture '{}' from {:?}: {}",
            name, path, e
        )
    });
    serde_json::from_str(&raw).unwrap_or_else(|e| panic!("Fixture '{name}' is not JSON: {e}"))
}

/// Create a test API token
#[allow(dead_code)]
pub fn test_api_key() -> String {
    "fhb-test-0123456789abcdef0123456789abcdef".to_string()
}

/// Client pointed at `base_url` with no rate limit and a 10ms throttle backoff
#[allow(dead_code)]
pub fn test_client(base_url: impl Into<String>) -> Client {
    test_client_with_limiter(base_url, Arc::new(Unlimited))
}

/// Like [`test_client`] but admitted by `limiter`
#[allow(dead_code)]
pub fn test_client_with_limiter(base_url: impl Into<String>, limiter: Arc<dyn Limiter>) -> Client {
    Client::builder()
        .api_key(test_api_key())
        .base_url(base_url)
        .backoff(Duration::from_millis(10))
        .limiter(limiter)
        .build()
        .expect("Failed to build client")
}

/// A minimal service object
#[allow(dead_code)]
pub fn service_json(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name })
}

/// One page of a listing
#[allow(dead_code)]
pub fn page_json(data: Vec<Value>, page: u32, next: u32, last: u32) -> Value {
    json!({
        "data": data,
        "pagination": {
            "count": null,
            "page": page,
            "items": 1,
            "pages": last,
            "prev": if page > 1 { Value::from(page - 1) } else { Value::Null },
            "next": if next == 0 { Value::Null } else { Value::from(next) },
            "last": last
        }
    })
}

/// Error envelope body
#[allow(dead_code)]
pub fn error_json(error: &str) -> Value {
    json!({ "error": error })
}
