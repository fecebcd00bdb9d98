//! Services API endpoint

use super::ResourceKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Marker for the `services` collection.
#[derive(Debug, Clone, Copy)]
pub struct Services;

impl ResourceKind for Services {
    const NAME: &'static str = "service";
    const PLURAL: &'static str = "services";
    const PATH: &'static str = "services";

    type Item = Service;
    type CreateRequest = CreateService;
    type UpdateRequest = UpdateService;
    type Query = ServiceQuery;
}

/// A service in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Service ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// URL-safe slug
    #[serde(default)]
    pub slug: Option<String>,
    /// Service tier, 1 (most critical) to 5
    #[serde(default)]
    pub service_tier: Option<u8>,
    /// Arbitrary key/value labels
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Creation timestamp (RFC 3339)
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update timestamp (RFC 3339)
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of a service creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateService {
    /// Display name
    pub name: String,
    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Service tier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_tier: Option<u8>,
    /// Labels
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl CreateService {
    /// Creation body with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the tier.
    pub fn service_tier(mut self, tier: u8) -> Self {
        self.service_tier = Some(tier);
        self
    }

    /// Add a label.
    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

/// Body of a service update. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateService {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New tier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_tier: Option<u8>,
    /// Replacement labels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

/// Filters for listing services.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceQuery {
    /// Free-text search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Exact name match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Page size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_service_tolerates_missing_optional_fields() {
        let service: Service = serde_json::from_value(json!({
            "id": "svc-1",
            "name": "checkout",
            "unknown_field": true
        }))
        .unwrap();

        assert_eq!(service.id, "svc-1");
        assert_eq!(service.description, "");
        assert!(service.labels.is_empty());
    }

    #[test]
    fn test_create_service_skips_unset_fields() {
        let body = CreateService::new("checkout").label("team", "payments");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"name": "checkout", "labels": {"team": "payments"}})
        );
    }

    #[test]
    fn test_empty_update_is_empty_object() {
        assert_eq!(
            serde_json::to_value(UpdateService::default()).unwrap(),
            json!({})
        );
    }
}
