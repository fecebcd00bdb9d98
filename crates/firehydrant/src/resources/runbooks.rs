//! Runbooks API endpoint

use super::ResourceKind;
use serde::{Deserialize, Serialize};

/// Marker for the `runbooks` collection.
#[derive(Debug, Clone, Copy)]
pub struct Runbooks;

impl ResourceKind for Runbooks {
    const NAME: &'static str = "runbook";
    const PLURAL: &'static str = "runbooks";
    const PATH: &'static str = "runbooks";

    type Item = Runbook;
    type CreateRequest = CreateRunbook;
    type UpdateRequest = UpdateRunbook;
    type Query = RunbookQuery;
}

/// A runbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runbook {
    /// Runbook ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// What the runbook attaches to, usually `"incident"`
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Team that owns the runbook
    #[serde(default)]
    pub owner: Option<RunbookOwner>,
}

/// Owner of a runbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunbookOwner {
    /// Team ID
    pub id: String,
    /// Team name
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of a runbook creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateRunbook {
    /// Display name
    pub name: String,
    /// Attachment type
    #[serde(rename = "type")]
    pub kind: String,
    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Owning team ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

impl CreateRunbook {
    /// Incident runbook with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: "incident".to_string(),
            description: None,
            owner_id: None,
        }
    }
}

/// Body of a runbook update. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateRunbook {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New owning team ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

/// Filters for listing runbooks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunbookQuery {
    /// Exact name match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Page size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}
