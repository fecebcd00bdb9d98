//! Teams API endpoint

use super::ResourceKind;
use serde::{Deserialize, Serialize};

/// Marker for the `teams` collection.
#[derive(Debug, Clone, Copy)]
pub struct Teams;

impl ResourceKind for Teams {
    const NAME: &'static str = "team";
    const PLURAL: &'static str = "teams";
    const PATH: &'static str = "teams";

    type Item = Team;
    type CreateRequest = CreateTeam;
    type UpdateRequest = UpdateTeam;
    type Query = TeamQuery;
}

/// A team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Team ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// URL-safe slug
    #[serde(default)]
    pub slug: Option<String>,
    /// Creation timestamp (RFC 3339)
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of a team creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateTeam {
    /// Display name
    pub name: String,
    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// URL-safe slug, derived from the name when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl CreateTeam {
    /// Creation body with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Body of a team update. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateTeam {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Filters for listing teams.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamQuery {
    /// Free-text search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Page size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}
