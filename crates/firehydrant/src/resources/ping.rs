//! Ping endpoint, used to validate credentials

use serde::{Deserialize, Serialize};

/// The authenticated principal behind the API token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Actor ID
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Email, for user tokens
    #[serde(default)]
    pub email: Option<String>,
    /// Actor type, e.g. `"firehydrant_bot"`
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Body of a `GET ping` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResponse {
    /// Who the token belongs to
    pub actor: Actor,
}
