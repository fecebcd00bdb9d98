//! Team signal rules API endpoint
//!
//! Signal rules live below a team: `teams/{team_id}/signal_rules`.

use super::{NoQuery, ResourceKind, TargetRef};
use serde::{Deserialize, Serialize};

/// Marker for a team's `signal_rules` collection.
#[derive(Debug, Clone, Copy)]
pub struct SignalRules;

impl ResourceKind for SignalRules {
    const NAME: &'static str = "signal rule";
    const PLURAL: &'static str = "signal rules";
    const PATH: &'static str = "signal_rules";

    type Item = SignalRule;
    type CreateRequest = CreateSignalRule;
    type UpdateRequest = UpdateSignalRule;
    type Query = NoQuery;
}

/// A rule routing matching signals to a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRule {
    /// Rule ID
    pub id: String,
    /// Display name
    pub name: String,
    /// CEL expression matched against incoming signals
    pub expression: String,
    /// Who gets notified
    #[serde(default)]
    pub target: Option<TargetRef>,
    /// Incident type to open on match
    #[serde(default)]
    pub incident_type_id: Option<String>,
}

/// Body of a signal rule creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateSignalRule {
    /// Display name
    pub name: String,
    /// CEL expression
    pub expression: String,
    /// Target type, e.g. `"EscalationPolicy"`
    pub target_type: String,
    /// Target ID
    pub target_id: String,
    /// Incident type to open on match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_type_id: Option<String>,
}

impl CreateSignalRule {
    /// Rule routing `expression` matches to `target`.
    pub fn new(name: impl Into<String>, expression: impl Into<String>, target: TargetRef) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
            target_type: target.target_type,
            target_id: target.id,
            incident_type_id: None,
        }
    }
}

/// Body of a signal rule update. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateSignalRule {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New expression
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    /// New target type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    /// New target ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
}
