//! Team escalation policies API endpoint

use super::{NoQuery, ResourceKind, TargetRef};
use serde::{Deserialize, Serialize};

/// Marker for a team's `escalation_policies` collection.
#[derive(Debug, Clone, Copy)]
pub struct EscalationPolicies;

impl ResourceKind for EscalationPolicies {
    const NAME: &'static str = "escalation policy";
    const PLURAL: &'static str = "escalation policies";
    const PATH: &'static str = "escalation_policies";

    type Item = EscalationPolicy;
    type CreateRequest = CreateEscalationPolicy;
    type UpdateRequest = UpdateEscalationPolicy;
    type Query = NoQuery;
}

/// An escalation policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationPolicy {
    /// Policy ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Whether this is the team's default policy
    #[serde(default)]
    pub default: bool,
    /// How many times the steps are repeated before giving up
    #[serde(default)]
    pub repetitions: u32,
    /// Ordered escalation steps
    #[serde(default)]
    pub steps: Vec<EscalationStep>,
}

/// One step of an escalation policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationStep {
    /// ISO 8601 duration to wait before moving on, e.g. `"PT5M"`
    pub timeout: String,
    /// Who gets paged at this step
    #[serde(default)]
    pub targets: Vec<TargetRef>,
}

impl EscalationStep {
    /// Step paging `targets` for `timeout`.
    pub fn new(timeout: impl Into<String>, targets: Vec<TargetRef>) -> Self {
        Self {
            timeout: timeout.into(),
            targets,
        }
    }
}

/// Body of an escalation policy creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateEscalationPolicy {
    /// Display name
    pub name: String,
    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Make this the team's default policy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
    /// Repeat count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetitions: Option<u32>,
    /// Ordered steps
    pub steps: Vec<EscalationStep>,
}

/// Body of an escalation policy update. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateEscalationPolicy {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New default flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
    /// New repeat count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetitions: Option<u32>,
    /// Replacement steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<EscalationStep>>,
}
