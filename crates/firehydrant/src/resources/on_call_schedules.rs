//! Team on-call schedules API endpoint

use super::{NoQuery, ResourceKind};
use serde::{Deserialize, Serialize};

/// Marker for a team's `on_call_schedules` collection.
#[derive(Debug, Clone, Copy)]
pub struct OnCallSchedules;

impl ResourceKind for OnCallSchedules {
    const NAME: &'static str = "on-call schedule";
    const PLURAL: &'static str = "on-call schedules";
    const PATH: &'static str = "on_call_schedules";

    type Item = OnCallSchedule;
    type CreateRequest = CreateOnCallSchedule;
    type UpdateRequest = UpdateOnCallSchedule;
    type Query = NoQuery;
}

/// An on-call schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnCallSchedule {
    /// Schedule ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// IANA time zone the rotation is defined in
    #[serde(default)]
    pub time_zone: Option<String>,
    /// Users in rotation order
    #[serde(default)]
    pub members: Vec<ScheduleMember>,
}

/// A user on a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleMember {
    /// User ID
    pub id: String,
    /// User name
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of an on-call schedule creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateOnCallSchedule {
    /// Display name
    pub name: String,
    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// IANA time zone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    /// User IDs in rotation order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub member_ids: Vec<String>,
}

/// Body of an on-call schedule update. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateOnCallSchedule {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Replacement member list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_ids: Option<Vec<String>>,
}
