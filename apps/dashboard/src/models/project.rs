//! Projects, user-defined project groups and their wire formats.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A test project as it appears in group membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub uuid: Uuid,
    #[serde(default)]
    pub name: String,
}

impl Project {
    pub fn new(uuid: Uuid, name: &str) -> Self {
        Project {
            uuid,
            name: name.to_string(),
        }
    }
}

/// A named collection of projects owned by the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectGroup {
    /// Server id. `None` (or zero on the wire) until the group is saved.
    #[serde(default, deserialize_with = "zero_as_none")]
    pub group_id: Option<i64>,
    pub group_name: String,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl ProjectGroup {
    /// A group that has not been persisted yet.
    pub fn unsaved(group_name: &str, projects: Vec<Project>) -> Self {
        ProjectGroup {
            group_id: None,
            group_name: group_name.to_string(),
            projects,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.group_id.is_some()
    }

    /// Case-insensitive name comparison.
    pub fn has_name(&self, name: &str) -> bool {
        self.group_name.to_lowercase() == name.to_lowercase()
    }

    pub fn contains(&self, uuid: &Uuid) -> bool {
        self.projects.iter().any(|p| &p.uuid == uuid)
    }

    /// Wire form: membership reduced to bare uuids, unsaved id sent as 0.
    pub fn to_request(&self) -> GroupedProjectsRequest {
        GroupedProjectsRequest {
            group_id: self.group_id.unwrap_or(0),
            group_name: self.group_name.clone(),
            projects: self.projects.iter().map(|p| p.uuid).collect(),
        }
    }
}

fn zero_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.filter(|id| *id != 0))
}

/// Response body of `GET /user/preferred`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferredProjectsResponse {
    #[serde(default)]
    pub preferred: Option<Vec<ProjectGroup>>,
}

/// One group in the `POST /user/preferred` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedProjectsRequest {
    pub group_id: i64,
    pub group_name: String,
    pub projects: Vec<Uuid>,
}

/// Body of `POST /user/preferred`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavePreferredRequest {
    pub preferred: Vec<GroupedProjectsRequest>,
}

/// Body of `DELETE /user/preferred`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePreferredRequest {
    pub preferred: Vec<GroupIdRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupIdRef {
    pub group_id: i64,
}

impl DeletePreferredRequest {
    pub fn new(group_ids: &[i64]) -> Self {
        DeletePreferredRequest {
            preferred: group_ids
                .iter()
                .map(|&group_id| GroupIdRef { group_id })
                .collect(),
        }
    }
}

/// Status envelope returned by preference write endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct WriteStatusResponse {
    #[serde(default)]
    pub status: String,
}

/// Label and value for a selector, such as the group filter or timezone list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

/// Body of `POST /user/favourite`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavouriteRequest {
    pub favourite: Uuid,
}
