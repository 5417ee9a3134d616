//! Project group management for the preferences page.
//!
//! Edits are applied to a working copy of the user's groups. The last list
//! confirmed by the server is kept as a snapshot until the next successful
//! save, so a failed save can be rolled back with [`GroupManager::rollback`].

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::api::DashboardApi;
use crate::error::{AppError, AppResult};
use crate::models::{SelectOption, Project, ProjectGroup};

/// Selector value that matches every project.
pub const ALL_GROUPS: &str = "all";
const ALL_GROUPS_LABEL: &str = "Show All";

/// What `add_project_to_group` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended to an existing group.
    Added,
    /// A new, unsaved group was created around the project.
    CreatedGroup,
    /// The group already listed the project; nothing changed.
    AlreadyMember,
}

/// Owns one user's project groups.
pub struct GroupManager {
    api: Arc<dyn DashboardApi>,
    groups: Vec<ProjectGroup>,
    snapshot: Vec<ProjectGroup>,
}

impl GroupManager {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        GroupManager {
            api,
            groups: Vec::new(),
            snapshot: Vec::new(),
        }
    }

    /// Current (possibly unsaved) groups.
    pub fn groups(&self) -> &[ProjectGroup] {
        &self.groups
    }

    /// Groups as last confirmed by the server.
    pub fn saved_groups(&self) -> &[ProjectGroup] {
        &self.snapshot
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.groups != self.snapshot
    }

    pub fn group_exists(&self, name: &str) -> bool {
        self.groups.iter().any(|g| g.has_name(name.trim()))
    }

    /// Load the user's groups, replacing local state.
    ///
    /// On failure the groups held from the previous load stay untouched.
    pub async fn fetch_groups(&mut self) -> AppResult<&[ProjectGroup]> {
        let groups = self.api.get_preferred_projects().await.map_err(|e| {
            warn!("Failed to fetch project groups: {}", e);
            e
        })?;

        info!("Loaded {} project groups", groups.len());
        self.snapshot = groups.clone();
        self.groups = groups;
        Ok(&self.groups)
    }

    /// Put `project` into the group called `group_name`, creating the group
    /// locally if no group by that name (ignoring case) exists.
    pub fn add_project_to_group(
        &mut self,
        project: Project,
        group_name: &str,
    ) -> AppResult<AddOutcome> {
        let group_name = group_name.trim();
        if group_name.is_empty() {
            return Err(AppError::Validation(
                "Select or enter a group name".to_string(),
            ));
        }

        match self.groups.iter_mut().find(|g| g.has_name(group_name)) {
            Some(group) if group.contains(&project.uuid) => Ok(AddOutcome::AlreadyMember),
            Some(group) => {
                group.projects.push(project);
                Ok(AddOutcome::Added)
            }
            None => {
                self.groups
                    .push(ProjectGroup::unsaved(group_name, vec![project]));
                Ok(AddOutcome::CreatedGroup)
            }
        }
    }

    /// Remove the project from every group; groups left empty disappear from
    /// the local list but are not deleted on the server.
    ///
    /// Returns how many groups lost the project.
    pub fn remove_project_from_group(&mut self, project_uuid: &Uuid) -> usize {
        let mut touched = 0;
        for group in &mut self.groups {
            let before = group.projects.len();
            group.projects.retain(|p| &p.uuid != project_uuid);
            if group.projects.len() != before {
                touched += 1;
            }
        }
        self.groups.retain(|g| !g.projects.is_empty());
        touched
    }

    /// Rename a group locally.
    pub fn rename_group(&mut self, current_name: &str, new_name: &str) -> AppResult<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(AppError::Validation(
                "Group name cannot be empty".to_string(),
            ));
        }

        let index = self
            .groups
            .iter()
            .position(|g| g.has_name(current_name))
            .ok_or_else(|| AppError::NotFound(format!("Group '{}'", current_name)))?;

        let taken = self
            .groups
            .iter()
            .enumerate()
            .any(|(i, g)| i != index && g.has_name(new_name));
        if taken {
            return Err(AppError::Validation(format!(
                "A group named '{}' already exists",
                new_name
            )));
        }

        self.groups[index].group_name = new_name.to_string();
        Ok(())
    }

    /// Persist the working copy.
    ///
    /// On failure the working copy is left as is; call [`rollback`](Self::rollback)
    /// to return to the last saved state. After a successful save the groups
    /// are re-read so new groups pick up their server ids.
    pub async fn save_groups(&mut self) -> AppResult<()> {
        if self.groups.iter().any(|g| g.group_name.trim().is_empty()) {
            return Err(AppError::Validation(
                "Every group needs a name".to_string(),
            ));
        }

        let requests: Vec<_> = self.groups.iter().map(ProjectGroup::to_request).collect();
        self.api
            .save_preferred_projects(&requests)
            .await
            .map_err(|e| {
                warn!("Failed to save {} project groups: {}", requests.len(), e);
                e
            })?;

        info!("Saved {} project groups", requests.len());
        self.snapshot = self.groups.clone();

        match self.api.get_preferred_projects().await {
            Ok(groups) => {
                self.snapshot = groups.clone();
                self.groups = groups;
            }
            Err(e) => warn!("Saved groups but could not reload them: {}", e),
        }
        Ok(())
    }

    /// Discard unsaved edits.
    pub fn rollback(&mut self) {
        self.groups = self.snapshot.clone();
    }

    /// Delete persisted groups on the server, then locally.
    ///
    /// Every id must belong to a group the server already knows.
    pub async fn delete_groups(&mut self, group_ids: &[i64]) -> AppResult<()> {
        if group_ids.is_empty() {
            return Err(AppError::Validation("No groups selected".to_string()));
        }
        let known: HashSet<i64> = self.snapshot.iter().filter_map(|g| g.group_id).collect();
        if let Some(id) = group_ids.iter().find(|id| !known.contains(id)) {
            return Err(AppError::Validation(format!(
                "Group {} has not been saved",
                id
            )));
        }

        self.api
            .delete_preferred_projects(group_ids)
            .await
            .map_err(|e| {
                warn!("Failed to delete groups {:?}: {}", group_ids, e);
                e
            })?;

        let is_deleted = |g: &ProjectGroup| g.group_id.is_some_and(|id| group_ids.contains(&id));
        self.groups.retain(|g| !is_deleted(g));
        self.snapshot.retain(|g| !is_deleted(g));
        info!("Deleted {} project groups", group_ids.len());
        Ok(())
    }

    /// Remove a group by name: unsaved groups are dropped locally, saved ones
    /// are deleted on the server.
    pub async fn remove_group(&mut self, group_name: &str) -> AppResult<()> {
        let group_id = self
            .groups
            .iter()
            .find(|g| g.has_name(group_name))
            .ok_or_else(|| AppError::NotFound(format!("Group '{}'", group_name)))?
            .group_id;

        match group_id {
            Some(id) if self.snapshot.iter().any(|g| g.group_id == Some(id)) => {
                self.delete_groups(&[id]).await
            }
            _ => {
                self.groups.retain(|g| !g.has_name(group_name));
                Ok(())
            }
        }
    }
}

/// Projects shown for a group selector value.
///
/// `"all"` yields every project; any other selector yields the projects of
/// the group with that name (ignoring case), or nothing.
pub fn filter_projects_by_group(
    all_projects: &[Project],
    groups: &[ProjectGroup],
    selector: &str,
) -> Vec<Project> {
    if selector.eq_ignore_ascii_case(ALL_GROUPS) {
        return all_projects.to_vec();
    }
    groups
        .iter()
        .find(|g| g.has_name(selector))
        .map(|g| g.projects.clone())
        .unwrap_or_default()
}

/// Dropdown options: "Show All" followed by one entry per group.
pub fn group_options(groups: &[ProjectGroup]) -> Vec<SelectOption> {
    std::iter::once(SelectOption {
        label: ALL_GROUPS_LABEL.to_string(),
        value: ALL_GROUPS.to_string(),
    })
    .chain(groups.iter().map(|g| SelectOption {
        label: g.group_name.clone(),
        value: g.group_name.to_lowercase(),
    }))
    .collect()
}

/// Every project in any group, first occurrence wins.
pub fn all_projects(groups: &[ProjectGroup]) -> Vec<Project> {
    let mut seen = HashSet::new();
    groups
        .iter()
        .flat_map(|g| g.projects.iter())
        .filter(|p| seen.insert(p.uuid))
        .cloned()
        .collect()
}
