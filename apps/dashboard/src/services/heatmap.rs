//! Group heatmaps: one tile per project, colored by its latest run.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::status::{status_border_color, status_color};
use crate::api::DashboardApi;
use crate::error::AppResult;
use crate::models::{Project, ProjectGroup, ProjectTestRun, SpecStatus};

/// Up to this many tiles the grid is kept near-square.
pub const MAX_SQUARE_TILES: usize = 25;
/// Row count once a group outgrows the square layout.
pub const MAX_ROWS: usize = 5;

/// Status shown for a project without runs.
pub const UNKNOWN_STATUS: &str = "UNKNOWN";

/// Rows and columns of a heatmap grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridSize {
    pub rows: usize,
    pub cols: usize,
}

impl GridSize {
    /// Number of cells, always at least the tile count it was built for.
    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }
}

/// Grid dimensions for `n` tiles.
///
/// Near-square (`rows = ceil(sqrt n)`) up to 25 tiles, then fixed at 5 rows
/// growing in columns. An empty group gets a 0x0 grid.
pub fn grid_dimensions(n: usize) -> GridSize {
    if n == 0 {
        return GridSize { rows: 0, cols: 0 };
    }
    let rows = if n <= MAX_SQUARE_TILES {
        ceil_sqrt(n)
    } else {
        MAX_ROWS
    };
    GridSize {
        rows,
        cols: n.div_ceil(rows),
    }
}

fn ceil_sqrt(n: usize) -> usize {
    let mut root = 0;
    while root * root < n {
        root += 1;
    }
    root
}

/// One project's cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapTile {
    pub uuid: Uuid,
    pub name: String,
    /// Status of the latest run, or `UNKNOWN`.
    pub status: String,
    /// Suites in the latest run with at least one spec of each status.
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub execution_time: Option<DateTime<Utc>>,
    pub color: &'static str,
    pub border_color: &'static str,
}

impl HeatmapTile {
    /// Tile for a project given its most recent run, if any.
    pub fn from_latest_run(project: &Project, latest: Option<&ProjectTestRun>) -> Self {
        let status = latest
            .and_then(|run| run.status.clone())
            .unwrap_or_else(|| UNKNOWN_STATUS.to_string());
        let suites = latest
            .and_then(|run| run.suite_runs.as_deref())
            .unwrap_or_default();

        let suites_with = |wanted: SpecStatus| {
            suites
                .iter()
                .filter(|suite| suite.spec_runs.iter().any(|spec| spec.status == wanted))
                .count()
        };

        HeatmapTile {
            uuid: project.uuid,
            name: project.name.clone(),
            passed: suites_with(SpecStatus::Passed),
            failed: suites_with(SpecStatus::Failed),
            skipped: suites_with(SpecStatus::Skipped),
            execution_time: latest.and_then(|run| run.end_time),
            color: status_color(&status),
            border_color: status_border_color(&status),
            status,
        }
    }

    pub fn unknown(project: &Project) -> Self {
        Self::from_latest_run(project, None)
    }
}

/// Heatmap for one project group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupHeatmap {
    pub group_id: Option<i64>,
    pub group_name: String,
    pub grid: GridSize,
    pub tiles: Vec<HeatmapTile>,
}

impl GroupHeatmap {
    pub fn new(group: &ProjectGroup, tiles: Vec<HeatmapTile>) -> Self {
        GroupHeatmap {
            group_id: group.group_id,
            group_name: group.group_name.clone(),
            grid: grid_dimensions(tiles.len()),
            tiles,
        }
    }
}

/// Assembles heatmaps for every group of the current user.
pub struct HeatmapBuilder {
    api: Arc<dyn DashboardApi>,
}

impl HeatmapBuilder {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        HeatmapBuilder { api }
    }

    /// Fetch the user's groups and each member project's latest run.
    ///
    /// Failing to load the groups fails the whole build. A project whose runs
    /// cannot be loaded is shown as unknown.
    pub async fn build_group_heatmaps(&self) -> AppResult<Vec<GroupHeatmap>> {
        let groups = self.api.get_preferred_projects().await.map_err(|e| {
            warn!("Failed to fetch groups for heatmap: {}", e);
            e
        })?;

        let mut heatmaps = Vec::with_capacity(groups.len());
        for group in &groups {
            let mut tiles = Vec::with_capacity(group.projects.len());
            for project in &group.projects {
                let tile = match self.api.get_project_test_runs(project.uuid).await {
                    Ok(runs) => HeatmapTile::from_latest_run(project, runs.test_runs.first()),
                    Err(e) => {
                        warn!(
                            "Failed to fetch test runs for project {} ({}): {}",
                            project.name, project.uuid, e
                        );
                        HeatmapTile::unknown(project)
                    }
                };
                tiles.push(tile);
            }
            heatmaps.push(GroupHeatmap::new(group, tiles));
        }

        info!("Built heatmaps for {} groups", heatmaps.len());
        Ok(heatmaps)
    }
}
