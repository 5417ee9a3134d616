//! Dashboard logic on top of the backend API.

pub mod duration;
pub mod favorites;
pub mod groups;
pub mod heatmap;
pub mod pager;
pub mod preference;
pub mod status;
pub mod summary;
pub mod tags;

pub use duration::{humanize_duration, run_duration};
pub use favorites::FavoritesManager;
pub use groups::{AddOutcome, GroupManager, all_projects, filter_projects_by_group, group_options};
pub use heatmap::{GridSize, GroupHeatmap, HeatmapBuilder, HeatmapTile, grid_dimensions};
pub use pager::{CursorPager, FetchOutcome, PagerSnapshot, PagerStatus};
pub use preference::{PreferenceStore, is_known_timezone, timezone_options};
pub use status::{
    StatusCounts, spec_run_ratio, status_border_color, status_color, status_counts,
    visible_spec_runs,
};
pub use summary::{
    HistoryEntry, ProjectHistory, RunOutcome, fetch_project_history, fetch_project_names,
};
pub use tags::{ColoredTag, colored_unique_tags, tag_color, unique_tags};
