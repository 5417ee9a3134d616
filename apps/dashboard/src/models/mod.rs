//! Domain models for the test report dashboard.

use serde::{Deserialize, Deserializer, Serialize};

pub mod preference;
pub mod project;
pub mod summary;
pub mod test_run;

// Re-export commonly used types
pub use preference::{UserPreference, UserPreferenceResponse};
pub use project::{
    DeletePreferredRequest, FavouriteRequest, GroupedProjectsRequest, PreferredProjectsResponse,
    Project, ProjectGroup, SavePreferredRequest, SelectOption, WriteStatusResponse,
};
pub use summary::{ProjectListResponse, ProjectTestRun, ProjectTestRuns, ReportSummary};
pub use test_run::{SpecRun, SpecStatus, SuiteRun, Tag, TestRun};

/// Treat an explicit `null` the same as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Relay-style page metadata returned with every `testRuns` page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub start_cursor: Option<String>,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// One page of records fetched with an opaque cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Records in server order.
    pub records: Vec<T>,
    /// Cursor to pass as `after` for the following page.
    pub next_cursor: Option<String>,
    pub has_next_page: bool,
    /// Total number of records across all pages.
    pub total_count: u64,
}

impl<T> Page<T> {
    /// A final page with no successor.
    pub fn last(records: Vec<T>, total_count: u64) -> Self {
        Page {
            records,
            next_cursor: None,
            has_next_page: false,
            total_count,
        }
    }
}

/// Slice one 1-based page out of an in-memory list.
///
/// Pages past the end are empty; page 0 is treated as page 1.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page_size == 0 {
        return &[];
    }
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

/// Number of pages needed to show `total` items.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if total == 0 || page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    }
}
