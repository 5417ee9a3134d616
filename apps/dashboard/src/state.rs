//! Application state built once at startup and passed to every view.

use std::sync::Arc;

use crate::api::{DashboardApi, HttpDashboardClient};
use crate::config::Config;
use crate::error::AppResult;
use crate::services::{
    CursorPager, FavoritesManager, GroupManager, HeatmapBuilder, PreferenceStore,
};

/// Shared handles for the dashboard. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub api: Arc<dyn DashboardApi>,
    pub preferences: PreferenceStore,
}

impl AppState {
    pub fn new(config: Config, api: Arc<dyn DashboardApi>) -> Self {
        AppState {
            preferences: PreferenceStore::new(api.clone()),
            config: Arc::new(config),
            api,
        }
    }

    /// State backed by the HTTP client for the configured backend.
    pub fn connect(config: Config) -> AppResult<Self> {
        let client = HttpDashboardClient::new(&config)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    /// A fresh pager for one list view.
    pub fn test_run_pager(&self) -> CursorPager {
        CursorPager::new(self.api.clone(), self.config.page_size)
    }

    pub fn group_manager(&self) -> GroupManager {
        GroupManager::new(self.api.clone())
    }

    pub fn favorites_manager(&self) -> FavoritesManager {
        FavoritesManager::new(self.api.clone())
    }

    pub fn heatmap_builder(&self) -> HeatmapBuilder {
        HeatmapBuilder::new(self.api.clone())
    }
}
