//! Favorite projects. The local set only changes once the server confirms.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::api::DashboardApi;
use crate::error::AppResult;

pub struct FavoritesManager {
    api: Arc<dyn DashboardApi>,
    favorites: BTreeSet<Uuid>,
}

impl FavoritesManager {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        FavoritesManager {
            api,
            favorites: BTreeSet::new(),
        }
    }

    pub fn favorites(&self) -> &BTreeSet<Uuid> {
        &self.favorites
    }

    pub fn is_favorite(&self, uuid: &Uuid) -> bool {
        self.favorites.contains(uuid)
    }

    /// Replace the local set with the server's.
    ///
    /// A failed fetch keeps whatever the last successful fetch returned.
    pub async fn fetch_favorites(&mut self) -> AppResult<&BTreeSet<Uuid>> {
        let favorites = self.api.get_favorites().await.map_err(|e| {
            warn!("Failed to fetch favorites: {}", e);
            e
        })?;
        info!("Loaded {} favorite projects", favorites.len());
        self.favorites = favorites;
        Ok(&self.favorites)
    }

    /// Flip a project's favorite flag on the server, then locally.
    ///
    /// `currently_favorite` is the state the user saw when toggling.
    /// Returns the new state.
    pub async fn toggle_favorite(&mut self, uuid: Uuid, currently_favorite: bool) -> AppResult<bool> {
        if currently_favorite {
            self.api.unmark_favorite(uuid).await.map_err(|e| {
                warn!("Failed to unmark favorite {}: {}", uuid, e);
                e
            })?;
            self.favorites.remove(&uuid);
            Ok(false)
        } else {
            self.api.mark_favorite(uuid).await.map_err(|e| {
                warn!("Failed to mark favorite {}: {}", uuid, e);
                e
            })?;
            self.favorites.insert(uuid);
            Ok(true)
        }
    }
}
