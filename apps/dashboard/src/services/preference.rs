//! Theme and timezone state shared across the dashboard.
//!
//! Uses tokio::sync::watch so every view holds a receiver with the current
//! value and is woken when it changes. The store is created once at startup
//! and handed to whoever needs it.

use std::sync::Arc;

use chrono_tz::{TZ_VARIANTS, Tz};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::api::DashboardApi;
use crate::error::{AppError, AppResult};
use crate::models::{SelectOption, UserPreference};

/// Whether `name` is an IANA zone such as `Europe/Berlin`. Case-sensitive.
pub fn is_known_timezone(name: &str) -> bool {
    name.parse::<Tz>().is_ok()
}

/// Every selectable timezone, in database order.
pub fn timezone_options() -> Vec<SelectOption> {
    TZ_VARIANTS
        .iter()
        .map(|tz| SelectOption {
            label: tz.name().to_string(),
            value: tz.name().to_string(),
        })
        .collect()
}

/// Current user preference plus its change channel.
#[derive(Clone)]
pub struct PreferenceStore {
    api: Arc<dyn DashboardApi>,
    sender: Arc<watch::Sender<UserPreference>>,
}

impl PreferenceStore {
    /// Start from the default light theme in UTC.
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self::with_initial(api, UserPreference::default())
    }

    pub fn with_initial(api: Arc<dyn DashboardApi>, initial: UserPreference) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            api,
            sender: Arc::new(sender),
        }
    }

    /// Receiver that always sees the latest preference.
    pub fn subscribe(&self) -> watch::Receiver<UserPreference> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> UserPreference {
        self.sender.borrow().clone()
    }

    /// Replace the current value with the server's.
    ///
    /// On failure the current value is kept.
    pub async fn load(&self) -> AppResult<UserPreference> {
        let preference = self.api.get_user_preference().await.map_err(|e| {
            warn!("Failed to load user preference: {}", e);
            e
        })?;
        info!(
            "Loaded user preference (dark: {}, timezone: {})",
            preference.is_dark, preference.timezone
        );
        self.sender.send_replace(preference.clone());
        Ok(preference)
    }

    /// Persist a new preference and publish it once the server accepts it.
    ///
    /// Concurrent saves are not ordered; whichever confirms last wins.
    pub async fn save(&self, preference: UserPreference) -> AppResult<()> {
        if preference.timezone.trim().is_empty() {
            return Err(AppError::Validation("Select a timezone".to_string()));
        }
        if !is_known_timezone(&preference.timezone) {
            return Err(AppError::Validation(format!(
                "Unknown timezone: {}",
                preference.timezone
            )));
        }

        self.api
            .save_user_preference(&preference)
            .await
            .map_err(|e| {
                warn!("Failed to save user preference: {}", e);
                e
            })?;

        self.sender.send_replace(preference);
        Ok(())
    }

    /// Switch between light and dark theme, keeping the timezone.
    pub async fn set_dark(&self, is_dark: bool) -> AppResult<()> {
        let mut preference = self.current();
        preference.is_dark = is_dark;
        self.save(preference).await
    }

    /// Change the timezone, keeping the theme.
    pub async fn set_timezone(&self, timezone: &str) -> AppResult<()> {
        let mut preference = self.current();
        preference.timezone = timezone.trim().to_string();
        self.save(preference).await
    }
}
