//! User display preferences (theme and timezone).

use serde::{Deserialize, Serialize};

/// Timezone used when the backend has none stored.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Theme and timezone for the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreference {
    pub is_dark: bool,
    pub timezone: String,
}

impl Default for UserPreference {
    fn default() -> Self {
        UserPreference {
            is_dark: false,
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

/// Response body of `GET /user/preference`.
///
/// The backend uses PascalCase keys and may omit either value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPreferenceResponse {
    #[serde(rename = "IsDark", default)]
    pub is_dark: Option<bool>,
    #[serde(rename = "Timezone", default)]
    pub timezone: Option<String>,
}

impl From<UserPreferenceResponse> for UserPreference {
    fn from(resp: UserPreferenceResponse) -> Self {
        UserPreference {
            is_dark: resp.is_dark.unwrap_or(false),
            timezone: resp
                .timezone
                .filter(|tz| !tz.is_empty())
                .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
        }
    }
}
