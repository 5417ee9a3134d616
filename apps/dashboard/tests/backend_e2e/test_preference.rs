//! E2E tests: theme and timezone preference.

use serde_json::json;

use super::test_helpers::*;

/// (1) Load reads the PascalCase payload and notifies subscribers.
#[actix_rt::test]
async fn test_load_preference() {
    let (backend, state) = start_state().await;
    backend.state.lock().unwrap().preference = json!({"IsDark": true, "Timezone": "Asia/Tokyo"});
    let rx = state.preferences.subscribe();

    state.preferences.load().await.unwrap();

    let current = rx.borrow().clone();
    assert!(current.is_dark);
    assert_eq!(current.timezone, "Asia/Tokyo");
}

/// (2) Missing values fall back to light theme in UTC.
#[actix_rt::test]
async fn test_load_defaults() {
    let (backend, state) = start_state().await;
    backend.state.lock().unwrap().preference = json!({});

    let preference = state.preferences.load().await.unwrap();

    assert!(!preference.is_dark);
    assert_eq!(preference.timezone, "UTC");
}

/// (3) Save PUTs the camelCase body.
#[actix_rt::test]
async fn test_save_preference() {
    let (backend, state) = start_state().await;

    state.preferences.set_timezone("Europe/Paris").await.unwrap();

    let bodies = backend.state.lock().unwrap().preference_bodies.clone();
    assert_eq!(bodies, vec![json!({"isDark": false, "timezone": "Europe/Paris"})]);
    assert_eq!(state.preferences.current().timezone, "Europe/Paris");
}

/// (4) A failed save keeps the current value.
#[actix_rt::test]
async fn test_failed_save() {
    let (backend, state) = start_state().await;
    backend.fail("preference");

    let err = state.preferences.set_dark(true).await.unwrap_err();

    assert_eq!(err.code(), "SAVE_ERROR");
    assert!(!state.preferences.current().is_dark);
}

/// (5) An unknown zone never reaches the backend.
#[actix_rt::test]
async fn test_unknown_timezone_not_sent() {
    let (backend, state) = start_state().await;

    let err = state
        .preferences
        .set_timezone("Mars/Olympus")
        .await
        .unwrap_err();

    assert_eq!(err.code(), "VALIDATION_ERROR");
    assert!(backend.state.lock().unwrap().preference_bodies.is_empty());
}
