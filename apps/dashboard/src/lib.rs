//! Fern test report dashboard library.
//!
//! This library provides the client-side core of the dashboard: the backend
//! API client, status and tag aggregation, cursor paging, project groups,
//! favorites, heatmaps and user preferences.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_utils;

pub use state::AppState;
