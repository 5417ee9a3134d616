//! Human-readable run durations ("a few seconds", "5 minutes", "an hour").

use chrono::{DateTime, Utc};

use crate::models::TestRun;

const DAYS_PER_MONTH: f64 = 30.436875;
const DAYS_PER_YEAR: f64 = 365.2425;

/// Elapsed time between two instants in words. Order does not matter.
pub fn humanize_duration(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let millis = (end - start).num_milliseconds().unsigned_abs() as f64;
    humanize_millis(millis)
}

/// Duration of a run, if both ends are known.
pub fn run_duration(test_run: &TestRun) -> Option<String> {
    Some(humanize_duration(test_run.start_time?, test_run.end_time?))
}

fn humanize_millis(millis: f64) -> String {
    let seconds = (millis / 1000.0).round();
    let minutes = (millis / 60_000.0).round();
    let hours = (millis / 3_600_000.0).round();
    let days_exact = millis / 86_400_000.0;
    let days = days_exact.round();
    let months = (days_exact / DAYS_PER_MONTH).round();
    let years = (days_exact / DAYS_PER_YEAR).round();

    if seconds < 45.0 {
        "a few seconds".to_string()
    } else if minutes <= 1.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        format!("{} minutes", minutes)
    } else if hours <= 1.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        format!("{} hours", hours)
    } else if days <= 1.0 {
        "a day".to_string()
    } else if days < 26.0 {
        format!("{} days", days)
    } else if months <= 1.0 {
        "a month".to_string()
    } else if months < 11.0 {
        format!("{} months", months)
    } else if years <= 1.0 {
        "a year".to_string()
    } else {
        format!("{} years", years)
    }
}
