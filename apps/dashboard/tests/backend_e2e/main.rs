//! Backend E2E test suite.
//!
//! Drives the real HTTP client against an in-process mock backend.
//!
//! Run with: cargo test --test backend_e2e

mod mock_backend;

mod test_preference;
