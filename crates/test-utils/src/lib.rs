//! Shared test utilities for the handles registry crates.
//!
//! This crate provides common test helpers to reduce boilerplate across test modules:
//!
//! - [`ManualClock`] - Clock that moves only when told to
//! - [`ScriptedSuffixSource`] - Replays a fixed suffix sequence
//! - [`RecordingClient`] - SQL client mock with failure injection
//! - [`eventually`] - Poll an async condition until it holds or times out
//! - [`test_registry_config`] - Default registry configuration for tests

#![deny(unsafe_code)]
// Test utilities are allowed to use unwrap for simplicity
#![cfg_attr(test, allow(clippy::disallowed_methods))]

mod assertions;
pub use assertions::eventually;

mod client;
pub use client::{RecordedStatement, RecordingClient};

mod clock;
pub use clock::ManualClock;

mod config;
pub use config::{TEST_HMAC_SECRET, test_registry_config, test_registry_config_with_range};

mod suffixes;
pub use suffixes::ScriptedSuffixSource;

pub mod strategies;
