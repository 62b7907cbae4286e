//! Handles registry server library.
//!
//! Configuration parsing, registry bootstrap, and shutdown handling for the
//! `handles-server` binary.

#![deny(unsafe_code)]

pub mod bootstrap;
pub mod config;
pub mod shutdown;
