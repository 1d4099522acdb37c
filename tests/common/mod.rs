//! Common test utilities for berth CLI tests.
//!
//! - `TestEnv`: isolated project and config directories plus a CLI runner
//! - Fixtures: a small service project with a local wheelhouse

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
