//! Infrastructure layer module
//!
//! This module contains the adapters around the domain model:
//! - Configuration resolution (defaults, files, environment)
//! - Logging infrastructure

pub mod config;
pub mod logging;
