//! Domain layer for gofcm
//!
//! Typed configuration model consumed by the service components.

pub mod models;
