//! Domain models.

pub mod config;

pub use config::{
    ApiSection, ConfigSchema, CoreSection, LogSection, RpcSection, StorageSection, ThriftSection,
};
