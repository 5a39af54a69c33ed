//! Service configuration, client factory and identifier generation

pub mod config;
pub mod dependencies;
pub mod identifier;

pub use config::{Environment, ServiceConfig, StorageConfig};
pub use dependencies::CREDENTIALS_PROFILE;
pub use identifier::{new_identifier, new_identifier_from};
