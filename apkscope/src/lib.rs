pub mod bridge;
pub use bridge::Bridge;

pub mod commands;
pub use commands::CommandBuilder;

pub mod config;
pub use config::InventoryConfig;

pub mod enumerator;
pub use enumerator::ApplicationEnumerator;

pub mod errors;
pub use errors::{Error, Result};

pub mod executor;
pub use executor::{CommandExecutor, ProcessExecutor};

pub mod hashing;
pub use hashing::HashEngine;

pub mod model;
pub use model::{
    Application, DeviceIdentity, DeviceProperties, DeviceSnapshot, Hashes, Permission,
    PermissionSets,
};

pub mod network;
pub use network::IpVersion;

pub mod permissions;
pub use permissions::{DangerousPermissions, PermissionClassifier};

pub mod properties;
pub use properties::PropertyReader;

pub mod session;
pub use session::{DeviceSession, SessionOptions};

pub mod version;

pub mod utils;

#[cfg(test)]
pub mod testing;
