use std::io;
use std::path::Path;

use thiserror::Error;

use crate::utils::path_must_str;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("adb was not found, add it to PATH or set APKSCOPE_ADB")]
    BridgeNotFound,

    #[error("android device {0} is not available")]
    DeviceNotAvailable(String),

    #[error("incorrect path: {0}")]
    IncorrectPath(String),

    #[error("{0}, check if the device is available")]
    Execution(String),

    #[error("failed to collect permissions for package {0}, check if the device is available")]
    PermissionCollection(String),

    #[error("unknown package: {0}")]
    UnknownPackage(String),

    #[error("unknown permission: {0}")]
    UnknownPermission(String),

    #[error("operation not allowed: {0}")]
    OperationNotAllowed(String),

    #[error("invalid package name: {0}")]
    InvalidPackageName(String),

    #[error("network interface {0} not found")]
    NetworkInterfaceNotFound(String),

    #[error("unsupported ip version {0}, expected ipv4 or ipv6")]
    UnsupportedIpVersion(String),

    #[error("malformed adb output: {0}")]
    MalformedOutput(String),

    #[error("invalid config {0}: {1}")]
    InvalidConfig(String, String),

    #[error("{0}")]
    IO(io::Error),
}

impl Error {
    /// Wraps a failure to launch or read a bridge process
    pub fn execution<S: ToString + ?Sized>(what: &S, err: &io::Error) -> Self {
        log::debug!("{}: {}", what.to_string(), err);
        Self::Execution(what.to_string())
    }

    pub fn new_cfg<S: ToString + ?Sized>(path: &Path, s: &S) -> Self {
        let as_str = path_must_str(path);
        Self::InvalidConfig(as_str.into(), s.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::IO(err)
    }
}
