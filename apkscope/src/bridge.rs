use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use which::which;

use crate::commands::CommandBuilder;
use crate::executor::{CommandExecutor, ProcessExecutor};
use crate::Error;

/// Env var that overrides where `adb` is looked up
pub const ADB_ENV: &str = "APKSCOPE_ADB";

/// First words of `adb version` output
const VERSION_BANNER: &str = "Android Debug Bridge";

/// Handle on the `adb` executable. Every command goes through its
/// [CommandExecutor], so a `Bridge` is cheap to clone and share between the
/// components of a session.
#[derive(Clone)]
pub struct Bridge {
    bin: String,
    executor: Arc<dyn CommandExecutor>,
}

fn find_adb() -> Option<PathBuf> {
    if let Ok(path) = env::var(ADB_ENV) {
        let pbuf = PathBuf::from(path);
        return if pbuf.exists() { Some(pbuf) } else { None };
    }
    which("adb").ok()
}

impl Bridge {
    /// Finds `adb` using [ADB_ENV] or the PATH and runs it with the
    /// [ProcessExecutor]
    pub fn locate() -> crate::Result<Self> {
        let bin = find_adb().ok_or(Error::BridgeNotFound)?;
        log::info!("using adb at {}", bin.display());
        Ok(Self::unchecked(
            bin.to_string_lossy(),
            Arc::new(ProcessExecutor::new()),
        ))
    }

    /// Uses the given executable after checking that `<path> version` prints
    /// the adb banner
    pub fn with_path(path: &str, executor: Arc<dyn CommandExecutor>) -> crate::Result<Self> {
        if path.trim().is_empty() {
            return Err(Error::IncorrectPath(path.into()));
        }
        let bridge = Self::unchecked(path, executor);
        match bridge.executor.run(&format!("{} version", bridge.bin)) {
            Ok(lines) if lines.iter().any(|it| it.contains(VERSION_BANNER)) => {
                log::debug!("adb at {} is valid", path);
                Ok(bridge)
            }
            Ok(_) => {
                log::debug!("`{} version` did not print the adb banner", path);
                Err(Error::IncorrectPath(path.into()))
            }
            Err(e) => {
                log::debug!("`{} version` failed: {}", path, e);
                Err(Error::IncorrectPath(path.into()))
            }
        }
    }

    /// Skips validation entirely
    pub fn unchecked<S: Into<String>>(bin: S, executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            bin: bin.into(),
            executor,
        }
    }

    pub fn bin(&self) -> &str {
        &self.bin
    }

    pub fn executor(&self) -> &dyn CommandExecutor {
        self.executor.as_ref()
    }

    /// Command renderer for the given device
    pub fn commands(&self, serial: &str) -> CommandBuilder {
        CommandBuilder::new(self.bin.as_str(), serial)
    }

    /// Serials of the devices `adb devices` currently reports.
    ///
    /// Failing to run `adb` is not an error here, it just means there are no
    /// devices.
    pub fn available_devices(&self) -> Vec<String> {
        let output = match self.executor.run(&format!("{} devices", self.bin)) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("no available devices found: {}", e);
                return Vec::new();
            }
        };
        let devices = parse_device_list(&output);
        if devices.is_empty() {
            log::warn!("no available devices found");
        }
        devices
    }

    /// Like [Bridge::available_devices], minus entries still carrying a state
    /// such as `unauthorized` or `offline`
    pub fn ready_devices(&self) -> Vec<String> {
        self.available_devices()
            .into_iter()
            .filter(|it| !it.contains(char::is_whitespace))
            .collect()
    }

    pub fn is_available(&self, serial: &str) -> bool {
        self.available_devices().iter().any(|it| it == serial)
    }
}

/// Parses `adb devices` output.
///
/// Lines starting with `*` (daemon chatter) or `List` (the header) are
/// dropped along with blank lines. A trailing `device` state is stripped so
/// only ready devices reduce to their bare serial; `unauthorized` or
/// `offline` entries keep their state and never match a serial.
pub fn parse_device_list<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut devices = Vec::new();
    for line in lines.iter().map(|it| it.as_ref()) {
        if line.starts_with('*') || line.starts_with("List") || line.trim().is_empty() {
            continue;
        }
        let trimmed = line.trim();
        let serial = match trimmed.strip_suffix("device") {
            Some(rest) if rest.ends_with(char::is_whitespace) => rest.trim(),
            _ => trimmed,
        };
        devices.push(String::from(serial));
    }
    devices
}
