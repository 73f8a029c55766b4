use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use crate::bridge::Bridge;
use crate::commands::CommandBuilder;
use crate::enumerator::ApplicationEnumerator;
use crate::hashing::HashEngine;
use crate::model::{Application, DeviceIdentity, DeviceSnapshot};
use crate::network::{IpVersion, NetworkInspector};
use crate::permissions::{DangerousPermissions, PermissionClassifier};
use crate::properties::PropertyReader;
use crate::utils::{ensure_dir_exists, path_must_str};
use crate::version::numeric_version;
use crate::Error;

const SUCCESS_MARKER: &str = "Success";
const UNKNOWN_PACKAGE_MARKER: &str = "Unknown package";
const UNKNOWN_PERMISSION_MARKER: &str = "Unknown permission";
const NOT_ALLOWED_MARKER: &str = "Operation not allowed";

/// How a [DeviceSession] bootstraps
#[derive(Clone, Debug, Default)]
pub struct SessionOptions {
    restriction: Option<usize>,
    reference: Arc<DangerousPermissions>,
    work_dir: Option<PathBuf>,
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only load the first `count` applications, 0 means no restriction
    pub fn restriction(mut self, count: usize) -> Self {
        self.restriction = Some(count);
        self
    }

    pub fn dangerous_permissions(mut self, reference: Arc<DangerousPermissions>) -> Self {
        self.reference = reference;
        self
    }

    /// Directory packages are pulled into, a fresh temporary directory is
    /// used if this isn't set
    pub fn work_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.work_dir = Some(dir.into());
        self
    }
}

enum WorkDir {
    Temporary(TempDir),
    Configured(PathBuf),
}

impl WorkDir {
    fn create(configured: Option<PathBuf>) -> crate::Result<Self> {
        match configured {
            Some(dir) => {
                ensure_dir_exists(&dir)?;
                Ok(Self::Configured(dir))
            }
            None => Ok(Self::Temporary(tempfile::tempdir()?)),
        }
    }

    fn path(&self) -> &Path {
        match self {
            Self::Temporary(dir) => dir.path(),
            Self::Configured(dir) => dir.as_path(),
        }
    }
}

/// A validated device together with everything that was loaded from it.
///
/// The application list is read once when the session is created; the only
/// later change is dropping a record after a successful uninstall.
pub struct DeviceSession {
    bridge: Bridge,
    commands: CommandBuilder,
    identity: DeviceIdentity,
    applications: Vec<Application>,
    reference: Arc<DangerousPermissions>,
    work_dir: WorkDir,
}

impl DeviceSession {
    /// Validates `serial` against `adb devices` and loads its properties and
    /// applications
    pub fn connect(bridge: Bridge, serial: &str, options: SessionOptions) -> crate::Result<Self> {
        if !bridge.is_available(serial) {
            return Err(Error::DeviceNotAvailable(serial.into()));
        }

        let commands = bridge.commands(serial);
        let work_dir = WorkDir::create(options.work_dir)?;
        log::info!("bootstrapping {}", serial);

        let properties = PropertyReader::new(bridge.executor(), &commands).read();
        let version = numeric_version(&properties.android_version).unwrap_or_else(|| {
            log::warn!(
                "unusable android version {:?} for {}, packages will be pulled",
                properties.android_version,
                serial
            );
            0.0
        });

        let mut applications =
            ApplicationEnumerator::new(bridge.executor(), &commands).list(options.restriction)?;
        log::info!("found {} applications on {}", applications.len(), serial);

        let classifier = PermissionClassifier::new(options.reference.as_ref());
        let engine = HashEngine::new(bridge.executor(), &commands, work_dir.path());
        for app in applications.iter_mut() {
            log::debug!("loading {}", app.package);
            app.permissions = classifier.collect(bridge.executor(), &commands, &app.package)?;
            app.hashes = Some(engine.compute(&app.path, version)?);
        }

        log::info!("{} is ready", serial);
        Ok(Self {
            identity: DeviceIdentity {
                serial: serial.into(),
                properties,
            },
            bridge,
            commands,
            applications,
            reference: options.reference,
            work_dir,
        })
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    pub fn serial(&self) -> &str {
        &self.identity.serial
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn application(&self, package: &str) -> Option<&Application> {
        self.applications.iter().find(|it| it.package == package)
    }

    pub fn dangerous_permissions(&self) -> &DangerousPermissions {
        self.reference.as_ref()
    }

    pub fn work_dir(&self) -> &Path {
        self.work_dir.path()
    }

    pub fn snapshot(&self) -> DeviceSnapshot {
        DeviceSnapshot {
            identity: self.identity.clone(),
            applications: self.applications.clone(),
        }
    }

    fn run(&self, cmd: &str, what: &str) -> crate::Result<Vec<String>> {
        self.bridge
            .executor()
            .run(cmd)
            .map_err(|e| Error::execution(what, &e))
    }

    /// Installs a local package, `Ok(false)` means adb did not report success
    pub fn install(&self, apk: &Path) -> crate::Result<bool> {
        if !apk.is_file() {
            return Err(Error::IncorrectPath(path_must_str(apk).into()));
        }
        let cmd = self.commands.install(&path_must_str(apk));
        log::info!("installing {} on {}", apk.display(), self.serial());
        let lines = self.run(&cmd, &format!("failed to install {}", apk.display()))?;
        Ok(contains_success(&lines))
    }

    /// Uninstalls `package` and drops its record if adb reports success
    pub fn uninstall(&mut self, package: &str) -> crate::Result<bool> {
        if !package.contains('.') {
            return Err(Error::InvalidPackageName(package.into()));
        }
        let cmd = self.commands.uninstall(package);
        log::info!("uninstalling {} from {}", package, self.serial());
        let lines = self.run(&cmd, &format!("failed to uninstall {}", package))?;
        if !contains_success(&lines) {
            return Ok(false);
        }
        self.applications.retain(|it| it.package != package);
        Ok(true)
    }

    pub fn grant(&self, package: &str, permission: &str) -> crate::Result<()> {
        let cmd = self.commands.grant(package, permission);
        log::info!("granting {} to {}", permission, package);
        let lines = self.run(&cmd, &format!("failed to grant {}", permission))?;
        check_permission_change(&lines, package, permission)
    }

    pub fn grant_app(&self, app: &Application, permission: &str) -> crate::Result<()> {
        self.grant(&app.package, permission)
    }

    pub fn revoke(&self, package: &str, permission: &str) -> crate::Result<()> {
        let cmd = self.commands.revoke(package, permission);
        log::info!("revoking {} from {}", permission, package);
        let lines = self.run(&cmd, &format!("failed to revoke {}", permission))?;
        check_permission_change(&lines, package, permission)
    }

    pub fn revoke_app(&self, app: &Application, permission: &str) -> crate::Result<()> {
        self.revoke(&app.package, permission)
    }

    pub fn network_interfaces(&self) -> crate::Result<Vec<String>> {
        NetworkInspector::new(self.bridge.executor(), &self.commands).interfaces()
    }

    pub fn interface_address(
        &self,
        name: &str,
        version: IpVersion,
    ) -> crate::Result<Option<String>> {
        NetworkInspector::new(self.bridge.executor(), &self.commands).address(name, version)
    }
}

fn contains_success(lines: &[String]) -> bool {
    lines.iter().any(|it| it.contains(SUCCESS_MARKER))
}

/// Only the first line of `pm grant`/`pm revoke` output is inspected
fn check_permission_change(lines: &[String], package: &str, permission: &str) -> crate::Result<()> {
    let first = match lines.first() {
        Some(v) => v,
        None => return Ok(()),
    };
    if first.contains(UNKNOWN_PACKAGE_MARKER) {
        Err(Error::UnknownPackage(package.into()))
    } else if first.contains(UNKNOWN_PERMISSION_MARKER) {
        Err(Error::UnknownPermission(permission.into()))
    } else if first.contains(NOT_ALLOWED_MARKER) {
        Err(Error::OperationNotAllowed(first.clone()))
    } else {
        Ok(())
    }
}
