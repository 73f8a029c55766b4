use std::collections::HashSet;

use lazy_static::lazy_static;

use crate::commands::CommandBuilder;
use crate::executor::CommandExecutor;
use crate::model::{Permission, PermissionSets};

/// Platform permissions with protection level `dangerous`
pub const PLATFORM_DANGEROUS_PERMISSIONS: &[&str] = &[
    "android.permission.ACCEPT_HANDOVER",
    "android.permission.ACCESS_BACKGROUND_LOCATION",
    "android.permission.ACCESS_COARSE_LOCATION",
    "android.permission.ACCESS_FINE_LOCATION",
    "android.permission.ACCESS_MEDIA_LOCATION",
    "android.permission.ACTIVITY_RECOGNITION",
    "android.permission.ANSWER_PHONE_CALLS",
    "android.permission.BLUETOOTH_ADVERTISE",
    "android.permission.BLUETOOTH_CONNECT",
    "android.permission.BLUETOOTH_SCAN",
    "android.permission.BODY_SENSORS",
    "android.permission.BODY_SENSORS_BACKGROUND",
    "android.permission.CALL_PHONE",
    "android.permission.CAMERA",
    "android.permission.GET_ACCOUNTS",
    "android.permission.NEARBY_WIFI_DEVICES",
    "android.permission.POST_NOTIFICATIONS",
    "android.permission.PROCESS_OUTGOING_CALLS",
    "android.permission.READ_CALENDAR",
    "android.permission.READ_CALL_LOG",
    "android.permission.READ_CONTACTS",
    "android.permission.READ_EXTERNAL_STORAGE",
    "android.permission.READ_MEDIA_AUDIO",
    "android.permission.READ_MEDIA_IMAGES",
    "android.permission.READ_MEDIA_VIDEO",
    "android.permission.READ_MEDIA_VISUAL_USER_SELECTED",
    "android.permission.READ_PHONE_NUMBERS",
    "android.permission.READ_PHONE_STATE",
    "android.permission.READ_SMS",
    "android.permission.RECEIVE_MMS",
    "android.permission.RECEIVE_SMS",
    "android.permission.RECEIVE_WAP_PUSH",
    "android.permission.RECORD_AUDIO",
    "android.permission.SEND_SMS",
    "android.permission.USE_SIP",
    "android.permission.UWB_RANGING",
    "android.permission.WRITE_CALENDAR",
    "android.permission.WRITE_CALL_LOG",
    "android.permission.WRITE_CONTACTS",
    "android.permission.WRITE_EXTERNAL_STORAGE",
    "com.android.voicemail.permission.ADD_VOICEMAIL",
];

lazy_static! {
    static ref PLATFORM_DANGEROUS: HashSet<String> = PLATFORM_DANGEROUS_PERMISSIONS
        .iter()
        .map(|it| String::from(*it))
        .collect();
}

/// Reference set used to decide whether a permission is dangerous.
///
/// The default is the platform list; vendors can be added with
/// [DangerousPermissions::with_extra].
#[derive(Clone, Debug)]
pub struct DangerousPermissions {
    names: HashSet<String>,
}

impl Default for DangerousPermissions {
    fn default() -> Self {
        Self {
            names: PLATFORM_DANGEROUS.clone(),
        }
    }
}

impl DangerousPermissions {
    /// A reference set containing only the given names
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(|it| it.into()).collect(),
        }
    }

    pub fn with_extra<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(|it| it.into()));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

const REQUESTED_HEADER: &str = "requested permissions";
const INSTALL_HEADER: &str = "install permissions";
const RUNTIME_HEADER: &str = "runtime permissions";
const PERMISSION_MARKER: &str = "android.permission";

/// Which section of the dump the classifier is reading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Awaiting,
    CollectingRequested,
    CollectingInstall,
    CollectingRuntime,
}

/// Turns `dumpsys package <pkg>` output into [PermissionSets]
pub struct PermissionClassifier<'a> {
    reference: &'a DangerousPermissions,
}

impl<'a> PermissionClassifier<'a> {
    pub fn new(reference: &'a DangerousPermissions) -> Self {
        Self { reference }
    }

    /// Runs the dump for `package` and classifies it
    pub fn collect(
        &self,
        executor: &dyn CommandExecutor,
        commands: &CommandBuilder,
        package: &str,
    ) -> crate::Result<PermissionSets> {
        let cmd = commands.dump_package(package);
        let lines = executor.run(&cmd).map_err(|e| {
            log::debug!("`{}` failed: {}", cmd, e);
            crate::Error::PermissionCollection(package.into())
        })?;
        Ok(self.classify(&lines))
    }

    pub fn classify<S: AsRef<str>>(&self, lines: &[S]) -> PermissionSets {
        let mut sets = PermissionSets::default();
        let mut stage = Stage::Awaiting;

        for line in lines.iter().map(|it| it.as_ref()) {
            if line.contains(REQUESTED_HEADER) {
                stage = Stage::CollectingRequested;
                continue;
            } else if line.contains(INSTALL_HEADER) {
                stage = Stage::CollectingInstall;
                continue;
            } else if line.contains(RUNTIME_HEADER) {
                // No `continue`, the header line still goes through the data check
                stage = Stage::CollectingRuntime;
            }

            if stage == Stage::Awaiting || !line.contains(PERMISSION_MARKER) {
                continue;
            }

            let permission = parse_permission_line(line, stage);
            let section = match stage {
                Stage::CollectingRequested => &mut sets.requested,
                Stage::CollectingInstall => &mut sets.install,
                Stage::CollectingRuntime => &mut sets.runtime,
                Stage::Awaiting => continue,
            };

            // Multi-user dumps repeat the runtime section per user
            if section.iter().any(|it| it.name == permission.name) {
                continue;
            }

            if permission.is_dangerous(self.reference) {
                sets.dangerous.push(permission.clone());
            }
            section.push(permission);
        }

        sets
    }
}

fn parse_permission_line(line: &str, stage: Stage) -> Permission {
    let trimmed = line.trim();
    let name = match trimmed.split_once(':') {
        Some((name, _)) => name,
        None => trimmed,
    };
    // Requested permissions are recorded as present, the dump's grant state
    // for them is ignored
    let granted = stage == Stage::CollectingRequested || trimmed.contains("true");
    Permission::new(name, granted)
}
