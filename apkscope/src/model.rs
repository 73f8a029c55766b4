use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::permissions::DangerousPermissions;

/// A single permission line from `dumpsys package`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub name: String,
    pub granted: bool,
}

impl Permission {
    pub fn new<S: Into<String>>(name: S, granted: bool) -> Self {
        Self {
            name: name.into(),
            granted,
        }
    }

    pub fn is_dangerous(&self, reference: &DangerousPermissions) -> bool {
        reference.contains(&self.name)
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: granted={}", self.name, self.granted)
    }
}

/// The four permission collections of an application, each in dump order.
///
/// `dangerous` overlaps the others: every dangerous entry is also in exactly
/// the section it was found in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSets {
    pub dangerous: Vec<Permission>,
    pub install: Vec<Permission>,
    pub runtime: Vec<Permission>,
    pub requested: Vec<Permission>,
}

/// Package digests, lowercase hex
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hashes {
    pub sha1: String,
    pub sha256: String,
    pub sha512: String,
}

/// An installed package as listed by `pm list packages -f`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub path: String,
    pub package: String,
    /// `None` until the digests have been computed
    pub hashes: Option<Hashes>,
    pub permissions: PermissionSets,
}

impl Application {
    pub fn new<P: Into<String>, N: Into<String>>(path: P, package: N) -> Self {
        Self {
            path: path.into(),
            package: package.into(),
            hashes: None,
            permissions: PermissionSets::default(),
        }
    }

    pub fn sha1(&self) -> &str {
        self.hashes.as_ref().map(|it| it.sha1.as_str()).unwrap_or("")
    }

    pub fn sha256(&self) -> &str {
        self.hashes.as_ref().map(|it| it.sha256.as_str()).unwrap_or("")
    }

    pub fn sha512(&self) -> &str {
        self.hashes.as_ref().map(|it| it.sha512.as_str()).unwrap_or("")
    }

    pub fn has_dangerous_permissions(&self) -> bool {
        !self.permissions.dangerous.is_empty()
    }
}

impl Display for Application {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.package)
    }
}

/// Raw `getprop` values, all empty if they couldn't be read
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProperties {
    pub android_version: String,
    pub sdk_version: String,
    pub brand: String,
    pub model: String,
}

/// Who the device is. Fixed once the session is created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub serial: String,
    pub properties: DeviceProperties,
}

/// Everything known about a device at the time its session was created
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub identity: DeviceIdentity,
    pub applications: Vec<Application>,
}

impl DeviceSnapshot {
    pub fn application(&self, package: &str) -> Option<&Application> {
        self.applications.iter().find(|it| it.package == package)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hash_accessors_empty_until_computed() {
        let mut app = Application::new("/system/app/Foo/Foo.apk", "com.example.foo");
        assert_eq!(app.sha1(), "");
        assert_eq!(app.sha256(), "");
        assert_eq!(app.sha512(), "");

        app.hashes = Some(Hashes {
            sha1: "a".into(),
            sha256: "b".into(),
            sha512: "c".into(),
        });
        assert_eq!(app.sha1(), "a");
        assert_eq!(app.sha256(), "b");
        assert_eq!(app.sha512(), "c");
    }

    #[test]
    fn test_permission_is_dangerous() {
        let reference = DangerousPermissions::default();
        assert!(Permission::new("android.permission.CAMERA", false).is_dangerous(&reference));
        assert!(!Permission::new("android.permission.INTERNET", true).is_dangerous(&reference));
    }

    #[test]
    fn test_snapshot_serializes() {
        let snapshot = DeviceSnapshot {
            identity: DeviceIdentity {
                serial: "emulator-5554".into(),
                properties: DeviceProperties::default(),
            },
            applications: vec![Application::new("/a/b.apk", "com.example.b")],
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["identity"]["serial"], "emulator-5554");
        assert_eq!(json["applications"][0]["package"], "com.example.b");
        assert!(json["applications"][0]["hashes"].is_null());
    }
}
