/// Renders the `adb` command lines for a single device.
///
/// Nothing here is escaped: the device serial and every path or package name
/// must already be a single shell-safe token.
#[derive(Clone, Debug)]
pub struct CommandBuilder {
    bin: String,
    serial: String,
}

impl CommandBuilder {
    pub fn new<B: Into<String>, S: Into<String>>(bin: B, serial: S) -> Self {
        Self {
            bin: bin.into(),
            serial: serial.into(),
        }
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// `adb -s <serial>`
    pub fn base(&self) -> String {
        format!("{} -s {}", self.bin, self.serial)
    }

    /// `adb -s <serial> shell`
    pub fn shell_base(&self) -> String {
        format!("{} shell", self.base())
    }

    fn shell(&self, cmd: &str) -> String {
        format!("{} {}", self.shell_base(), cmd)
    }

    pub fn list_packages(&self) -> String {
        self.shell("pm list packages -f")
    }

    pub fn pull(&self, remote: &str, local: &str) -> String {
        format!("{} pull {} {}", self.base(), remote, local)
    }

    pub fn hash(&self, hash_fn: &str, path: &str) -> String {
        self.shell(&format!("{} {}", hash_fn, path))
    }

    pub fn dump_package(&self, package: &str) -> String {
        self.shell(&format!("dumpsys package {}", package))
    }

    pub fn network_interfaces(&self) -> String {
        self.shell("ifconfig")
    }

    pub fn interface_address(&self, iface: &str) -> String {
        self.shell(&format!("ip addr show {}", iface))
    }

    pub fn install(&self, apk: &str) -> String {
        format!("{} install {}", self.base(), apk)
    }

    pub fn uninstall(&self, package: &str) -> String {
        format!("{} uninstall {}", self.base(), package)
    }

    pub fn grant(&self, package: &str, permission: &str) -> String {
        self.shell(&format!("pm grant {} {}", package, permission))
    }

    pub fn revoke(&self, package: &str, permission: &str) -> String {
        self.shell(&format!("pm revoke {} {}", package, permission))
    }

    /// `getprop <prop>`, unless the property is already a full shell command
    pub fn get_property(&self, prop: &str) -> String {
        if prop.contains(' ') {
            self.shell(prop)
        } else {
            self.shell(&format!("getprop {}", prop))
        }
    }
}
