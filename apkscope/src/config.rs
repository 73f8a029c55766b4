use std::borrow::Cow;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use toml::{Table, Value};

use crate::permissions::DangerousPermissions;
use crate::session::SessionOptions;
use crate::utils::read_file;

/// Env var pointing at the configuration file
pub const CONFIG_ENV: &str = "APKSCOPE_CONFIG";

/// A view of one TOML table that knows where it came from, so lookups can
/// report `file: table.key` in their errors
pub struct ConfigMap<'c> {
    path: &'c Path,
    name: Option<Cow<'c, str>>,
    table: &'c Table,
}

pub fn parse_config<R, F>(file: &Path, f: F) -> crate::Result<R>
where
    F: FnOnce(&ConfigMap) -> crate::Result<R>,
{
    let as_str = read_file(file)?;
    let table: Table = toml::from_str(&as_str).map_err(|e| crate::Error::new_cfg(file, &e))?;
    f(&ConfigMap {
        path: file,
        name: None,
        table: &table,
    })
}

impl<'c> ConfigMap<'c> {
    fn key_path<'a>(&self, key: &'a str) -> Cow<'a, str> {
        match &self.name {
            None => Cow::Borrowed(key),
            Some(parent) => Cow::Owned(format!("{}.{}", parent, key)),
        }
    }

    /// Helper to create a crate::Error for an invalid key
    pub fn invalid_key(&self, key: &str, expected: &str) -> crate::Error {
        crate::Error::new_cfg(
            self.path,
            &format!(
                "invalid value for key: {} (expected type: {})",
                self.key_path(key),
                expected
            ),
        )
    }

    pub fn has(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    /// Looks up `key` and converts it with `conv`. A missing key is `None`,
    /// a value `conv` rejects is an error naming `expected`.
    fn typed<T, F>(&self, key: &str, expected: &str, conv: F) -> crate::Result<Option<T>>
    where
        F: FnOnce(&'c Value) -> Option<T>,
    {
        match self.table.get(key) {
            None => Ok(None),
            Some(v) => conv(v)
                .map(Some)
                .ok_or_else(|| self.invalid_key(key, expected)),
        }
    }

    pub fn get_int(&self, key: &str) -> crate::Result<Option<i64>> {
        self.typed(key, "int", Value::as_integer)
    }

    pub fn get_str(&self, key: &str) -> crate::Result<Option<&'c str>> {
        self.typed(key, "string", Value::as_str)
    }

    pub fn get_str_list(&self, key: &str) -> crate::Result<Option<Vec<&'c str>>> {
        self.typed(key, "string array", |v| {
            v.as_array()?.iter().map(Value::as_str).collect()
        })
    }

    /// The nested table at `key`
    pub fn get_map(&self, key: &str) -> crate::Result<Option<ConfigMap<'c>>> {
        let table = match self.typed(key, "table", Value::as_table)? {
            Some(v) => v,
            None => return Ok(None),
        };
        Ok(Some(ConfigMap {
            path: self.path,
            name: Some(Cow::Owned(self.key_path(key).into_owned())),
            table,
        }))
    }
}

/// Settings read from the `[bridge]` and `[inventory]` tables
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InventoryConfig {
    /// `bridge.executable`
    pub adb: Option<PathBuf>,
    /// `bridge.serial`
    pub serial: Option<String>,
    /// `inventory.limit`
    pub limit: Option<usize>,
    /// `inventory.pull-dir`
    pub pull_dir: Option<PathBuf>,
    /// `inventory.extra-dangerous`
    pub extra_dangerous: Vec<String>,
}

impl InventoryConfig {
    pub const BRIDGE_KEY: &'static str = "bridge";
    pub const INVENTORY_KEY: &'static str = "inventory";

    pub fn parse(file: &Path) -> crate::Result<Self> {
        parse_config(file, Self::from_cfg_map)
    }

    /// Loads the file named by [CONFIG_ENV], or the defaults if it isn't set
    pub fn from_env() -> crate::Result<Self> {
        match env::var_os(CONFIG_ENV) {
            Some(path) => Self::parse(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_cfg_map(cfg: &ConfigMap) -> crate::Result<Self> {
        let mut config = Self::default();

        if let Some(bridge) = cfg.get_map(Self::BRIDGE_KEY)? {
            config.adb = bridge.get_str("executable")?.map(PathBuf::from);
            config.serial = bridge.get_str("serial")?.map(String::from);
        }

        if let Some(inventory) = cfg.get_map(Self::INVENTORY_KEY)? {
            config.limit = match inventory.get_int("limit")? {
                Some(v) if v < 0 => return Err(inventory.invalid_key("limit", "positive int")),
                Some(v) => Some(v as usize),
                None => None,
            };
            config.pull_dir = inventory.get_str("pull-dir")?.map(PathBuf::from);
            config.extra_dangerous = inventory
                .get_str_list("extra-dangerous")?
                .unwrap_or_default()
                .into_iter()
                .map(String::from)
                .collect();
        }

        Ok(config)
    }

    pub fn dangerous_permissions(&self) -> DangerousPermissions {
        DangerousPermissions::default().with_extra(self.extra_dangerous.iter())
    }

    /// Session options carrying the configured limit, pull directory and
    /// extra dangerous permissions
    pub fn session_options(&self) -> SessionOptions {
        let mut opts =
            SessionOptions::new().dangerous_permissions(Arc::new(self.dangerous_permissions()));
        if let Some(limit) = self.limit {
            opts = opts.restriction(limit);
        }
        if let Some(dir) = &self.pull_dir {
            opts = opts.work_dir(dir);
        }
        opts
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::{tmp_dir, TmpDir};
    use rstest::*;

    #[rstest]
    fn test_config_map(tmp_dir: TmpDir) {
        let file = tmp_dir.create_file_name(
            "config.toml",
            br#"
base = 12

[foo]
bar = "baz"
list = ["a", "b"]
quux = { neato = true }
"#,
        );

        let f = |cfg: &ConfigMap| -> crate::Result<()> {
            assert_eq!(cfg.get_int("base")?, Some(12));
            let foo = cfg.get_map("foo")?.unwrap();
            assert_eq!(foo.get_str("bar")?, Some("baz"));
            assert_eq!(foo.get_str("ohno")?, None);
            assert_eq!(foo.get_str_list("list")?, Some(vec!["a", "b"]));
            assert!(foo.get_str_list("bar").is_err());
            assert!(foo.has("quux"));
            let quux = foo.get_map("quux")?.unwrap();
            assert!(quux.has("neato"));
            match quux.get_int("neato") {
                Err(crate::Error::InvalidConfig(_, msg)) => assert!(msg.contains("foo.quux.neato")),
                _ => panic!("expected InvalidConfig"),
            }
            Ok(())
        };

        parse_config(&file, f).unwrap();
    }

    #[rstest]
    fn test_inventory_config(tmp_dir: TmpDir) {
        let file = tmp_dir.create_file_name(
            "apkscope.toml",
            br#"
[bridge]
executable = "/opt/platform-tools/adb"
serial = "emulator-5554"

[inventory]
limit = 25
pull-dir = "/var/tmp/apkscope"
extra-dangerous = ["com.vendor.permission.X"]
"#,
        );

        let config = InventoryConfig::parse(&file).unwrap();
        assert_eq!(
            config,
            InventoryConfig {
                adb: Some(PathBuf::from("/opt/platform-tools/adb")),
                serial: Some("emulator-5554".into()),
                limit: Some(25),
                pull_dir: Some(PathBuf::from("/var/tmp/apkscope")),
                extra_dangerous: vec!["com.vendor.permission.X".into()],
            }
        );

        let reference = config.dangerous_permissions();
        assert!(reference.contains("com.vendor.permission.X"));
        assert!(reference.contains("android.permission.CAMERA"));
    }

    #[rstest]
    fn test_empty_config(tmp_dir: TmpDir) {
        let file = tmp_dir.create_file_name("empty.toml", b"");
        assert_eq!(InventoryConfig::parse(&file).unwrap(), InventoryConfig::default());
    }

    #[rstest]
    #[case("[inventory]\nlimit = -1\n")]
    #[case("[inventory]\nlimit = \"ten\"\n")]
    #[case("[inventory]\nextra-dangerous = \"android.permission.X\"\n")]
    #[case("bridge = 3\n")]
    #[case("[bridge\n")]
    fn test_invalid_config(tmp_dir: TmpDir, #[case] content: &str) {
        let file = tmp_dir.create_file_name("bad.toml", content.as_bytes());
        assert!(matches!(
            InventoryConfig::parse(&file),
            Err(crate::Error::InvalidConfig(_, _))
        ));
    }

    #[rstest]
    fn test_missing_file(tmp_dir: TmpDir) {
        assert!(matches!(
            InventoryConfig::parse(&tmp_dir.path().join("nope.toml")),
            Err(crate::Error::IncorrectPath(_))
        ));
    }
}
