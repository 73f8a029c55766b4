use crate::commands::CommandBuilder;
use crate::executor::CommandExecutor;
use crate::model::DeviceProperties;

pub const ANDROID_VERSION: &str = "ro.build.version.release";
pub const ANDROID_SDK_VERSION: &str = "ro.build.version.sdk";
pub const PRODUCT_BRAND: &str = "ro.product.brand";
pub const PRODUCT_MODEL: &str = "ro.product.model";

/// Reads `getprop` values off a device
pub struct PropertyReader<'a> {
    executor: &'a dyn CommandExecutor,
    commands: &'a CommandBuilder,
}

impl<'a> PropertyReader<'a> {
    pub fn new(executor: &'a dyn CommandExecutor, commands: &'a CommandBuilder) -> Self {
        Self { executor, commands }
    }

    /// Raw value of a single property, multi-line output is joined with `\n`
    /// and trimmed. An unset property is an empty string.
    pub fn raw_value(&self, prop: &str) -> crate::Result<String> {
        let cmd = self.commands.get_property(prop);
        let lines = self
            .executor
            .run(&cmd)
            .map_err(|e| crate::Error::execution(&format!("failed to get {}", prop), &e))?;
        Ok(lines.join("\n").trim().to_string())
    }

    /// Reads the identity properties. If any read fails all of them are
    /// reported as empty.
    pub fn read(&self) -> DeviceProperties {
        match self.try_read() {
            Ok(props) => props,
            Err(e) => {
                log::warn!(
                    "failed to read properties of {}: {}",
                    self.commands.serial(),
                    e
                );
                DeviceProperties::default()
            }
        }
    }

    fn try_read(&self) -> crate::Result<DeviceProperties> {
        Ok(DeviceProperties {
            android_version: self.raw_value(ANDROID_VERSION)?,
            sdk_version: self.raw_value(ANDROID_SDK_VERSION)?,
            brand: self.raw_value(PRODUCT_BRAND)?,
            model: self.raw_value(PRODUCT_MODEL)?,
        })
    }
}
