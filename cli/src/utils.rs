use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Args;

use apkscope::{Bridge, DeviceSession, InventoryConfig, ProcessExecutor, SessionOptions};

/// Env var naming the default device, shared with `adb` itself
pub const SERIAL_ENV: &str = "ANDROID_SERIAL";

/// Options every subcommand understands
#[derive(Args, Clone, Default)]
pub struct Target {
    /// Configuration file, overrides `$APKSCOPE_CONFIG`
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Serial of the device to use
    ///
    /// If this isn't set `$ANDROID_SERIAL` is used, then `bridge.serial` from
    /// the configuration, then the only ready device if there is exactly
    /// one.
    #[arg(short = 'd', long, global = true)]
    serial: Option<String>,
}

impl Target {
    pub fn load_config(&self) -> anyhow::Result<InventoryConfig> {
        let config = match &self.config {
            Some(path) => InventoryConfig::parse(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => InventoryConfig::from_env().with_context(|| "loading config from env")?,
        };
        Ok(config)
    }

    pub fn get_bridge(&self, config: &InventoryConfig) -> anyhow::Result<Bridge> {
        let bridge = match &config.adb {
            Some(path) => Bridge::with_path(
                &path.to_string_lossy(),
                Arc::new(ProcessExecutor::new()),
            )?,
            None => Bridge::locate()?,
        };
        Ok(bridge)
    }

    pub fn get_serial(&self, config: &InventoryConfig, bridge: &Bridge) -> anyhow::Result<String> {
        let from_env = env::var(SERIAL_ENV).ok();
        let explicit = pick_serial(
            self.serial.as_deref(),
            from_env.as_deref(),
            config.serial.as_deref(),
        );
        if let Some(serial) = explicit {
            return Ok(serial.into());
        }

        let mut devices = bridge.ready_devices();
        match devices.len() {
            0 => bail!("no authorized android devices are available"),
            1 => Ok(devices.remove(0)),
            n => bail!(
                "{} devices are available, pick one with --serial or ${}",
                n,
                SERIAL_ENV
            ),
        }
    }

    /// Bootstraps a session, `restriction` replaces the configured limit
    pub fn open_session(&self, restriction: Option<usize>) -> anyhow::Result<DeviceSession> {
        let config = self.load_config()?;
        let bridge = self.get_bridge(&config)?;
        let serial = self.get_serial(&config, &bridge)?;

        let mut opts: SessionOptions = config.session_options();
        if let Some(count) = restriction {
            opts = opts.restriction(count);
        }

        let session = DeviceSession::connect(bridge, &serial, opts)
            .with_context(|| format!("loading device {}", serial))?;
        Ok(session)
    }

    /// Session for commands that act on a single package and don't need
    /// the full inventory
    pub fn open_light_session(&self) -> anyhow::Result<DeviceSession> {
        self.open_session(Some(1))
    }
}

/// First serial given, in priority order
pub fn pick_serial<'a>(
    arg: Option<&'a str>,
    env: Option<&'a str>,
    config: Option<&'a str>,
) -> Option<&'a str> {
    [arg, env, config]
        .into_iter()
        .flatten()
        .find(|it| !it.trim().is_empty())
}
