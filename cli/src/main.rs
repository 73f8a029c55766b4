use std::borrow::Cow;
use std::path::PathBuf;

use anyhow::Context as AnyhowContext;
use clap::{Parser, Subcommand};
use flexi_logger::{FileSpec, LevelFilter, LogSpecification, Logger, LoggerHandle, WriteMode};

mod devices;
use devices::Devices;

mod inventory;
use inventory::Inventory;

mod network;
use network::{Address, Interfaces};

mod package;
use package::{Install, Uninstall};

mod permission;
use permission::{Grant, Revoke};

mod utils;
use utils::Target;

#[derive(Parser)]
#[command(name = "apkscope")]
#[command(version)]
struct Cli {
    /// `-e`, `--log-stderr`: Flag value, when enabled will cause logs to be output to `stderr`
    /// even if a log file is given
    #[arg(short = 'e', long, help = "Log to stderr instead of a file", action = clap::ArgAction::SetTrue, default_value_t = false)]
    log_stderr: bool,

    /// `-f`, `--log-file`: Path to desired log output file location. Logs go to `stderr` if this
    /// isn't set
    #[arg(short = 'f', long, help = "Send log output to the given file")]
    log_file: Option<PathBuf>,

    /// `-s`, `--log-spec`: Debug options for [flexi_logger](https://docs.rs/flexi_logger/latest/flexi_logger/struct.LogSpecification.html)
    #[arg(short = 's', long, help = "Log spec for flexi_logger")]
    log_spec: Option<String>,

    /// `-l`, `--log-level`: Set the desired log verbosity. Defaults to 0, all values are listed
    /// below:
    ///
    /// | Value | Log Level |
    /// | ----- | --------- |
    /// | **0** | **Warn** |
    /// | 1 | Info |
    /// | 2 | Debug |
    /// | 3 | Trace |
    #[arg(
        short = 'l',
        long,
        help = "Set the log level, 0 = warn, 1 = info, etc",
        long_help = None,
        default_value_t = 0
    )]
    log_level: u8,

    #[command(flatten)]
    target: Target,

    /// The command being called. See [Commands] for the implemented options
    #[command(subcommand)]
    command: Commands,
}

/// The currently implemented commands
#[derive(Subcommand)]
enum Commands {
    /// List the serials of the connected devices
    #[command()]
    Devices(Devices),

    /// Load every application on the device with its permissions and hashes
    /// and print the result as JSON
    ///
    /// Hashing is done on the device when it is new enough, older devices
    /// have every package pulled, so this can take a while.
    #[command()]
    Inventory(Inventory),

    /// Install a local APK
    #[command()]
    Install(Install),

    /// Uninstall a package
    #[command()]
    Uninstall(Uninstall),

    /// Grant a runtime permission to a package
    #[command()]
    Grant(Grant),

    /// Revoke a runtime permission from a package
    #[command()]
    Revoke(Revoke),

    /// List the device's network interfaces
    #[command()]
    Interfaces(Interfaces),

    /// Show the address of a network interface
    #[command()]
    Address(Address),
}

impl Cli {
    fn log_level(&self) -> Option<LevelFilter> {
        match self.log_level {
            0 => None,
            1 => Some(LevelFilter::Info),
            2 => Some(LevelFilter::Debug),
            _ => Some(LevelFilter::Trace),
        }
    }

    fn configure_loggers(&self) -> anyhow::Result<LoggerHandle> {
        let log_spec = match &self.log_spec {
            Some(s) => {
                LogSpecification::parse(s).with_context(|| format!("parsing log spec {}", s))?
            }
            None => match self.log_level() {
                Some(lvl) => LogSpecification::builder()
                    .module("apkscope", lvl)
                    .module("apkscope_cli", lvl)
                    .build(),
                None => LogSpecification::env_or_parse("warn")
                    .with_context(|| "getting log spec from env")?,
            },
        };

        let mut logger = Logger::with(log_spec);

        if !self.log_stderr {
            let path = self.log_file.as_ref().map(|v| {
                if v.is_absolute() {
                    Ok(Cow::Borrowed(v))
                } else {
                    std::env::current_dir().map(|cwd| Cow::Owned(cwd.join(v)))
                }
            });

            if let Some(p) = path {
                let p = p?;
                logger = logger
                    .log_to_file(
                        FileSpec::try_from(p.as_ref()).with_context(|| "creating filespec")?,
                    )
                    .append()
                    .write_mode(WriteMode::BufferAndFlush);
            }
        }

        logger.start().with_context(|| "starting logger")
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_handle = cli.configure_loggers()?;

    let target = &cli.target;
    let res = match &cli.command {
        Commands::Devices(c) => c.run(target),
        Commands::Inventory(c) => c.run(target),
        Commands::Install(c) => c.run(target),
        Commands::Uninstall(c) => c.run(target),
        Commands::Grant(c) => c.run(target),
        Commands::Revoke(c) => c.run(target),
        Commands::Interfaces(c) => c.run(target),
        Commands::Address(c) => c.run(target),
    };

    log_handle.flush();
    res
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;
    use rstest::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case(&["apkscope", "devices"])]
    #[case(&["apkscope", "-l", "2", "inventory", "--limit", "5", "--pretty"])]
    #[case(&["apkscope", "inventory", "--serial", "emulator-5554", "-o", "out.json"])]
    #[case(&["apkscope", "-c", "apkscope.toml", "uninstall", "com.example.app"])]
    #[case(&["apkscope", "grant", "com.example.app", "android.permission.CAMERA"])]
    #[case(&["apkscope", "address", "wlan0", "--ip", "ipv6"])]
    fn test_parse(#[case] argv: &[&str]) {
        assert!(Cli::try_parse_from(argv).is_ok());
    }

    #[rstest]
    #[case(&["apkscope"])]
    #[case(&["apkscope", "address", "wlan0", "--ip", "ipx"])]
    #[case(&["apkscope", "revoke", "com.example.app"])]
    fn test_parse_rejects(#[case] argv: &[&str]) {
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_log_level() {
        let cli = Cli::try_parse_from(["apkscope", "-l", "7", "devices"]).unwrap();
        assert_eq!(cli.log_level(), Some(LevelFilter::Trace));
        let cli = Cli::try_parse_from(["apkscope", "devices"]).unwrap();
        assert_eq!(cli.log_level(), None);
    }
}
