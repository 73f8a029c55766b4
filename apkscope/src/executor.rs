use std::borrow::Cow;
use std::ffi::OsStr;
use std::io;
use std::process::{Command, ExitStatus, Output, Stdio};

use log::Level::Debug;
use log::{debug, log_enabled};

/// Runs a rendered command line and hands back its stdout, one entry per
/// line. Nothing above this trait spawns processes.
///
/// Implementations block until the child exits; there is no timeout, so a
/// hung `adb` hangs the caller.
pub trait CommandExecutor: Send + Sync {
    fn run(&self, command_line: &str) -> io::Result<Vec<String>>;
}

/// A `CommandExecutor` that actually spawns the process
#[derive(Clone, Copy, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for ProcessExecutor {
    fn run(&self, command_line: &str) -> io::Result<Vec<String>> {
        let argv = tokenize(command_line);
        let (cmd, args) = argv.split_first().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "empty command line")
        })?;
        let output = run_cmd(cmd, args)?;
        if !output.ok() {
            debug!(
                "`{}` exited with {}: {}",
                command_line,
                output.status,
                output.stderr_utf8_lossy().trim()
            );
        }
        Ok(output.stdout_lines())
    }
}

pub struct CmdOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl From<Output> for CmdOutput {
    fn from(output: Output) -> Self {
        Self {
            status: output.status,
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }
}

impl CmdOutput {
    #[inline]
    pub fn ok(&self) -> bool {
        self.status.success()
    }

    #[inline]
    pub fn stdout_utf8_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    #[inline]
    pub fn stderr_utf8_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }

    /// Stdout split into lines with any trailing `\r` removed
    pub fn stdout_lines(&self) -> Vec<String> {
        self.stdout_utf8_lossy().lines().map(String::from).collect()
    }
}

/// Splits a rendered command line into argv on whitespace.
///
/// Quotes and backslashes are ordinary characters, so Windows paths and
/// file names with apostrophes reach the process untouched.
pub fn tokenize(command_line: &str) -> Vec<&str> {
    command_line.split_whitespace().collect()
}

pub fn run_cmd<C, S>(cmd: C, args: &[S]) -> io::Result<CmdOutput>
where
    C: AsRef<OsStr>,
    S: AsRef<OsStr>,
{
    if log_enabled!(Debug) {
        log_cmd(&cmd, args);
    }
    Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map(|output| output.into())
}

pub fn log_cmd<C, S>(cmd: &C, args: &[S])
where
    C: AsRef<OsStr>,
    S: AsRef<OsStr>,
{
    let mut line = cmd.as_ref().to_string_lossy().into_owned();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.as_ref().to_string_lossy());
    }
    debug!("running `{}`", line);
}
