use std::fmt::{Display, Formatter};
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::commands::CommandBuilder;
use crate::executor::CommandExecutor;
use crate::Error;

lazy_static! {
    static ref IPV4_ADDR: Regex = Regex::new(r"inet\s(\d+\.\d+\.\d+\.\d+)/\d+").unwrap();
    static ref IPV6_ADDR: Regex = Regex::new(r"inet6\s([\da-fA-F:]+)/\d+").unwrap();
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IpVersion {
    #[default]
    V4,
    V6,
}

impl IpVersion {
    fn pattern(&self) -> &'static Regex {
        match self {
            Self::V4 => &IPV4_ADDR,
            Self::V6 => &IPV6_ADDR,
        }
    }
}

impl FromStr for IpVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ipv4" => Ok(Self::V4),
            "ipv6" => Ok(Self::V6),
            _ => Err(Error::UnsupportedIpVersion(s.into())),
        }
    }
}

impl Display for IpVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V4 => write!(f, "ipv4"),
            Self::V6 => write!(f, "ipv6"),
        }
    }
}

/// Interface and address queries
pub struct NetworkInspector<'a> {
    executor: &'a dyn CommandExecutor,
    commands: &'a CommandBuilder,
}

impl<'a> NetworkInspector<'a> {
    pub fn new(executor: &'a dyn CommandExecutor, commands: &'a CommandBuilder) -> Self {
        Self { executor, commands }
    }

    /// Names of the interfaces `ifconfig` reports
    pub fn interfaces(&self) -> crate::Result<Vec<String>> {
        let cmd = self.commands.network_interfaces();
        log::info!("collecting network interfaces");
        let lines = self
            .executor
            .run(&cmd)
            .map_err(|e| Error::execution("failed to list network interfaces", &e))?;
        Ok(parse_interfaces(&lines))
    }

    /// First address of the given version on `name`, if it has one
    pub fn address(&self, name: &str, version: IpVersion) -> crate::Result<Option<String>> {
        if !self.interfaces()?.iter().any(|it| it == name) {
            return Err(Error::NetworkInterfaceNotFound(name.into()));
        }
        let cmd = self.commands.interface_address(name);
        log::info!("getting {} address of {} with {}", version, name, cmd);
        let lines = self
            .executor
            .run(&cmd)
            .map_err(|e| Error::execution(&format!("failed to get the address of {}", name), &e))?;
        Ok(find_address(&lines, version))
    }
}

/// Interface lines of `ifconfig` carry `Link encap:` and start with the name
pub fn parse_interfaces<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .map(|it| it.as_ref())
        .filter(|it| it.contains("encap"))
        .filter_map(|it| it.split(' ').next())
        .filter(|it| !it.is_empty())
        .map(String::from)
        .collect()
}

pub fn find_address<S: AsRef<str>>(lines: &[S], version: IpVersion) -> Option<String> {
    let pattern = version.pattern();
    lines
        .iter()
        .find_map(|it| pattern.captures(it.as_ref()))
        .and_then(|caps| caps.get(1))
        .map(|it| String::from(it.as_str()))
}
