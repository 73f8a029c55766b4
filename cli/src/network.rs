use std::process::exit;

use clap::Args;

use apkscope::IpVersion;

use crate::utils::Target;

#[derive(Args)]
pub struct Interfaces {}

impl Interfaces {
    pub fn run(&self, target: &Target) -> anyhow::Result<()> {
        let session = target.open_light_session()?;
        for iface in session.network_interfaces()? {
            println!("{}", iface);
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct Address {
    /// Interface name, such as wlan0
    #[arg()]
    interface: String,

    /// Address family, ipv4 or ipv6
    #[arg(long, default_value = "ipv4")]
    ip: IpVersion,
}

impl Address {
    pub fn run(&self, target: &Target) -> anyhow::Result<()> {
        let session = target.open_light_session()?;
        match session.interface_address(&self.interface, self.ip)? {
            Some(addr) => {
                println!("{}", addr);
                Ok(())
            }
            None => {
                eprintln!("{} has no {} address", self.interface, self.ip);
                exit(1)
            }
        }
    }
}
