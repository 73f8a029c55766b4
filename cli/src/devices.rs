use clap::Args;

use crate::utils::Target;

#[derive(Args)]
pub struct Devices {}

impl Devices {
    pub fn run(&self, target: &Target) -> anyhow::Result<()> {
        let config = target.load_config()?;
        let bridge = target.get_bridge(&config)?;
        for serial in bridge.available_devices() {
            println!("{}", serial);
        }
        Ok(())
    }
}
