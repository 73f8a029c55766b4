use std::path::PathBuf;
use std::process::exit;

use clap::Args;

use crate::utils::Target;

#[derive(Args)]
pub struct Install {
    /// Local APK to install
    #[arg()]
    apk: PathBuf,
}

impl Install {
    pub fn run(&self, target: &Target) -> anyhow::Result<()> {
        let session = target.open_light_session()?;
        report(session.install(&self.apk)?)
    }
}

#[derive(Args)]
pub struct Uninstall {
    /// Package name, such as com.example.app
    #[arg()]
    package: String,
}

impl Uninstall {
    pub fn run(&self, target: &Target) -> anyhow::Result<()> {
        let mut session = target.open_light_session()?;
        report(session.uninstall(&self.package)?)
    }
}

fn report(success: bool) -> anyhow::Result<()> {
    if success {
        println!("Success");
        Ok(())
    } else {
        eprintln!("Failure");
        exit(1)
    }
}
