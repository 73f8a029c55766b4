use std::fs::File;
use std::io::{stdout, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{self, Args};

use apkscope::DeviceSnapshot;

use crate::utils::Target;

#[derive(Args)]
pub struct Inventory {
    /// Only load the first N applications, 0 loads everything
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Pretty print the JSON
    #[arg(short, long, action = clap::ArgAction::SetTrue, default_value_t = false)]
    pretty: bool,

    /// Only include applications holding a dangerous permission
    #[arg(long, action = clap::ArgAction::SetTrue, default_value_t = false)]
    dangerous_only: bool,

    /// Write the snapshot here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Inventory {
    pub fn run(&self, target: &Target) -> anyhow::Result<()> {
        let session = target.open_session(self.limit)?;
        let mut snapshot = session.snapshot();
        if self.dangerous_only {
            snapshot
                .applications
                .retain(|it| it.has_dangerous_permissions());
        }
        log::info!(
            "writing {} applications of {}",
            snapshot.applications.len(),
            snapshot.identity.serial
        );

        match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("creating {}", path.display()))?;
                self.write(file, &snapshot)
            }
            None => self.write(stdout().lock(), &snapshot),
        }
    }

    fn write<W: Write>(&self, mut out: W, snapshot: &DeviceSnapshot) -> anyhow::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut out, snapshot)?;
        } else {
            serde_json::to_writer(&mut out, snapshot)?;
        }
        writeln!(out)?;
        Ok(())
    }
}
