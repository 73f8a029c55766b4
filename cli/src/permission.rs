use clap::Args;

use crate::utils::Target;

#[derive(Args)]
pub struct PermissionArgs {
    /// Package name, such as com.example.app
    #[arg()]
    package: String,

    /// Permission name, such as android.permission.CAMERA
    #[arg()]
    permission: String,
}

#[derive(Args)]
pub struct Grant {
    #[command(flatten)]
    args: PermissionArgs,
}

impl Grant {
    pub fn run(&self, target: &Target) -> anyhow::Result<()> {
        let session = target.open_light_session()?;
        session.grant(&self.args.package, &self.args.permission)?;
        println!("granted {} to {}", self.args.permission, self.args.package);
        Ok(())
    }
}

#[derive(Args)]
pub struct Revoke {
    #[command(flatten)]
    args: PermissionArgs,
}

impl Revoke {
    pub fn run(&self, target: &Target) -> anyhow::Result<()> {
        let session = target.open_light_session()?;
        session.revoke(&self.args.package, &self.args.permission)?;
        println!("revoked {} from {}", self.args.permission, self.args.package);
        Ok(())
    }
}
