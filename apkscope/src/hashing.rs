use std::fs;
use std::path::{Path, PathBuf};

use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

use crate::commands::CommandBuilder;
use crate::executor::CommandExecutor;
use crate::model::Hashes;
use crate::utils::{bytes_to_hex, is_hex_digest, path_must_str, remove_if_exists};

/// Name of the local copy of a pulled package inside the work dir
pub const PULLED_APK_NAME: &str = "temp.apk";

const SHA1_SUM: &str = "sha1sum";
const SHA256_SUM: &str = "sha256sum";
const SHA512_SUM: &str = "sha512sum";

/// Lowest version with working `sha256sum` and `sha512sum`
const FULL_ON_DEVICE_VERSION: f32 = 8.0;
/// Lowest version with a working `sha1sum`
const SHA1_ON_DEVICE_VERSION: f32 = 6.0;

/// Picks between on-device and local hashing based on the device version
pub struct HashEngine<'a> {
    executor: &'a dyn CommandExecutor,
    commands: &'a CommandBuilder,
    work_dir: &'a Path,
}

#[derive(Default)]
struct Partial {
    sha1: String,
    sha256: String,
    sha512: String,
}

impl Partial {
    fn is_complete(&self) -> bool {
        !(self.sha1.is_empty() || self.sha256.is_empty() || self.sha512.is_empty())
    }
}

impl<'a> HashEngine<'a> {
    pub fn new(
        executor: &'a dyn CommandExecutor,
        commands: &'a CommandBuilder,
        work_dir: &'a Path,
    ) -> Self {
        Self {
            executor,
            commands,
            work_dir,
        }
    }

    /// Where pulled packages land
    pub fn pulled_apk(&self) -> PathBuf {
        self.work_dir.join(PULLED_APK_NAME)
    }

    /// Computes all three digests of the package at `path`
    pub fn compute(&self, path: &str, version: f32) -> crate::Result<Hashes> {
        let mut partial = Partial::default();

        if version >= FULL_ON_DEVICE_VERSION {
            partial.sha1 = self.on_device(SHA1_SUM, path)?;
            partial.sha256 = self.on_device(SHA256_SUM, path)?;
            partial.sha512 = self.on_device(SHA512_SUM, path)?;
        }

        if version >= SHA1_ON_DEVICE_VERSION {
            partial.sha1 = self.on_device(SHA1_SUM, path)?;
        }

        if version < SHA1_ON_DEVICE_VERSION || !partial.is_complete() {
            self.hash_locally(path, &mut partial)?;
        }

        Ok(Hashes {
            sha1: partial.sha1,
            sha256: partial.sha256,
            sha512: partial.sha512,
        })
    }

    fn on_device(&self, hash_fn: &str, path: &str) -> crate::Result<String> {
        let cmd = self.commands.hash(hash_fn, path);
        let lines = self
            .executor
            .run(&cmd)
            .map_err(|e| crate::Error::execution(&format!("failed to run {}", hash_fn), &e))?;

        let digest = lines
            .first()
            .and_then(|it| it.split_whitespace().next())
            .unwrap_or("");

        if is_hex_digest(digest) {
            Ok(digest.to_ascii_lowercase())
        } else {
            log::warn!(
                "unusable {} output for {}: {:?}",
                hash_fn,
                path,
                lines.first()
            );
            Ok(String::new())
        }
    }

    fn hash_locally(&self, path: &str, partial: &mut Partial) -> crate::Result<()> {
        let local = self.pulled_apk();
        remove_if_exists(&local)?;

        let cmd = self.commands.pull(path, &path_must_str(&local));
        log::debug!("pulling {} to {}", path, local.display());
        self.executor
            .run(&cmd)
            .map_err(|e| crate::Error::execution(&format!("failed to pull {}", path), &e))?;

        let data = fs::read(&local).map_err(|e| {
            crate::Error::execution(&format!("failed to read the pulled copy of {}", path), &e)
        })?;

        if partial.sha1.is_empty() {
            partial.sha1 = bytes_to_hex(&Sha1::digest(&data));
        }
        partial.sha256 = bytes_to_hex(&Sha256::digest(&data));
        partial.sha512 = bytes_to_hex(&Sha512::digest(&data));
        Ok(())
    }
}
