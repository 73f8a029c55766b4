use std::fs;
use std::path::{Path, PathBuf};

use rstest::fixture;
use tempfile::TempDir;

pub struct TmpDir {
    inner: TempDir,
}

impl TmpDir {
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    pub fn create_file_name(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.inner.path().join(name);

        let parent = path.parent().unwrap();

        if !parent.exists() {
            fs::create_dir_all(parent).expect("failed to create directories for new file");
        }

        fs::write(&path, content).expect("failed to make temp file with content");
        path
    }
}

#[fixture]
pub fn tmp_dir() -> TmpDir {
    TmpDir {
        inner: tempfile::tempdir().expect("failed to create temp dir"),
    }
}
