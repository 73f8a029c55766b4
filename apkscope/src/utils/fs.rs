use std::borrow::Cow;
use std::fs::{self, create_dir_all};
use std::io::{self, ErrorKind};
use std::path::Path;

pub fn ensure_dir_exists(p: &Path) -> io::Result<()> {
    if p.exists() {
        return Ok(());
    }

    create_dir_all(p)
}

/// Lossy string form of a path, for messages and rendered commands
pub fn path_must_str(path: &Path) -> Cow<'_, str> {
    path.to_string_lossy()
}

/// Reads the file into a string, a missing file is reported as an incorrect path
pub fn read_file(path: &Path) -> crate::Result<String> {
    match fs::read_to_string(path) {
        Ok(v) => Ok(v),
        Err(e) => match e.kind() {
            ErrorKind::NotFound => Err(crate::Error::IncorrectPath(path_must_str(path).into())),
            _ => Err(e.into()),
        },
    }
}

/// Removes the file if it exists
pub fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::{tmp_dir, TmpDir};
    use rstest::*;

    #[rstest]
    fn test_read_missing_file(tmp_dir: TmpDir) {
        let missing = tmp_dir.path().join("nope.toml");
        match read_file(&missing) {
            Err(crate::Error::IncorrectPath(p)) => assert!(p.ends_with("nope.toml")),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[rstest]
    fn test_remove_if_exists(tmp_dir: TmpDir) {
        let file = tmp_dir.create_file_name("temp.apk", b"data");
        remove_if_exists(&file).expect("removing existing file");
        assert!(!file.exists());
        remove_if_exists(&file).expect("removing missing file");
    }

    #[rstest]
    fn test_ensure_dir_exists(tmp_dir: TmpDir) {
        let dir = tmp_dir.path().join("a").join("b");
        ensure_dir_exists(&dir).expect("creating dirs");
        assert!(dir.is_dir());
        ensure_dir_exists(&dir).expect("dir already exists");
    }
}
