//! Directory snapshots.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Something that can list the entry names of the watched directory.
pub trait DirSource {
    fn snapshot(&mut self) -> io::Result<BTreeSet<String>>;
}

/// A real directory on disk.
#[derive(Debug, Clone)]
pub struct FsDir {
    path: PathBuf,
}

impl FsDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DirSource for FsDir {
    fn snapshot(&mut self) -> io::Result<BTreeSet<String>> {
        let mut names = BTreeSet::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            names.insert(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }
}

impl<S: DirSource + ?Sized> DirSource for &mut S {
    fn snapshot(&mut self) -> io::Result<BTreeSet<String>> {
        (**self).snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn lists_entry_names() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.wav"), b"x").unwrap();
        fs::write(dir.path().join("b.wav.part"), b"").unwrap();
        let names = FsDir::new(dir.path()).snapshot().unwrap();
        let names: Vec<_> = names.into_iter().collect();
        assert_eq!(names, vec!["a.wav".to_string(), "b.wav.part".to_string()]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let mut src = FsDir::new(dir.path().join("gone"));
        assert!(src.snapshot().is_err());
    }
}
