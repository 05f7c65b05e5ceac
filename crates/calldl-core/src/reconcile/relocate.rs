//! Moving finished downloads into the destination directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::CollisionPolicy;

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("no finished .{extension} download found in {}", .dir.display())]
    NoArtifact { dir: PathBuf, extension: String },
    #[error("destination already exists: {}", .0.display())]
    Collision(PathBuf),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Choose the destination path for `file_name` in `dir` under `policy`.
pub fn resolve_destination(
    dir: &Path,
    file_name: &str,
    policy: CollisionPolicy,
) -> Result<PathBuf, ReconcileError> {
    let path = dir.join(file_name);
    if !path.exists() {
        return Ok(path);
    }
    match policy {
        CollisionPolicy::Overwrite => {
            tracing::warn!("overwriting {}", path.display());
            Ok(path)
        }
        CollisionPolicy::Error => Err(ReconcileError::Collision(path)),
        CollisionPolicy::Suffix => {
            let (stem, ext) = match file_name.rsplit_once('.') {
                Some((stem, ext)) => (stem, format!(".{ext}")),
                None => (file_name, String::new()),
            };
            let mut n = 2u32;
            loop {
                let candidate = dir.join(format!("{stem} ({n}){ext}"));
                if !candidate.exists() {
                    tracing::info!(
                        "{} exists; filing as {}",
                        path.display(),
                        candidate.display()
                    );
                    return Ok(candidate);
                }
                n += 1;
            }
        }
    }
}

/// Move `from` to `to`. Falls back to copy + remove when the two paths are on
/// different filesystems.
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device(&e) => {
            tracing::debug!("rename across devices, copying {}", from.display());
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn is_cross_device(e: &io::Error) -> bool {
    e.raw_os_error() == Some(libc::EXDEV)
}

#[cfg(windows)]
fn is_cross_device(e: &io::Error) -> bool {
    // ERROR_NOT_SAME_DEVICE
    e.raw_os_error() == Some(17)
}

#[cfg(not(any(unix, windows)))]
fn is_cross_device(_e: &io::Error) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const NAME: &str = "[1432] Smith, John.wav";

    #[test]
    fn free_name_is_used_as_is() {
        let dir = tempdir().unwrap();
        let p = resolve_destination(dir.path(), NAME, CollisionPolicy::Error).unwrap();
        assert_eq!(p, dir.path().join(NAME));
    }

    #[test]
    fn suffix_policy_numbers_duplicates() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(NAME), b"1").unwrap();
        fs::write(dir.path().join("[1432] Smith, John (2).wav"), b"2").unwrap();
        let p = resolve_destination(dir.path(), NAME, CollisionPolicy::Suffix).unwrap();
        assert_eq!(p, dir.path().join("[1432] Smith, John (3).wav"));
    }

    #[test]
    fn error_policy_refuses_existing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(NAME), b"1").unwrap();
        assert!(matches!(
            resolve_destination(dir.path(), NAME, CollisionPolicy::Error),
            Err(ReconcileError::Collision(_))
        ));
    }

    #[test]
    fn overwrite_policy_replaces() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("dl.wav");
        fs::write(dir.path().join(NAME), b"old").unwrap();
        fs::write(&src, b"new").unwrap();
        let p = resolve_destination(dir.path(), NAME, CollisionPolicy::Overwrite).unwrap();
        move_file(&src, &p).unwrap();
        assert_eq!(fs::read(&p).unwrap(), b"new");
    }

    #[test]
    fn move_removes_source() {
        let a = tempdir().unwrap();
        let b = tempdir().unwrap();
        let src = a.path().join("x.wav");
        fs::write(&src, b"data").unwrap();
        let dst = b.path().join(NAME);
        move_file(&src, &dst).unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read(&dst).unwrap(), b"data");
    }
}
