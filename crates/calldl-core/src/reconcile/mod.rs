//! File reconciler: name a finished download after its call and file it.

mod naming;
mod relocate;

pub use naming::{destination_name, split_name, time_tag, title_case, InmateName, NamingError};
pub use relocate::{move_file, resolve_destination, ReconcileError};

use std::fs;
use std::path::PathBuf;

use crate::config::{CallDlConfig, CollisionPolicy, NamePolicy};

/// Destination file name worked out for a row before its download starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedName {
    pub file_name: String,
}

/// Moves completed downloads from the download directory to the destination
/// directory under `"[HHMM] Last, First.<ext>"`.
#[derive(Debug, Clone)]
pub struct Reconciler {
    download_dir: PathBuf,
    dest_dir: PathBuf,
    extension: String,
    collision: CollisionPolicy,
    names: NamePolicy,
}

impl Reconciler {
    pub fn new(
        download_dir: impl Into<PathBuf>,
        dest_dir: impl Into<PathBuf>,
        extension: &str,
        collision: CollisionPolicy,
        names: NamePolicy,
    ) -> Self {
        Self {
            download_dir: download_dir.into(),
            dest_dir: dest_dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
            collision,
            names,
        }
    }

    pub fn from_config(cfg: &CallDlConfig) -> Self {
        Self::new(
            &cfg.download_dir,
            &cfg.dest_dir,
            &cfg.final_extension,
            cfg.collision_policy(),
            cfg.name_policy(),
        )
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Derive the destination name from the row's inmate name and call time.
    pub fn plan(&self, inmate_name: &str, call_time: &str) -> Result<PlannedName, NamingError> {
        let tag = time_tag(call_time)?;
        let name = split_name(inmate_name, self.names)?;
        Ok(PlannedName {
            file_name: destination_name(&tag, &name, &self.extension),
        })
    }

    /// Pick the finished download. Prefers files the download monitor saw
    /// appear; falls back to the first matching file in the download directory.
    pub fn locate_artifact(&self, new_files: &[String]) -> Result<PathBuf, ReconcileError> {
        let mut candidates: Vec<String> = new_files.to_vec();
        if candidates.is_empty() {
            let suffix = format!(".{}", self.extension);
            for entry in fs::read_dir(&self.download_dir)? {
                let entry = entry?;
                let name = entry.file_name().to_string_lossy().into_owned();
                if name.ends_with(&suffix) && entry.file_type()?.is_file() {
                    candidates.push(name);
                }
            }
        }
        candidates.sort();
        if candidates.len() > 1 {
            tracing::warn!(
                ?candidates,
                "more than one finished download in {}; taking the first",
                self.download_dir.display()
            );
        }
        candidates
            .into_iter()
            .next()
            .map(|name| self.download_dir.join(name))
            .ok_or_else(|| ReconcileError::NoArtifact {
                dir: self.download_dir.clone(),
                extension: self.extension.clone(),
            })
    }

    /// Move the finished download to its planned destination.
    pub fn reconcile(&self, new_files: &[String], plan: &PlannedName) -> Result<PathBuf, ReconcileError> {
        let source = self.locate_artifact(new_files)?;
        let dest = resolve_destination(&self.dest_dir, &plan.file_name, self.collision)?;
        move_file(&source, &dest)?;
        tracing::info!(from = %source.display(), to = %dest.display(), "filed recording");
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    fn reconciler(dl: &Path, dest: &Path) -> Reconciler {
        Reconciler::new(dl, dest, "wav", CollisionPolicy::Suffix, NamePolicy::Strict)
    }

    #[test]
    fn plan_builds_bracketed_name() {
        let r = reconciler(Path::new("/dl"), Path::new("/dest"));
        let plan = r.plan("John Smith", "14:32:07").unwrap();
        assert_eq!(plan.file_name, "[1432] Smith, John.wav");
    }

    #[test]
    fn plan_rejects_three_token_name_when_strict() {
        let r = reconciler(Path::new("/dl"), Path::new("/dest"));
        assert!(matches!(
            r.plan("John Paul Smith", "14:32"),
            Err(NamingError::NameTokens { .. })
        ));
    }

    #[test]
    fn reconcile_moves_monitor_artifact() {
        let dl = tempdir().unwrap();
        let dest = tempdir().unwrap();
        std::fs::write(dl.path().join("older.wav"), b"old").unwrap();
        std::fs::write(dl.path().join("rec_0001.wav"), b"RIFF").unwrap();
        let r = reconciler(dl.path(), dest.path());
        let plan = r.plan("John Smith", "09:05").unwrap();

        let out = r.reconcile(&["rec_0001.wav".to_string()], &plan).unwrap();

        assert_eq!(out, dest.path().join("[0905] Smith, John.wav"));
        assert_eq!(std::fs::read(&out).unwrap(), b"RIFF");
        assert!(!dl.path().join("rec_0001.wav").exists());
        assert!(dl.path().join("older.wav").exists());
    }

    #[test]
    fn locate_falls_back_to_directory_scan() {
        let dl = tempdir().unwrap();
        let dest = tempdir().unwrap();
        std::fs::write(dl.path().join("notes.txt"), b"").unwrap();
        std::fs::write(dl.path().join("b.wav"), b"").unwrap();
        std::fs::write(dl.path().join("a.wav"), b"").unwrap();
        let r = reconciler(dl.path(), dest.path());
        assert_eq!(r.locate_artifact(&[]).unwrap(), dl.path().join("a.wav"));
    }

    #[test]
    fn locate_without_candidates_errors() {
        let dl = tempdir().unwrap();
        let dest = tempdir().unwrap();
        let r = reconciler(dl.path(), dest.path());
        assert!(matches!(
            r.locate_artifact(&[]),
            Err(ReconcileError::NoArtifact { .. })
        ));
    }
}
