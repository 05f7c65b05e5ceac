//! Two-phase download detection over directory snapshots.

use std::collections::BTreeSet;
use std::io;
use std::time::Duration;

use super::source::DirSource;

/// What the monitor saw happen in the download directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadEvent {
    /// In-progress entries appeared.
    Started { partial: Vec<String> },
    /// No in-progress entries remain. `artifacts` are finished files that were
    /// not in the directory when the monitor was armed.
    Completed { artifacts: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Armed,
    InFlight,
    Done,
}

/// Watches one download from trigger to completion.
///
/// Arm it before clicking the download link so the baseline predates the
/// transfer. Only one download may be in flight per directory; the monitor
/// cannot tell concurrent transfers apart.
pub struct DownloadMonitor<S> {
    source: S,
    partial_suffix: String,
    final_suffix: String,
    interval: Duration,
    baseline: BTreeSet<String>,
    phase: Phase,
}

impl<S: DirSource> DownloadMonitor<S> {
    /// Take the baseline snapshot.
    pub fn arm(
        mut source: S,
        partial_suffix: &str,
        final_extension: &str,
        interval: Duration,
    ) -> io::Result<Self> {
        let baseline = source.snapshot()?;
        Ok(Self {
            source,
            partial_suffix: partial_suffix.to_string(),
            final_suffix: format!(".{}", final_extension.trim_start_matches('.')),
            interval,
            baseline,
            phase: Phase::Armed,
        })
    }

    /// Feed one snapshot through the state machine.
    pub fn observe(&mut self, names: &BTreeSet<String>) -> Option<DownloadEvent> {
        let partial: Vec<String> = names
            .iter()
            .filter(|n| n.ends_with(&self.partial_suffix))
            .cloned()
            .collect();

        match self.phase {
            Phase::Armed if !partial.is_empty() => {
                self.phase = Phase::InFlight;
                Some(DownloadEvent::Started { partial })
            }
            Phase::InFlight if partial.is_empty() => {
                self.phase = Phase::Done;
                let artifacts = names
                    .iter()
                    .filter(|n| n.ends_with(&self.final_suffix) && !self.baseline.contains(*n))
                    .cloned()
                    .collect();
                Some(DownloadEvent::Completed { artifacts })
            }
            Phase::Armed | Phase::InFlight | Phase::Done => None,
        }
    }

    /// Poll until the next event. Waits without bound; a stalled browser
    /// download blocks here.
    pub async fn next_event(&mut self) -> io::Result<DownloadEvent> {
        if self.phase == Phase::Done {
            return Err(io::Error::other("download already completed"));
        }
        loop {
            let names = self.source.snapshot()?;
            if let Some(event) = self.observe(&names) {
                return Ok(event);
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Block through both phases and return the new finished files.
    pub async fn wait_for_completion(mut self) -> io::Result<Vec<String>> {
        loop {
            match self.next_event().await? {
                DownloadEvent::Started { partial } => {
                    tracing::debug!(?partial, "download started");
                }
                DownloadEvent::Completed { artifacts } => {
                    tracing::debug!(?artifacts, "download completed");
                    return Ok(artifacts);
                }
            }
        }
    }
}
