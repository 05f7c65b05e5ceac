//! Download synchronizer.
//!
//! The browser's download manager writes `<name>.part` while a transfer is in
//! flight and renames it when done. Completion is detected by diffing
//! snapshots of the download directory: a `.part` entry must appear (started)
//! and then every `.part` entry must be gone (completed). Checking only for the
//! final file would race against partially written data.

mod monitor;
mod source;

pub use monitor::{DownloadEvent, DownloadMonitor};
pub use source::{DirSource, FsDir};
