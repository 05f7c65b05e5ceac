//! Enumerate stage: walk the result rows and download what is new.

use std::io::Write;
use std::path::PathBuf;

use super::{SessionDriver, Stage};
use crate::error::SessionError;
use crate::locator::Field;
use crate::page::{Element, Page};
use crate::reconcile::title_case;
use crate::row::{decode_listened, parse_call_count, split_date_time, CallRow, ListenedState};
use crate::watch::{DirSource, DownloadMonitor};

/// What happened to one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    AlreadyListened,
    NotAvailable,
    /// The inmate name or call time could not be turned into a file name.
    Unnamed(String),
    Downloaded(PathBuf),
}

/// Totals for a finished enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub listened: usize,
    pub unavailable: usize,
    pub unnamed: usize,
    pub downloaded: Vec<PathBuf>,
}

impl RunSummary {
    fn record(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::AlreadyListened => self.listened += 1,
            RowOutcome::NotAvailable => self.unavailable += 1,
            RowOutcome::Unnamed(_) => self.unnamed += 1,
            RowOutcome::Downloaded(path) => self.downloaded.push(path),
        }
    }
}

impl<P: Page, D: DirSource> SessionDriver<P, D> {
    /// Read the result count, then handle every row once, in order. Progress
    /// lines for the operator go to `out`.
    pub async fn enumerate<W: Write>(&mut self, out: &mut W) -> Result<RunSummary, SessionError> {
        self.enter(Stage::Enumerate)?;
        let count_text = self.waiter.wait_for(&self.page, Field::CallCount).await?.text().await?;
        let count = parse_call_count(&count_text)?;
        tracing::info!(count, "search results");

        let mut summary = RunSummary {
            total: count,
            ..RunSummary::default()
        };
        for index in 0..count {
            let row = self.read_row(index).await?;
            say(
                out,
                format_args!(
                    "Working on call {} of {} by {} on {} at {}",
                    row.position(),
                    count,
                    row.inmate_name,
                    row.call_date,
                    row.call_time
                ),
            );
            let outcome = self.handle_row(&row, out).await?;
            tracing::info!(position = row.position(), ?outcome, "row done");
            summary.record(outcome);
        }
        Ok(summary)
    }

    async fn read_row(&self, index: usize) -> Result<CallRow, SessionError> {
        let name = self
            .waiter
            .wait_for(&self.page, Field::RowInmateName(index))
            .await?
            .text()
            .await?;
        let when = self
            .waiter
            .wait_for(&self.page, Field::RowCallDateTime(index))
            .await?
            .text()
            .await?;
        let (call_date, call_time) = split_date_time(index + 1, &when)?;
        Ok(CallRow {
            index,
            inmate_name: title_case(name.trim()),
            call_date,
            call_time,
        })
    }

    async fn listened_state(&self, row: &CallRow) -> Result<ListenedState, SessionError> {
        let icon = self
            .waiter
            .wait_for(&self.page, Field::RowListenedIcon(row.index))
            .await?;
        let style = icon.attr("style").await?;
        decode_listened(row.position(), style.as_deref())
    }

    async fn handle_row<W: Write>(&mut self, row: &CallRow, out: &mut W) -> Result<RowOutcome, SessionError> {
        let n = row.position();

        if self.listened_state(row).await? == ListenedState::Listened {
            say(out, format_args!("Call #{} has already been listened to.\n", n));
            return Ok(RowOutcome::AlreadyListened);
        }

        let link = match self
            .waiter
            .find_optional(&self.page, Field::RowDownloadLink(row.index))
            .await?
        {
            Some(link) => link,
            None => {
                say(out, format_args!("Call #{} is not available for download.\n", n));
                return Ok(RowOutcome::NotAvailable);
            }
        };

        // Name first, so a rejected row never leaves a download behind.
        let plan = match self.reconciler.plan(&row.inmate_name, &row.call_time) {
            Ok(plan) => plan,
            Err(e) => {
                say(out, format_args!("Call #{} skipped: {}\n", n, e));
                tracing::warn!(position = n, error = %e, "cannot name recording");
                return Ok(RowOutcome::Unnamed(e.to_string()));
            }
        };

        say(out, format_args!("Downloading #{}\n", n));
        let monitor = DownloadMonitor::arm(
            &mut self.downloads,
            &self.settings.partial_suffix,
            self.reconciler.extension(),
            self.settings.download_poll,
        )
        .map_err(SessionError::Watch)?;
        link.click().await?;
        let artifacts = monitor.wait_for_completion().await.map_err(SessionError::Watch)?;

        let dest = self.reconciler.reconcile(&artifacts, &plan)?;
        Ok(RowOutcome::Downloaded(dest))
    }
}

/// One operator-facing line. A closed stdout must not abort the run.
fn say<W: Write>(out: &mut W, line: std::fmt::Arguments<'_>) {
    if writeln!(out, "{}", line).and_then(|_| out.flush()).is_err() {
        tracing::debug!("progress output unavailable");
    }
}
