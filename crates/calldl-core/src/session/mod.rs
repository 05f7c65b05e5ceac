//! Session driver: one linear pass over the portal.
//!
//! Stages run strictly in order (start, navigate, authenticate, search,
//! enumerate, shutdown) and never go back. Every element is located through
//! the [`ElementWaiter`]; every download goes through the
//! [`DownloadMonitor`](crate::watch::DownloadMonitor) and the [`Reconciler`].

mod enumerate;

pub use enumerate::{RowOutcome, RunSummary};

use std::fmt;
use std::time::Duration;

use chrono::NaiveDateTime;

use crate::config::CallDlConfig;
use crate::error::SessionError;
use crate::locator::Field;
use crate::page::{BrowserOptions, Element, Page, WebDriverPage};
use crate::poll::PollPolicy;
use crate::reconcile::Reconciler;
use crate::search::overnight_start_date;
use crate::waiter::ElementWaiter;
use crate::watch::{DirSource, FsDir};

/// Where a session is. Ordered; the driver only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Start,
    Navigate,
    Authenticate,
    Search,
    Enumerate,
    Shutdown,
}

/// Portal login. The password is never printed.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Per-session settings taken from [`CallDlConfig`].
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub portal_url: String,
    pub overnight_cutoff_hour: u32,
    pub partial_suffix: String,
    /// Cadence for watching the download directory.
    pub download_poll: Duration,
}

impl From<&CallDlConfig> for SessionSettings {
    fn from(cfg: &CallDlConfig) -> Self {
        Self {
            portal_url: cfg.portal_url.clone(),
            overnight_cutoff_hour: cfg.overnight_cutoff_hour,
            partial_suffix: cfg.partial_suffix.clone(),
            download_poll: Duration::from_millis(cfg.poll().interval_ms.max(1)),
        }
    }
}

/// A live session against the portal.
pub struct SessionDriver<P, D> {
    page: P,
    downloads: D,
    waiter: ElementWaiter,
    reconciler: Reconciler,
    settings: SessionSettings,
    stage: Stage,
}

/// Start stage: launch a browser that saves recordings into `download_dir`.
pub async fn launch(cfg: &CallDlConfig) -> Result<SessionDriver<WebDriverPage, FsDir>, SessionError> {
    let page = WebDriverPage::launch(&BrowserOptions::from(cfg)).await?;
    Ok(SessionDriver::from_config(page, FsDir::new(&cfg.download_dir), cfg))
}

impl<P: Page, D: DirSource> SessionDriver<P, D> {
    pub fn new(
        page: P,
        downloads: D,
        waiter: ElementWaiter,
        reconciler: Reconciler,
        settings: SessionSettings,
    ) -> Self {
        Self {
            page,
            downloads,
            waiter,
            reconciler,
            settings,
            stage: Stage::Start,
        }
    }

    pub fn from_config(page: P, downloads: D, cfg: &CallDlConfig) -> Self {
        let waiter = ElementWaiter::new(cfg.locators(), PollPolicy::from(&cfg.poll()));
        Self::new(
            page,
            downloads,
            waiter,
            Reconciler::from_config(cfg),
            SessionSettings::from(cfg),
        )
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn enter(&mut self, next: Stage) -> Result<(), SessionError> {
        if next <= self.stage {
            return Err(SessionError::StageOrder {
                from: self.stage,
                to: next,
            });
        }
        tracing::debug!(from = ?self.stage, to = ?next, "session stage");
        self.stage = next;
        Ok(())
    }

    /// Load the portal entry page.
    pub async fn navigate(&mut self) -> Result<(), SessionError> {
        self.enter(Stage::Navigate)?;
        tracing::info!(url = %self.settings.portal_url, "opening portal");
        self.page.goto(&self.settings.portal_url).await?;
        Ok(())
    }

    /// Fill and submit the login form. Whether the login worked is not
    /// checked; a failed login shows up later as elements that never render.
    pub async fn authenticate(&mut self, creds: &Credentials) -> Result<(), SessionError> {
        self.enter(Stage::Authenticate)?;
        self.fill(Field::UsernameField, &creds.username).await?;
        self.fill(Field::PasswordField, &creds.password).await?;
        self.click(Field::LoginSubmit).await?;
        tracing::info!(username = %creds.username, "login submitted");
        Ok(())
    }

    /// Run the saved search. Before the overnight cutoff the start date is
    /// moved back to midnight of the previous day.
    pub async fn search(&mut self, now: NaiveDateTime) -> Result<(), SessionError> {
        self.enter(Stage::Search)?;
        self.click(Field::SavedSearchesMenu).await?;
        self.click(Field::SavedQuery).await?;

        if let Some(start) = overnight_start_date(now, self.settings.overnight_cutoff_hour) {
            tracing::info!(%start, "overnight run, widening search start date");
            self.fill(Field::SearchStartDate, &start).await?;
        }

        self.click(Field::ExecuteSearch).await?;
        Ok(())
    }

    /// Quit the browser.
    pub async fn shutdown(mut self) -> Result<(), SessionError> {
        self.enter(Stage::Shutdown)?;
        self.page.close().await?;
        tracing::info!("browser session closed");
        Ok(())
    }

    /// Navigate, log in, search, enumerate and shut down.
    ///
    /// `credentials` is called once the portal page is loaded, right before
    /// the login form is filled. If any stage fails the browser is still
    /// closed and the stage's error is returned.
    pub async fn run<W, C>(
        mut self,
        credentials: C,
        now: NaiveDateTime,
        out: &mut W,
    ) -> Result<RunSummary, SessionError>
    where
        W: std::io::Write,
        C: FnOnce() -> std::io::Result<Credentials>,
    {
        match self.drive(credentials, now, out).await {
            Ok(summary) => {
                self.shutdown().await?;
                Ok(summary)
            }
            Err(e) => {
                tracing::error!(stage = ?self.stage, "session failed: {}", e);
                if let Err(close_err) = self.page.close().await {
                    tracing::warn!("closing browser after failure: {}", close_err);
                }
                Err(e)
            }
        }
    }

    async fn drive<W, C>(
        &mut self,
        credentials: C,
        now: NaiveDateTime,
        out: &mut W,
    ) -> Result<RunSummary, SessionError>
    where
        W: std::io::Write,
        C: FnOnce() -> std::io::Result<Credentials>,
    {
        self.navigate().await?;
        let creds = credentials().map_err(SessionError::Credentials)?;
        self.authenticate(&creds).await?;
        self.search(now).await?;
        self.enumerate(out).await
    }

    async fn fill(&self, field: Field, text: &str) -> Result<(), SessionError> {
        let el = self.waiter.wait_for(&self.page, field).await?;
        el.clear().await?;
        el.send_keys(text).await?;
        Ok(())
    }

    async fn click(&self, field: Field) -> Result<(), SessionError> {
        self.waiter.wait_for(&self.page, field).await?.click().await?;
        Ok(())
    }
}
