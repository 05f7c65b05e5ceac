//! `calldl run` – one portal session.

use anyhow::{Context, Result};
use calldl_core::config::{self, CallDlConfig};
use calldl_core::session::{self, RunSummary};
use std::path::{Path, PathBuf};

use crate::cli::prompt;

/// Command-line values that replace the config file's.
#[derive(Debug, Default)]
pub struct RunOverrides {
    pub download_dir: Option<PathBuf>,
    pub dest_dir: Option<PathBuf>,
    pub portal_url: Option<String>,
    pub browser_binary: Option<PathBuf>,
    pub webdriver_url: Option<String>,
}

impl RunOverrides {
    pub fn apply(self, cfg: &mut CallDlConfig) {
        if let Some(dir) = self.download_dir {
            cfg.download_dir = dir;
        }
        if let Some(dir) = self.dest_dir {
            cfg.dest_dir = dir;
        }
        if let Some(url) = self.portal_url {
            cfg.portal_url = url;
        }
        if let Some(path) = self.browser_binary {
            cfg.browser_binary = Some(path);
        }
        if let Some(url) = self.webdriver_url {
            cfg.webdriver_url = url;
        }
    }
}

pub(crate) fn load_config(path: Option<&Path>) -> Result<CallDlConfig> {
    match path {
        Some(p) => config::load_from(p),
        None => config::load_or_init(),
    }
}

pub async fn run_session(config_path: Option<&Path>, overrides: RunOverrides, no_wait: bool) -> Result<()> {
    let mut cfg = load_config(config_path)?;
    overrides.apply(&mut cfg);
    tracing::debug!("loaded config: {:?}", cfg);
    cfg.validate()?;

    let driver = session::launch(&cfg)
        .await
        .with_context(|| format!("could not start a browser session via {}", cfg.webdriver_url))?;

    let now = chrono::Local::now().naive_local();
    let mut stdout = std::io::stdout();
    let summary = driver.run(prompt::credentials, now, &mut stdout).await?;
    print_summary(&summary);

    if !no_wait {
        prompt::acknowledge("Done!")?;
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    tracing::info!(
        total = summary.total,
        downloaded = summary.downloaded.len(),
        listened = summary.listened,
        unavailable = summary.unavailable,
        unnamed = summary.unnamed,
        "run completed"
    );
    println!(
        "{} call(s): {} downloaded, {} already listened to, {} not available, {} skipped",
        summary.total,
        summary.downloaded.len(),
        summary.listened,
        summary.unavailable,
        summary.unnamed
    );
    for path in &summary.downloaded {
        println!("  {}", path.display());
    }
}
