//! Firefox over WebDriver (geckodriver), via `thirtyfour`.

use std::path::PathBuf;

use thirtyfour::common::capabilities::firefox::FirefoxPreferences;
use thirtyfour::prelude::*;

use super::{Element, Page, PageError};
use crate::config::CallDlConfig;

/// A Firefox profile preference value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefValue {
    Int(i64),
    Bool(bool),
    Str(String),
}

/// What the browser needs to know at launch.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub webdriver_url: String,
    pub browser_binary: Option<PathBuf>,
    pub download_dir: PathBuf,
    pub download_mime_type: String,
}

impl From<&CallDlConfig> for BrowserOptions {
    fn from(cfg: &CallDlConfig) -> Self {
        Self {
            webdriver_url: cfg.webdriver_url.clone(),
            browser_binary: cfg.browser_binary.clone(),
            download_dir: cfg.download_dir.clone(),
            download_mime_type: cfg.download_mime_type.clone(),
        }
    }
}

impl BrowserOptions {
    /// Profile preferences that make Firefox save `download_mime_type` into
    /// `download_dir` without a dialog.
    pub fn download_preferences(&self) -> Vec<(&'static str, PrefValue)> {
        let dir = std::path::absolute(&self.download_dir)
            .unwrap_or_else(|_| self.download_dir.clone());
        vec![
            ("browser.download.folderList", PrefValue::Int(2)),
            (
                "browser.download.manager.showWhenStarting",
                PrefValue::Bool(false),
            ),
            ("browser.download.useDownloadDir", PrefValue::Bool(true)),
            (
                "browser.download.dir",
                PrefValue::Str(dir.to_string_lossy().into_owned()),
            ),
            (
                "browser.helperApps.neverAsk.saveToDisk",
                PrefValue::Str(self.download_mime_type.clone()),
            ),
        ]
    }
}

/// A Firefox session driven through WebDriver.
pub struct WebDriverPage {
    driver: WebDriver,
}

impl WebDriverPage {
    /// Start a browser configured to auto-save downloads.
    pub async fn launch(opts: &BrowserOptions) -> Result<Self, PageError> {
        let mut prefs = FirefoxPreferences::new();
        for (key, value) in opts.download_preferences() {
            match value {
                PrefValue::Int(v) => prefs.set(key, v)?,
                PrefValue::Bool(v) => prefs.set(key, v)?,
                PrefValue::Str(v) => prefs.set(key, v)?,
            }
        }

        let mut caps = DesiredCapabilities::firefox();
        caps.set_preferences(prefs)?;
        if let Some(binary) = &opts.browser_binary {
            let binary = binary.to_string_lossy();
            caps.set_firefox_binary(&*binary)?;
        }

        tracing::info!(
            webdriver = %opts.webdriver_url,
            download_dir = %opts.download_dir.display(),
            "starting browser session"
        );
        let driver = WebDriver::new(opts.webdriver_url.as_str(), caps).await?;
        Ok(Self { driver })
    }
}

impl Page for WebDriverPage {
    type Element = WebElement;

    async fn goto(&self, url: &str) -> Result<(), PageError> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn try_find(&self, xpath: &str) -> Result<Option<WebElement>, PageError> {
        let mut found = self.driver.find_all(By::XPath(xpath)).await?;
        if found.is_empty() {
            Ok(None)
        } else {
            Ok(Some(found.swap_remove(0)))
        }
    }

    async fn close(self) -> Result<(), PageError> {
        self.driver.quit().await?;
        Ok(())
    }
}

impl Element for WebElement {
    async fn text(&self) -> Result<String, PageError> {
        Ok(WebElement::text(self).await?)
    }

    async fn attr(&self, name: &str) -> Result<Option<String>, PageError> {
        Ok(WebElement::attr(self, name).await?)
    }

    async fn clear(&self) -> Result<(), PageError> {
        Ok(WebElement::clear(self).await?)
    }

    async fn send_keys(&self, text: &str) -> Result<(), PageError> {
        Ok(WebElement::send_keys(self, text).await?)
    }

    async fn click(&self) -> Result<(), PageError> {
        Ok(WebElement::click(self).await?)
    }
}
