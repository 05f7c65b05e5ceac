use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::locator::Locators;

/// Poll cadence parameters (optional `[poll]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Delay between attempts in milliseconds.
    pub interval_ms: u64,
    /// Upper bound on the delay when backing off; equal to `interval_ms` for a fixed cadence.
    pub max_interval_ms: u64,
    /// Seconds after which a "still waiting" warning is logged. Polling continues.
    pub soft_timeout_secs: u64,
    /// Give up on a page element after this many seconds (None = wait forever).
    #[serde(default)]
    pub hard_timeout_secs: Option<u64>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            max_interval_ms: 100,
            soft_timeout_secs: 30,
            hard_timeout_secs: None,
        }
    }
}

/// What to do when the destination file name already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Append ` (2)`, ` (3)`, ... before the extension.
    #[default]
    Suffix,
    /// Replace the existing file.
    Overwrite,
    /// Abort the run.
    Error,
}

/// How inmate display names are split into given name and surname.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamePolicy {
    /// Exactly two tokens ("First Last"); anything else skips the row.
    #[default]
    Strict,
    /// Last token is the surname, everything before it the given name.
    SurnameLast,
}

/// Configuration loaded from `~/.config/calldl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallDlConfig {
    /// Directory the browser saves downloads into (watched for `.part` files).
    pub download_dir: PathBuf,
    /// Directory recordings are filed into. May be on another volume.
    pub dest_dir: PathBuf,
    /// Portal entry page (login form).
    pub portal_url: String,
    /// WebDriver endpoint, e.g. a local geckodriver.
    pub webdriver_url: String,
    /// Firefox binary to launch (None = whatever the driver finds).
    #[serde(default)]
    pub browser_binary: Option<PathBuf>,
    /// MIME type the browser saves without prompting.
    pub download_mime_type: String,
    /// Suffix the browser appends to in-progress downloads.
    pub partial_suffix: String,
    /// Extension of a completed recording, without the dot.
    pub final_extension: String,
    /// At or before this local hour the search starts from the previous day.
    pub overnight_cutoff_hour: u32,
    #[serde(default)]
    pub poll: Option<PollConfig>,
    #[serde(default)]
    pub on_collision: Option<CollisionPolicy>,
    #[serde(default)]
    pub name_policy: Option<NamePolicy>,
    /// Portal markup locations; missing keys fall back to the built-in table.
    #[serde(default)]
    pub locators: Option<Locators>,
}

impl Default for CallDlConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("downloads"),
            dest_dir: PathBuf::from("calls"),
            portal_url: "https://commandcenter.securustech.net/SignonWeb/login/entrypage.jsp"
                .to_string(),
            webdriver_url: "http://localhost:4444".to_string(),
            browser_binary: None,
            download_mime_type: "audio/wav".to_string(),
            partial_suffix: ".part".to_string(),
            final_extension: "wav".to_string(),
            overnight_cutoff_hour: 7,
            poll: None,
            on_collision: None,
            name_policy: None,
            locators: None,
        }
    }
}

impl CallDlConfig {
    pub fn poll(&self) -> PollConfig {
        self.poll.clone().unwrap_or_default()
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.on_collision.unwrap_or_default()
    }

    pub fn name_policy(&self) -> NamePolicy {
        self.name_policy.unwrap_or_default()
    }

    pub fn locators(&self) -> Locators {
        self.locators.clone().unwrap_or_default()
    }

    /// Both directories must already exist; they are never created here.
    pub fn validate(&self) -> Result<()> {
        for (what, dir) in [("download_dir", &self.download_dir), ("dest_dir", &self.dest_dir)] {
            if !dir.is_dir() {
                anyhow::bail!("{} does not exist or is not a directory: {}", what, dir.display());
            }
        }
        if self.overnight_cutoff_hour > 23 {
            anyhow::bail!(
                "overnight_cutoff_hour must be 0..=23, got {}",
                self.overnight_cutoff_hour
            );
        }
        if self.partial_suffix.is_empty() || self.final_extension.is_empty() {
            anyhow::bail!("partial_suffix and final_extension must not be empty");
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("calldl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from the XDG location, creating a default file if none exists.
pub fn load_or_init() -> Result<CallDlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = CallDlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<CallDlConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let cfg: CallDlConfig = toml::from_str(&data)
        .with_context(|| format!("invalid config: {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const MINIMAL: &str = r#"
        download_dir = "/tmp/dl"
        dest_dir = "/mnt/share/calls"
        portal_url = "https://portal.example/login"
        webdriver_url = "http://localhost:4444"
        download_mime_type = "audio/wav"
        partial_suffix = ".part"
        final_extension = "wav"
        overnight_cutoff_hour = 7
    "#;

    #[test]
    fn default_config_values() {
        let cfg = CallDlConfig::default();
        assert_eq!(cfg.partial_suffix, ".part");
        assert_eq!(cfg.final_extension, "wav");
        assert_eq!(cfg.overnight_cutoff_hour, 7);
        assert_eq!(cfg.collision_policy(), CollisionPolicy::Suffix);
        assert_eq!(cfg.name_policy(), NamePolicy::Strict);
        assert_eq!(cfg.poll().interval_ms, 100);
        assert_eq!(cfg.poll().soft_timeout_secs, 30);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = CallDlConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: CallDlConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.portal_url, cfg.portal_url);
        assert_eq!(parsed.download_dir, cfg.download_dir);
        assert_eq!(parsed.dest_dir, cfg.dest_dir);
    }

    #[test]
    fn config_toml_minimal() {
        let cfg: CallDlConfig = toml::from_str(MINIMAL).unwrap();
        assert_eq!(cfg.dest_dir, PathBuf::from("/mnt/share/calls"));
        assert!(cfg.browser_binary.is_none());
        assert!(cfg.poll.is_none());
        assert!(cfg.locators.is_none());
    }

    #[test]
    fn config_toml_policies_and_poll() {
        let toml = format!(
            r#"{MINIMAL}
            browser_binary = "/opt/firefox/firefox"
            on_collision = "overwrite"
            name_policy = "surname-last"

            [poll]
            interval_ms = 250
            max_interval_ms = 1000
            soft_timeout_secs = 10
            hard_timeout_secs = 120
            "#
        );
        let cfg: CallDlConfig = toml::from_str(&toml).unwrap();
        assert_eq!(cfg.collision_policy(), CollisionPolicy::Overwrite);
        assert_eq!(cfg.name_policy(), NamePolicy::SurnameLast);
        assert_eq!(
            cfg.browser_binary.as_deref(),
            Some(Path::new("/opt/firefox/firefox"))
        );
        let poll = cfg.poll();
        assert_eq!(poll.interval_ms, 250);
        assert_eq!(poll.hard_timeout_secs, Some(120));
    }

    #[test]
    fn config_toml_partial_locators() {
        let toml = format!(
            r#"{MINIMAL}
            [locators]
            username_field = "//input[@name='user']"
            "#
        );
        let cfg: CallDlConfig = toml::from_str(&toml).unwrap();
        let locators = cfg.locators();
        assert_eq!(locators.username_field, "//input[@name='user']");
        assert_eq!(locators.password_field, Locators::default().password_field);
    }

    #[test]
    fn validate_requires_existing_dirs() {
        let dl = tempdir().unwrap();
        let dest = tempdir().unwrap();
        let mut cfg = CallDlConfig {
            download_dir: dl.path().to_path_buf(),
            dest_dir: dest.path().to_path_buf(),
            ..CallDlConfig::default()
        };
        cfg.validate().unwrap();

        cfg.dest_dir = dest.path().join("missing");
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("dest_dir"));
    }

    #[test]
    fn load_from_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "not = [valid").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("config.toml"));
    }
}
