//! CLI for calldl.

mod commands;
mod prompt;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_config, run_name, run_session, RunOverrides};

/// Top-level CLI for calldl.
#[derive(Debug, Parser)]
#[command(name = "calldl")]
#[command(about = "calldl: download new call recordings from the monitoring portal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Log in, run the saved search and download every call not yet listened to.
    Run {
        /// Config file to use instead of ~/.config/calldl/config.toml.
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
        /// Directory the browser saves downloads into.
        #[arg(long, value_name = "DIR")]
        download_dir: Option<PathBuf>,
        /// Directory recordings are filed into.
        #[arg(long, value_name = "DIR")]
        dest_dir: Option<PathBuf>,
        /// Portal entry page.
        #[arg(long, value_name = "URL")]
        portal_url: Option<String>,
        /// Firefox binary to launch.
        #[arg(long, value_name = "PATH")]
        browser_binary: Option<PathBuf>,
        /// WebDriver endpoint (e.g. geckodriver).
        #[arg(long, value_name = "URL")]
        webdriver_url: Option<String>,
        /// Exit without waiting for Enter when the run is done.
        #[arg(long)]
        no_wait: bool,
    },

    /// Show the config file location and the effective configuration.
    Config {
        /// Config file to show instead of the default one.
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Preview the file name a call would be filed under.
    Name {
        /// Inmate name as shown by the portal, e.g. "JOHN SMITH".
        name: String,
        /// Call time, HH:MM[:SS].
        time: String,
        /// Treat the last word as the surname and allow middle names.
        #[arg(long)]
        surname_last: bool,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Run {
                config,
                download_dir,
                dest_dir,
                portal_url,
                browser_binary,
                webdriver_url,
                no_wait,
            } => {
                let overrides = RunOverrides {
                    download_dir,
                    dest_dir,
                    portal_url,
                    browser_binary,
                    webdriver_url,
                };
                run_session(config.as_deref(), overrides, no_wait).await?;
            }
            CliCommand::Config { config } => run_config(config.as_deref())?,
            CliCommand::Name {
                name,
                time,
                surname_last,
            } => run_name(&name, &time, surname_last)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
