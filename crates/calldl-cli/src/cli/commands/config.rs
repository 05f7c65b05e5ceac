//! `calldl config` – show where the config lives and what it says.

use anyhow::Result;
use calldl_core::config;
use std::path::Path;

use super::run::load_config;

pub fn run_config(path: Option<&Path>) -> Result<()> {
    let shown = match path {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    let cfg = load_config(path)?;
    println!("# {}", shown.display());
    print!("{}", toml::to_string_pretty(&cfg)?);
    Ok(())
}
