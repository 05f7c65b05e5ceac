//! Interactive operator prompts.

use anyhow::{Context, Result};
use calldl_core::session::Credentials;
use std::io::{self, BufRead, Write};

/// Ask for the portal username (echoed) and password (hidden).
pub fn credentials() -> io::Result<Credentials> {
    tokio::task::block_in_place(|| -> io::Result<Credentials> {
        let username = read_line("Username: ")?;
        let password = rpassword::prompt_password("Password: ")?;
        Ok(Credentials {
            username: username.trim().to_string(),
            password,
        })
    })
}

/// Block until the operator presses Enter.
pub fn acknowledge(message: &str) -> Result<()> {
    tokio::task::block_in_place(|| read_line(message).map(|_| ()))
        .context("failed to read from stdin")
}

fn read_line(prompt: &str) -> io::Result<String> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", prompt)?;
    stdout.flush()?;
    drop(stdout);

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}
