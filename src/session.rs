//! Session bootstrap: login identity and the message of the day.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

fn login_path(root: &Path) -> PathBuf {
    root.join("std").join("login")
}

/// Load the login persisted under the session root, prompting for and
/// persisting one on first run. Greets either way.
pub fn login<R: BufRead, W: Write>(root: &Path, input: &mut R, out: &mut W) -> Result<String> {
    let login = match stored_login(root)? {
        Some(login) => login,
        None => {
            write!(out, "login: ")?;
            out.flush()?;
            let mut line = String::new();
            input.read_line(&mut line).context("reading login")?;
            let login = line.trim().to_owned();
            let path = login_path(root);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &login)
                .with_context(|| format!("persisting login to {}", path.display()))?;
            login
        }
    };
    writeln!(out, "Logged in as: {login}")?;
    Ok(login)
}

/// First token of the stored login file, if it exists and holds one.
fn stored_login(root: &Path) -> Result<Option<String>> {
    match fs::read_to_string(login_path(root)) {
        Ok(text) => Ok(text.split_whitespace().next().map(str::to_owned)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).context("reading stored login"),
    }
}

/// Message-of-the-day text, if `etc/motd` exists under the root.
pub fn motd(root: &Path) -> Option<String> {
    match fs::read_to_string(root.join("etc").join("motd")) {
        Ok(text) => Some(text),
        Err(e) => {
            debug!("no message of the day: {e}");
            None
        }
    }
}
