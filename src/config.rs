//! Runtime configuration, resolved once at startup.

use crate::cli::{Cli, CopyWith};
use crate::clipboard;
use crate::navigator::{EntryOrder, ListOptions};
use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_STORE_DIR: &str = ".password-store";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_root: PathBuf,
    pub list_options: ListOptions,
    pub copy_with: CopyWith,
    pub pass_bin: PathBuf,
    pub clip_time: Duration,
    pub print_only: bool,
    pub list_only: bool,
}

impl AppConfig {
    /// Reads the process environment for what clap does not cover.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let clip_time = std::env::var("PASSWORD_STORE_CLIP_TIME").ok();
        Self::resolve(cli, dirs::home_dir(), clip_time.as_deref())
    }

    fn resolve(cli: Cli, home: Option<PathBuf>, clip_time: Option<&str>) -> Result<Self> {
        let store_root = resolve_store_root(cli.store_dir, home.as_deref())?;
        let order = if cli.fs_order {
            EntryOrder::Filesystem
        } else {
            EntryOrder::FileName
        };

        Ok(Self {
            store_root,
            list_options: ListOptions {
                order,
                hide_dotfiles: cli.hide_dotfiles,
            },
            copy_with: cli.copy_with,
            pass_bin: cli.pass_bin,
            clip_time: clipboard::clip_time_from(clip_time),
            print_only: cli.print,
            list_only: cli.list,
        })
    }
}

/// Explicit directory (flag or `PASSWORD_STORE_DIR`) with `~` expanded,
/// otherwise `~/.password-store`.
fn resolve_store_root(explicit: Option<PathBuf>, home: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(dir) => expand_tilde(&dir, home),
        None => home
            .map(|h| h.join(DEFAULT_STORE_DIR))
            .ok_or_else(|| anyhow!("Could not determine home directory")),
    }
}

fn expand_tilde(path: &Path, home: Option<&Path>) -> Result<PathBuf> {
    let Ok(rest) = path.strip_prefix("~") else {
        return Ok(path.to_path_buf());
    };
    let home = home.ok_or_else(|| anyhow!("Could not determine home directory to expand ~"))?;
    Ok(home.join(rest))
}
