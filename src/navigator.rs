//! Position tracking and directory listing inside a password store.
//!
//! [`StoreNavigator`] owns "where in the store am I" and answers "what can I
//! see from here". Every listing is rebuilt from the filesystem; nothing is
//! cached across moves except the listing of the current directory.

use crate::error::{StoreError, StoreResult};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name of the synthetic "go up" entry.
pub const PARENT_MARKER: &str = "..";

/// Suffix of an encrypted secret file.
pub const SECRET_SUFFIX: &str = ".gpg";

/// One item of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: String,
    index: usize,
    is_dir: bool,
}

impl Entry {
    pub fn new(name: impl Into<String>, index: usize, is_dir: bool) -> Self {
        Self {
            name: name.into(),
            index,
            is_dir,
        }
    }

    /// Display name. Secrets carry no `.gpg` suffix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position assigned when the listing was built.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    #[must_use]
    pub fn is_parent_marker(&self) -> bool {
        self.is_dir && self.name == PARENT_MARKER
    }
}

/// Store-relative path of a secret, in the form `pass` expects
/// (`Social/twitter`, never `Social/twitter.gpg`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretReference(PathBuf);

impl SecretReference {
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for SecretReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_path().display())
    }
}

impl AsRef<OsStr> for SecretReference {
    fn as_ref(&self) -> &OsStr {
        self.0.as_os_str()
    }
}

/// Order in which the children of a directory are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryOrder {
    /// Sorted by raw file name, so the same store always lists the same way.
    #[default]
    FileName,
    /// Whatever order the filesystem enumerates in.
    Filesystem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListOptions {
    pub order: EntryOrder,
    /// Skip names starting with `.` (`.git`, `.gpg-id`, ...).
    pub hide_dotfiles: bool,
}

/// Navigation state over one password store.
///
/// `current` is always a canonical directory at or below `root`. The only
/// mutators are [`StoreNavigator::move_to`] and [`StoreNavigator::refresh`],
/// and both leave the state untouched when they fail.
#[derive(Debug)]
pub struct StoreNavigator {
    root: PathBuf,
    current: PathBuf,
    entries: Vec<Entry>,
    options: ListOptions,
}

impl StoreNavigator {
    /// Opens the store at `root` and lists its top level.
    pub fn open(root: impl AsRef<Path>, options: ListOptions) -> StoreResult<Self> {
        let root = root.as_ref();
        let resolved = match root.canonicalize() {
            Ok(path) if path.is_dir() => path,
            _ => return Err(StoreError::InvalidStore(root.to_path_buf())),
        };

        let entries = read_listing(&resolved, false, options)?;
        log::debug!(
            "opened store {} ({} entries)",
            resolved.display(),
            entries.len()
        );

        Ok(Self {
            root: resolved.clone(),
            current: resolved,
            entries,
            options,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn current(&self) -> &Path {
        &self.current
    }

    /// Current directory relative to the store root; empty at the root.
    #[must_use]
    pub fn relative_location(&self) -> &Path {
        self.current
            .strip_prefix(&self.root)
            .unwrap_or_else(|_| Path::new(""))
    }

    #[must_use]
    pub fn is_at_root(&self) -> bool {
        self.current == self.root
    }

    /// Listing of the current directory.
    #[must_use]
    pub fn list(&self) -> &[Entry] {
        &self.entries
    }

    /// Moves to `current / target`, where `target` is a child name or
    /// [`PARENT_MARKER`].
    ///
    /// Returns `false` and changes nothing if the move would leave the store,
    /// the target is not a directory, or its listing cannot be read.
    pub fn move_to(&mut self, target: &str) -> bool {
        if target == PARENT_MARKER && self.is_at_root() {
            log::debug!("refusing to move above the store root");
            return false;
        }

        let candidate = match self.current.join(target).canonicalize() {
            Ok(path) => path,
            Err(e) => {
                log::debug!("cannot resolve {:?} from {}: {}", target, self.current.display(), e);
                return false;
            }
        };
        if !candidate.is_dir() {
            log::debug!("{} is not a directory", candidate.display());
            return false;
        }
        if !candidate.starts_with(&self.root) {
            log::warn!(
                "{} resolves outside the store root {}",
                candidate.display(),
                self.root.display()
            );
            return false;
        }

        let below_root = candidate != self.root;
        match read_listing(&candidate, below_root, self.options) {
            Ok(entries) => {
                log::debug!("moved to {}", candidate.display());
                self.current = candidate;
                self.entries = entries;
                true
            }
            Err(e) => {
                log::warn!("cannot list {}: {}", candidate.display(), e);
                false
            }
        }
    }

    /// Re-reads the current directory. Keeps the old listing on failure.
    pub fn refresh(&mut self) -> bool {
        match read_listing(&self.current, !self.is_at_root(), self.options) {
            Ok(entries) => {
                self.entries = entries;
                true
            }
            Err(e) => {
                log::warn!("cannot refresh {}: {}", self.current.display(), e);
                false
            }
        }
    }

    /// Resolves the entry at `index` of the current listing.
    ///
    /// Directories resolve to `None`; the caller should move into them
    /// instead. An index that is not in the listing is a caller bug.
    pub fn resolve_secret(&self, index: usize) -> StoreResult<Option<SecretReference>> {
        let entry = self
            .entries
            .iter()
            .find(|entry| entry.index() == index)
            .ok_or_else(|| {
                log::error!(
                    "stale entry index {} used in {}",
                    index,
                    self.current.display()
                );
                StoreError::EntryNotFound(index)
            })?;

        if entry.is_dir() {
            return Ok(None);
        }
        Ok(Some(SecretReference(
            self.relative_location().join(entry.name()),
        )))
    }

    /// Every secret in the store, recursively, sorted by path.
    pub fn all_secrets(&self) -> StoreResult<Vec<SecretReference>> {
        let mut secrets = Vec::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|dirent| {
                !(self.options.hide_dotfiles && dirent.file_name().to_string_lossy().starts_with('.'))
            });

        for result in walker {
            let dirent = match result {
                Ok(v) => v,
                Err(e) => {
                    log::warn!("skipping unreadable store entry: {}", e);
                    continue;
                }
            };
            if dirent.file_type().is_dir() {
                continue;
            }
            let Ok(relative) = dirent.path().strip_prefix(&self.root) else {
                continue;
            };
            let relative = relative.to_string_lossy();
            if let Some(stem) = relative.strip_suffix(SECRET_SUFFIX) {
                if !stem.is_empty() && !stem.ends_with('/') {
                    secrets.push(SecretReference(PathBuf::from(stem)));
                }
            }
        }
        Ok(secrets)
    }
}

/// Lists the immediate children of `dir`.
///
/// Directories and `.gpg` files become entries; anything else is skipped.
/// Indices count only emitted entries, starting after the parent marker.
fn read_listing(dir: &Path, with_parent: bool, options: ListOptions) -> StoreResult<Vec<Entry>> {
    let mut entries = Vec::new();
    if with_parent {
        entries.push(Entry::new(PARENT_MARKER, 0, true));
    }

    let mut walker = WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true);
    if options.order == EntryOrder::FileName {
        walker = walker.sort_by_file_name();
    }

    for result in walker {
        let dirent = match result {
            Ok(v) => v,
            Err(e) if e.path() == Some(dir) => return Err(e.into()),
            Err(e) => {
                log::warn!("skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        let file_name = dirent.file_name().to_string_lossy();
        if options.hide_dotfiles && file_name.starts_with('.') {
            continue;
        }

        let index = entries.len();
        if dirent.file_type().is_dir() {
            entries.push(Entry::new(file_name, index, true));
        } else if let Some(stem) = file_name.strip_suffix(SECRET_SUFFIX) {
            if !stem.is_empty() {
                entries.push(Entry::new(stem, index, false));
            }
        }
    }

    Ok(entries)
}
