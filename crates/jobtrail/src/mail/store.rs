//! Local directory-backed mail store.
//!
//! Layout: `<root>/<store>/<folder>/`, where each folder holds `.eml` files
//! directly and/or Maildir `cur/` and `new/` subdirectories.

use std::cmp::Reverse;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::error::{MailError, Result};
use super::parser::MessageParser;
use super::{FolderHandle, MailStore, RawMessage, StoreListing};

const MAILDIR_SUBDIRS: [&str; 2] = ["cur", "new"];

pub struct DirectoryMailStore {
    root: PathBuf,
    parser: MessageParser,
}

impl DirectoryMailStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            parser: MessageParser::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_root(&self) -> Result<()> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(MailError::RootNotFound(self.root.clone()))
        }
    }

    /// Collects the message files of a folder: `.eml` files at the top level
    /// and every file under `cur/` or `new/`.
    fn message_files(&self, folder: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(folder).min_depth(1).max_depth(2) {
            let entry = entry.map_err(|e| MailError::Walk {
                path: folder.to_path_buf(),
                source: e,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let in_maildir_subdir = entry.depth() == 2
                && path
                    .parent()
                    .and_then(|p| p.file_name())
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| MAILDIR_SUBDIRS.contains(&n));
            let is_eml = entry.depth() == 1 && has_eml_extension(path);

            if in_maildir_subdir || is_eml {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }
}

impl MailStore for DirectoryMailStore {
    fn lookup_folder(&self, store: &str, folder: &str) -> Result<FolderHandle> {
        self.ensure_root()?;

        let not_found = || MailError::FolderNotFound {
            store: store.to_string(),
            folder: folder.to_string(),
        };

        let (store_name, store_path) = find_child_dir(&self.root, store)?.ok_or_else(not_found)?;
        let (folder_name, folder_path) =
            find_child_dir(&store_path, folder)?.ok_or_else(not_found)?;

        debug!("Resolved folder '{}/{}' to {}", store, folder, folder_path.display());

        Ok(FolderHandle {
            store: store_name,
            folder: folder_name,
            path: folder_path,
        })
    }

    fn enumerate_messages(&self, folder: &FolderHandle) -> Result<Vec<RawMessage>> {
        let files = self.message_files(&folder.path)?;
        let mut messages = Vec::with_capacity(files.len());

        for path in files {
            let raw = std::fs::read(&path).map_err(|e| MailError::Read {
                path: path.clone(),
                source: e,
            })?;
            match self.parser.parse(&raw) {
                Ok(message) => messages.push(message),
                Err(e) => warn!("Skipping unreadable message {}: {}", path.display(), e),
            }
        }

        // Newest first; undated items sort last. The sort is stable so items
        // with equal timestamps keep their file-name order.
        messages.sort_by_key(|m| Reverse(m.received_naive()));

        info!(
            "Enumerated {} messages in '{}/{}'",
            messages.len(),
            folder.store,
            folder.folder
        );

        Ok(messages)
    }

    fn list_folders(&self) -> Result<Vec<StoreListing>> {
        self.ensure_root()?;

        let mut listings = Vec::new();
        for (store, store_path) in child_dirs(&self.root)? {
            let folders = child_dirs(&store_path)?
                .into_iter()
                .map(|(name, _)| name)
                .collect();
            listings.push(StoreListing { store, folders });
        }

        Ok(listings)
    }
}

/// Immediate subdirectories of `dir`, sorted by name.
fn child_dirs(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let read_err = |e| MailError::Read {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            dirs.push((name.to_string(), path));
        }
    }

    dirs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(dirs)
}

/// Finds the subdirectory whose name equals `name`, ignoring case.
fn find_child_dir(dir: &Path, name: &str) -> Result<Option<(String, PathBuf)>> {
    let wanted = name.to_lowercase();
    Ok(child_dirs(dir)?
        .into_iter()
        .find(|(candidate, _)| candidate.to_lowercase() == wanted))
}

fn has_eml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("eml"))
}
