// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::SessionToken;

#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Allocates per-session workspaces under a fixed pair of root directories.
///
/// Layout is `<upload_root>/<token>/` and `<extract_root>/<token>/`; token
/// validation (see [`SessionToken`]) guarantees the two subtrees of distinct
/// sessions never overlap.
#[derive(Debug, Clone)]
pub struct WorkspaceStore {
    upload_root: PathBuf,
    extract_root: PathBuf,
}

impl WorkspaceStore {
    pub fn new(upload_root: impl Into<PathBuf>, extract_root: impl Into<PathBuf>) -> Self {
        Self {
            upload_root: upload_root.into(),
            extract_root: extract_root.into(),
        }
    }

    pub fn upload_root(&self) -> &Path {
        &self.upload_root
    }

    pub fn extract_root(&self) -> &Path {
        &self.extract_root
    }

    /// Returns the session's workspace, creating both areas if needed.
    /// Creation is idempotent; existing contents are left untouched.
    pub fn open(&self, token: &SessionToken) -> Result<Workspace, StoreError> {
        let upload_dir = self.upload_root.join(token.as_str());
        let extract_dir = self.extract_root.join(token.as_str());

        for dir in [&upload_dir, &extract_dir] {
            fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(Workspace {
            token: token.clone(),
            upload_dir,
            extract_dir,
        })
    }
}

/// One session's pair of storage areas.
#[derive(Debug, Clone)]
pub struct Workspace {
    token: SessionToken,
    upload_dir: PathBuf,
    extract_dir: PathBuf,
}

impl Workspace {
    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn extract_dir(&self) -> &Path {
        &self.extract_dir
    }

    /// Empties both areas so no state survives from a prior archive.
    pub fn clear(&self) -> Result<(), StoreError> {
        clear_dir(&self.upload_dir)?;
        clear_dir(&self.extract_dir)
    }
}

/// Recursively removes everything inside `dir` while keeping `dir` itself.
///
/// Symbolic links are unlinked, never followed. A missing `dir` is not an
/// error; any other filesystem failure propagates.
pub fn clear_dir(dir: &Path) -> Result<(), StoreError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(StoreError::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    for entry in entries {
        let entry = entry.map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        let metadata = fs::symlink_metadata(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        if metadata.is_dir() {
            clear_dir(&path)?;
            fs::remove_dir(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
        } else {
            // Regular files and symlinks alike; the link itself goes, not
            // its target.
            fs::remove_file(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
        }
    }

    Ok(())
}
