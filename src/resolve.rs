// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mapping client-supplied names to files inside the extraction area.
//!
//! Requested names are sanitized before any path is built, so a crafted
//! name can never address anything outside the session's extraction
//! directory.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ResolveError {
    NotFound { name: String },
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { name } => write!(f, "no extracted file named {name:?}"),
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound { .. } => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Reduces a client-supplied name to a single safe filename component.
///
/// Path separators become token breaks, runs of whitespace join with `_`,
/// only ASCII `[A-Za-z0-9_.-]` survive, and leading/trailing dots and
/// underscores are stripped. Windows device names get a `_` prefix. The
/// result may be empty if nothing safe remains.
pub fn sanitize_file_name(name: &str) -> String {
    let spaced = name.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept = joined
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-'))
        .collect::<String>();
    let trimmed = kept.trim_matches(|ch| ch == '.' || ch == '_');

    let stem = trimmed.split('.').next().unwrap_or(trimmed);
    if is_windows_device_name(stem) {
        format!("_{trimmed}")
    } else {
        trimmed.to_owned()
    }
}

fn is_windows_device_name(base: &str) -> bool {
    let base = base.to_ascii_uppercase();
    match base.as_str() {
        "CON" | "PRN" | "AUX" | "NUL" => true,
        _ => {
            if let Some(num) = base.strip_prefix("COM") {
                matches!(num, "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9")
            } else if let Some(num) = base.strip_prefix("LPT") {
                matches!(num, "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9")
            } else {
                false
            }
        }
    }
}

/// Locates a member file by name inside `extract_dir`.
///
/// The sanitized name is tried as a direct child first; failing that, the
/// whole tree is walked for an exact filename match, first hit in traversal
/// order winning.
pub fn resolve_member(extract_dir: &Path, requested: &str) -> Result<PathBuf, ResolveError> {
    let name = sanitize_file_name(requested);
    if name.is_empty() {
        return Err(ResolveError::NotFound {
            name: requested.to_owned(),
        });
    }

    let direct = extract_dir.join(&name);
    if direct.is_file() {
        return Ok(direct);
    }

    match find_by_file_name(extract_dir, &name)? {
        Some(path) => Ok(path),
        None => Err(ResolveError::NotFound { name }),
    }
}

fn find_by_file_name(dir: &Path, name: &str) -> Result<Option<PathBuf>, ResolveError> {
    let entries = fs::read_dir(dir).map_err(|source| ResolveError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    // Files in this directory are checked before descending.
    let mut subdirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ResolveError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if entry.file_name().to_string_lossy() == name {
            return Ok(Some(path));
        }
    }

    for subdir in subdirs {
        if let Some(found) = find_by_file_name(&subdir, name)? {
            return Ok(Some(found));
        }
    }

    Ok(None)
}
