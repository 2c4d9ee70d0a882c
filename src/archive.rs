// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Bundle decompression and the post-extraction walk.
//!
//! A bundle is a single 7z archive. Extraction fully decompresses it into
//! the session's extraction area, then walks the resulting tree once to
//! enumerate member paths and eagerly parse the two specially named
//! members wherever they occur.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::{ExtractSummary, SysconfigReport, UNKNOWN};
use crate::report::{parse_cluster_info, parse_sysconfig};

/// System configuration report, parsed eagerly when present.
pub const SYSCONFIG_FILE: &str = "SYSCONFIG-A.txt";
/// Cluster identity document, parsed eagerly when present.
pub const CLUSTER_INFO_FILE: &str = "CLUSTER-INFO.xml";

#[derive(Debug)]
pub enum ExtractError {
    /// The archive could not be opened or decompressed. This is the one
    /// failure that aborts extraction as a whole.
    Archive {
        path: PathBuf,
        source: sevenz_rust::Error,
    },
    Io {
        path: PathBuf,
        source: io::Error,
    },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archive { path, source } => {
                write!(f, "cannot extract archive {path:?}: {source}")
            }
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Archive { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Decompresses the archive at `archive_path` into `dest_dir` and summarizes
/// the result.
///
/// Member paths come back relative to `dest_dir` in filesystem traversal
/// order (not sorted). Absence of either special member is not an error;
/// the corresponding summary fields stay at their sentinels. The archive
/// itself is left untouched.
pub fn extract_bundle(archive_path: &Path, dest_dir: &Path) -> Result<ExtractSummary, ExtractError> {
    sevenz_rust::decompress_file(archive_path, dest_dir).map_err(|source| {
        ExtractError::Archive {
            path: archive_path.to_path_buf(),
            source,
        }
    })?;

    let mut summary = ExtractSummary {
        files: Vec::new(),
        cluster_name: UNKNOWN.to_owned(),
        sysconfig: SysconfigReport::default(),
    };
    walk_extracted(dest_dir, dest_dir, &mut summary)?;
    Ok(summary)
}

fn walk_extracted(
    root: &Path,
    dir: &Path,
    summary: &mut ExtractSummary,
) -> Result<(), ExtractError> {
    let entries = fs::read_dir(dir).map_err(|source| ExtractError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| ExtractError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() {
            walk_extracted(root, &path, summary)?;
            continue;
        }

        let file_name = entry.file_name();
        if file_name == SYSCONFIG_FILE {
            summary.sysconfig = parse_sysconfig(&path);
        } else if file_name == CLUSTER_INFO_FILE {
            summary.cluster_name = parse_cluster_info(&path);
        }

        let relative = path.strip_prefix(root).unwrap_or(&path);
        summary.files.push(relative.to_string_lossy().into_owned());
    }

    Ok(())
}
