// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The four core operations invoked by the request-handling layer.
//!
//! Session state is an explicit [`BundleSession`] value passed into every
//! operation, never ambient, so multiple sessions coexist in one process
//! (and in one test). Errors here are structural (two-tier contract):
//! anything a format parser chokes on has already been converted into a
//! non-error [`Fragment`] further down.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::archive::{extract_bundle, ExtractError};
use crate::model::{ExtractSummary, SessionToken, UploadReceipt};
use crate::render::{escape_html, render_member, Fragment, RenderFormat};
use crate::resolve::{resolve_member, sanitize_file_name, ResolveError};
use crate::store::{StoreError, WorkspaceStore};

/// Extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["7z", "txt", "xml", "csv", "gz"];

/// Per-session context: the token plus the most recently uploaded archive.
#[derive(Debug, Clone)]
pub struct BundleSession {
    token: SessionToken,
    uploaded_archive: Option<PathBuf>,
}

impl BundleSession {
    pub fn new(token: SessionToken) -> Self {
        Self {
            token,
            uploaded_archive: None,
        }
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn uploaded_archive(&self) -> Option<&Path> {
        self.uploaded_archive.as_deref()
    }
}

#[derive(Debug)]
pub enum OpError {
    EmptyFileName,
    UnsupportedExtension { file_name: String },
    NoUploadedArchive,
    MissingFileName,
    MemberNotFound { name: String },
    Store(StoreError),
    Extract(ExtractError),
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for OpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFileName => f.write_str("no usable file name supplied"),
            Self::UnsupportedExtension { file_name } => write!(
                f,
                "file {file_name:?} does not have an allowed extension (7z, txt, xml, csv, gz)"
            ),
            Self::NoUploadedArchive => {
                f.write_str("no uploaded archive for this session; upload one first")
            }
            Self::MissingFileName => f.write_str("no file specified"),
            Self::MemberNotFound { name } => write!(f, "file {name:?} does not exist"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Extract(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
        }
    }
}

impl std::error::Error for OpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Extract(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<StoreError> for OpError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<ExtractError> for OpError {
    fn from(err: ExtractError) -> Self {
        Self::Extract(err)
    }
}

/// True when the name carries one of the [`ALLOWED_EXTENSIONS`]
/// (case-insensitive; a dot is required).
pub fn allowed_file(file_name: &str) -> bool {
    file_name.rsplit_once('.').is_some_and(|(_, extension)| {
        ALLOWED_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str())
    })
}

/// Saves an uploaded archive into the session's upload area.
///
/// The whole workspace is cleared first, so no state from a prior bundle
/// survives even when validation rejects the new upload afterwards.
pub fn upload(
    store: &WorkspaceStore,
    session: &mut BundleSession,
    file_name: &str,
    data: &[u8],
) -> Result<UploadReceipt, OpError> {
    let workspace = store.open(session.token())?;
    workspace.clear()?;
    session.uploaded_archive = None;

    if file_name.is_empty() {
        return Err(OpError::EmptyFileName);
    }
    if !allowed_file(file_name) {
        return Err(OpError::UnsupportedExtension {
            file_name: file_name.to_owned(),
        });
    }

    let saved_name = sanitize_file_name(file_name);
    if saved_name.is_empty() {
        return Err(OpError::EmptyFileName);
    }

    let saved_path = workspace.upload_dir().join(&saved_name);
    fs::write(&saved_path, data).map_err(|source| OpError::Io {
        path: saved_path.clone(),
        source,
    })?;
    session.uploaded_archive = Some(saved_path);

    Ok(UploadReceipt {
        file_name: saved_name,
    })
}

/// Decompresses the session's uploaded archive into its extraction area and
/// returns the member list plus the eagerly parsed special-file summaries.
pub fn extract(store: &WorkspaceStore, session: &BundleSession) -> Result<ExtractSummary, OpError> {
    let workspace = store.open(session.token())?;

    let archive = session
        .uploaded_archive()
        .ok_or(OpError::NoUploadedArchive)?;
    if !archive.is_file() {
        return Err(OpError::NoUploadedArchive);
    }

    Ok(extract_bundle(archive, workspace.extract_dir())?)
}

/// Renders one extracted member as an HTML fragment.
///
/// An unsupported or missing extension is not an error: it yields an
/// explanatory fragment, per the two-tier contract. Unresolvable names are
/// structural errors (the 404 case).
pub fn view(
    store: &WorkspaceStore,
    session: &BundleSession,
    requested: &str,
) -> Result<Fragment, OpError> {
    if requested.is_empty() {
        return Err(OpError::MissingFileName);
    }

    let workspace = store.open(session.token())?;
    let path = resolve_member(workspace.extract_dir(), requested).map_err(|err| match err {
        ResolveError::NotFound { name } => OpError::MemberNotFound { name },
        ResolveError::Io { path, source } => OpError::Io { path, source },
    })?;

    let fragment = match requested.rsplit_once('.') {
        Some((_, extension)) => match RenderFormat::from_extension(extension) {
            Some(format) => render_member(format, &path),
            None => Fragment::Content(format!(
                "unsupported file format: .{}",
                escape_html(&extension.to_ascii_lowercase())
            )),
        },
        None => Fragment::Content("unsupported file format".to_owned()),
    };

    Ok(fragment)
}

#[cfg(test)]
mod tests;
