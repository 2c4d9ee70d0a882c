// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model: session tokens and the records derived from a bundle.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use uuid::Uuid;

/// Placeholder used whenever an expected field cannot be parsed out of a
/// bundle member.
pub const UNKNOWN: &str = "unknown";

/// Opaque identifier binding a client to its workspace directories.
///
/// Tokens name directories on disk, so they are restricted to a single safe
/// path segment: ASCII letters, digits, `-` and `_`. Generated tokens are
/// v4 UUIDs and always satisfy this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionToken {
    value: String,
}

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Result<Self, TokenError> {
        let value = value.into();
        if value.is_empty() {
            return Err(TokenError::Empty);
        }
        if !value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'))
        {
            return Err(TokenError::UnsafeCharacter);
        }
        Ok(Self { value })
    }

    /// Mints a fresh globally-unique token.
    pub fn generate() -> Self {
        Self {
            value: Uuid::new_v4().to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for SessionToken {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for SessionToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    Empty,
    UnsafeCharacter,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("session token must not be empty"),
            Self::UnsafeCharacter => f.write_str(
                "session token may only contain ASCII letters, digits, '-' and '_'",
            ),
        }
    }
}

impl std::error::Error for TokenError {}

/// Structured extraction of a `SYSCONFIG-A.txt` member.
///
/// Every field defaults to [`UNKNOWN`]; `disk_failed` keeps one trimmed
/// failure line per disk serial, in encounter order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SysconfigReport {
    pub node_name: String,
    pub serial_number: String,
    pub module_name: String,
    pub disk_failed: Vec<String>,
}

impl Default for SysconfigReport {
    fn default() -> Self {
        Self {
            node_name: UNKNOWN.to_owned(),
            serial_number: UNKNOWN.to_owned(),
            module_name: UNKNOWN.to_owned(),
            disk_failed: Vec::new(),
        }
    }
}

/// Result of extracting an uploaded bundle: the member list relative to the
/// extraction area plus the two eagerly parsed special-file summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractSummary {
    pub files: Vec<String>,
    pub cluster_name: String,
    pub sysconfig: SysconfigReport,
}

/// Confirmation of a saved upload; `file_name` is the sanitized name the
/// archive was stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    pub file_name: String,
}
