// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::warn;

use crate::model::UNKNOWN;

const CLUSTER_NAME_TAG: &str = "cluster-name";

/// Extracts the cluster identity from a `CLUSTER-INFO.xml` member.
///
/// Matches `cluster-name` elements by local name at any depth, regardless of
/// namespace prefix. Distinct non-empty values are comma-joined in document
/// order; no matches, unreadable input, and malformed XML all yield the
/// sentinel.
pub fn parse_cluster_info(path: &Path) -> String {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!("cannot read cluster info at {}: {err}", path.display());
            return UNKNOWN.to_owned();
        }
    };

    match parse_cluster_info_text(&text) {
        Ok(name) => name,
        Err(err) => {
            warn!("cannot parse cluster info at {}: {err}", path.display());
            UNKNOWN.to_owned()
        }
    }
}

pub(crate) fn parse_cluster_info_text(text: &str) -> Result<String, roxmltree::Error> {
    let doc = roxmltree::Document::parse(text)?;

    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for node in doc.descendants() {
        if !node.is_element() || node.tag_name().name() != CLUSTER_NAME_TAG {
            continue;
        }
        let Some(value) = node.text() else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        if seen.insert(value.to_owned()) {
            names.push(value.to_owned());
        }
    }

    if names.is_empty() {
        Ok(UNKNOWN.to_owned())
    } else {
        Ok(names.join(", "))
    }
}
