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
use std::sync::OnceLock;

use log::warn;
use regex::Regex;

use crate::model::SysconfigReport;

fn serial_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"System Serial Number: (\S+)").expect("hard-coded regex is valid")
    })
}

fn node_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"System Serial Number: \S+ \((.*?)\)").expect("hard-coded regex is valid")
    })
}

fn module_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Model Name:\s+(\S+)").expect("hard-coded regex is valid"))
}

fn parenthesized_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([^)]+)\)").expect("hard-coded regex is valid"))
}

/// Extracts the system configuration record from a `SYSCONFIG-A.txt` member.
///
/// Never fails: an unreadable or non-UTF-8 file is logged and yields the
/// all-sentinel default record.
pub fn parse_sysconfig(path: &Path) -> SysconfigReport {
    match fs::read_to_string(path) {
        Ok(content) => parse_sysconfig_text(&content),
        Err(err) => {
            warn!("cannot read sysconfig at {}: {err}", path.display());
            SysconfigReport::default()
        }
    }
}

pub(crate) fn parse_sysconfig_text(content: &str) -> SysconfigReport {
    let mut report = SysconfigReport::default();

    // First match across the whole file wins for each field.
    if let Some(caps) = serial_number_re().captures(content) {
        report.serial_number = caps[1].to_owned();
    }
    if let Some(caps) = node_name_re().captures(content) {
        report.node_name = caps[1].to_owned();
    }
    if let Some(caps) = module_name_re().captures(content) {
        report.module_name = caps[1].to_owned();
    }

    // One failure line per disk serial, first occurrence wins, encounter
    // order preserved. Lines without a parenthesized serial are skipped.
    let mut seen_serials = HashSet::new();
    for line in content.lines() {
        if !line.contains("Failed") {
            continue;
        }
        let Some(caps) = parenthesized_re().captures(line) else {
            continue;
        };
        if seen_serials.insert(caps[1].to_owned()) {
            report.disk_failed.push(line.trim().to_owned());
        }
    }

    report
}
