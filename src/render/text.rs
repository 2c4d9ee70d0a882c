// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io::{self, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use super::Fragment;

/// Renders a UTF-8 text file as preformatted content with explicit
/// line-break markers.
pub fn render_plain_text(path: &Path) -> Fragment {
    match fs::read_to_string(path) {
        Ok(content) => Fragment::Content(preformatted(&content)),
        Err(err) => Fragment::Failure(format!("cannot read text file: {err}")),
    }
}

/// Renders a gzip-compressed text file the same way as plain text.
pub fn render_gzip_text(path: &Path) -> Fragment {
    match read_gzip_text(path) {
        Ok(content) => Fragment::Content(preformatted(&content)),
        Err(err) => Fragment::Failure(format!("cannot decompress gzip file: {err}")),
    }
}

fn read_gzip_text(path: &Path) -> io::Result<String> {
    let file = fs::File::open(path)?;
    let mut decoder = GzDecoder::new(BufReader::new(file));
    let mut content = String::new();
    decoder.read_to_string(&mut content)?;
    Ok(content)
}

// Contents are embedded verbatim; only newlines are rewritten, so viewing a
// member returns its exact bytes modulo the line-break transform.
fn preformatted(content: &str) -> String {
    format!("<pre>{}</pre>", content.replace('\n', "<br>"))
}
