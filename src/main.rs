// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Proteus CLI entrypoint.
//!
//! Serves the bundle-viewer HTTP surface. Workspace roots default to
//! `uploads/` and `extracted/` in the working directory.

use std::error::Error;
use std::sync::Arc;

use proteus::server::AppState;
use proteus::store::WorkspaceStore;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5001";
const DEFAULT_UPLOAD_ROOT: &str = "uploads";
const DEFAULT_EXTRACT_ROOT: &str = "extracted";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--listen <addr>] [--upload-root <dir>] [--extract-root <dir>]\n\nDefaults: --listen {DEFAULT_LISTEN_ADDR}, --upload-root {DEFAULT_UPLOAD_ROOT}, --extract-root {DEFAULT_EXTRACT_ROOT}.\n\nEach session gets its own subdirectory under both roots; sessions are\nidentified by the x-session request header."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    listen: Option<String>,
    upload_root: Option<String>,
    extract_root: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--listen" => {
                if options.listen.is_some() {
                    return Err(());
                }
                options.listen = Some(args.next().ok_or(())?);
            }
            "--upload-root" => {
                if options.upload_root.is_some() {
                    return Err(());
                }
                options.upload_root = Some(args.next().ok_or(())?);
            }
            "--extract-root" => {
                if options.extract_root.is_some() {
                    return Err(());
                }
                options.extract_root = Some(args.next().ok_or(())?);
            }
            _ => return Err(()),
        }
    }

    Ok(options)
}

fn main() {
    env_logger::init();

    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "proteus".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let listen = options
            .listen
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_owned());
        let store = WorkspaceStore::new(
            options
                .upload_root
                .unwrap_or_else(|| DEFAULT_UPLOAD_ROOT.to_owned()),
            options
                .extract_root
                .unwrap_or_else(|| DEFAULT_EXTRACT_ROOT.to_owned()),
        );
        let state = Arc::new(AppState::new(store));

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind(&listen).await?;
            eprintln!("proteus: listening on http://{}", listener.local_addr()?);
            axum::serve(listener, proteus::server::router(state)).await?;
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("proteus: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_all_flags() {
        let args = [
            "--listen",
            "0.0.0.0:8080",
            "--upload-root",
            "/tmp/up",
            "--extract-root",
            "/tmp/ex",
        ]
        .map(str::to_owned);
        let options = parse_options(args.into_iter()).expect("parse options");
        assert_eq!(options.listen.as_deref(), Some("0.0.0.0:8080"));
        assert_eq!(options.upload_root.as_deref(), Some("/tmp/up"));
        assert_eq!(options.extract_root.as_deref(), Some("/tmp/ex"));
    }

    #[test]
    fn rejects_duplicate_and_unknown_flags() {
        let duplicated = ["--listen", "a", "--listen", "b"].map(str::to_owned);
        assert!(parse_options(duplicated.into_iter()).is_err());

        let unknown = ["--nope".to_owned()];
        assert!(parse_options(unknown.into_iter()).is_err());
    }

    #[test]
    fn rejects_missing_flag_values() {
        let args = ["--upload-root".to_owned()];
        assert!(parse_options(args.into_iter()).is_err());
    }
}
