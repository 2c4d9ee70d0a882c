// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::path::{Path, PathBuf};

use rstest::{fixture, rstest};

use super::{allowed_file, extract, upload, view, BundleSession, OpError};
use crate::model::SessionToken;
use crate::render::Fragment;
use crate::store::WorkspaceStore;
use crate::test_utils::TempDir;

struct OpsTestCtx {
    tmp: TempDir,
    store: WorkspaceStore,
}

impl OpsTestCtx {
    fn session(&self) -> BundleSession {
        BundleSession::new(SessionToken::generate())
    }

    /// A small but real 7z bundle, returned as raw upload bytes.
    fn bundle_bytes(&self, populate: impl FnOnce(&Path)) -> Vec<u8> {
        let source = self.tmp.path().join("bundle-source");
        let _ = fs::remove_dir_all(&source);
        fs::create_dir_all(&source).unwrap();
        populate(&source);

        let archive = self.tmp.path().join("fixture.7z");
        sevenz_rust::compress_to_path(&source, &archive).unwrap();
        fs::read(&archive).unwrap()
    }

    fn extract_dir(&self, session: &BundleSession) -> PathBuf {
        self.store
            .open(session.token())
            .unwrap()
            .extract_dir()
            .to_path_buf()
    }
}

#[fixture]
fn ctx() -> OpsTestCtx {
    let tmp = TempDir::new("ops");
    let store = WorkspaceStore::new(tmp.path().join("uploads"), tmp.path().join("extracted"));
    OpsTestCtx { tmp, store }
}

#[test]
fn allowed_file_requires_a_known_extension() {
    assert!(allowed_file("bundle.7z"));
    assert!(allowed_file("BUNDLE.7Z"));
    assert!(allowed_file("report.Csv"));
    assert!(!allowed_file("archive.rar"));
    assert!(!allowed_file("no-extension"));
    assert!(!allowed_file("trailing-dot."));
}

#[rstest]
fn upload_rejects_empty_names(ctx: OpsTestCtx) {
    let mut session = ctx.session();
    assert!(matches!(
        upload(&ctx.store, &mut session, "", b"data"),
        Err(OpError::EmptyFileName)
    ));
}

#[rstest]
fn upload_rejects_unsupported_extensions(ctx: OpsTestCtx) {
    let mut session = ctx.session();
    assert!(matches!(
        upload(&ctx.store, &mut session, "bundle.rar", b"data"),
        Err(OpError::UnsupportedExtension { .. })
    ));
    assert!(session.uploaded_archive().is_none());
}

#[rstest]
fn upload_saves_under_the_sanitized_name(ctx: OpsTestCtx) {
    let mut session = ctx.session();
    let receipt = upload(&ctx.store, &mut session, "my bundle (1).7z", b"data").unwrap();

    assert_eq!(receipt.file_name, "my_bundle_1.7z");
    let saved = session.uploaded_archive().unwrap();
    assert!(saved.is_file());
    assert!(saved.ends_with("my_bundle_1.7z"));
}

#[rstest]
fn upload_clears_both_areas_first(ctx: OpsTestCtx) {
    let mut session = ctx.session();
    let workspace = ctx.store.open(session.token()).unwrap();
    fs::write(workspace.upload_dir().join("stale.7z"), b"old").unwrap();
    fs::create_dir_all(workspace.extract_dir().join("old")).unwrap();
    fs::write(workspace.extract_dir().join("old/member.txt"), b"old").unwrap();

    upload(&ctx.store, &mut session, "fresh.7z", b"new").unwrap();

    assert!(!workspace.upload_dir().join("stale.7z").exists());
    assert!(!workspace.extract_dir().join("old").exists());
}

#[rstest]
fn even_a_rejected_upload_clears_the_workspace(ctx: OpsTestCtx) {
    let mut session = ctx.session();
    let workspace = ctx.store.open(session.token()).unwrap();
    fs::write(workspace.upload_dir().join("stale.7z"), b"old").unwrap();

    let result = upload(&ctx.store, &mut session, "bad.rar", b"new");

    assert!(result.is_err());
    assert!(!workspace.upload_dir().join("stale.7z").exists());
}

#[rstest]
fn extract_without_prior_upload_fails(ctx: OpsTestCtx) {
    let session = ctx.session();
    assert!(matches!(
        extract(&ctx.store, &session),
        Err(OpError::NoUploadedArchive)
    ));
}

#[rstest]
fn extract_with_vanished_upload_fails(ctx: OpsTestCtx) {
    let mut session = ctx.session();
    upload(&ctx.store, &mut session, "bundle.7z", b"data").unwrap();
    fs::remove_file(session.uploaded_archive().unwrap()).unwrap();

    assert!(matches!(
        extract(&ctx.store, &session),
        Err(OpError::NoUploadedArchive)
    ));
}

#[rstest]
fn extract_surfaces_corrupt_archives(ctx: OpsTestCtx) {
    let mut session = ctx.session();
    upload(&ctx.store, &mut session, "bundle.7z", b"not really a 7z").unwrap();

    assert!(matches!(
        extract(&ctx.store, &session),
        Err(OpError::Extract(_))
    ));
}

#[rstest]
fn upload_extract_view_pipeline(ctx: OpsTestCtx) {
    let bytes = ctx.bundle_bytes(|source| {
        fs::create_dir_all(source.join("nodes")).unwrap();
        fs::write(source.join("notes.txt"), b"first line\nsecond line").unwrap();
        fs::write(
            source.join("nodes/SYSCONFIG-A.txt"),
            "System Serial Number: ABC123 (NodeX)\nModel Name:          FAS8200\n",
        )
        .unwrap();
    });

    let mut session = ctx.session();
    upload(&ctx.store, &mut session, "bundle.7z", &bytes).unwrap();
    let summary = extract(&ctx.store, &session).unwrap();

    assert_eq!(summary.files.len(), 2);
    assert_eq!(summary.sysconfig.node_name, "NodeX");

    let fragment = view(&ctx.store, &session, "notes.txt").unwrap();
    assert_eq!(
        fragment,
        Fragment::Content("<pre>first line<br>second line</pre>".to_owned())
    );
}

#[rstest]
fn sessions_never_observe_each_other(ctx: OpsTestCtx) {
    let bytes = ctx.bundle_bytes(|source| {
        fs::write(source.join("only-in-a.txt"), b"a").unwrap();
    });

    let mut session_a = ctx.session();
    let session_b = ctx.session();
    upload(&ctx.store, &mut session_a, "bundle.7z", &bytes).unwrap();
    extract(&ctx.store, &session_a).unwrap();

    assert!(matches!(
        extract(&ctx.store, &session_b),
        Err(OpError::NoUploadedArchive)
    ));
    assert!(matches!(
        view(&ctx.store, &session_b, "only-in-a.txt"),
        Err(OpError::MemberNotFound { .. })
    ));
}

#[rstest]
fn view_requires_a_file_name(ctx: OpsTestCtx) {
    let session = ctx.session();
    assert!(matches!(
        view(&ctx.store, &session, ""),
        Err(OpError::MissingFileName)
    ));
}

#[rstest]
fn view_reports_unknown_members_as_not_found(ctx: OpsTestCtx) {
    let session = ctx.session();
    ctx.extract_dir(&session);

    assert!(matches!(
        view(&ctx.store, &session, "missing.txt"),
        Err(OpError::MemberNotFound { .. })
    ));
}

#[rstest]
fn view_resolves_nested_members_by_bare_name(ctx: OpsTestCtx) {
    let session = ctx.session();
    let extract_dir = ctx.extract_dir(&session);
    fs::create_dir_all(extract_dir.join("nodes/node-a")).unwrap();
    fs::write(extract_dir.join("nodes/node-a/deep.txt"), b"found").unwrap();

    let fragment = view(&ctx.store, &session, "deep.txt").unwrap();
    assert_eq!(fragment, Fragment::Content("<pre>found</pre>".to_owned()));
}

#[rstest]
fn view_with_unsupported_extension_explains_instead_of_failing(ctx: OpsTestCtx) {
    let session = ctx.session();
    let extract_dir = ctx.extract_dir(&session);
    fs::write(extract_dir.join("core.bin"), [0x00, 0x01]).unwrap();

    let fragment = view(&ctx.store, &session, "core.bin").unwrap();
    match fragment {
        Fragment::Content(message) => assert!(message.contains("unsupported file format")),
        Fragment::Failure(message) => panic!("expected a non-error fragment, got: {message}"),
    }
}

#[rstest]
fn view_traversal_names_stay_inside_the_extraction_area(ctx: OpsTestCtx) {
    let session = ctx.session();
    let extract_dir = ctx.extract_dir(&session);
    fs::write(extract_dir.join("safe.txt"), b"inside").unwrap();
    // A file directly above the extraction area, reachable only by escaping.
    fs::write(extract_dir.parent().unwrap().join("outside.txt"), b"secret").unwrap();

    assert!(matches!(
        view(&ctx.store, &session, "../outside.txt"),
        Err(OpError::MemberNotFound { .. })
    ));
}
