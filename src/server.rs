// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Thin HTTP layer over the core operations.
//!
//! Handlers translate request shapes and plumb session tokens; all parsing,
//! extraction and rendering logic lives in the core modules. Clients pass
//! their token via the `x-session` header; every JSON response echoes the
//! token to use on the next request (a fresh one is minted when the header
//! is absent or invalid).

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::model::{SessionToken, SysconfigReport};
use crate::ops::{self, BundleSession, OpError};
use crate::store::WorkspaceStore;

/// Upload size ceiling enforced at the body layer.
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Header carrying the client's session token.
pub const SESSION_HEADER: &str = "x-session";

pub struct AppState {
    store: WorkspaceStore,
    sessions: Mutex<HashMap<SessionToken, BundleSession>>,
}

impl AppState {
    pub fn new(store: WorkspaceStore) -> Self {
        Self {
            store,
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload_member))
        .route("/extract", post(extract_uploaded))
        .route("/view-file", get(view_member))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

const INDEX_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Proteus</title></head>
<body>
<h1>Proteus</h1>
<p>Upload a 7z diagnostic bundle, then POST /extract and browse members via
GET /view-file?file=&lt;name&gt;. Keep the session token from each response
in the x-session header.</p>
<form action="/upload" method="post" enctype="multipart/form-data">
  <input type="file" name="file">
  <button type="submit">Upload</button>
</form>
</body>
</html>
"#;

#[derive(Debug, Serialize)]
struct UploadResponse {
    success: bool,
    file_name: String,
    session: String,
}

#[derive(Debug, Serialize)]
struct ExtractResponse {
    success: bool,
    files: Vec<String>,
    cluster_name: String,
    sysconfig: SysconfigReport,
    session: String,
}

#[derive(Debug, Serialize)]
struct ViewResponse {
    content: String,
    session: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    session: String,
}

#[derive(Debug, Deserialize)]
struct ViewQuery {
    file: Option<String>,
}

async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

async fn upload_member(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let token = request_token(&headers).unwrap_or_else(SessionToken::generate);

    let (file_name, data) = match read_upload_field(&mut multipart).await {
        Ok(Some(pair)) => pair,
        Ok(None) => {
            return error_response(StatusCode::BAD_REQUEST, "no file uploaded", &token);
        }
        Err(err) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &format!("cannot read upload: {err}"),
                &token,
            );
        }
    };

    let mut sessions = state.sessions.lock().await;
    let session = sessions
        .entry(token.clone())
        .or_insert_with(|| BundleSession::new(token.clone()));

    match ops::upload(&state.store, session, &file_name, &data) {
        Ok(receipt) => (
            StatusCode::OK,
            Json(UploadResponse {
                success: true,
                file_name: receipt.file_name,
                session: token.into_string(),
            }),
        )
            .into_response(),
        Err(err) => op_error_response(&err, &token),
    }
}

async fn read_upload_field(
    multipart: &mut Multipart,
) -> Result<Option<(String, Bytes)>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or_default().to_owned();
            let data = field.bytes().await?;
            return Ok(Some((file_name, data)));
        }
    }
    Ok(None)
}

async fn extract_uploaded(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let token = request_token(&headers).unwrap_or_else(SessionToken::generate);

    let mut sessions = state.sessions.lock().await;
    let session = sessions
        .entry(token.clone())
        .or_insert_with(|| BundleSession::new(token.clone()));

    match ops::extract(&state.store, session) {
        Ok(summary) => (
            StatusCode::OK,
            Json(ExtractResponse {
                success: true,
                files: summary.files,
                cluster_name: summary.cluster_name,
                sysconfig: summary.sysconfig,
                session: token.into_string(),
            }),
        )
            .into_response(),
        Err(err) => op_error_response(&err, &token),
    }
}

async fn view_member(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ViewQuery>,
) -> Response {
    let token = request_token(&headers).unwrap_or_else(SessionToken::generate);

    let Some(file) = query.file else {
        return op_error_response(&OpError::MissingFileName, &token);
    };

    let mut sessions = state.sessions.lock().await;
    let session = sessions
        .entry(token.clone())
        .or_insert_with(|| BundleSession::new(token.clone()));

    match ops::view(&state.store, session, &file) {
        Ok(fragment) => (
            StatusCode::OK,
            Json(ViewResponse {
                content: fragment.to_html(),
                session: token.into_string(),
            }),
        )
            .into_response(),
        Err(err) => op_error_response(&err, &token),
    }
}

fn request_token(headers: &HeaderMap) -> Option<SessionToken> {
    headers.get(SESSION_HEADER)?.to_str().ok()?.parse().ok()
}

fn status_for(err: &OpError) -> StatusCode {
    match err {
        OpError::EmptyFileName
        | OpError::UnsupportedExtension { .. }
        | OpError::NoUploadedArchive
        | OpError::MissingFileName => StatusCode::BAD_REQUEST,
        OpError::MemberNotFound { .. } => StatusCode::NOT_FOUND,
        OpError::Store(_) | OpError::Extract(_) | OpError::Io { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn op_error_response(err: &OpError, token: &SessionToken) -> Response {
    error_response(status_for(err), &err.to_string(), token)
}

fn error_response(status: StatusCode, message: &str, token: &SessionToken) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_owned(),
            session: token.as_str().to_owned(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, StatusCode};

    use super::{request_token, status_for, SESSION_HEADER};
    use crate::ops::OpError;

    #[test]
    fn request_token_accepts_only_valid_headers() {
        let mut headers = HeaderMap::new();
        assert!(request_token(&headers).is_none());

        headers.insert(SESSION_HEADER, HeaderValue::from_static("abc-123"));
        assert_eq!(request_token(&headers).unwrap().as_str(), "abc-123");

        headers.insert(SESSION_HEADER, HeaderValue::from_static("../escape"));
        assert!(request_token(&headers).is_none());
    }

    #[test]
    fn error_responses_carry_an_error_field_and_the_token() {
        let body = serde_json::to_value(super::ErrorResponse {
            error: "boom".to_owned(),
            session: "abc-123".to_owned(),
        })
        .unwrap();
        assert_eq!(body["error"], "boom");
        assert_eq!(body["session"], "abc-123");
    }

    #[test]
    fn structural_errors_map_to_the_original_status_codes() {
        assert_eq!(status_for(&OpError::EmptyFileName), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&OpError::NoUploadedArchive),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&OpError::MemberNotFound {
                name: "x.txt".to_owned()
            }),
            StatusCode::NOT_FOUND
        );
    }
}
