//! HTTP handlers

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect};
use axum::{Form, Json};
use bookshelf_core::{Book, NewBook};
use serde::Deserialize;
use tracing::info;

use crate::error::{ApiError, Result};
use crate::AppState;

/// GET / and GET /api/books
pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<Book>>> {
    Ok(Json(state.catalog.list_books()?))
}

/// POST / - add one book from form fields
pub async fn add_book_form(
    State(state): State<AppState>,
    Form(new_book): Form<NewBook>,
) -> Result<Redirect> {
    state.catalog.add_book(new_book)?;
    Ok(Redirect::to("/"))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

/// POST /api/books - add one book from a JSON body
pub async fn add_book_json(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Book>)> {
    if !is_json(&headers) {
        return Err(ApiError::BadRequest(
            "Content-Type must be application/json".to_string(),
        ));
    }

    let new_book: NewBook = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))?;

    let book = state.catalog.add_book(new_book)?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// POST /upload - multipart upload with field `file`
pub async fn upload(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse> {
    let no_file = || ApiError::BadRequest("No file provided in the request".to_string());
    let mut multipart = multipart.map_err(|_| no_file())?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;
        upload = Some((filename, data));
        break;
    }

    let (filename, data) = upload.ok_or_else(no_file)?;
    if filename.is_empty() {
        return Err(ApiError::BadRequest("No selected file".to_string()));
    }

    info!(filename = %filename, bytes = data.len(), "upload received");

    let ingestor = state.ingestor.clone();
    let report = tokio::task::spawn_blocking(move || ingestor.ingest(&filename, &data))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "File processed successfully",
            "format": report.format,
            "imported": report.imported,
            "skipped": report.skipped,
        })),
    ))
}

/// A missing field is `None` and matches no record; an empty field is
/// `Some("")` and matches untitled records.
#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    pub oldtitle: Option<String>,
    pub newtitle: Option<String>,
}

/// POST /update - rename the first book with `oldtitle`
pub async fn update(
    State(state): State<AppState>,
    Form(form): Form<UpdateForm>,
) -> Result<Redirect> {
    if let Some(old_title) = form.oldtitle {
        let new_title = form.newtitle.unwrap_or_default();
        state.catalog.update_title(&old_title, &new_title)?;
    }
    Ok(Redirect::to("/"))
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub title: Option<String>,
}

/// POST /delete - remove every book with `title`
pub async fn delete(
    State(state): State<AppState>,
    Form(form): Form<DeleteForm>,
) -> Result<Redirect> {
    if let Some(title) = form.title {
        state.catalog.delete_by_title(&title)?;
    }
    Ok(Redirect::to("/"))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "version": crate::VERSION
        })),
    )
}
