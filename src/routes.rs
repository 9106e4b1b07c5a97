use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Extension, Multipart, Request, multipart::MultipartRejection},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use mime::Mime;
use std::{path::PathBuf, sync::Arc};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    errors::ApiError,
    models::{GalleryRecord, MediaKind, NewGalleryRecord},
    records::RecordStore,
    storage::{FileData, MediaStorage, stored_file_name},
};

/// Room left in the body limit for multipart boundaries and the text fields.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub static_dir: PathBuf,
    /// Directory served under `/uploads`, when files live on local disk.
    pub uploads_dir: Option<PathBuf>,
    /// Cap on the uploaded file; `None` accepts any size.
    pub max_file_bytes: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct UploadLimits {
    max_file_bytes: Option<usize>,
}

pub fn build_router(
    storage: Arc<dyn MediaStorage>,
    records: Arc<dyn RecordStore>,
    options: RouterOptions,
) -> Router {
    let body_limit = match options.max_file_bytes {
        Some(max) => DefaultBodyLimit::max(max.saturating_add(MULTIPART_OVERHEAD)),
        None => DefaultBodyLimit::disable(),
    };

    let mut app = Router::new().route(
        "/api/gallery",
        get(list_gallery).post(upload).layer(body_limit),
    );

    if let Some(uploads_dir) = options.uploads_dir {
        app = app.nest_service("/uploads", ServeDir::new(uploads_dir));
    }

    app.fallback_service(ServeDir::new(options.static_dir))
        .layer(middleware::from_fn(hide_dotfiles))
        .layer(Extension(storage))
        .layer(Extension(records))
        .layer(Extension(UploadLimits {
            max_file_bytes: options.max_file_bytes,
        }))
        .layer(TraceLayer::new_for_http())
}

/// The static root may be the working directory, which also holds `.env`.
/// Any path segment starting with a dot, literal or percent-encoded, is a 404.
async fn hide_dotfiles(req: Request, next: Next) -> Response {
    let hidden = req.uri().path().split('/').any(|segment| {
        segment.starts_with('.')
            || segment
                .get(..3)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("%2e"))
    });

    if hidden {
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(req).await
}

struct UploadedFile {
    original_name: Option<String>,
    content_type: Mime,
    bytes: Bytes,
}

async fn upload(
    Extension(storage): Extension<Arc<dyn MediaStorage>>,
    Extension(records): Extension<Arc<dyn RecordStore>>,
    Extension(limits): Extension<UploadLimits>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GalleryRecord>, ApiError> {
    // a body that is not multipart at all carries no file part either
    let mut multipart = multipart.map_err(|rejection| {
        tracing::warn!(error = %rejection, "upload body is not multipart");
        ApiError::BadRequest("No file uploaded".to_string())
    })?;

    let mut file: Option<UploadedFile> = None;
    let mut name = None;
    let mut message = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(str::to_owned);
        let is_file = field.file_name().is_some();

        match field_name.as_deref() {
            Some("file") if is_file => {
                if file.is_some() {
                    return Err(ApiError::BadRequest("Unexpected field".to_string()));
                }
                let original_name = field.file_name().map(str::to_owned);
                let content_type = field
                    .content_type()
                    .and_then(|ct| ct.parse().ok())
                    .unwrap_or(mime::APPLICATION_OCTET_STREAM);
                let bytes = field.bytes().await?;

                if limits.max_file_bytes.is_some_and(|max| bytes.len() > max) {
                    return Err(ApiError::PayloadTooLarge);
                }
                file = Some(UploadedFile {
                    original_name,
                    content_type,
                    bytes,
                });
            }
            Some("name") => name = Some(field.text().await?),
            Some("message") => message = Some(field.text().await?),
            _ => {}
        }
    }

    let Some(file) = file else {
        return Err(ApiError::BadRequest("No file uploaded".to_string()));
    };

    let kind = MediaKind::from_content_type(&file.content_type);
    let filename = stored_file_name(
        chrono::Utc::now().timestamp_millis(),
        file.original_name.as_deref(),
    );

    let src = storage
        .store(FileData {
            bytes: file.bytes,
            content_type: file.content_type,
            filename,
        })
        .await?;

    // a failure here leaves the stored file orphaned
    let record = records
        .append(NewGalleryRecord::new(kind, src, name, message))
        .await
        .map_err(ApiError::Record)?;

    tracing::info!(id = %record.id, src = %record.src, kind = ?record.kind, "gallery item added");
    Ok(Json(record))
}

async fn list_gallery(
    Extension(records): Extension<Arc<dyn RecordStore>>,
) -> Result<Json<Vec<GalleryRecord>>, ApiError> {
    let items = records.list().await.map_err(ApiError::List)?;
    Ok(Json(items))
}
