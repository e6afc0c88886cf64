//! Gateway HTTP request handlers
//!
//! Every response is plain text. Failures carry a fixed message per endpoint;
//! the provider error is only logged.

use axum::{
    extract::{DefaultBodyLimit, FromRequest, Multipart, RawQuery, Request, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use bytes::Bytes;
use filegate_core::{ErrorKind, GatewayError, StorageKey};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::service::{DeleteService, UploadService};
use crate::storage::ObjectStore;

/// Largest form body any gateway route reads: 10 MiB
pub const DEFAULT_MAX_FORM_BYTES: usize = 10 << 20;

const PARSE_FORM_FAILED: &str = "Error al parsear el formulario";
const FILE_MISSING: &str = "Error al obtener el archivo";
const UPLOAD_FAILED: &str = "Error al subir el archivo";
const DELETE_FILE_FAILED: &str = "Error al eliminar el archivo";
const DELETE_FOLDER_FAILED: &str = "Error al eliminar la carpeta";

const FILE_DELETED: &str = "Archivo eliminado con éxito\n";
const FOLDER_DELETED: &str = "Carpeta eliminada con éxito\n";

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Shared state for gateway handlers
pub struct GatewayState {
    pub uploads: UploadService,
    pub deletes: DeleteService,
}

impl GatewayState {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            uploads: UploadService::new(store.clone()),
            deletes: DeleteService::new(store),
        }
    }
}

/// Gateway routes; `max_form_bytes` bounds every form body
pub fn routes(max_form_bytes: usize) -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/upload", post(upload))
        .route("/delete", post(delete))
        .route("/deleteFolder", post(delete_folder))
        .layer(DefaultBodyLimit::max(max_form_bytes))
}

/// File part of an upload form
struct UploadedFile {
    filename: String,
    data: Bytes,
}

/// `POST /upload`: multipart form with `file`, `userID` and `folderName`
pub async fn upload(
    State(state): State<Arc<GatewayState>>,
    RawQuery(query): RawQuery,
    request: Request,
) -> Response {
    let (file, fields) = match read_upload_form(&state, query.as_deref(), request).await {
        Ok(form) => form,
        Err(err) => return upload_error(&err),
    };

    let user_id = field(&fields, "userID");
    let folder_name = field(&fields, "folderName");

    match state
        .uploads
        .upload(user_id, folder_name, &file.filename, file.data)
        .await
    {
        Ok(result) => text_response(
            StatusCode::OK,
            format!("Archivo subido con éxito. URL: {}", result.url),
        ),
        Err(err) => upload_error(&err),
    }
}

/// `POST /delete`: form field `key`
pub async fn delete(
    State(state): State<Arc<GatewayState>>,
    RawQuery(query): RawQuery,
    request: Request,
) -> Response {
    let fields = read_text_form(&state, query.as_deref(), request).await;
    let key = StorageKey::new(field(&fields, "key"));

    match state.deletes.delete_one(&key).await {
        Ok(()) => text_response(StatusCode::OK, FILE_DELETED.to_string()),
        Err(err) => {
            log_failure("Delete failed", &err);
            error_response(&err, DELETE_FILE_FAILED)
        }
    }
}

/// `POST /deleteFolder`: form field `folderName`
pub async fn delete_folder(
    State(state): State<Arc<GatewayState>>,
    RawQuery(query): RawQuery,
    request: Request,
) -> Response {
    let fields = read_text_form(&state, query.as_deref(), request).await;
    let folder_name = field(&fields, "folderName");

    match state.deletes.delete_folder(folder_name).await {
        Ok(deleted) => {
            info!(folder = %folder_name, deleted, "Folder removed");
            text_response(StatusCode::OK, FOLDER_DELETED.to_string())
        }
        Err(err) => {
            log_failure("Folder delete failed", &err);
            error_response(&err, DELETE_FOLDER_FAILED)
        }
    }
}

// === Form parsing ===

/// Parse the multipart upload form.
///
/// The first `file` part carrying a non-empty filename is the upload; only
/// the filename's last path segment is kept. A part with an empty filename
/// counts as a text value. Text parts and query parameters fill the
/// remaining fields, body values first.
async fn read_upload_form(
    state: &Arc<GatewayState>,
    query: Option<&str>,
    request: Request,
) -> Result<(UploadedFile, HashMap<String, String>), GatewayError> {
    let mut multipart = Multipart::from_request(request, state)
        .await
        .map_err(GatewayError::form_parse)?;

    let mut fields = HashMap::new();
    let mut file = None;

    while let Some(part) = multipart
        .next_field()
        .await
        .map_err(GatewayError::form_parse)?
    {
        let Some(name) = part.name().map(str::to_string) else {
            continue;
        };

        match part
            .file_name()
            .filter(|filename| !filename.is_empty())
            .map(|filename| base_name(filename).to_string())
        {
            Some(filename) => {
                let data = part.bytes().await.map_err(GatewayError::form_parse)?;
                if name == "file" && file.is_none() {
                    file = Some(UploadedFile { filename, data });
                }
            }
            None => {
                let value = part.text().await.map_err(GatewayError::form_parse)?;
                fields.entry(name).or_insert(value);
            }
        }
    }

    merge_query(&mut fields, query);

    let file = file.ok_or_else(|| GatewayError::field_missing("file"))?;
    Ok((file, fields))
}

/// Collect text fields from a urlencoded or multipart body plus the query.
///
/// An unreadable body leaves its fields unset; the handler then proceeds with
/// empty values.
async fn read_text_form(
    state: &Arc<GatewayState>,
    query: Option<&str>,
    request: Request,
) -> HashMap<String, String> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    let mut fields = HashMap::new();

    let parsed = if content_type.starts_with("multipart/form-data") {
        read_multipart_text(state, request, &mut fields).await
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        match Bytes::from_request(request, state).await {
            Ok(body) => {
                for (name, value) in form_urlencoded::parse(&body) {
                    fields
                        .entry(name.into_owned())
                        .or_insert_with(|| value.into_owned());
                }
                Ok(())
            }
            Err(e) => Err(GatewayError::form_parse(e)),
        }
    } else {
        Ok(())
    };

    if let Err(err) = parsed {
        warn!(error = %err, cause = %err.cause_chain(), "Ignoring unreadable form body");
    }

    merge_query(&mut fields, query);
    fields
}

async fn read_multipart_text(
    state: &Arc<GatewayState>,
    request: Request,
    fields: &mut HashMap<String, String>,
) -> Result<(), GatewayError> {
    let mut multipart = Multipart::from_request(request, state)
        .await
        .map_err(GatewayError::form_parse)?;

    while let Some(part) = multipart
        .next_field()
        .await
        .map_err(GatewayError::form_parse)?
    {
        if part.file_name().is_some_and(|filename| !filename.is_empty()) {
            continue;
        }
        if let Some(name) = part.name().map(str::to_string) {
            let value = part.text().await.map_err(GatewayError::form_parse)?;
            fields.entry(name).or_insert(value);
        }
    }
    Ok(())
}

/// Last `/`-separated segment of a client filename; `"/"` if nothing else is left
fn base_name(filename: &str) -> &str {
    let trimmed = filename.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Query parameters only fill fields the body did not set
fn merge_query(fields: &mut HashMap<String, String>, query: Option<&str>) {
    if let Some(query) = query {
        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            fields
                .entry(name.into_owned())
                .or_insert_with(|| value.into_owned());
        }
    }
}

/// Missing fields read as empty strings
fn field<'a>(fields: &'a HashMap<String, String>, name: &str) -> &'a str {
    fields.get(name).map_or("", String::as_str)
}

// === Responses ===

fn upload_error(err: &GatewayError) -> Response {
    let message = match err.kind() {
        ErrorKind::FormParse => PARSE_FORM_FAILED,
        ErrorKind::FormFieldMissing => FILE_MISSING,
        _ => UPLOAD_FAILED,
    };

    if err.kind().is_storage() {
        log_failure("Upload failed", err);
    } else {
        warn!(error = %err, cause = %err.cause_chain(), "Rejected upload form");
    }

    error_response(err, message)
}

fn log_failure(what: &str, err: &GatewayError) {
    error!(
        kind = %err.kind(),
        key = err.key().unwrap_or(""),
        cause = %err.cause_chain(),
        "{}",
        what
    );
}

fn text_response(status: StatusCode, body: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN))],
        body,
    )
        .into_response()
}

fn error_response(err: &GatewayError, message: &str) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN)),
            (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        ],
        format!("{}\n", message),
    )
        .into_response()
}
