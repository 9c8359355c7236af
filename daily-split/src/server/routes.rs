//! Request handlers for the upload form and the workbook API

use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::{HeaderName, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::AppState;
use super::page::{self, DOWNLOAD_FILE_NAME, XLSX_MIME};
use crate::config::Config;
use crate::split::{
    InputFormat, SplitEngine, SplitError, SplitOutput, read_reservations_bytes, write_split_excel,
};

/// Multipart field carrying the reservations file
const FILE_FIELD: &str = "file";

const SKIPPED_ROWS_HEADER: HeaderName = HeaderName::from_static("x-skipped-rows");
const WARNINGS_HEADER: HeaderName = HeaderName::from_static("x-warnings");

/// A successfully split upload
struct SplitUpload {
    file_name: String,
    output: SplitOutput,
    workbook: Vec<u8>,
}

/// Why an upload produced no workbook
#[derive(Debug)]
struct UploadError {
    status: StatusCode,
    file_name: Option<String>,
    summary: String,
    details: Vec<String>,
}

impl UploadError {
    fn new(status: StatusCode, file_name: Option<&str>, summary: impl Into<String>) -> Self {
        Self {
            status,
            file_name: file_name.map(str::to_string),
            summary: summary.into(),
            details: Vec::new(),
        }
    }

    fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    fn from_multipart(err: MultipartError) -> Self {
        Self::new(err.status(), None, err.body_text())
    }

    fn from_split(err: SplitError, file_name: &str) -> Self {
        match err {
            SplitError::Schema(schema) => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                Some(file_name),
                schema.to_string(),
            ),
            SplitError::Rows(errors) => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                Some(file_name),
                format!(
                    "{} row{} could not be split",
                    errors.len(),
                    if errors.len() == 1 { "" } else { "s" }
                ),
            )
            .with_details(errors.iter().map(|e| e.to_string()).collect()),
            limit @ SplitError::SheetRowLimit { .. } => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                Some(file_name),
                limit.to_string(),
            ),
        }
    }
}

/// GET / - upload form
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(page::index_page(state.config.max_upload_bytes))
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

/// POST /split - result page with previews and a download link
pub async fn split_upload(State(state): State<AppState>, multipart: Multipart) -> Response {
    match process_upload(state.config, multipart).await {
        Ok(upload) => {
            let encoded = STANDARD.encode(&upload.workbook);
            Html(page::result_page(&upload.file_name, &upload.output, &encoded)).into_response()
        }
        Err(err) => (
            err.status,
            Html(page::error_page(
                err.file_name.as_deref(),
                &err.summary,
                &err.details,
            )),
        )
            .into_response(),
    }
}

/// POST /api/split - the workbook itself as an attachment
pub async fn api_split(State(state): State<AppState>, multipart: Multipart) -> Response {
    match process_upload(state.config, multipart).await {
        Ok(upload) => (
            [
                (header::CONTENT_TYPE, XLSX_MIME.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", DOWNLOAD_FILE_NAME),
                ),
                (SKIPPED_ROWS_HEADER, upload.output.skipped.len().to_string()),
                (WARNINGS_HEADER, upload.output.warnings.len().to_string()),
            ],
            upload.workbook,
        )
            .into_response(),
        Err(err) => {
            let mut body = err.summary;
            for detail in &err.details {
                body.push('\n');
                body.push_str(detail);
            }
            (err.status, body).into_response()
        }
    }
}

async fn process_upload(
    config: Arc<Config>,
    multipart: Multipart,
) -> Result<SplitUpload, UploadError> {
    let result = match read_upload(multipart, config.max_upload_bytes).await {
        Ok((file_name, bytes)) => split_upload_bytes(config, file_name, bytes).await,
        Err(err) => Err(err),
    };

    match &result {
        Ok(upload) => log::info!(
            "Split {}: {} reservations, {} daily rows, {} skipped",
            upload.file_name,
            upload.output.reservation_count(),
            upload.output.daily.len(),
            upload.output.skipped.len()
        ),
        Err(err) => log::warn!(
            "Rejected upload {}: {} {}",
            err.file_name.as_deref().unwrap_or("<none>"),
            err.status.as_u16(),
            err.summary
        ),
    }
    result
}

/// Pull the file field out of the form
async fn read_upload(
    mut multipart: Multipart,
    max_upload_bytes: usize,
) -> Result<(String, Vec<u8>), UploadError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(UploadError::from_multipart)?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(UploadError::from_multipart)?;

        if file_name.is_empty() {
            return Err(UploadError::new(
                StatusCode::BAD_REQUEST,
                None,
                "No file was selected",
            ));
        }
        if bytes.is_empty() {
            return Err(UploadError::new(
                StatusCode::BAD_REQUEST,
                Some(&file_name),
                "The uploaded file is empty",
            ));
        }
        if bytes.len() > max_upload_bytes {
            return Err(UploadError::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                Some(&file_name),
                format!(
                    "The file is {} bytes; the limit is {} bytes",
                    bytes.len(),
                    max_upload_bytes
                ),
            ));
        }

        return Ok((file_name, bytes.to_vec()));
    }

    Err(UploadError::new(
        StatusCode::BAD_REQUEST,
        None,
        format!("The form has no '{}' field", FILE_FIELD),
    ))
}

/// Read, split and write the workbook off the async runtime
async fn split_upload_bytes(
    config: Arc<Config>,
    file_name: String,
    bytes: Vec<u8>,
) -> Result<SplitUpload, UploadError> {
    let format = InputFormat::from_file_name(&file_name).ok_or_else(|| {
        UploadError::new(
            StatusCode::BAD_REQUEST,
            Some(&file_name),
            "Unsupported file type, expected .xlsx or .csv",
        )
    })?;

    tokio::task::spawn_blocking(move || {
        let table = read_reservations_bytes(&bytes, format).map_err(|e| {
            UploadError::new(
                StatusCode::BAD_REQUEST,
                Some(&file_name),
                "The file could not be read as a reservations spreadsheet",
            )
            .with_details(vec![format!("{:#}", e)])
        })?;

        let output = SplitEngine::new(config.split_options())
            .run(&table)
            .map_err(|e| UploadError::from_split(e, &file_name))?;

        let workbook = write_split_excel(&output, &config.workbook_options()).map_err(|e| {
            log::error!("Failed to write workbook for {}: {:#}", file_name, e);
            UploadError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(&file_name),
                "The result workbook could not be written",
            )
        })?;

        Ok(SplitUpload {
            file_name,
            output,
            workbook,
        })
    })
    .await
    .map_err(|e| {
        log::error!("Split task failed: {}", e);
        UploadError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            None,
            "The split could not be completed",
        )
    })?
}
