use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use crate::service::import::{self as service, ImportReport, ImportRow};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ImportRequest {
    pub rows: Vec<ImportRow>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ImportTextRequest {
    /// One `full name, registration, position` per line.
    #[schema(example = "Maria Souza, 123.456-7, Analyst\nJoão Lima, 1234567, Manager")]
    pub content: String,
    /// Skip the first line. Defaults to false.
    pub has_header: Option<bool>,
}

/// Import already parsed rows
#[utoipa::path(
    post,
    path = "/api/import/employees",
    request_body = ImportRequest,
    responses(
        (status = 200, description = "Import report", body = ImportReport),
        (status = 429, description = "Too many import requests")
    ),
    tag = "Import"
)]
pub async fn import_employees(
    state: web::Data<AppState>,
    payload: web::Json<ImportRequest>,
) -> actix_web::Result<HttpResponse> {
    let report = service::import_rows(state.store.as_ref(), payload.into_inner().rows).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Import a delimited text file
#[utoipa::path(
    post,
    path = "/api/import/employees/text",
    request_body = ImportTextRequest,
    responses(
        (status = 200, description = "Import report", body = ImportReport),
        (status = 429, description = "Too many import requests")
    ),
    tag = "Import"
)]
pub async fn import_employees_text(
    state: web::Data<AppState>,
    payload: web::Json<ImportTextRequest>,
) -> actix_web::Result<HttpResponse> {
    let payload = payload.into_inner();
    let rows = service::parse_import_text(&payload.content, payload.has_header.unwrap_or(false));
    info!(parsed = rows.len(), "Import text parsed");

    let report = service::import_rows(state.store.as_ref(), rows).await?;
    Ok(HttpResponse::Ok().json(report))
}
