//! Stateless helpers exposing the `HH:MM` conversions used by the forms.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::utils::time_text::{format_minutes, is_valid_time_text, parse_time_text};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ParseQuery {
    /// Free-form duration such as `07:30`, `-1:05` or `0730`
    pub text: String,
    /// Accept a leading minus sign when validating. Defaults to true.
    pub allow_negative: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct FormatQuery {
    /// Signed minute count
    pub minutes: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ParsedTime {
    #[schema(example = 450)]
    pub minutes: i64,
    /// Whether the text passes the strict form validation.
    pub valid: bool,
    #[schema(example = "07:30")]
    pub formatted: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FormattedTime {
    #[schema(example = "-01:05")]
    pub text: String,
}

#[utoipa::path(
    get,
    path = "/api/time/parse",
    params(ParseQuery),
    responses(
        (status = 200, description = "Minutes parsed from the text", body = ParsedTime)
    ),
    tag = "Time"
)]
pub async fn parse_time(query: web::Query<ParseQuery>) -> HttpResponse {
    let minutes = parse_time_text(&query.text);
    HttpResponse::Ok().json(ParsedTime {
        minutes,
        valid: is_valid_time_text(&query.text, query.allow_negative.unwrap_or(true)),
        formatted: format_minutes(minutes),
    })
}

#[utoipa::path(
    get,
    path = "/api/time/format",
    params(FormatQuery),
    responses(
        (status = 200, description = "Minutes rendered as HH:MM", body = FormattedTime)
    ),
    tag = "Time"
)]
pub async fn format_time(query: web::Query<FormatQuery>) -> HttpResponse {
    HttpResponse::Ok().json(FormattedTime {
        text: format_minutes(query.minutes),
    })
}
