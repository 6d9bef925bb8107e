//! Turns domain failures into JSON error envelopes.
//!
//! The domain [`Error`] stays free of HTTP types; this module picks the
//! status for each [`ErrorCode`] and strips internal failures down to a
//! generic message before they leave the process. Extractor rejections for
//! bodies, query strings and path segments are folded into the same
//! `invalid_request` envelope.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result type returned by every templatehub handler.
pub type ApiResult<T> = Result<T, Error>;

const INTERNAL_MESSAGE: &str = "Internal server error";

fn http_status(code: ErrorCode) -> StatusCode {
    use ErrorCode as C;
    match code {
        C::InvalidRequest => StatusCode::BAD_REQUEST,
        C::Unauthorized => StatusCode::UNAUTHORIZED,
        C::Forbidden => StatusCode::FORBIDDEN,
        C::NotFound => StatusCode::NOT_FOUND,
        C::Conflict => StatusCode::CONFLICT,
        C::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        C::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Envelope sent to the client. Internal errors keep only their trace id.
fn client_view(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    let generic = Error::internal(INTERNAL_MESSAGE);
    match error.trace_id() {
        Some(id) => generic.with_trace_id(id.to_owned()),
        None => generic,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        http_status(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = ?self.code(), message = %self.message(), "request failed");
        }
        let mut response = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        response.json(client_view(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "unhandled actix error");
        Error::internal(INTERNAL_MESSAGE)
    }
}

fn rejected(source: &'static str, reason: impl std::fmt::Display) -> actix_web::Error {
    let reason = reason.to_string();
    debug!(source, %reason, "extractor rejected request");
    Error::invalid_request(format!("malformed request {source}"))
        .with_details(json!({ "source": source, "reason": reason }))
        .into()
}

/// Installed on [`actix_web::web::JsonConfig`].
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    rejected("body", err)
}

/// Installed on [`actix_web::web::QueryConfig`].
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    rejected("query", err)
}

/// Installed on [`actix_web::web::PathConfig`].
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    rejected("path", err)
}

#[cfg(test)]
mod tests;
