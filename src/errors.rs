use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("not found")]
    NotFound,
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("malformed request body: {0}")]
    MalformedBody(String),
    #[error("persistence failure: {0:#}")]
    Persistence(#[from] anyhow::Error),
}

/// Reasons a write request was rejected, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(reason.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, reasons) in &self.0 {
            for reason in reasons {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {reason}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl From<garde::Report> for FieldErrors {
    fn from(report: garde::Report) -> Self {
        let mut errors = FieldErrors::default();
        for (path, error) in report.iter() {
            errors.add(path.to_string(), error.message());
        }
        errors
    }
}

#[derive(Debug, serde::Serialize)]
pub struct RequestErrorJsonWrapper {
    errors: FieldErrors,
}

impl RequestErrorJsonWrapper {
    pub fn new(error: &str) -> RequestErrorJsonWrapper {
        let mut errors = FieldErrors::default();
        errors.add("body", error);
        RequestErrorJsonWrapper { errors }
    }

    pub fn from_fields(errors: FieldErrors) -> RequestErrorJsonWrapper {
        RequestErrorJsonWrapper { errors }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        match self.into_parts() {
            (status_code, Some(json)) => (status_code, Json(json)).into_response(),
            (status_code, None) => status_code.into_response(),
        }
    }
}

impl RequestError {
    /// Not-found answers carry no body.
    fn into_parts(self) -> (StatusCode, Option<RequestErrorJsonWrapper>) {
        match self {
            RequestError::NotFound => (StatusCode::NOT_FOUND, None),
            RequestError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Some(RequestErrorJsonWrapper::from_fields(errors)),
            ),
            RequestError::MalformedBody(message) => (
                StatusCode::BAD_REQUEST,
                Some(RequestErrorJsonWrapper::new(&message)),
            ),
            RequestError::Persistence(e) => {
                tracing::error!(error = ?e, "persistence failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Some(RequestErrorJsonWrapper::new("Internal Server Error")),
                )
            }
        }
    }
}
