use std::fmt;

use actix_web::{
    error::ResponseError,
    http::StatusCode,
    HttpResponse
};
use serde::Serialize;
use validator::ValidationErrors;

use crate::response::ErrorEnvelope;

/// Every failure a request can end in. The error boundary and the
/// `ResponseError` impl below are the only places these become HTTP.
#[derive(Debug)]
pub enum AppError {
    NotFound,
    MissingFields(Vec<String>),
    ValidationError(Vec<FieldError>),
    InvalidFormat(String),
    BadRequest(String),
    Conflict,
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound => write!(f, "Resource not found"),
            AppError::MissingFields(fields) => {
                write!(f, "Missing required fields: {}", fields.join(", "))
            }
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "Validation Failed: {}", messages)
            }
            AppError::InvalidFormat(field) => write!(f, "Invalid data format for {}", field),
            AppError::BadRequest(msg) => write!(f, "{}", msg),
            AppError::Conflict => write!(f, "Duplicate key error"),
            AppError::InternalError(_) => write!(f, "Internal server error"),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Server-side detail that is never part of the public message.
    pub fn detail(&self) -> Option<&str> {
        match self {
            AppError::InternalError(detail) => Some(detail.as_str()),
            _ => None,
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope::new(self.status_code(), self.to_string())
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        self.envelope().into_response()
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MissingFields(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: to_camel_case(field),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();

        field_errors.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::ValidationError(field_errors)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            sqlx::Error::Database(e) => match e.code().as_deref() {
                Some("23505") => AppError::Conflict,
                Some("23514") => {
                    let field = e.constraint()
                        .map(field_from_constraint)
                        .unwrap_or_else(|| "record".to_string());
                    AppError::ValidationError(vec![FieldError {
                        message: format!("Path `{}` failed validation.", field),
                        field,
                    }])
                }
                // Postgres does not name the column here, so its own message is passed through
                Some("22P02") => AppError::BadRequest(format!("Invalid data format: {}", e.message())),
                _ => AppError::InternalError(format!("Database error: {}", e)),
            },
            _ => AppError::InternalError(format!("Database error: {}", err))
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// `projects_code_link_check` -> `codeLink`
fn field_from_constraint(constraint: &str) -> String {
    let column = constraint
        .strip_prefix("projects_")
        .unwrap_or(constraint);
    let column = column.strip_suffix("_check").unwrap_or(column);
    to_camel_case(column)
}

fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
