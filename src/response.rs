use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;

/// Uniform success body: `{ success, status, message, data }`.
///
/// `data` is always present and serializes to `null` when there is no payload.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub status: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        ApiResponse {
            success: true,
            status: status.as_u16(),
            message: message.into(),
            data,
        }
    }

    pub fn respond(status: StatusCode, message: impl Into<String>, data: Option<T>) -> HttpResponse {
        HttpResponse::build(status).json(Self::new(status, message, data))
    }

    pub fn ok(data: T, message: impl Into<String>) -> HttpResponse {
        Self::respond(StatusCode::OK, message, Some(data))
    }

    pub fn created(data: T, message: impl Into<String>) -> HttpResponse {
        Self::respond(StatusCode::CREATED, message, Some(data))
    }
}

impl ApiResponse<()> {
    pub fn ok_empty(message: impl Into<String>) -> HttpResponse {
        Self::respond(StatusCode::OK, message, None)
    }
}

/// Failure body. There is no `data` key; `stack` only appears when details are exposed.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ErrorEnvelope {
            success: false,
            status: status.as_u16(),
            message: message.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn into_response(self) -> HttpResponse {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        HttpResponse::build(status).json(self)
    }
}
