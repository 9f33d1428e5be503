use actix_web::{
    error::{JsonPayloadError, QueryPayloadError, UrlencodedError},
    web,
};

use crate::errors::AppError;

/// Body, form and query extraction failures are reported through the same envelope as handler errors.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::from(err).into()
    }));
    cfg.app_data(web::FormConfig::default().error_handler(|err, _req| {
        AppError::from(err).into()
    }));
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::from(err).into()
    }));
}

impl From<JsonPayloadError> for AppError {
    fn from(err: JsonPayloadError) -> Self {
        match err {
            JsonPayloadError::ContentType => {
                AppError::BadRequest("Content type must be application/json".to_string())
            }
            JsonPayloadError::Deserialize(e) => {
                AppError::BadRequest(format!("Invalid JSON payload: {}", e))
            }
            other => AppError::BadRequest(format!("JSON payload error: {}", other)),
        }
    }
}

impl From<UrlencodedError> for AppError {
    fn from(err: UrlencodedError) -> Self {
        AppError::BadRequest(format!("Invalid form payload: {}", err))
    }
}

impl From<QueryPayloadError> for AppError {
    fn from(err: QueryPayloadError) -> Self {
        AppError::BadRequest(format!("Invalid query string: {}", err))
    }
}
