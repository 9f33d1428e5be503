use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::errors::AppError;

/// Single place where failed requests are logged, and where internal
/// error detail is attached to the envelope when `expose_details` is set.
#[derive(Clone, Copy)]
pub struct ErrorBoundary {
    expose_details: bool,
}

impl ErrorBoundary {
    pub fn new(expose_details: bool) -> Self {
        ErrorBoundary { expose_details }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ErrorBoundary
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorBoundaryService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ErrorBoundaryService {
            service: Rc::new(service),
            expose_details: self.expose_details,
        })
    }
}

pub struct ErrorBoundaryService<S> {
    service: Rc<S>,
    expose_details: bool,
}

impl<S, B> Service<ServiceRequest> for ErrorBoundaryService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let expose_details = self.expose_details;

        Box::pin(async move {
            let method = req.method().clone();
            let path = req.path().to_string();

            let res = match service.call(req).await {
                Ok(res) => res.map_into_boxed_body(),
                // Rendered by actix through `ResponseError`; only logged here
                Err(err) => {
                    tracing::error!(%method, %path, error = %err, "Unhandled error");
                    return Err(err);
                }
            };

            let Some(err) = res.response().error() else {
                return Ok(res);
            };

            let status = res.status();
            let app_error = err.as_error::<AppError>();
            let detail = app_error.and_then(AppError::detail);

            if status.is_server_error() {
                tracing::error!(
                    %method, %path, status = status.as_u16(),
                    error = %err, detail = detail.unwrap_or_default(),
                    "Request failed"
                );
            } else {
                tracing::warn!(%method, %path, status = status.as_u16(), error = %err, "Request rejected");
            }

            let exposed = match (expose_details, app_error, detail) {
                (true, Some(app_error), Some(detail)) => {
                    Some(app_error.envelope().with_stack(detail).into_response())
                }
                _ => None,
            };

            Ok(match exposed {
                Some(body) => res.into_response(body),
                None => res,
            })
        })
    }
}
