use actix_web::{
    body::{BodySize, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error,
};
use chrono::{DateTime, Utc};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{logging::ACCESS_LOG_TARGET, utils::get_client_ip::get_client_ip};

/// Emits one Apache "combined" line per request on the access log target.
pub struct AccessLog;

impl<S, B> Transform<S, ServiceRequest> for AccessLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessLogService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AccessLogService {
            service: Rc::new(service),
        })
    }
}

pub struct AccessLogService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AccessLogService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        let mut entry = AccessLogEntry {
            remote_addr: get_client_ip(req.request(), false),
            timestamp: Utc::now(),
            request_line: format!("{} {} {:?}", req.method(), req.uri(), req.version()),
            status: 0,
            body_size: None,
            referrer: header_value(&req, header::REFERER),
            user_agent: header_value(&req, header::USER_AGENT),
        };

        Box::pin(async move {
            let res = service.call(req).await;

            match &res {
                Ok(res) => {
                    entry.status = res.status().as_u16();
                    entry.body_size = match res.response().body().size() {
                        BodySize::Sized(n) => Some(n),
                        _ => None,
                    };
                }
                Err(err) => {
                    entry.status = err.as_response_error().status_code().as_u16();
                }
            }

            tracing::info!(target: ACCESS_LOG_TARGET, "{}", entry.combined());
            res
        })
    }
}

fn header_value(req: &ServiceRequest, name: header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub timestamp: DateTime<Utc>,
    pub request_line: String,
    pub status: u16,
    pub body_size: Option<u64>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
}

impl AccessLogEntry {
    /// `:remote-addr - - [:date] ":request" :status :bytes ":referrer" ":user-agent"`
    pub fn combined(&self) -> String {
        format!(
            r#"{} - - [{}] "{}" {} {} "{}" "{}""#,
            self.remote_addr,
            self.timestamp.format("%d/%b/%Y:%H:%M:%S %z"),
            self.request_line,
            self.status,
            self.body_size.map_or_else(|| "-".to_string(), |n| n.to_string()),
            self.referrer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn renders_combined_format() {
        let entry = AccessLogEntry {
            remote_addr: "127.0.0.1".into(),
            timestamp: Utc.with_ymd_and_hms(2025, 3, 7, 14, 5, 9).unwrap(),
            request_line: "GET /projects/filter?page=2 HTTP/1.1".into(),
            status: 200,
            body_size: Some(512),
            referrer: None,
            user_agent: Some("curl/8.5.0".into()),
        };

        assert_eq!(
            entry.combined(),
            r#"127.0.0.1 - - [07/Mar/2025:14:05:09 +0000] "GET /projects/filter?page=2 HTTP/1.1" 200 512 "-" "curl/8.5.0""#
        );
    }

    #[test]
    fn unknown_size_renders_as_dash() {
        let entry = AccessLogEntry {
            remote_addr: "-".into(),
            timestamp: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            request_line: "DELETE /projects/abc HTTP/1.1".into(),
            status: 400,
            body_size: None,
            referrer: Some("https://example.com/".into()),
            user_agent: None,
        };

        let line = entry.combined();
        assert!(line.contains(r#"" 400 - "https://example.com/" "-""#));
    }
}
