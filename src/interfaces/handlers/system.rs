use actix_web::{
    dev::{ServiceRequest, ServiceResponse},
    get, HttpRequest, HttpResponse, Responder,
};
use serde::Serialize;

use crate::{errors::AppError, utils::get_client_ip::get_client_ip};

#[derive(Serialize)]
struct MachineInfo {
    host: String,
    ip: String,
    os: &'static str,
}

#[derive(Serialize)]
struct HealthCheckResponse {
    health: &'static str,
    machine: MachineInfo,
}

/// Liveness check; answers 200 whenever the process can serve requests.
#[get("/health")]
pub async fn health_check(req: HttpRequest) -> impl Responder {
    let host = strip_port(req.connection_info().host()).to_string();

    HttpResponse::Ok().json(HealthCheckResponse {
        health: "OK",
        machine: MachineInfo {
            host,
            ip: get_client_ip(&req, false),
            os: std::env::consts::OS,
        },
    })
}

/// `example.com:3000` -> `example.com`, `[::1]:3000` -> `[::1]`
fn strip_port(host: &str) -> &str {
    let end = if host.starts_with('[') {
        host.find(']').map_or(host.len(), |i| i + 1)
    } else {
        host.find(':').unwrap_or(host.len())
    };
    &host[..end]
}

/// Fallback for paths no route or static file answers.
pub async fn not_found(req: ServiceRequest) -> Result<ServiceResponse, actix_web::Error> {
    let (req, _) = req.into_parts();
    Ok(ServiceResponse::from_err(AppError::NotFound, req))
}
