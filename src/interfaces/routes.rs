use actix_files::Files;
use actix_web::{dev::fn_service, guard, web};

use crate::handlers::system::{health_check, not_found};

mod json_error;
mod projects;

/// API routes plus the 404 envelope for anything no route claims.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check);
    cfg.configure(projects::config_routes);
    cfg.configure(json_error::config_routes);
    cfg.default_service(fn_service(not_found));
}

/// Static assets mounted at `/`; register after every API scope.
/// Only GET and HEAD are routed here, other methods fall through to the 404 envelope.
pub fn static_files(public_dir: &str) -> Files {
    Files::new("/", public_dir)
        .index_file("index.html")
        .guard(guard::Any(guard::Get()).or(guard::Head()))
        .default_handler(fn_service(not_found))
}
