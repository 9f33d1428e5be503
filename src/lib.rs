use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::NormalizePath,
    web, App,
};

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod graceful_shutdown;
pub mod logging;
pub mod response;
pub mod settings;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, middlewares, repositories, routes};
pub use infrastructure::{db, utils};

use middlewares::{access_log::AccessLog, error_boundary::ErrorBoundary};
use repositories::{project::ProjectRepository, sqlx_repo::SqlxProjectRepo};
use routes::{configure_routes, static_files};
use use_cases::projects::ProjectHandler;

pub type SharedProjectRepo = Arc<dyn ProjectRepository>;
pub type AppProjectHandler = ProjectHandler<SharedProjectRepo>;

/// Process-wide request state, built once in `main` and shared by every worker.
pub struct AppState {
    pub project_handler: AppProjectHandler,
}

impl AppState {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self::with_repository(Arc::new(SqlxProjectRepo::new(pool)))
    }

    pub fn with_repository(project_repo: SharedProjectRepo) -> Self {
        AppState {
            project_handler: ProjectHandler::new(project_repo),
        }
    }
}

/// The full application: middleware stack, API routes, static files and the 404 fallback.
/// `ErrorBoundary` sits innermost so the access log records the final status.
pub fn build_app(
    state: web::Data<AppState>,
    expose_details: bool,
    public_dir: String,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .wrap(ErrorBoundary::new(expose_details))
        .wrap(NormalizePath::trim())
        .wrap(AccessLog)
        .configure(configure_routes)
        .service(static_files(&public_dir))
}
