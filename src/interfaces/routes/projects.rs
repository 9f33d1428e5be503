use actix_web::{dev::fn_service, web};

use crate::handlers::{projects, system::not_found};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/projects")
            .service(
                web::resource("")
                    .route(web::get().to(projects::get_all_projects))
                    .route(web::post().to(projects::create_project))
                    .default_service(fn_service(not_found))
            )
            // Literal segment goes ahead of `/{project_id}` so it is never captured as an id
            .service(
                web::resource("/filter")
                    .route(web::get().to(projects::get_projects_paginated))
                    .default_service(fn_service(not_found))
            )
            .service(
                web::resource("/{project_id}")
                    .route(web::get().to(projects::get_project_by_id))
                    .route(web::put().to(projects::update_project))
                    .route(web::delete().to(projects::delete_project))
                    .default_service(fn_service(not_found))
            )
            .default_service(fn_service(not_found))
    );
}
