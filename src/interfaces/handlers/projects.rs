use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::{
    entities::{
        pagination::PageRequest,
        project::{NewProjectRequest, UpdateProjectRequest},
    },
    errors::AppError,
    response::ApiResponse,
    use_cases::extractors::ProjectBody,
    AppState,
};

#[instrument(skip(state))]
pub async fn get_all_projects(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let projects = state.project_handler.list_projects().await?;

    Ok(ApiResponse::ok(projects, "Projects retrieved successfully"))
}

#[instrument(skip(state, query))]
pub async fn get_projects_paginated(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let page_request = PageRequest::from_query(&query)?;
    tracing::debug!(
        page = page_request.page,
        limit = page_request.limit,
        sort = %page_request.sort.field,
        descending = page_request.sort.descending,
        "Fetching projects page"
    );

    let page = state.project_handler
        .list_projects_paginated(page_request)
        .await?;

    Ok(ApiResponse::ok(page, "Paginated projects retrieved"))
}

#[instrument(skip(state))]
pub async fn get_project_by_id(
    project_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let project = state.project_handler.get_project(&project_id).await?;

    Ok(ApiResponse::ok(project, "Project retrieved successfully"))
}

#[instrument(skip(state, data))]
pub async fn create_project(
    state: web::Data<AppState>,
    data: ProjectBody<NewProjectRequest>,
) -> Result<HttpResponse, AppError> {
    let project = state.project_handler
        .create_project(data.into_inner())
        .await?;

    tracing::info!(project_id = %project.id, "Project created");
    Ok(ApiResponse::created(project, "Project created successfully"))
}

#[instrument(skip(state, data))]
pub async fn update_project(
    project_id: web::Path<String>,
    state: web::Data<AppState>,
    data: ProjectBody<UpdateProjectRequest>,
) -> Result<HttpResponse, AppError> {
    let project = state.project_handler
        .update_project(&project_id, data.into_inner())
        .await?;

    Ok(ApiResponse::ok(project, "Project updated successfully"))
}

#[instrument(skip(state))]
pub async fn delete_project(
    project_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    state.project_handler.delete_project(&project_id).await?;

    tracing::info!(project_id = %project_id.as_str(), "Project deleted");
    Ok(ApiResponse::ok_empty("Project deleted successfully"))
}
