use chrono::Utc;
use validator::Validate;

use crate::{
    entities::{
        pagination::{PageRequest, PaginatedProjects},
        project::{NewProjectRequest, Project, UpdateProjectRequest},
    },
    errors::AppError,
    repositories::project::ProjectRepository,
    utils::valid_uuid::valid_uuid,
};

pub struct ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub project_repo: R,
}

impl<R> ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub fn new(project_repo: R) -> Self {
        ProjectHandler { project_repo }
    }

    /// Retrieves every project, newest first
    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        self.project_repo.list_projects().await
    }

    /// Retrieves one page of projects along with the page totals
    pub async fn list_projects_paginated(&self, request: PageRequest) -> Result<PaginatedProjects, AppError> {
        let projects = self.project_repo
            .list_projects_page(request.sort, request.offset(), i64::from(request.limit))
            .await?;
        let total = self.project_repo.count_projects().await?;

        Ok(PaginatedProjects {
            projects,
            current_page: request.page,
            total_pages: request.total_pages(total),
            total_projects: total,
        })
    }

    /// Retrieves a project by its ID
    pub async fn get_project(&self, id: &str) -> Result<Project, AppError> {
        let valid_id = valid_uuid(id)?;
        self.project_repo.get_project_by_id(&valid_id).await
    }

    /// Creates a project once every required field is present
    pub async fn create_project(&self, request: NewProjectRequest) -> Result<Project, AppError> {
        let missing = request.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::MissingFields(missing));
        }

        let project = request.into_project(Utc::now());
        project.validate()?;

        self.project_repo.create_project(&project).await
    }

    /// Applies the fields present in `request` to an existing project
    pub async fn update_project(
        &self,
        id: &str,
        request: UpdateProjectRequest,
    ) -> Result<Project, AppError> {
        let valid_id = valid_uuid(id)?;

        let mut project = self.project_repo.get_project_by_id(&valid_id).await?;

        // Validate the merged record, but only write the columns the body names
        let changes = request.into_changes(Utc::now())?;
        changes.apply_to(&mut project);
        project.validate()?;

        self.project_repo.update_project(&valid_id, &changes).await
    }

    /// Permanently removes a project
    pub async fn delete_project(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id)?;
        self.project_repo.delete_project(&valid_id).await
    }
}
