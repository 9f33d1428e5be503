use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;
use sqlx::{self, PgPool, QueryBuilder};

use crate::{
    entities::{pagination::SortOrder, project::{Project, ProjectChanges}},
    errors::AppError,
    repositories::sqlx_repo::SqlxProjectRepo,
};

const PROJECT_COLUMNS: &str = "id, image, title, description, technologies, category, \
    project_link, code_link, created_at, updated_at";

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create_project(&self, project: &Project) -> Result<Project, AppError>;
    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError>;
    async fn list_projects(&self) -> Result<Vec<Project>, AppError>;
    async fn list_projects_page(&self, sort: SortOrder, offset: i64, limit: i64) -> Result<Vec<Project>, AppError>;
    async fn count_projects(&self) -> Result<i64, AppError>;
    async fn update_project(&self, id: &Uuid, changes: &ProjectChanges) -> Result<Project, AppError>;
    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError>;
}

#[async_trait]
impl<T> ProjectRepository for Arc<T>
where
    T: ProjectRepository + ?Sized,
{
    async fn create_project(&self, project: &Project) -> Result<Project, AppError> {
        (**self).create_project(project).await
    }

    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError> {
        (**self).get_project_by_id(id).await
    }

    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        (**self).list_projects().await
    }

    async fn list_projects_page(&self, sort: SortOrder, offset: i64, limit: i64) -> Result<Vec<Project>, AppError> {
        (**self).list_projects_page(sort, offset, limit).await
    }

    async fn count_projects(&self) -> Result<i64, AppError> {
        (**self).count_projects().await
    }

    async fn update_project(&self, id: &Uuid, changes: &ProjectChanges) -> Result<Project, AppError> {
        (**self).update_project(id, changes).await
    }

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        (**self).delete_project(id).await
    }
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn create_project(&self, project: &Project) -> Result<Project, AppError> {
        let created = sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects (
                id, image, title, description, technologies, category,
                project_link, code_link, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(project.id)
        .bind(&project.image)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.technologies)
        .bind(&project.category)
        .bind(&project.project_link)
        .bind(&project.code_link)
        .bind(project.created_at)
        .bind(project.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn list_projects_page(&self, sort: SortOrder, offset: i64, limit: i64) -> Result<Vec<Project>, AppError> {
        let mut builder = QueryBuilder::new(format!("SELECT {PROJECT_COLUMNS} FROM projects"));

        // Column and direction come from the closed SortField enum, never from raw input
        builder.push(format!(
            " ORDER BY {column} {dir}, id {dir}",
            column = sort.field.column(),
            dir = sort.direction()
        ));
        builder.push(" LIMIT ").push_bind(limit);
        builder.push(" OFFSET ").push_bind(offset);

        let query = builder.build_query_as::<Project>();
        let projects: Vec<Project> = query.fetch_all(&self.pool).await?;

        Ok(projects)
    }

    async fn count_projects(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn update_project(&self, id: &Uuid, changes: &ProjectChanges) -> Result<Project, AppError> {
        // COALESCE keeps columns the request left out, so concurrent updates to
        // different fields do not overwrite each other
        let updated = sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE projects SET
                image = COALESCE($1, image),
                title = COALESCE($2, title),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                technologies = COALESCE($5, technologies),
                category = COALESCE($6, category),
                project_link = COALESCE($7, project_link),
                code_link = COALESCE($8, code_link),
                updated_at = GREATEST($9, updated_at + INTERVAL '1 microsecond', created_at)
            WHERE id = $10
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(changes.image.as_deref())
        .bind(changes.title.as_deref())
        .bind(!changes.description.is_unchanged())
        .bind(changes.description.clone().into_option().flatten())
        .bind(changes.technologies.as_deref())
        .bind(changes.category.as_deref())
        .bind(changes.project_link.as_deref())
        .bind(changes.code_link.as_deref())
        .bind(changes.requested_at)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
