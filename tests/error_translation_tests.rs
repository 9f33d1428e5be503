use std::sync::Arc;

use actix_web::{http::StatusCode, test};
use chrono::Utc;
use mockall::{mock, predicate::*};
use serde_json::Value;
use uuid::Uuid;

use projects_api::{
    entities::{pagination::{PageRequest, SortOrder}, project::{Project, ProjectChanges}},
    errors::{AppError, FieldError},
    repositories::project::ProjectRepository,
    use_cases::projects::ProjectHandler,
};

use test_utils::{sample_project, test_app};

// === Mock Trait for ProjectRepository ===
mock! {
    pub ProjectRepo {}

    #[async_trait::async_trait]
    impl ProjectRepository for ProjectRepo {
        async fn create_project(&self, project: &Project) -> Result<Project, AppError>;
        async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError>;
        async fn list_projects(&self) -> Result<Vec<Project>, AppError>;
        async fn list_projects_page(&self, sort: SortOrder, offset: i64, limit: i64) -> Result<Vec<Project>, AppError>;
        async fn count_projects(&self) -> Result<i64, AppError>;
        async fn update_project(&self, id: &Uuid, changes: &ProjectChanges) -> Result<Project, AppError>;
        async fn delete_project(&self, id: &Uuid) -> Result<(), AppError>;
    }
}

fn stored_project(id: Uuid) -> Project {
    let mut project = sample_project("stored").into_project(Utc::now());
    project.id = id;
    project
}

async fn call(repo: MockProjectRepo, expose_details: bool, req: test::TestRequest) -> (StatusCode, Value) {
    let app = test::init_service(test_app(Arc::new(repo), expose_details)).await;
    let resp = test::call_service(&app, req.to_request()).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

// === Use case ===

#[tokio::test]
async fn missing_fields_never_reach_the_repository() {
    let mut repo = MockProjectRepo::new();
    repo.expect_create_project().never();

    let handler = ProjectHandler::new(repo);

    let mut request = sample_project("atlas");
    request.image = None;
    request.category = Some(String::new());

    let err = handler.create_project(request).await.unwrap_err();
    match err {
        AppError::MissingFields(fields) => assert_eq!(fields, vec!["image", "category"]),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_id_is_rejected_before_lookup() {
    let mut repo = MockProjectRepo::new();
    repo.expect_get_project_by_id().never();
    repo.expect_delete_project().never();

    let handler = ProjectHandler::new(repo);

    assert!(matches!(
        handler.get_project("1234").await,
        Err(AppError::InvalidFormat(field)) if field == "id"
    ));
    assert!(matches!(
        handler.delete_project("").await,
        Err(AppError::InvalidFormat(_))
    ));
}

#[tokio::test]
async fn pagination_requests_the_computed_window() {
    let mut repo = MockProjectRepo::new();
    repo.expect_list_projects_page()
        .with(eq(SortOrder::default()), eq(20), eq(10))
        .times(1)
        .returning(|_, _, _| Ok(vec![]));
    repo.expect_count_projects().returning(|| Ok(21));

    let handler = ProjectHandler::new(repo);
    let request = PageRequest {
        page: 3,
        limit: 10,
        sort: SortOrder::default(),
    };

    let page = handler.list_projects_paginated(request).await.unwrap();
    assert_eq!(page.current_page, 3);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.total_projects, 21);
    assert!(page.projects.is_empty());
}

#[tokio::test]
async fn update_keeps_updated_at_after_created_at() {
    let id = Uuid::new_v4();
    let mut repo = MockProjectRepo::new();
    repo.expect_get_project_by_id()
        .with(eq(id))
        .returning(move |id| Ok(stored_project(*id)));
    repo.expect_update_project()
        .returning(move |_, changes| {
            let mut project = stored_project(id);
            changes.apply_to(&mut project);
            Ok(project)
        });

    let handler = ProjectHandler::new(repo);
    let request = serde_json::from_value(serde_json::json!({ "title": "  renamed " })).unwrap();

    let updated = handler.update_project(&id.to_string(), request).await.unwrap();
    assert_eq!(updated.title, "renamed");
    assert_eq!(updated.category, "web");
    assert!(updated.updated_at > updated.created_at);
}

#[tokio::test]
async fn update_writes_only_the_fields_in_the_body() {
    let id = Uuid::new_v4();
    let mut repo = MockProjectRepo::new();

    // The read returns a snapshot that another writer may already have changed
    repo.expect_get_project_by_id()
        .returning(move |id| Ok(stored_project(*id)));
    repo.expect_update_project()
        .withf(move |target, changes| {
            *target == id
                && changes.title.as_deref() == Some("renamed")
                && changes.category.is_none()
                && changes.image.is_none()
                && changes.technologies.is_none()
                && changes.project_link.is_none()
                && changes.code_link.is_none()
                && changes.description.is_unchanged()
        })
        .times(1)
        .returning(move |_, changes| {
            let mut project = stored_project(id);
            project.category = "concurrently-changed".into();
            changes.apply_to(&mut project);
            Ok(project)
        });

    let handler = ProjectHandler::new(repo);
    let request = serde_json::from_value(serde_json::json!({ "title": "renamed" })).unwrap();

    let updated = handler.update_project(&id.to_string(), request).await.unwrap();
    assert_eq!(updated.title, "renamed");
    assert_eq!(updated.category, "concurrently-changed");
}

#[tokio::test]
async fn invalid_update_never_reaches_the_write() {
    let id = Uuid::new_v4();
    let mut repo = MockProjectRepo::new();
    repo.expect_get_project_by_id()
        .returning(move |id| Ok(stored_project(*id)));
    repo.expect_update_project().never();

    let handler = ProjectHandler::new(repo);
    let request = serde_json::from_value(serde_json::json!({ "title": "   " })).unwrap();

    let err = handler.update_project(&id.to_string(), request).await.unwrap_err();
    assert_eq!(err.to_string(), "Validation Failed: title: Path `title` is required.");
}

// === HTTP translation ===

#[actix_web::test]
async fn duplicate_key_is_409() {
    let mut repo = MockProjectRepo::new();
    repo.expect_create_project().returning(|_| Err(AppError::Conflict));

    let (status, body) = call(
        repo,
        false,
        test::TestRequest::post().uri("/projects").set_json(sample_project("atlas")),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 409);
    assert_eq!(body["message"], "Duplicate key error");
}

#[actix_web::test]
async fn store_validation_failure_is_400_with_field_message() {
    let mut repo = MockProjectRepo::new();
    repo.expect_create_project().returning(|_| {
        Err(AppError::ValidationError(vec![FieldError {
            field: "codeLink".into(),
            message: "Path `codeLink` failed validation.".into(),
        }]))
    });

    let (status, body) = call(
        repo,
        false,
        test::TestRequest::post().uri("/projects").set_json(sample_project("atlas")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation Failed: codeLink: Path `codeLink` failed validation.");
}

#[actix_web::test]
async fn internal_error_exposes_stack_only_when_enabled() {
    let failing_repo = || {
        let mut repo = MockProjectRepo::new();
        repo.expect_list_projects()
            .returning(|| Err(AppError::InternalError("Database error: pool timed out".into())));
        repo
    };

    let (status, body) = call(failing_repo(), true, test::TestRequest::get().uri("/projects")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
    assert_eq!(body["stack"], "Database error: pool timed out");

    let (status, body) = call(failing_repo(), false, test::TestRequest::get().uri("/projects")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
    assert!(body.get("stack").is_none());
}

#[actix_web::test]
async fn client_errors_never_carry_a_stack() {
    let mut repo = MockProjectRepo::new();
    repo.expect_get_project_by_id().returning(|_| Err(AppError::NotFound));

    let uri = format!("/projects/{}", Uuid::new_v4());
    let (status, body) = call(repo, true, test::TestRequest::get().uri(&uri)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Resource not found");
    assert!(body.get("stack").is_none());
}

#[actix_web::test]
async fn count_failure_fails_the_whole_page() {
    let mut repo = MockProjectRepo::new();
    repo.expect_list_projects_page().returning(|_, _, _| Ok(vec![]));
    repo.expect_count_projects()
        .returning(|| Err(AppError::InternalError("Database error: connection reset".into())));

    let (status, body) = call(repo, false, test::TestRequest::get().uri("/projects/filter")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
}
