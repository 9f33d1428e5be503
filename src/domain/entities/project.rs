use std::borrow::Cow;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::entities::option_fields::{OptionField, PatchString, PatchVec};

/// Body keys that must be present and non-empty when creating a project.
pub const REQUIRED_FIELDS: [&str; 7] = [
    "image",
    "title",
    "description",
    "technologies",
    "category",
    "projectLink",
    "codeLink",
];

// ───── Database Model ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,

    #[validate(length(min = 1, code = "required", message = "Path `image` is required."))]
    pub image: String,

    #[validate(length(min = 1, code = "required", message = "Path `title` is required."))]
    pub title: String,

    pub description: Option<String>,

    pub technologies: Vec<String>,

    #[validate(length(min = 1, code = "required", message = "Path `category` is required."))]
    pub category: String,

    #[validate(length(min = 1, code = "required", message = "Path `projectLink` is required."))]
    pub project_link: String,

    #[validate(length(min = 1, code = "required", message = "Path `codeLink` is required."))]
    pub code_link: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Moves `updated_at` strictly forward, never behind `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        let floor = self.updated_at + Duration::microseconds(1);
        self.updated_at = now.max(floor).max(self.created_at);
    }
}

// ───── Input Requests ───────────────────────────────────────────────

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProjectRequest {
    pub image: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "technologies")]
    pub technologies: Option<Vec<String>>,
    pub category: Option<String>,
    pub project_link: Option<String>,
    pub code_link: Option<String>,
}

impl NewProjectRequest {
    /// Required keys that are absent, `null` or `""`, in `REQUIRED_FIELDS` order.
    pub fn missing_fields(&self) -> Vec<String> {
        let text = |value: &Option<String>| value.as_deref().is_none_or(str::is_empty);

        REQUIRED_FIELDS
            .iter()
            .filter(|field| match **field {
                "image" => text(&self.image),
                "title" => text(&self.title),
                "description" => text(&self.description),
                "technologies" => self.technologies.is_none(),
                "category" => text(&self.category),
                "projectLink" => text(&self.project_link),
                "codeLink" => text(&self.code_link),
                _ => false,
            })
            .map(|field| field.to_string())
            .collect()
    }

    pub fn into_project(self, now: DateTime<Utc>) -> Project {
        let trimmed = |value: Option<String>| value.map(|s| s.trim().to_string()).unwrap_or_default();

        Project {
            id: Uuid::new_v4(),
            image: trimmed(self.image),
            title: trimmed(self.title),
            description: self.description.map(|s| s.trim().to_string()),
            technologies: self.technologies.unwrap_or_default(),
            category: trimmed(self.category),
            project_link: trimmed(self.project_link),
            code_link: trimmed(self.code_link),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub image: PatchString,
    pub title: PatchString,
    pub description: PatchString,
    #[serde(deserialize_with = "technologies_patch")]
    pub technologies: PatchVec<String>,
    pub category: PatchString,
    pub project_link: PatchString,
    pub code_link: PatchString,
}

impl UpdateProjectRequest {
    /// Normalizes the body into the set of column changes. Absent keys stay out of it;
    /// a `null` on a required field is reported instead of applied.
    pub fn into_changes(self, now: DateTime<Utc>) -> Result<ProjectChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let changes = ProjectChanges {
            image: required_change("image", self.image, &mut errors),
            title: required_change("title", self.title, &mut errors),
            description: self.description.map_value(|v| v.trim().to_string()),
            technologies: match self.technologies {
                OptionField::Unchanged => None,
                OptionField::SetToNull => {
                    errors.add("technologies", required_error("technologies"));
                    None
                }
                OptionField::SetToValue(v) => Some(v),
            },
            category: required_change("category", self.category, &mut errors),
            project_link: required_change("projectLink", self.project_link, &mut errors),
            code_link: required_change("codeLink", self.code_link, &mut errors),
            requested_at: now,
        };

        if errors.is_empty() {
            Ok(changes)
        } else {
            Err(errors)
        }
    }
}

/// Columns a PUT actually touches. `None` leaves the stored value alone.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectChanges {
    pub image: Option<String>,
    pub title: Option<String>,
    pub description: PatchString,
    pub technologies: Option<Vec<String>>,
    pub category: Option<String>,
    pub project_link: Option<String>,
    pub code_link: Option<String>,
    pub requested_at: DateTime<Utc>,
}

impl ProjectChanges {
    /// Writes the changed fields onto `project` and bumps `updated_at`.
    pub fn apply_to(&self, project: &mut Project) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }

        set(&mut project.image, &self.image);
        set(&mut project.title, &self.title);
        set(&mut project.technologies, &self.technologies);
        set(&mut project.category, &self.category);
        set(&mut project.project_link, &self.project_link);
        set(&mut project.code_link, &self.code_link);

        if !self.description.is_unchanged() {
            project.description = self.description.clone().into_option().flatten();
        }

        project.touch(self.requested_at);
    }
}

fn required_change(
    field: &'static str,
    value: PatchString,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match value.map_value(|v| v.trim().to_string()) {
        OptionField::Unchanged => None,
        OptionField::SetToNull => {
            errors.add(field, required_error(field));
            None
        }
        OptionField::SetToValue(v) => Some(v),
    }
}

/// A JSON array, or a single comma separated string as sent by HTML forms.
#[derive(Deserialize)]
#[serde(untagged)]
enum TechnologyList {
    Many(Vec<String>),
    One(String),
}

impl From<TechnologyList> for Vec<String> {
    fn from(list: TechnologyList) -> Self {
        match list {
            TechnologyList::Many(items) => items,
            TechnologyList::One(joined) => joined
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

fn technologies<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TechnologyList>::deserialize(deserializer)?.map(Vec::from))
}

fn technologies_patch<'de, D>(deserializer: D) -> Result<PatchVec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(technologies(deserializer)?.into())
}

fn required_error(field: &'static str) -> ValidationError {
    let mut err = ValidationError::new("required");
    err.message = Some(Cow::Owned(format!("Path `{}` is required.", field)));
    err
}
