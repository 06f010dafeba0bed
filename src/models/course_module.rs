use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ordered section of a course.
///
/// The slug is unique per course, not globally, so unrelated courses can
/// both have a `basics` module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseModule {
    pub id: Uuid,
    pub course_id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub sequence_order: i64,
    pub estimated_minutes: Option<i64>,
    pub published: bool,
    pub learning_objectives: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attributes for upserting a module. `None` fields never overwrite stored
/// values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub sequence_order: Option<i64>,
    pub estimated_minutes: Option<i64>,
    pub published: Option<bool>,
    pub learning_objectives: Option<Vec<String>>,
}
