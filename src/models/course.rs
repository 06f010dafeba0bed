use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A published course: the top-level unit of the content tree.
///
/// Courses are looked up by slug, never by surrogate id, so re-running the
/// loader against edited YAML converges on the same row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    /// Globally unique natural key.
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub estimated_hours: Option<f64>,
    pub difficulty_level: DifficultyTier,
    pub published: bool,
    pub sequence_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The fixed difficulty vocabulary of the data model.
///
/// Free-text YAML levels (`easy`, `medium`, `hard`, ...) are folded into
/// this set by [`crate::loader::map_level`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// Attributes for upserting a course. Fields left `None` never overwrite
/// stored values, so several seed files can enrich one record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub estimated_hours: Option<f64>,
    pub difficulty_level: Option<DifficultyTier>,
    pub published: Option<bool>,
    pub sequence_order: Option<i64>,
}
