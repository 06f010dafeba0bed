use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reading lesson declared inline in a manifest, owned by its module.
///
/// Legacy entity: the natural key is the title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub reading_time_minutes: Option<i64>,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attributes for upserting an inline lesson. `None` fields never overwrite
/// stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LessonInput {
    pub content: Option<String>,
    pub reading_time_minutes: Option<i64>,
    pub video_url: Option<String>,
}

/// A hands-on lab declared inline in a manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lab {
    pub id: Uuid,
    /// Globally unique natural key.
    pub slug: String,
    pub title: String,
    pub difficulty: Option<String>,
    pub lab_type: Option<String>,
    /// `terminal`, `code_editor` or `hybrid`.
    pub lab_format: Option<String>,
    pub estimated_minutes: Option<i64>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub success_criteria: Option<String>,
    /// Ordered task list (free-form maps from YAML).
    pub steps: serde_json::Value,
    pub max_attempts: i64,
    pub points_reward: i64,
    pub is_active: bool,
    pub category: Option<String>,
    // Populated only for code_editor / hybrid formats.
    pub programming_language: Option<String>,
    pub starter_code: Option<String>,
    pub solution_code: Option<String>,
    pub test_cases: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attributes for upserting a lab. `None` fields never overwrite stored
/// values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabInput {
    pub title: Option<String>,
    pub difficulty: Option<String>,
    pub lab_type: Option<String>,
    pub lab_format: Option<String>,
    pub estimated_minutes: Option<i64>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub success_criteria: Option<String>,
    pub steps: Option<serde_json::Value>,
    pub max_attempts: Option<i64>,
    pub points_reward: Option<i64>,
    pub is_active: Option<bool>,
    pub category: Option<String>,
    pub programming_language: Option<String>,
    pub starter_code: Option<String>,
    pub solution_code: Option<String>,
    pub test_cases: Option<serde_json::Value>,
}

/// A quiz declared inline in a manifest, keyed by (module, title) so
/// re-running the loader converges instead of stacking duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: Uuid,
    pub module_id: Uuid,
    pub title: String,
    pub passing_score: i64,
    pub quiz_type: Option<String>,
    pub time_limit_minutes: Option<i64>,
    pub max_attempts: Option<i64>,
    pub shuffle_questions: bool,
    pub show_correct_answers: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attributes for upserting a quiz. `None` fields never overwrite stored
/// values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizInput {
    pub passing_score: Option<i64>,
    pub quiz_type: Option<String>,
    pub time_limit_minutes: Option<i64>,
    pub max_attempts: Option<i64>,
    pub shuffle_questions: Option<bool>,
    pub show_correct_answers: Option<bool>,
}

/// A single question within a quiz. Questions are replaced wholesale on
/// quiz reload, like exercises under a microlesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub question_text: String,
    pub question_type: QuestionType,
    pub sequence_order: i64,
    pub points: i64,
    pub difficulty_level: Option<String>,
    pub explanation: Option<String>,
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<String>,
    pub expected_output: Option<String>,
}

/// The fixed question vocabulary; unrecognized YAML tags default to
/// `MultipleChoice`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    Command,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple_choice",
            Self::TrueFalse => "true_false",
            Self::Command => "command",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "multiple_choice" => Some(Self::MultipleChoice),
            "true_false" => Some(Self::TrueFalse),
            "command" => Some(Self::Command),
            _ => None,
        }
    }
}

/// Input for one question in a replace-all batch.
#[derive(Debug, Clone)]
pub struct NewQuizQuestion {
    pub question_text: String,
    pub question_type: QuestionType,
    pub sequence_order: i64,
    pub points: i64,
    pub difficulty_level: Option<String>,
    pub explanation: Option<String>,
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<String>,
    pub expected_output: Option<String>,
}

/// Join row linking a course-owned item to its module, carrying explicit
/// ordering. Upserts on (module, kind, item) so reordering content is just a
/// re-run with updated indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleItem {
    pub id: Uuid,
    pub module_id: Uuid,
    pub item_kind: ItemKind,
    pub item_id: Uuid,
    pub sequence_order: i64,
    pub required: bool,
}

/// Which table a [`ModuleItem`] points into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Lesson,
    Lab,
    Quiz,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lesson => "lesson",
            Self::Lab => "lab",
            Self::Quiz => "quiz",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "lesson" => Some(Self::Lesson),
            "lab" => Some(Self::Lab),
            "quiz" => Some(Self::Quiz),
            _ => None,
        }
    }
}
