use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A standalone lesson unit loaded from its own YAML file.
///
/// The slug is globally unique even though microlessons are referenced from
/// module manifests: this is the deliberate cross-course sharing mechanism.
/// Two manifests that name the same slug share one row, and the most recent
/// load wins the `module_id` link. Content that must stay private to a
/// course belongs in a [`super::Lesson`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Microlesson {
    pub id: Uuid,
    /// Module that most recently loaded this slug.
    pub module_id: Uuid,
    /// Globally unique natural key.
    pub slug: String,
    pub title: String,
    /// Markdown body.
    pub content: String,
    pub sequence_order: i64,
    pub estimated_minutes: Option<i64>,
    pub difficulty: Option<String>,
    pub published: bool,
    pub key_concepts: Vec<String>,
    pub objectives: Vec<String>,
    pub prerequisite_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attributes for upserting a microlesson. `None` fields never overwrite
/// stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MicrolessonInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub sequence_order: Option<i64>,
    pub estimated_minutes: Option<i64>,
    pub difficulty: Option<String>,
    pub published: Option<bool>,
    pub key_concepts: Option<Vec<String>>,
    pub objectives: Option<Vec<String>>,
    pub prerequisite_ids: Option<Vec<String>>,
}

/// A single graded or practice activity under a microlesson.
///
/// Exercises have no natural key of their own: the whole set is deleted and
/// rebuilt from the current file whenever the parent microlesson reloads,
/// because exercise lists are declared completely in one place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Uuid,
    pub microlesson_id: Uuid,
    pub kind: ExerciseKind,
    pub sequence_order: i64,
    pub payload: ExercisePayload,
    pub created_at: DateTime<Utc>,
}

/// The closed set of exercise kinds the grading pipeline understands.
///
/// YAML tags outside this set degrade to `ShortAnswer` — including
/// `reflection`, `checkpoint` and `sql`, which keep their type-specific
/// payload fields but lose the distinct kind. That collapse matches the
/// behavior the existing content was authored against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    Terminal,
    Mcq,
    Code,
    ShortAnswer,
    Sandbox,
}

impl ExerciseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Terminal => "terminal",
            Self::Mcq => "mcq",
            Self::Code => "code",
            Self::ShortAnswer => "short_answer",
            Self::Sandbox => "sandbox",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "terminal" => Some(Self::Terminal),
            "mcq" => Some(Self::Mcq),
            "code" => Some(Self::Code),
            "short_answer" => Some(Self::ShortAnswer),
            "sandbox" => Some(Self::Sandbox),
            _ => None,
        }
    }
}

/// Type-specific exercise data, stored as one JSON column.
///
/// The projection is keyed on the *raw* YAML tag rather than the mapped
/// kind, so a `reflection` exercise keeps its prompt and slug even though
/// its kind degrades to `short_answer`. Fields irrelevant to the tag stay
/// `None` and are skipped on serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExercisePayload {
    // Shared base
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default)]
    pub require_pass: bool,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,

    // terminal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_sec: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<serde_json::Value>,

    // mcq / short_answer / coding / sql
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_type: Option<String>,

    // reflection / checkpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    // coding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starter_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_cases: Option<serde_json::Value>,

    // sql
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_result: Option<serde_json::Value>,
}

fn default_difficulty() -> String {
    "medium".to_string()
}

/// Input for one exercise in a replace-all batch.
#[derive(Debug, Clone)]
pub struct NewExercise {
    pub kind: ExerciseKind,
    pub sequence_order: i64,
    pub payload: ExercisePayload,
}
