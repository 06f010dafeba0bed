//! Typed views of the YAML input documents.
//!
//! These mirror the file formats, not the database model: everything beyond
//! the natural keys is optional, and unknown keys are ignored so content
//! authors can carry extra metadata without breaking loads. Free-form
//! sub-documents (validation rules, lab tasks, test cases) deserialize
//! straight into `serde_json::Value`.

use serde::Deserialize;

/// Top-level shape of a `manifest.yml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestDoc {
    pub course: CourseDoc,
    #[serde(default)]
    pub modules: Vec<ModuleDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseDoc {
    pub slug: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub estimated_hours: Option<f64>,
    pub level: Option<String>,
    pub published: Option<bool>,
    pub sequence_order: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModuleDoc {
    pub slug: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub sequence_order: Option<i64>,
    pub estimated_minutes: Option<i64>,
    pub published: Option<bool>,
    pub learning_objectives: Option<Vec<String>>,
    /// Microlesson slugs, resolved against the course's `microlessons/`
    /// subdirectory.
    #[serde(default)]
    pub lessons: Vec<String>,
    /// Inline course-owned lessons.
    #[serde(default)]
    pub course_lessons: Vec<LessonDoc>,
    #[serde(default)]
    pub labs: Vec<LabDoc>,
    #[serde(default)]
    pub quizzes: Vec<QuizDoc>,
}

/// Shape of a standalone `microlessons/<slug>.yml` file.
#[derive(Debug, Clone, Deserialize)]
pub struct MicrolessonDoc {
    pub slug: String,
    pub title: Option<String>,
    /// `content_md` is preferred; `content` is the legacy spelling.
    pub content_md: Option<String>,
    pub content: Option<String>,
    pub sequence_order: Option<i64>,
    pub estimated_minutes: Option<i64>,
    pub difficulty: Option<String>,
    pub published: Option<bool>,
    pub key_concepts: Option<Vec<String>>,
    pub objectives: Option<Vec<String>>,
    pub prerequisite_ids: Option<Vec<String>>,
    #[serde(default)]
    pub exercises: Vec<ExerciseDoc>,
}

impl MicrolessonDoc {
    pub fn body(&self) -> String {
        self.content_md
            .clone()
            .or_else(|| self.content.clone())
            .unwrap_or_default()
    }
}

/// One typed exercise entry. Fields irrelevant to the declared `type` are
/// simply absent; the payload builder projects out what matters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExerciseDoc {
    #[serde(rename = "type")]
    pub exercise_type: Option<String>,
    pub sequence_order: Option<i64>,

    pub description: Option<String>,
    pub hints: Option<Vec<String>>,
    pub require_pass: Option<bool>,
    pub difficulty: Option<String>,

    pub command: Option<String>,
    pub timeout_sec: Option<i64>,
    pub validation: Option<serde_json::Value>,

    pub question: Option<String>,
    pub options: Option<Vec<String>>,
    pub correct_answer_index: Option<i64>,
    pub explanation: Option<String>,

    pub expected_answer: Option<String>,
    pub validation_type: Option<String>,

    pub prompt: Option<String>,
    pub slug: Option<String>,

    pub language: Option<String>,
    pub starter_code: Option<String>,
    pub solution_code: Option<String>,
    pub test_cases: Option<serde_json::Value>,

    pub schema: Option<String>,
    pub expected_result: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LessonDoc {
    pub title: String,
    pub content: Option<String>,
    pub reading_time_minutes: Option<i64>,
    pub video_url: Option<String>,
    pub sequence_order: Option<i64>,
    pub required: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabDoc {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub difficulty: Option<String>,
    pub lab_type: Option<String>,
    pub lab_format: Option<String>,
    pub estimated_minutes: Option<i64>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub success_criteria: Option<String>,
    /// `tasks` is preferred; `steps` is the legacy spelling.
    pub tasks: Option<serde_json::Value>,
    pub steps: Option<serde_json::Value>,
    pub max_attempts: Option<i64>,
    pub points_reward: Option<i64>,
    pub is_active: Option<bool>,
    pub category: Option<String>,
    pub programming_language: Option<String>,
    pub starter_code: Option<String>,
    pub solution_code: Option<String>,
    pub test_cases: Option<serde_json::Value>,
    pub sequence_order: Option<i64>,
    pub required: Option<bool>,
}

impl LabDoc {
    pub fn step_list(&self) -> Option<serde_json::Value> {
        self.tasks.clone().or_else(|| self.steps.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizDoc {
    pub title: String,
    pub passing_score: Option<i64>,
    pub quiz_type: Option<String>,
    pub time_limit_minutes: Option<i64>,
    pub max_attempts: Option<i64>,
    pub shuffle_questions: Option<bool>,
    pub show_correct_answers: Option<bool>,
    pub sequence_order: Option<i64>,
    pub required: Option<bool>,
    #[serde(default)]
    pub questions: Vec<QuestionDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionDoc {
    #[serde(rename = "type")]
    pub question_type: Option<String>,
    pub question: Option<String>,
    pub sequence_order: Option<i64>,
    pub points: Option<i64>,
    pub difficulty: Option<String>,
    pub explanation: Option<String>,
    pub options: Option<Vec<String>>,
    /// MCQ: index into `options`. True/false: a boolean.
    pub correct: Option<serde_yaml::Value>,
    pub expected_output: Option<String>,
}
