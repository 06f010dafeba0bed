//! Structural validation of manifest and microlesson documents.
//!
//! Validation runs against the parsed YAML value before anything is written
//! to the database, so a file with missing required fields is never
//! partially persisted. The validator checks referential *shape* only; it
//! does not confirm that a referenced microlesson file exists on disk (the
//! loader degrades that to a per-lesson warning).

use std::path::Path;

use serde_yaml::Value;

const VALID_DIFFICULTIES: &[&str] = &[
    "easy",
    "medium",
    "hard",
    "beginner",
    "intermediate",
    "advanced",
];
const VALID_LEVELS: &[&str] = &["beginner", "intermediate", "advanced"];
const VALID_EXERCISE_TYPES: &[&str] = &[
    "terminal",
    "mcq",
    "short_answer",
    "reflection",
    "checkpoint",
    "coding",
    "sql",
];
const VALID_LAB_TYPES: &[&str] = &[
    "docker",
    "kubernetes",
    "docker-compose",
    "helm",
    "python",
    "golang",
    "javascript",
    "ruby",
    "postgresql",
    "networking",
    "linux",
    "security",
];
const VALID_LAB_FORMATS: &[&str] = &["terminal", "code_editor", "hybrid"];
const VALID_PROGRAMMING_LANGUAGES: &[&str] =
    &["python", "golang", "javascript", "ruby", "java", "sql"];
const VALID_QUIZ_TYPES: &[&str] = &[
    "standard",
    "review_session",
    "topic_deepdive",
    "mastery_challenge",
];

/// Which structural contract a document is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Manifest,
    Microlesson,
}

/// Errors block loading; warnings are soft issues that do not.
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Validate an already-parsed document against the contract for `kind`.
pub fn validate(doc: &Value, kind: DocumentKind) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();
    match kind {
        DocumentKind::Manifest => validate_manifest_structure(doc, &mut outcome),
        DocumentKind::Microlesson => validate_microlesson_structure(doc, &mut outcome),
    }
    outcome
}

/// Read, parse and validate a file. Read and parse failures surface as
/// errors in the outcome rather than panics or early returns; unparsable
/// YAML is its own error class, distinct from schema violations.
pub fn validate_file(path: &Path, kind: DocumentKind) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            outcome.error(format!("File not found or unreadable: {}: {e}", path.display()));
            return outcome;
        }
    };

    let doc: Value = match serde_yaml::from_str(&text) {
        Ok(doc) => doc,
        Err(e) => {
            outcome.error(format!("YAML syntax error: {e}"));
            return outcome;
        }
    };

    validate(&doc, kind)
}

// ============================================================
// Manifest
// ============================================================

fn validate_manifest_structure(doc: &Value, out: &mut ValidationOutcome) {
    let Some(root) = doc.as_mapping() else {
        out.error("Manifest must be a mapping");
        return;
    };

    match root.get("course") {
        Some(course) => validate_course_metadata(course, out),
        None => {
            out.error("Missing required 'course' section");
            return;
        }
    }

    let Some(modules) = root.get("modules") else {
        out.error("Missing required 'modules' section");
        return;
    };

    let Some(modules) = modules.as_sequence() else {
        out.error("'modules' must be an array");
        return;
    };

    if modules.is_empty() {
        out.warning("No modules defined in manifest");
    }

    for (idx, module) in modules.iter().enumerate() {
        validate_module(module, idx, out);
    }
}

fn validate_course_metadata(course: &Value, out: &mut ValidationOutcome) {
    for field in ["slug", "title"] {
        if !present(course, field) {
            out.error(format!("Course missing required field: {field}"));
        }
    }

    if let Some(slug) = str_field(course, "slug") {
        if !valid_slug(slug) {
            out.error(format!(
                "Invalid slug format: '{slug}' (use lowercase, hyphens only)"
            ));
        }
    }

    if let Some(level) = str_field(course, "level") {
        if !VALID_LEVELS.contains(&level) {
            out.error(format!(
                "Invalid level: '{level}'. Must be one of: {}",
                VALID_LEVELS.join(", ")
            ));
        }
    }

    if let Some(hours) = course.get("estimated_hours") {
        if !is_number(hours) {
            out.warning(format!("estimated_hours should be a number, got: {hours:?}"));
        }
    }
}

fn validate_module(module: &Value, index: usize, out: &mut ValidationOutcome) {
    if module.as_mapping().is_none() {
        out.error(format!("Module at index {index} must be a mapping"));
        return;
    }

    if !present(module, "slug") {
        out.error(format!("Module at index {index} missing required field: slug"));
    }
    if !present(module, "title") {
        out.error(format!("Module at index {index} missing required field: title"));
    }

    let module_slug = str_field(module, "slug").unwrap_or("?");
    if let Some(slug) = str_field(module, "slug") {
        if !valid_slug(slug) {
            out.error(format!("Invalid module slug format: '{slug}'"));
        }
    }

    match module.get("lessons") {
        Some(lessons) => match lessons.as_sequence() {
            Some(lessons) => {
                for lesson in lessons {
                    match lesson.as_str() {
                        Some(slug) if valid_slug(slug) => {}
                        _ => out.error(format!(
                            "Invalid lesson slug in module '{module_slug}': {lesson:?}"
                        )),
                    }
                }
            }
            None => out.error(format!("Module '{module_slug}' lessons must be an array")),
        },
        None => out.warning(format!("Module '{module_slug}' has no lessons defined")),
    }

    if let Some(lessons) = module.get("course_lessons") {
        match lessons.as_sequence() {
            Some(lessons) => {
                for (idx, lesson) in lessons.iter().enumerate() {
                    validate_course_lesson(lesson, idx, module_slug, out);
                }
            }
            None => out.error(format!(
                "Module '{module_slug}' course_lessons must be an array"
            )),
        }
    }

    if let Some(labs) = module.get("labs") {
        match labs.as_sequence() {
            Some(labs) => {
                for (idx, lab) in labs.iter().enumerate() {
                    validate_lab(lab, idx, module_slug, out);
                }
            }
            None => out.error(format!("Module '{module_slug}' labs must be an array")),
        }
    }

    if let Some(quizzes) = module.get("quizzes") {
        match quizzes.as_sequence() {
            Some(quizzes) => {
                for (idx, quiz) in quizzes.iter().enumerate() {
                    validate_quiz(quiz, idx, module_slug, out);
                }
            }
            None => out.error(format!("Module '{module_slug}' quizzes must be an array")),
        }
    }
}

fn validate_course_lesson(
    lesson: &Value,
    index: usize,
    module_slug: &str,
    out: &mut ValidationOutcome,
) {
    if lesson.as_mapping().is_none() {
        out.error(format!(
            "Course lesson at index {index} in module '{module_slug}' must be a mapping"
        ));
        return;
    }

    if !present(lesson, "title") {
        out.error(format!(
            "Course lesson at index {index} in module '{module_slug}' missing title"
        ));
    }
    if !present(lesson, "content") {
        out.warning(format!(
            "Course lesson at index {index} in module '{module_slug}' has no content"
        ));
    }

    if let Some(minutes) = lesson.get("reading_time_minutes") {
        if !is_number(minutes) {
            out.error("Course lesson reading_time_minutes must be a number");
        }
    }

    if let Some(url) = str_field(lesson, "video_url") {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            out.warning("Course lesson video_url should start with http:// or https://");
        }
    }
}

fn validate_lab(lab: &Value, index: usize, module_slug: &str, out: &mut ValidationOutcome) {
    if lab.as_mapping().is_none() {
        out.error(format!(
            "Lab at index {index} in module '{module_slug}' must be a mapping"
        ));
        return;
    }

    for field in [
        "slug",
        "title",
        "difficulty",
        "lab_type",
        "lab_format",
        "estimated_minutes",
    ] {
        if !present(lab, field) {
            out.error(format!(
                "Lab at index {index} in module '{module_slug}' missing required field: {field}"
            ));
        }
    }

    if let Some(difficulty) = str_field(lab, "difficulty") {
        if !VALID_DIFFICULTIES.contains(&difficulty) {
            out.error(format!(
                "Lab difficulty must be one of: {}",
                VALID_DIFFICULTIES.join(", ")
            ));
        }
    }

    if let Some(lab_type) = str_field(lab, "lab_type") {
        if !VALID_LAB_TYPES.contains(&lab_type) {
            out.error(format!(
                "Lab type must be one of: {}",
                VALID_LAB_TYPES.join(", ")
            ));
        }
    }

    let lab_format = str_field(lab, "lab_format");
    if let Some(format) = lab_format {
        if !VALID_LAB_FORMATS.contains(&format) {
            out.error(format!(
                "Lab format must be one of: {}",
                VALID_LAB_FORMATS.join(", ")
            ));
        }
    }

    if matches!(lab_format, Some("code_editor") | Some("hybrid")) {
        if !present(lab, "programming_language") {
            out.error(format!(
                "Lab at index {index} requires programming_language for code_editor format"
            ));
        }
        if !present(lab, "starter_code") {
            out.warning(format!("Lab at index {index} has no starter_code"));
        }
        if let Some(language) = str_field(lab, "programming_language") {
            if !VALID_PROGRAMMING_LANGUAGES.contains(&language) {
                out.error(format!(
                    "Programming language must be one of: {}",
                    VALID_PROGRAMMING_LANGUAGES.join(", ")
                ));
            }
        }
    }

    if let Some(tasks) = lab.get("tasks") {
        match tasks.as_sequence() {
            Some(tasks) => {
                for (task_idx, task) in tasks.iter().enumerate() {
                    validate_lab_task(task, task_idx, out);
                }
            }
            None => out.error("Lab tasks must be an array"),
        }
    }
}

fn validate_lab_task(task: &Value, index: usize, out: &mut ValidationOutcome) {
    if task.as_mapping().is_none() {
        out.error(format!("Lab task at index {index} must be a mapping"));
        return;
    }

    if !present(task, "instruction") {
        out.error(format!("Lab task at index {index} missing instruction"));
    }
    if !present(task, "validation") {
        out.warning(format!("Lab task at index {index} has no validation command"));
    }
}

fn validate_quiz(quiz: &Value, index: usize, module_slug: &str, out: &mut ValidationOutcome) {
    if quiz.as_mapping().is_none() {
        out.error(format!(
            "Quiz at index {index} in module '{module_slug}' must be a mapping"
        ));
        return;
    }

    if !present(quiz, "title") {
        out.error(format!(
            "Quiz at index {index} in module '{module_slug}' missing title"
        ));
    }

    match quiz.get("passing_score") {
        None => out.warning(format!(
            "Quiz at index {index} has no passing_score (will default to 70)"
        )),
        Some(score) => {
            if let Some(score) = score.as_i64() {
                if !(0..=100).contains(&score) {
                    out.error("Quiz passing_score must be between 0 and 100");
                }
            }
        }
    }

    if let Some(quiz_type) = str_field(quiz, "quiz_type") {
        if !VALID_QUIZ_TYPES.contains(&quiz_type) {
            out.error(format!(
                "Quiz type must be one of: {}",
                VALID_QUIZ_TYPES.join(", ")
            ));
        }
    }

    match quiz.get("questions") {
        None => out.error(format!("Quiz at index {index} has no questions")),
        Some(questions) => match questions.as_sequence() {
            None => out.error("Quiz questions must be an array"),
            Some(questions) if questions.is_empty() => {
                out.error("Quiz must have at least one question");
            }
            Some(questions) => {
                for (q_idx, question) in questions.iter().enumerate() {
                    validate_quiz_question(question, q_idx, out);
                }
            }
        },
    }
}

fn validate_quiz_question(question: &Value, index: usize, out: &mut ValidationOutcome) {
    if question.as_mapping().is_none() {
        out.error(format!("Quiz question at index {index} must be a mapping"));
        return;
    }

    if !present(question, "type") {
        out.error(format!("Quiz question at index {index} missing type"));
    }
    if !present(question, "question") {
        out.error(format!("Quiz question at index {index} missing question text"));
    }

    match str_field(question, "type") {
        Some("mcq") | Some("multiple_choice") => validate_mcq_quiz_question(question, index, out),
        Some("true_false") => {
            if question.get("correct").and_then(Value::as_bool).is_none() {
                out.error(format!(
                    "True/false question at index {index} correct answer must be true or false"
                ));
            }
        }
        Some("command") => {
            if !present(question, "expected_output") {
                out.warning(format!(
                    "Command question at index {index} has no expected_output for validation"
                ));
            }
        }
        _ => {}
    }
}

fn validate_mcq_quiz_question(question: &Value, index: usize, out: &mut ValidationOutcome) {
    let options = question.get("options").and_then(Value::as_sequence);
    match options {
        Some(options) if options.len() >= 2 => {}
        _ => out.error(format!(
            "MCQ question at index {index} must have at least 2 options"
        )),
    }

    match question.get("correct") {
        None => out.error(format!(
            "MCQ question at index {index} missing correct answer index"
        )),
        Some(correct) => match correct.as_i64() {
            None => out.error("MCQ correct answer must be a number (index)"),
            Some(correct) => {
                if let Some(options) = options {
                    let max_index = options.len() as i64 - 1;
                    if correct < 0 || correct > max_index {
                        out.error(format!(
                            "MCQ correct answer index out of range (0-{max_index})"
                        ));
                    }
                }
            }
        },
    }
}

// ============================================================
// Microlesson
// ============================================================

fn validate_microlesson_structure(doc: &Value, out: &mut ValidationOutcome) {
    if doc.as_mapping().is_none() {
        out.error("Microlesson must be a mapping");
        return;
    }

    for field in ["slug", "title"] {
        if !present(doc, field) {
            out.error(format!("Microlesson missing required field: {field}"));
        }
    }

    if let Some(slug) = str_field(doc, "slug") {
        if !valid_slug(slug) {
            out.error(format!("Invalid slug format: '{slug}'"));
        }
    }

    if let Some(difficulty) = str_field(doc, "difficulty") {
        if !VALID_DIFFICULTIES.contains(&difficulty) {
            out.error(format!(
                "Invalid difficulty: '{difficulty}'. Must be one of: {}",
                VALID_DIFFICULTIES.join(", ")
            ));
        }
    }

    if let Some(minutes) = doc.get("estimated_minutes") {
        let positive = minutes.as_i64().map(|m| m > 0).unwrap_or(false)
            || minutes.as_f64().map(|m| m > 0.0).unwrap_or(false);
        if !positive {
            out.error("estimated_minutes must be a positive number");
        }
    }

    if let Some(order) = doc.get("sequence_order") {
        if !is_number(order) {
            out.error("sequence_order must be a number");
        }
    }

    if !present(doc, "content_md") && !present(doc, "content") {
        out.warning("Microlesson has no content_md");
    }

    if let Some(exercises) = doc.get("exercises") {
        match exercises.as_sequence() {
            Some(exercises) => {
                for (idx, exercise) in exercises.iter().enumerate() {
                    validate_exercise(exercise, idx, out);
                }
            }
            None => out.error("exercises must be an array"),
        }
    }

    for field in ["objectives", "key_concepts", "prerequisites", "prerequisite_ids"] {
        if let Some(value) = doc.get(field) {
            if value.as_sequence().is_none() {
                out.error(format!("{field} must be an array"));
            }
        }
    }
}

fn validate_exercise(exercise: &Value, index: usize, out: &mut ValidationOutcome) {
    if exercise.as_mapping().is_none() {
        out.error(format!("Exercise at index {index} must be a mapping"));
        return;
    }

    let Some(exercise_type) = str_field(exercise, "type") else {
        out.error(format!("Exercise at index {index} missing required field: type"));
        return;
    };

    if !VALID_EXERCISE_TYPES.contains(&exercise_type) {
        out.error(format!(
            "Exercise at index {index} has invalid type: '{exercise_type}'. Must be one of: {}",
            VALID_EXERCISE_TYPES.join(", ")
        ));
    }

    match exercise_type {
        "terminal" => {
            if !present(exercise, "command") {
                out.error(format!(
                    "Terminal exercise at index {index} missing required field: command"
                ));
            }
            if let Some(timeout) = exercise.get("timeout_sec") {
                if !is_number(timeout) {
                    out.error(format!(
                        "Terminal exercise at index {index} timeout_sec must be a number"
                    ));
                }
            }
        }
        "mcq" => validate_mcq_exercise(exercise, index, out),
        "short_answer" | "coding" | "sql" => {
            if !present(exercise, "question") {
                out.error(format!(
                    "{} exercise at index {index} missing required field: question",
                    capitalize(exercise_type)
                ));
            }
            if exercise_type == "coding" && !present(exercise, "starter_code") {
                out.warning(format!("Coding exercise at index {index} has no starter_code"));
            }
        }
        "reflection" | "checkpoint" => {
            if !present(exercise, "prompt") {
                out.error(format!(
                    "{} exercise at index {index} missing required field: prompt",
                    capitalize(exercise_type)
                ));
            }
            if !present(exercise, "slug") {
                out.error(format!(
                    "{} exercise at index {index} missing required field: slug",
                    capitalize(exercise_type)
                ));
            }
        }
        _ => {}
    }

    if let Some(order) = exercise.get("sequence_order") {
        if !is_number(order) {
            out.error(format!("Exercise at index {index} sequence_order must be a number"));
        }
    }

    if let Some(require_pass) = exercise.get("require_pass") {
        if require_pass.as_bool().is_none() {
            out.warning(format!(
                "Exercise at index {index} require_pass should be boolean (true/false)"
            ));
        }
    }
}

fn validate_mcq_exercise(exercise: &Value, index: usize, out: &mut ValidationOutcome) {
    if !present(exercise, "question") {
        out.error(format!("MCQ exercise at index {index} missing required field: question"));
    }

    let options = exercise.get("options").and_then(Value::as_sequence);
    match options {
        None => out.error(format!(
            "MCQ exercise at index {index} missing or invalid field: options (must be array)"
        )),
        Some(options) if options.is_empty() => {
            out.error(format!("MCQ exercise at index {index} must have at least one option"));
        }
        Some(_) => {}
    }

    match exercise.get("correct_answer_index") {
        None => out.error(format!(
            "MCQ exercise at index {index} missing required field: correct_answer_index"
        )),
        Some(correct) => match correct.as_i64() {
            None => out.error(format!(
                "MCQ exercise at index {index} correct_answer_index must be a number"
            )),
            Some(correct) => {
                let max_index = options.map(|o| o.len() as i64 - 1).unwrap_or(-1);
                if correct < 0 || correct > max_index {
                    out.error(format!(
                        "MCQ exercise at index {index} correct_answer_index out of range (0-{max_index})"
                    ));
                }
            }
        },
    }
}

// ============================================================
// Helpers
// ============================================================

/// Present means the key exists with a non-blank scalar or non-null value.
fn present(value: &Value, key: &str) -> bool {
    match value.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn is_number(value: &Value) -> bool {
    value.as_i64().is_some() || value.as_f64().is_some()
}

/// Slugs are lowercase alphanumeric runs joined by single hyphens.
fn valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(yaml: &str) -> ValidationOutcome {
        let doc: Value = serde_yaml::from_str(yaml).unwrap();
        validate(&doc, DocumentKind::Manifest)
    }

    fn microlesson(yaml: &str) -> ValidationOutcome {
        let doc: Value = serde_yaml::from_str(yaml).unwrap();
        validate(&doc, DocumentKind::Microlesson)
    }

    #[test]
    fn manifest_missing_course_slug_is_an_error() {
        let outcome = manifest(
            "course:\n  title: Docker\nmodules:\n  - slug: basics\n    title: Basics\n    lessons: [intro]\n",
        );
        assert!(!outcome.is_valid());
        assert!(outcome.errors.iter().any(|e| e.contains("slug")));
    }

    #[test]
    fn manifest_with_required_fields_is_valid() {
        let outcome = manifest(
            "course:\n  slug: docker-101\n  title: Docker 101\nmodules:\n  - slug: basics\n    title: Basics\n    lessons: [intro]\n",
        );
        assert!(outcome.is_valid(), "errors: {:?}", outcome.errors);
    }

    #[test]
    fn bad_slug_format_is_an_error() {
        let outcome = manifest(
            "course:\n  slug: Docker_101\n  title: Docker\nmodules: []\n",
        );
        assert!(!outcome.is_valid());
    }

    #[test]
    fn empty_modules_is_a_warning_not_an_error() {
        let outcome = manifest(
            "course:\n  slug: docker-101\n  title: Docker\nmodules: []\n",
        );
        assert!(outcome.is_valid());
        assert!(!outcome.warnings.is_empty());
    }

    #[test]
    fn module_without_lessons_warns() {
        let outcome = manifest(
            "course:\n  slug: docker-101\n  title: Docker\nmodules:\n  - slug: basics\n    title: Basics\n",
        );
        assert!(outcome.is_valid());
        assert!(outcome.warnings.iter().any(|w| w.contains("no lessons")));
    }

    #[test]
    fn invalid_course_level_is_an_error() {
        let outcome = manifest(
            "course:\n  slug: docker-101\n  title: Docker\n  level: expert\nmodules: []\n",
        );
        assert!(!outcome.is_valid());
    }

    #[test]
    fn microlesson_requires_slug_and_title() {
        let outcome = microlesson("content_md: hello\n");
        assert_eq!(outcome.errors.len(), 2);
    }

    #[test]
    fn microlesson_without_content_warns() {
        let outcome = microlesson("slug: intro\ntitle: Intro\n");
        assert!(outcome.is_valid());
        assert!(outcome.warnings.iter().any(|w| w.contains("content_md")));
    }

    #[test]
    fn terminal_exercise_requires_command() {
        let outcome = microlesson(
            "slug: intro\ntitle: Intro\ncontent_md: x\nexercises:\n  - type: terminal\n",
        );
        assert!(!outcome.is_valid());
        assert!(outcome.errors.iter().any(|e| e.contains("command")));
    }

    #[test]
    fn mcq_exercise_index_out_of_range() {
        let outcome = microlesson(
            "slug: intro\ntitle: Intro\ncontent_md: x\nexercises:\n  - type: mcq\n    question: Q?\n    options: [a, b]\n    correct_answer_index: 5\n",
        );
        assert!(!outcome.is_valid());
        assert!(outcome.errors.iter().any(|e| e.contains("out of range")));
    }

    #[test]
    fn unknown_exercise_type_is_an_error() {
        let outcome = microlesson(
            "slug: intro\ntitle: Intro\ncontent_md: x\nexercises:\n  - type: essay\n    question: Q?\n",
        );
        assert!(!outcome.is_valid());
    }

    #[test]
    fn quiz_requires_questions() {
        let outcome = manifest(
            "course:\n  slug: c\n  title: C\nmodules:\n  - slug: m\n    title: M\n    lessons: [intro]\n    quizzes:\n      - title: Checkpoint\n        passing_score: 70\n",
        );
        assert!(!outcome.is_valid());
        assert!(outcome.errors.iter().any(|e| e.contains("questions")));
    }

    #[test]
    fn validate_file_reports_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.yml");
        std::fs::write(&path, "course: [unclosed").unwrap();

        let outcome = validate_file(&path, DocumentKind::Manifest);
        assert!(!outcome.is_valid());
        assert!(outcome.errors[0].contains("YAML syntax error"));
    }

    #[test]
    fn slug_helper_accepts_and_rejects() {
        assert!(valid_slug("docker-101"));
        assert!(valid_slug("intro"));
        assert!(!valid_slug("Intro"));
        assert!(!valid_slug("a--b"));
        assert!(!valid_slug("-leading"));
        assert!(!valid_slug(""));
    }
}
