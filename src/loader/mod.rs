//! The course loader: discovers manifests on disk, validates them, and
//! idempotently upserts the content tree in dependency order (course before
//! module before microlesson before exercise).
//!
//! Failure isolation is the central design rule here: a bad manifest or
//! lesson file is recorded and the run continues with the next unit. The
//! only thing that skips a whole directory is the directory not existing,
//! and even that is just a warning.

mod docs;
mod mapping;
mod stats;

pub use docs::*;
pub use mapping::{build_exercise_payload, map_exercise_kind, map_level, map_question_type};
pub use stats::{FailureKind, LoadFailure, LoadStats};

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::db::Database;
use crate::models::*;
use crate::validator::{self, DocumentKind};

/// Toggles for one load pass.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Run the schema validator before parsing each file.
    pub validate: bool,
    /// Emit per-entity progress logs.
    pub verbose: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            validate: true,
            verbose: true,
        }
    }
}

/// Recursively collect `manifest.yml` paths under `dir`, sorted for a
/// deterministic load order. Unreadable subdirectories are logged and
/// skipped so one bad entry cannot hide the rest of the tree. Kept separate
/// from the loader so orchestration can be driven from an injected path
/// list in tests.
pub fn discover_manifests(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    fn walk(entries: std::fs::ReadDir, out: &mut Vec<PathBuf>) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                match std::fs::read_dir(&path) {
                    Ok(nested) => walk(nested, out),
                    Err(e) => warn!("Skipping unreadable directory {}: {e}", path.display()),
                }
            } else if path.file_name().is_some_and(|name| name == "manifest.yml") {
                out.push(path);
            }
        }
    }

    let mut found = Vec::new();
    walk(std::fs::read_dir(dir)?, &mut found);
    found.sort();
    Ok(found)
}

/// List the `microlessons/*.yml` files belonging to one course directory,
/// sorted. A course without a microlessons directory yields an empty list.
pub fn discover_lesson_files(course_dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(course_dir.join("microlessons")) else {
        return Vec::new();
    };

    let mut found: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "yml"))
        .collect();
    found.sort();
    found
}

/// Single-pass, single-threaded orchestrator over one or more base
/// directories of course content.
pub struct CourseLoader {
    db: Database,
    options: LoadOptions,
    stats: LoadStats,
}

impl CourseLoader {
    pub fn new(db: Database, options: LoadOptions) -> Self {
        Self {
            db,
            options,
            stats: LoadStats::default(),
        }
    }

    /// The conventional content locations, relative to the working
    /// directory of a deployment checkout.
    pub fn default_base_paths() -> Vec<PathBuf> {
        vec![
            PathBuf::from("content/courses"),
            PathBuf::from("content/networking"),
        ]
    }

    /// Load every course found under the given base directories and return
    /// the aggregated statistics. Never aborts early: per-file failures are
    /// recorded and the pass continues.
    pub fn load_all(mut self, base_paths: &[PathBuf]) -> LoadStats {
        for base_path in base_paths {
            self.load_directory(base_path);
        }
        self.stats
    }

    /// Drive the load from an explicit list of manifest paths.
    pub fn load_manifests(mut self, manifest_paths: &[PathBuf]) -> LoadStats {
        for path in manifest_paths {
            self.load_manifest(path);
        }
        self.stats
    }

    fn load_directory(&mut self, dir: &Path) {
        if !dir.is_dir() {
            warn!("Directory not found: {}", dir.display());
            self.stats
                .warnings
                .push(format!("Directory not found: {}", dir.display()));
            return;
        }

        let manifests = match discover_manifests(dir) {
            Ok(manifests) => manifests,
            Err(e) => {
                warn!("Could not scan {}: {e}", dir.display());
                self.stats
                    .warnings
                    .push(format!("Could not scan {}: {e}", dir.display()));
                return;
            }
        };

        if manifests.is_empty() {
            warn!("No manifest.yml files found in {}", dir.display());
            self.stats
                .warnings
                .push(format!("No manifest.yml files found in {}", dir.display()));
            return;
        }

        if self.options.verbose {
            info!("Found {} course(s) in {}", manifests.len(), dir.display());
        }

        for manifest_path in &manifests {
            self.load_manifest(manifest_path);
        }
    }

    fn load_manifest(&mut self, path: &Path) {
        let course_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        let course_name = course_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if self.options.verbose {
            info!("Loading course: {course_name}");
        }

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                self.record_failure(
                    &course_name,
                    path,
                    FailureKind::Parse,
                    vec![format!("Failed to read manifest: {e}")],
                );
                return;
            }
        };

        let doc: serde_yaml::Value = match serde_yaml::from_str(&text) {
            Ok(doc) => doc,
            Err(e) => {
                self.record_failure(
                    &course_name,
                    path,
                    FailureKind::Parse,
                    vec![format!("YAML syntax error: {e}")],
                );
                return;
            }
        };

        if self.options.validate {
            let outcome = validator::validate(&doc, DocumentKind::Manifest);
            for warning in &outcome.warnings {
                warn!("{course_name}: {warning}");
                self.stats.warnings.push(format!("{course_name}: {warning}"));
            }
            if !outcome.is_valid() {
                self.record_failure(&course_name, path, FailureKind::Schema, outcome.errors);
                return;
            }
        }

        let manifest: ManifestDoc = match serde_yaml::from_value(doc) {
            Ok(manifest) => manifest,
            Err(e) => {
                self.record_failure(
                    &course_name,
                    path,
                    FailureKind::Parse,
                    vec![format!("Manifest shape error: {e}")],
                );
                return;
            }
        };

        let course_input = CourseInput {
            title: manifest.course.title.clone(),
            description: manifest.course.description.clone(),
            estimated_hours: manifest.course.estimated_hours,
            // Map only when a level is declared, so reloading a manifest
            // that omits it cannot clobber a stored tier.
            difficulty_level: manifest
                .course
                .level
                .as_deref()
                .map(|level| map_level(Some(level))),
            published: manifest.course.published,
            sequence_order: manifest.course.sequence_order,
        };

        let course = match self.db.upsert_course(&manifest.course.slug, course_input) {
            Ok(up) => {
                if up.created {
                    self.stats.courses_created += 1;
                    if self.options.verbose {
                        info!("Course created: {}", up.entity.title);
                    }
                } else {
                    self.stats.courses_updated += 1;
                    if self.options.verbose {
                        info!("Course updated: {}", up.entity.title);
                    }
                }
                up.entity
            }
            Err(e) => {
                self.record_failure(
                    &course_name,
                    path,
                    FailureKind::Persistence,
                    vec![format!("Failed to save course: {e}")],
                );
                return;
            }
        };

        for (index, module_doc) in manifest.modules.iter().enumerate() {
            self.load_module(&course, module_doc, index as i64, &course_dir, path, &course_name);
        }
    }

    fn load_module(
        &mut self,
        course: &Course,
        doc: &ModuleDoc,
        index: i64,
        course_dir: &Path,
        manifest_path: &Path,
        course_name: &str,
    ) {
        let input = ModuleInput {
            title: doc.title.clone(),
            description: doc.description.clone(),
            // File order is the fallback; the link always gets an explicit
            // index either way.
            sequence_order: Some(doc.sequence_order.unwrap_or(index)),
            estimated_minutes: doc.estimated_minutes,
            published: doc.published,
            learning_objectives: doc.learning_objectives.clone(),
        };

        let module = match self.db.upsert_module(course.id, &doc.slug, input) {
            Ok(up) => {
                if up.created {
                    self.stats.modules_created += 1;
                    if self.options.verbose {
                        info!("Module created: {}", up.entity.title);
                    }
                } else {
                    self.stats.modules_updated += 1;
                    if self.options.verbose {
                        info!("Module updated: {}", up.entity.title);
                    }
                }
                up.entity
            }
            Err(e) => {
                self.record_failure(
                    course_name,
                    manifest_path,
                    FailureKind::Persistence,
                    vec![format!("Failed to save module '{}': {e}", doc.slug)],
                );
                return;
            }
        };

        self.load_microlessons(&module, &doc.lessons, course_dir, course_name);
        self.load_inline_lessons(&module, &doc.course_lessons, manifest_path, course_name);
        self.load_labs(&module, &doc.labs, manifest_path, course_name);
        self.load_quizzes(&module, &doc.quizzes, manifest_path, course_name);
    }

    fn load_microlessons(
        &mut self,
        module: &CourseModule,
        lesson_slugs: &[String],
        course_dir: &Path,
        course_name: &str,
    ) {
        if lesson_slugs.is_empty() {
            return;
        }

        let microlessons_dir = course_dir.join("microlessons");
        if !microlessons_dir.is_dir() {
            warn!("{course_name}: no microlessons directory found");
            self.stats
                .warnings
                .push(format!("{course_name}: no microlessons directory found"));
            return;
        }

        for (index, slug) in lesson_slugs.iter().enumerate() {
            let lesson_path = microlessons_dir.join(format!("{slug}.yml"));
            if !lesson_path.is_file() {
                // Degraded to a warning: the rest of the module still loads.
                warn!("{course_name}: lesson file not found: {slug}.yml");
                self.stats
                    .warnings
                    .push(format!("{course_name}: lesson file not found: {slug}.yml"));
                continue;
            }

            self.load_microlesson(module, &lesson_path, index as i64, course_name);
        }
    }

    fn load_microlesson(
        &mut self,
        module: &CourseModule,
        path: &Path,
        index: i64,
        course_name: &str,
    ) {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                self.record_failure(
                    course_name,
                    path,
                    FailureKind::Parse,
                    vec![format!("Failed to read lesson: {e}")],
                );
                return;
            }
        };

        let doc: serde_yaml::Value = match serde_yaml::from_str(&text) {
            Ok(doc) => doc,
            Err(e) => {
                self.record_failure(
                    course_name,
                    path,
                    FailureKind::Parse,
                    vec![format!("YAML syntax error: {e}")],
                );
                return;
            }
        };

        if self.options.validate {
            let outcome = validator::validate(&doc, DocumentKind::Microlesson);
            for warning in &outcome.warnings {
                warn!("{course_name}: {warning}");
                self.stats.warnings.push(format!("{course_name}: {warning}"));
            }
            if !outcome.is_valid() {
                self.record_failure(course_name, path, FailureKind::Schema, outcome.errors);
                return;
            }
        }

        let lesson: MicrolessonDoc = match serde_yaml::from_value(doc) {
            Ok(lesson) => lesson,
            Err(e) => {
                self.record_failure(
                    course_name,
                    path,
                    FailureKind::Parse,
                    vec![format!("Lesson shape error: {e}")],
                );
                return;
            }
        };

        let input = MicrolessonInput {
            title: lesson.title.clone(),
            content: Some(lesson.body()),
            sequence_order: Some(lesson.sequence_order.unwrap_or(index)),
            estimated_minutes: lesson.estimated_minutes,
            difficulty: lesson.difficulty.clone(),
            published: lesson.published,
            key_concepts: Some(lesson.key_concepts.clone().unwrap_or_default()),
            objectives: lesson.objectives.clone(),
            prerequisite_ids: Some(lesson.prerequisite_ids.clone().unwrap_or_default()),
        };

        let microlesson = match self.db.upsert_microlesson(module.id, &lesson.slug, input) {
            Ok(up) => {
                if up.created {
                    self.stats.microlessons_created += 1;
                    if self.options.verbose {
                        info!("Microlesson created: {}", up.entity.title);
                    }
                } else {
                    self.stats.microlessons_updated += 1;
                    if self.options.verbose {
                        info!("Microlesson updated: {}", up.entity.title);
                    }
                }
                up.entity
            }
            Err(e) => {
                self.record_failure(
                    course_name,
                    path,
                    FailureKind::Persistence,
                    vec![format!("Failed to save microlesson: {e}")],
                );
                return;
            }
        };

        let exercises: Vec<NewExercise> = lesson
            .exercises
            .iter()
            .enumerate()
            .map(|(i, doc)| NewExercise {
                kind: map_exercise_kind(doc.exercise_type.as_deref()),
                sequence_order: doc.sequence_order.unwrap_or(i as i64 + 1),
                payload: build_exercise_payload(doc),
            })
            .collect();

        match self.db.replace_exercises(microlesson.id, exercises) {
            Ok(inserted) => self.stats.exercises_created += inserted.len(),
            Err(e) => self.record_failure(
                course_name,
                path,
                FailureKind::Persistence,
                vec![format!("Failed to save exercises: {e}")],
            ),
        }
    }

    fn load_inline_lessons(
        &mut self,
        module: &CourseModule,
        lessons: &[LessonDoc],
        manifest_path: &Path,
        course_name: &str,
    ) {
        for (index, doc) in lessons.iter().enumerate() {
            let input = LessonInput {
                content: doc.content.clone(),
                reading_time_minutes: doc.reading_time_minutes,
                video_url: doc.video_url.clone(),
            };

            let lesson = match self.db.upsert_lesson(&doc.title, input) {
                Ok(up) => {
                    if up.created {
                        self.stats.lessons_created += 1;
                        if self.options.verbose {
                            info!("Lesson created: {}", up.entity.title);
                        }
                    } else {
                        self.stats.lessons_updated += 1;
                    }
                    up.entity
                }
                Err(e) => {
                    self.record_failure(
                        course_name,
                        manifest_path,
                        FailureKind::Persistence,
                        vec![format!("Failed to save lesson '{}': {e}", doc.title)],
                    );
                    continue;
                }
            };

            self.link_module_item(
                module,
                ItemKind::Lesson,
                lesson.id,
                doc.sequence_order.unwrap_or(index as i64 + 1),
                doc.required.unwrap_or(true),
                manifest_path,
                course_name,
            );
        }
    }

    fn load_labs(
        &mut self,
        module: &CourseModule,
        labs: &[LabDoc],
        manifest_path: &Path,
        course_name: &str,
    ) {
        for (index, doc) in labs.iter().enumerate() {
            let Some(slug) = doc.slug.as_deref() else {
                warn!("{course_name}: lab without a slug skipped");
                self.stats
                    .warnings
                    .push(format!("{course_name}: lab without a slug skipped"));
                continue;
            };

            let code_editor = matches!(
                doc.lab_format.as_deref(),
                Some("code_editor") | Some("hybrid")
            );

            let input = LabInput {
                title: doc.title.clone(),
                difficulty: doc.difficulty.clone(),
                lab_type: doc.lab_type.clone(),
                lab_format: doc.lab_format.clone(),
                estimated_minutes: doc.estimated_minutes,
                description: doc.description.clone(),
                instructions: doc.instructions.clone(),
                success_criteria: doc.success_criteria.clone(),
                steps: doc.step_list(),
                max_attempts: doc.max_attempts,
                points_reward: doc.points_reward,
                is_active: doc.is_active,
                category: doc.category.clone(),
                // Editor fields only apply to code_editor/hybrid formats.
                programming_language: code_editor
                    .then(|| doc.programming_language.clone())
                    .flatten(),
                starter_code: code_editor.then(|| doc.starter_code.clone()).flatten(),
                solution_code: code_editor.then(|| doc.solution_code.clone()).flatten(),
                test_cases: code_editor.then(|| doc.test_cases.clone()).flatten(),
            };

            let lab = match self.db.upsert_lab(slug, input) {
                Ok(up) => {
                    if up.created {
                        self.stats.labs_created += 1;
                        if self.options.verbose {
                            info!("Lab created: {}", up.entity.title);
                        }
                    } else {
                        self.stats.labs_updated += 1;
                    }
                    up.entity
                }
                Err(e) => {
                    self.record_failure(
                        course_name,
                        manifest_path,
                        FailureKind::Persistence,
                        vec![format!("Failed to save lab '{slug}': {e}")],
                    );
                    continue;
                }
            };

            self.link_module_item(
                module,
                ItemKind::Lab,
                lab.id,
                doc.sequence_order.unwrap_or(index as i64 + 1),
                doc.required.unwrap_or(true),
                manifest_path,
                course_name,
            );
        }
    }

    fn load_quizzes(
        &mut self,
        module: &CourseModule,
        quizzes: &[QuizDoc],
        manifest_path: &Path,
        course_name: &str,
    ) {
        for (index, doc) in quizzes.iter().enumerate() {
            let input = QuizInput {
                passing_score: doc.passing_score,
                quiz_type: doc.quiz_type.clone(),
                time_limit_minutes: doc.time_limit_minutes,
                max_attempts: doc.max_attempts,
                shuffle_questions: doc.shuffle_questions,
                show_correct_answers: doc.show_correct_answers,
            };

            let quiz = match self.db.upsert_quiz(module.id, &doc.title, input) {
                Ok(up) => {
                    if up.created {
                        self.stats.quizzes_created += 1;
                        if self.options.verbose {
                            info!("Quiz created: {}", up.entity.title);
                        }
                    } else {
                        self.stats.quizzes_updated += 1;
                    }
                    up.entity
                }
                Err(e) => {
                    self.record_failure(
                        course_name,
                        manifest_path,
                        FailureKind::Persistence,
                        vec![format!("Failed to save quiz '{}': {e}", doc.title)],
                    );
                    continue;
                }
            };

            let questions: Vec<NewQuizQuestion> = doc
                .questions
                .iter()
                .enumerate()
                .map(|(i, q)| build_question(q, i as i64))
                .collect();

            if let Err(e) = self.db.replace_quiz_questions(quiz.id, questions) {
                self.record_failure(
                    course_name,
                    manifest_path,
                    FailureKind::Persistence,
                    vec![format!("Failed to save quiz questions: {e}")],
                );
            }

            self.link_module_item(
                module,
                ItemKind::Quiz,
                quiz.id,
                doc.sequence_order.unwrap_or(index as i64 + 1),
                doc.required.unwrap_or(true),
                manifest_path,
                course_name,
            );
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn link_module_item(
        &mut self,
        module: &CourseModule,
        kind: ItemKind,
        item_id: uuid::Uuid,
        sequence_order: i64,
        required: bool,
        manifest_path: &Path,
        course_name: &str,
    ) {
        if let Err(e) =
            self.db
                .upsert_module_item(module.id, kind, item_id, sequence_order, required)
        {
            self.record_failure(
                course_name,
                manifest_path,
                FailureKind::Persistence,
                vec![format!("Failed to link {} to module: {e}", kind.as_str())],
            );
        }
    }

    fn record_failure(
        &mut self,
        course: &str,
        file: &Path,
        kind: FailureKind,
        messages: Vec<String>,
    ) {
        error!("{course} ({}): {kind}", file.display());
        for message in &messages {
            error!("  - {message}");
        }
        self.stats.failures.push(LoadFailure {
            course: course.to_string(),
            file: file.to_path_buf(),
            kind,
            messages,
        });
    }
}

fn build_question(doc: &QuestionDoc, index: i64) -> NewQuizQuestion {
    let question_type = map_question_type(doc.question_type.as_deref());

    let mut options = None;
    let mut correct_answer = None;
    let mut expected_output = None;

    match question_type {
        QuestionType::MultipleChoice => {
            options = doc.options.clone();
            correct_answer = doc
                .correct
                .as_ref()
                .and_then(serde_yaml::Value::as_i64)
                .and_then(|idx| {
                    doc.options
                        .as_ref()
                        .and_then(|opts| usize::try_from(idx).ok().and_then(|i| opts.get(i)))
                        .cloned()
                });
        }
        QuestionType::TrueFalse => {
            correct_answer = doc
                .correct
                .as_ref()
                .and_then(serde_yaml::Value::as_bool)
                .map(|b| b.to_string());
        }
        QuestionType::Command => {
            expected_output = doc.expected_output.clone();
        }
    }

    NewQuizQuestion {
        question_text: doc.question.clone().unwrap_or_default(),
        question_type,
        sequence_order: doc.sequence_order.unwrap_or(index + 1),
        points: doc.points.unwrap_or(1),
        difficulty_level: doc.difficulty.clone(),
        explanation: doc.explanation.clone(),
        options,
        correct_answer,
        expected_output,
    }
}
