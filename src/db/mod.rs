mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::models::*;

/// Handle to the content store.
///
/// Every write path is an upsert keyed on a natural key, so re-running the
/// loader against the same database is always safe. Lookups hold the
/// connection lock only for the duration of a single statement; the loader
/// is the sole writer by contract.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "syllabus")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("syllabus.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Course operations
    // ============================================================

    pub fn get_all_courses(&self) -> Result<Vec<Course>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {COURSE_COLS} FROM courses ORDER BY sequence_order, slug"
        ))?;

        let courses = stmt
            .query_map([], course_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(courses)
    }

    pub fn get_course_by_slug(&self, slug: &str) -> Result<Option<Course>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {COURSE_COLS} FROM courses WHERE slug = ?"
        ))?;

        let mut rows = stmt.query([slug])?;
        match rows.next()? {
            Some(row) => Ok(Some(course_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn upsert_course(&self, slug: &str, input: CourseInput) -> Result<Upserted<Course>> {
        if let Some(existing) = self.get_course_by_slug(slug)? {
            let now = Utc::now();
            let title = input.title.unwrap_or(existing.title);
            let description = input.description.or(existing.description);
            let estimated_hours = input.estimated_hours.or(existing.estimated_hours);
            let difficulty_level = input.difficulty_level.unwrap_or(existing.difficulty_level);
            let published = input.published.unwrap_or(existing.published);
            let sequence_order = input.sequence_order.unwrap_or(existing.sequence_order);

            let conn = self.conn.lock().expect("database lock poisoned");
            conn.execute(
                "UPDATE courses SET title = ?, description = ?, estimated_hours = ?,
                 difficulty_level = ?, published = ?, sequence_order = ?, updated_at = ?
                 WHERE id = ?",
                params![
                    &title,
                    &description,
                    estimated_hours,
                    difficulty_level.as_str(),
                    published as i32,
                    sequence_order,
                    now.to_rfc3339(),
                    existing.id.to_string(),
                ],
            )?;

            Ok(Upserted {
                entity: Course {
                    id: existing.id,
                    slug: existing.slug,
                    title,
                    description,
                    estimated_hours,
                    difficulty_level,
                    published,
                    sequence_order,
                    created_at: existing.created_at,
                    updated_at: now,
                },
                created: false,
            })
        } else {
            let conn = self.conn.lock().expect("database lock poisoned");
            let id = Uuid::new_v4();
            let now = Utc::now();
            let title = input.title.unwrap_or_default();
            let difficulty_level = input.difficulty_level.unwrap_or(DifficultyTier::Beginner);
            let published = input.published.unwrap_or(true);
            let sequence_order = input.sequence_order.unwrap_or(0);

            conn.execute(
                "INSERT INTO courses (id, slug, title, description, estimated_hours,
                 difficulty_level, published, sequence_order, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    id.to_string(),
                    slug,
                    &title,
                    &input.description,
                    input.estimated_hours,
                    difficulty_level.as_str(),
                    published as i32,
                    sequence_order,
                    now.to_rfc3339(),
                    now.to_rfc3339(),
                ],
            )?;

            Ok(Upserted {
                entity: Course {
                    id,
                    slug: slug.to_string(),
                    title,
                    description: input.description,
                    estimated_hours: input.estimated_hours,
                    difficulty_level,
                    published,
                    sequence_order,
                    created_at: now,
                    updated_at: now,
                },
                created: true,
            })
        }
    }

    // ============================================================
    // Module operations
    // ============================================================

    pub fn get_module_by_slug(&self, course_id: Uuid, slug: &str) -> Result<Option<CourseModule>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {MODULE_COLS} FROM course_modules WHERE course_id = ? AND slug = ?"
        ))?;

        let mut rows = stmt.query([course_id.to_string(), slug.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(module_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn get_modules_by_course(&self, course_id: Uuid) -> Result<Vec<CourseModule>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {MODULE_COLS} FROM course_modules WHERE course_id = ? ORDER BY sequence_order, slug"
        ))?;

        let modules = stmt
            .query_map([course_id.to_string()], module_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(modules)
    }

    pub fn upsert_module(
        &self,
        course_id: Uuid,
        slug: &str,
        input: ModuleInput,
    ) -> Result<Upserted<CourseModule>> {
        if let Some(existing) = self.get_module_by_slug(course_id, slug)? {
            let now = Utc::now();
            let title = input.title.unwrap_or(existing.title);
            let description = input.description.or(existing.description);
            let sequence_order = input.sequence_order.unwrap_or(existing.sequence_order);
            let estimated_minutes = input.estimated_minutes.or(existing.estimated_minutes);
            let published = input.published.unwrap_or(existing.published);
            let learning_objectives = input
                .learning_objectives
                .unwrap_or(existing.learning_objectives);

            let conn = self.conn.lock().expect("database lock poisoned");
            conn.execute(
                "UPDATE course_modules SET title = ?, description = ?, sequence_order = ?,
                 estimated_minutes = ?, published = ?, learning_objectives = ?, updated_at = ?
                 WHERE id = ?",
                params![
                    &title,
                    &description,
                    sequence_order,
                    estimated_minutes,
                    published as i32,
                    serde_json::to_string(&learning_objectives)?,
                    now.to_rfc3339(),
                    existing.id.to_string(),
                ],
            )?;

            Ok(Upserted {
                entity: CourseModule {
                    id: existing.id,
                    course_id,
                    slug: existing.slug,
                    title,
                    description,
                    sequence_order,
                    estimated_minutes,
                    published,
                    learning_objectives,
                    created_at: existing.created_at,
                    updated_at: now,
                },
                created: false,
            })
        } else {
            let conn = self.conn.lock().expect("database lock poisoned");
            let id = Uuid::new_v4();
            let now = Utc::now();
            let title = input.title.unwrap_or_default();
            let sequence_order = input.sequence_order.unwrap_or(0);
            let published = input.published.unwrap_or(true);
            let learning_objectives = input.learning_objectives.unwrap_or_default();

            conn.execute(
                "INSERT INTO course_modules (id, course_id, slug, title, description,
                 sequence_order, estimated_minutes, published, learning_objectives,
                 created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    id.to_string(),
                    course_id.to_string(),
                    slug,
                    &title,
                    &input.description,
                    sequence_order,
                    input.estimated_minutes,
                    published as i32,
                    serde_json::to_string(&learning_objectives)?,
                    now.to_rfc3339(),
                    now.to_rfc3339(),
                ],
            )?;

            Ok(Upserted {
                entity: CourseModule {
                    id,
                    course_id,
                    slug: slug.to_string(),
                    title,
                    description: input.description,
                    sequence_order,
                    estimated_minutes: input.estimated_minutes,
                    published,
                    learning_objectives,
                    created_at: now,
                    updated_at: now,
                },
                created: true,
            })
        }
    }

    // ============================================================
    // Microlesson operations
    // ============================================================

    /// Lookup is global: microlesson slugs are the cross-course sharing key.
    pub fn get_microlesson_by_slug(&self, slug: &str) -> Result<Option<Microlesson>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {MICROLESSON_COLS} FROM microlessons WHERE slug = ?"
        ))?;

        let mut rows = stmt.query([slug])?;
        match rows.next()? {
            Some(row) => Ok(Some(microlesson_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn upsert_microlesson(
        &self,
        module_id: Uuid,
        slug: &str,
        input: MicrolessonInput,
    ) -> Result<Upserted<Microlesson>> {
        if let Some(existing) = self.get_microlesson_by_slug(slug)? {
            let now = Utc::now();
            let title = input.title.unwrap_or(existing.title);
            let content = input.content.unwrap_or(existing.content);
            let sequence_order = input.sequence_order.unwrap_or(existing.sequence_order);
            let estimated_minutes = input.estimated_minutes.or(existing.estimated_minutes);
            let difficulty = input.difficulty.or(existing.difficulty);
            let published = input.published.unwrap_or(existing.published);
            let key_concepts = input.key_concepts.unwrap_or(existing.key_concepts);
            let objectives = input.objectives.unwrap_or(existing.objectives);
            let prerequisite_ids = input.prerequisite_ids.unwrap_or(existing.prerequisite_ids);

            let conn = self.conn.lock().expect("database lock poisoned");
            conn.execute(
                "UPDATE microlessons SET module_id = ?, title = ?, content = ?,
                 sequence_order = ?, estimated_minutes = ?, difficulty = ?, published = ?,
                 key_concepts = ?, objectives = ?, prerequisite_ids = ?, updated_at = ?
                 WHERE id = ?",
                params![
                    module_id.to_string(),
                    &title,
                    &content,
                    sequence_order,
                    estimated_minutes,
                    &difficulty,
                    published as i32,
                    serde_json::to_string(&key_concepts)?,
                    serde_json::to_string(&objectives)?,
                    serde_json::to_string(&prerequisite_ids)?,
                    now.to_rfc3339(),
                    existing.id.to_string(),
                ],
            )?;

            Ok(Upserted {
                entity: Microlesson {
                    id: existing.id,
                    module_id,
                    slug: existing.slug,
                    title,
                    content,
                    sequence_order,
                    estimated_minutes,
                    difficulty,
                    published,
                    key_concepts,
                    objectives,
                    prerequisite_ids,
                    created_at: existing.created_at,
                    updated_at: now,
                },
                created: false,
            })
        } else {
            let conn = self.conn.lock().expect("database lock poisoned");
            let id = Uuid::new_v4();
            let now = Utc::now();
            let title = input.title.unwrap_or_default();
            let content = input.content.unwrap_or_default();
            let sequence_order = input.sequence_order.unwrap_or(0);
            let published = input.published.unwrap_or(true);
            let key_concepts = input.key_concepts.unwrap_or_default();
            let objectives = input.objectives.unwrap_or_default();
            let prerequisite_ids = input.prerequisite_ids.unwrap_or_default();

            conn.execute(
                "INSERT INTO microlessons (id, module_id, slug, title, content,
                 sequence_order, estimated_minutes, difficulty, published, key_concepts,
                 objectives, prerequisite_ids, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    id.to_string(),
                    module_id.to_string(),
                    slug,
                    &title,
                    &content,
                    sequence_order,
                    input.estimated_minutes,
                    &input.difficulty,
                    published as i32,
                    serde_json::to_string(&key_concepts)?,
                    serde_json::to_string(&objectives)?,
                    serde_json::to_string(&prerequisite_ids)?,
                    now.to_rfc3339(),
                    now.to_rfc3339(),
                ],
            )?;

            Ok(Upserted {
                entity: Microlesson {
                    id,
                    module_id,
                    slug: slug.to_string(),
                    title,
                    content,
                    sequence_order,
                    estimated_minutes: input.estimated_minutes,
                    difficulty: input.difficulty,
                    published,
                    key_concepts,
                    objectives,
                    prerequisite_ids,
                    created_at: now,
                    updated_at: now,
                },
                created: true,
            })
        }
    }

    // ============================================================
    // Exercise operations
    // ============================================================

    pub fn get_exercises(&self, microlesson_id: Uuid) -> Result<Vec<Exercise>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, microlesson_id, exercise_type, sequence_order, payload, created_at
             FROM exercises WHERE microlesson_id = ? ORDER BY sequence_order",
        )?;

        let exercises = stmt
            .query_map([microlesson_id.to_string()], exercise_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(exercises)
    }

    /// Delete and rebuild the exercise set for one microlesson.
    ///
    /// Exercises are the one exception to merge semantics: the stored set
    /// must always match the current source file exactly.
    pub fn replace_exercises(
        &self,
        microlesson_id: Uuid,
        exercises: Vec<NewExercise>,
    ) -> Result<Vec<Exercise>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "DELETE FROM exercises WHERE microlesson_id = ?",
            [microlesson_id.to_string()],
        )?;

        let now = Utc::now();
        let mut inserted = Vec::with_capacity(exercises.len());
        for exercise in exercises {
            let id = Uuid::new_v4();
            conn.execute(
                "INSERT INTO exercises (id, microlesson_id, exercise_type, sequence_order, payload, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    id.to_string(),
                    microlesson_id.to_string(),
                    exercise.kind.as_str(),
                    exercise.sequence_order,
                    serde_json::to_string(&exercise.payload)?,
                    now.to_rfc3339(),
                ],
            )?;

            inserted.push(Exercise {
                id,
                microlesson_id,
                kind: exercise.kind,
                sequence_order: exercise.sequence_order,
                payload: exercise.payload,
                created_at: now,
            });
        }

        Ok(inserted)
    }

    // ============================================================
    // Lesson operations (course-owned, keyed by title)
    // ============================================================

    pub fn get_lesson_by_title(&self, title: &str) -> Result<Option<Lesson>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, title, content, reading_time_minutes, video_url, created_at, updated_at
             FROM lessons WHERE title = ?",
        )?;

        let mut rows = stmt.query([title])?;
        match rows.next()? {
            Some(row) => Ok(Some(lesson_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn upsert_lesson(&self, title: &str, input: LessonInput) -> Result<Upserted<Lesson>> {
        if let Some(existing) = self.get_lesson_by_title(title)? {
            let now = Utc::now();
            let content = input.content.or(existing.content);
            let reading_time_minutes = input
                .reading_time_minutes
                .or(existing.reading_time_minutes);
            let video_url = input.video_url.or(existing.video_url);

            let conn = self.conn.lock().expect("database lock poisoned");
            conn.execute(
                "UPDATE lessons SET content = ?, reading_time_minutes = ?, video_url = ?, updated_at = ?
                 WHERE id = ?",
                params![
                    &content,
                    reading_time_minutes,
                    &video_url,
                    now.to_rfc3339(),
                    existing.id.to_string(),
                ],
            )?;

            Ok(Upserted {
                entity: Lesson {
                    id: existing.id,
                    title: existing.title,
                    content,
                    reading_time_minutes,
                    video_url,
                    created_at: existing.created_at,
                    updated_at: now,
                },
                created: false,
            })
        } else {
            let conn = self.conn.lock().expect("database lock poisoned");
            let id = Uuid::new_v4();
            let now = Utc::now();

            conn.execute(
                "INSERT INTO lessons (id, title, content, reading_time_minutes, video_url, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                params![
                    id.to_string(),
                    title,
                    &input.content,
                    input.reading_time_minutes,
                    &input.video_url,
                    now.to_rfc3339(),
                    now.to_rfc3339(),
                ],
            )?;

            Ok(Upserted {
                entity: Lesson {
                    id,
                    title: title.to_string(),
                    content: input.content,
                    reading_time_minutes: input.reading_time_minutes,
                    video_url: input.video_url,
                    created_at: now,
                    updated_at: now,
                },
                created: true,
            })
        }
    }

    // ============================================================
    // Lab operations
    // ============================================================

    pub fn get_lab_by_slug(&self, slug: &str) -> Result<Option<Lab>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!("SELECT {LAB_COLS} FROM labs WHERE slug = ?"))?;

        let mut rows = stmt.query([slug])?;
        match rows.next()? {
            Some(row) => Ok(Some(lab_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn upsert_lab(&self, slug: &str, input: LabInput) -> Result<Upserted<Lab>> {
        if let Some(existing) = self.get_lab_by_slug(slug)? {
            let now = Utc::now();
            let title = input.title.unwrap_or(existing.title);
            let difficulty = input.difficulty.or(existing.difficulty);
            let lab_type = input.lab_type.or(existing.lab_type);
            let lab_format = input.lab_format.or(existing.lab_format);
            let estimated_minutes = input.estimated_minutes.or(existing.estimated_minutes);
            let description = input.description.or(existing.description);
            let instructions = input.instructions.or(existing.instructions);
            let success_criteria = input.success_criteria.or(existing.success_criteria);
            let steps = input.steps.unwrap_or(existing.steps);
            let max_attempts = input.max_attempts.unwrap_or(existing.max_attempts);
            let points_reward = input.points_reward.unwrap_or(existing.points_reward);
            let is_active = input.is_active.unwrap_or(existing.is_active);
            let category = input.category.or(existing.category);
            let programming_language = input
                .programming_language
                .or(existing.programming_language);
            let starter_code = input.starter_code.or(existing.starter_code);
            let solution_code = input.solution_code.or(existing.solution_code);
            let test_cases = input.test_cases.or(existing.test_cases);

            let conn = self.conn.lock().expect("database lock poisoned");
            conn.execute(
                "UPDATE labs SET title = ?, difficulty = ?, lab_type = ?, lab_format = ?,
                 estimated_minutes = ?, description = ?, instructions = ?, success_criteria = ?,
                 steps = ?, max_attempts = ?, points_reward = ?, is_active = ?, category = ?,
                 programming_language = ?, starter_code = ?, solution_code = ?, test_cases = ?,
                 updated_at = ?
                 WHERE id = ?",
                params![
                    &title,
                    &difficulty,
                    &lab_type,
                    &lab_format,
                    estimated_minutes,
                    &description,
                    &instructions,
                    &success_criteria,
                    serde_json::to_string(&steps)?,
                    max_attempts,
                    points_reward,
                    is_active as i32,
                    &category,
                    &programming_language,
                    &starter_code,
                    &solution_code,
                    test_cases.as_ref().map(serde_json::to_string).transpose()?,
                    now.to_rfc3339(),
                    existing.id.to_string(),
                ],
            )?;

            Ok(Upserted {
                entity: Lab {
                    id: existing.id,
                    slug: existing.slug,
                    title,
                    difficulty,
                    lab_type,
                    lab_format,
                    estimated_minutes,
                    description,
                    instructions,
                    success_criteria,
                    steps,
                    max_attempts,
                    points_reward,
                    is_active,
                    category,
                    programming_language,
                    starter_code,
                    solution_code,
                    test_cases,
                    created_at: existing.created_at,
                    updated_at: now,
                },
                created: false,
            })
        } else {
            let conn = self.conn.lock().expect("database lock poisoned");
            let id = Uuid::new_v4();
            let now = Utc::now();
            let title = input.title.unwrap_or_default();
            let steps = input.steps.unwrap_or(serde_json::Value::Array(vec![]));
            let max_attempts = input.max_attempts.unwrap_or(3);
            let points_reward = input.points_reward.unwrap_or(10);
            let is_active = input.is_active.unwrap_or(true);

            conn.execute(
                "INSERT INTO labs (id, slug, title, difficulty, lab_type, lab_format,
                 estimated_minutes, description, instructions, success_criteria, steps,
                 max_attempts, points_reward, is_active, category, programming_language,
                 starter_code, solution_code, test_cases, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    id.to_string(),
                    slug,
                    &title,
                    &input.difficulty,
                    &input.lab_type,
                    &input.lab_format,
                    input.estimated_minutes,
                    &input.description,
                    &input.instructions,
                    &input.success_criteria,
                    serde_json::to_string(&steps)?,
                    max_attempts,
                    points_reward,
                    is_active as i32,
                    &input.category,
                    &input.programming_language,
                    &input.starter_code,
                    &input.solution_code,
                    input
                        .test_cases
                        .as_ref()
                        .map(serde_json::to_string)
                        .transpose()?,
                    now.to_rfc3339(),
                    now.to_rfc3339(),
                ],
            )?;

            Ok(Upserted {
                entity: Lab {
                    id,
                    slug: slug.to_string(),
                    title,
                    difficulty: input.difficulty,
                    lab_type: input.lab_type,
                    lab_format: input.lab_format,
                    estimated_minutes: input.estimated_minutes,
                    description: input.description,
                    instructions: input.instructions,
                    success_criteria: input.success_criteria,
                    steps,
                    max_attempts,
                    points_reward,
                    is_active,
                    category: input.category,
                    programming_language: input.programming_language,
                    starter_code: input.starter_code,
                    solution_code: input.solution_code,
                    test_cases: input.test_cases,
                    created_at: now,
                    updated_at: now,
                },
                created: true,
            })
        }
    }

    // ============================================================
    // Quiz operations (keyed by module + title)
    // ============================================================

    pub fn get_quiz(&self, module_id: Uuid, title: &str) -> Result<Option<Quiz>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {QUIZ_COLS} FROM quizzes WHERE module_id = ? AND title = ?"
        ))?;

        let mut rows = stmt.query([module_id.to_string(), title.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(quiz_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn upsert_quiz(
        &self,
        module_id: Uuid,
        title: &str,
        input: QuizInput,
    ) -> Result<Upserted<Quiz>> {
        if let Some(existing) = self.get_quiz(module_id, title)? {
            let now = Utc::now();
            let passing_score = input.passing_score.unwrap_or(existing.passing_score);
            let quiz_type = input.quiz_type.or(existing.quiz_type);
            let time_limit_minutes = input.time_limit_minutes.or(existing.time_limit_minutes);
            let max_attempts = input.max_attempts.or(existing.max_attempts);
            let shuffle_questions = input
                .shuffle_questions
                .unwrap_or(existing.shuffle_questions);
            let show_correct_answers = input
                .show_correct_answers
                .unwrap_or(existing.show_correct_answers);

            let conn = self.conn.lock().expect("database lock poisoned");
            conn.execute(
                "UPDATE quizzes SET passing_score = ?, quiz_type = ?, time_limit_minutes = ?,
                 max_attempts = ?, shuffle_questions = ?, show_correct_answers = ?, updated_at = ?
                 WHERE id = ?",
                params![
                    passing_score,
                    &quiz_type,
                    time_limit_minutes,
                    max_attempts,
                    shuffle_questions as i32,
                    show_correct_answers as i32,
                    now.to_rfc3339(),
                    existing.id.to_string(),
                ],
            )?;

            Ok(Upserted {
                entity: Quiz {
                    id: existing.id,
                    module_id,
                    title: existing.title,
                    passing_score,
                    quiz_type,
                    time_limit_minutes,
                    max_attempts,
                    shuffle_questions,
                    show_correct_answers,
                    created_at: existing.created_at,
                    updated_at: now,
                },
                created: false,
            })
        } else {
            let conn = self.conn.lock().expect("database lock poisoned");
            let id = Uuid::new_v4();
            let now = Utc::now();
            let passing_score = input.passing_score.unwrap_or(70);
            let shuffle_questions = input.shuffle_questions.unwrap_or(false);
            let show_correct_answers = input.show_correct_answers.unwrap_or(true);

            conn.execute(
                "INSERT INTO quizzes (id, module_id, title, passing_score, quiz_type,
                 time_limit_minutes, max_attempts, shuffle_questions, show_correct_answers,
                 created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    id.to_string(),
                    module_id.to_string(),
                    title,
                    passing_score,
                    &input.quiz_type,
                    input.time_limit_minutes,
                    input.max_attempts,
                    shuffle_questions as i32,
                    show_correct_answers as i32,
                    now.to_rfc3339(),
                    now.to_rfc3339(),
                ],
            )?;

            Ok(Upserted {
                entity: Quiz {
                    id,
                    module_id,
                    title: title.to_string(),
                    passing_score,
                    quiz_type: input.quiz_type,
                    time_limit_minutes: input.time_limit_minutes,
                    max_attempts: input.max_attempts,
                    shuffle_questions,
                    show_correct_answers,
                    created_at: now,
                    updated_at: now,
                },
                created: true,
            })
        }
    }

    pub fn get_quiz_questions(&self, quiz_id: Uuid) -> Result<Vec<QuizQuestion>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, quiz_id, question_text, question_type, sequence_order, points,
             difficulty_level, explanation, options, correct_answer, expected_output
             FROM quiz_questions WHERE quiz_id = ? ORDER BY sequence_order",
        )?;

        let questions = stmt
            .query_map([quiz_id.to_string()], question_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(questions)
    }

    /// Delete and rebuild the question set for one quiz, same contract as
    /// [`Self::replace_exercises`].
    pub fn replace_quiz_questions(
        &self,
        quiz_id: Uuid,
        questions: Vec<NewQuizQuestion>,
    ) -> Result<Vec<QuizQuestion>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "DELETE FROM quiz_questions WHERE quiz_id = ?",
            [quiz_id.to_string()],
        )?;

        let mut inserted = Vec::with_capacity(questions.len());
        for question in questions {
            let id = Uuid::new_v4();
            conn.execute(
                "INSERT INTO quiz_questions (id, quiz_id, question_text, question_type,
                 sequence_order, points, difficulty_level, explanation, options,
                 correct_answer, expected_output)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    id.to_string(),
                    quiz_id.to_string(),
                    &question.question_text,
                    question.question_type.as_str(),
                    question.sequence_order,
                    question.points,
                    &question.difficulty_level,
                    &question.explanation,
                    question
                        .options
                        .as_ref()
                        .map(serde_json::to_string)
                        .transpose()?,
                    &question.correct_answer,
                    &question.expected_output,
                ],
            )?;

            inserted.push(QuizQuestion {
                id,
                quiz_id,
                question_text: question.question_text,
                question_type: question.question_type,
                sequence_order: question.sequence_order,
                points: question.points,
                difficulty_level: question.difficulty_level,
                explanation: question.explanation,
                options: question.options,
                correct_answer: question.correct_answer,
                expected_output: question.expected_output,
            });
        }

        Ok(inserted)
    }

    // ============================================================
    // Module item operations (join rows with explicit ordering)
    // ============================================================

    pub fn get_module_items(&self, module_id: Uuid) -> Result<Vec<ModuleItem>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, module_id, item_type, item_id, sequence_order, required
             FROM module_items WHERE module_id = ? ORDER BY sequence_order",
        )?;

        let items = stmt
            .query_map([module_id.to_string()], module_item_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    pub fn upsert_module_item(
        &self,
        module_id: Uuid,
        item_kind: ItemKind,
        item_id: Uuid,
        sequence_order: i64,
        required: bool,
    ) -> Result<Upserted<ModuleItem>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, module_id, item_type, item_id, sequence_order, required
             FROM module_items WHERE module_id = ? AND item_type = ? AND item_id = ?",
        )?;

        let mut rows = stmt.query(params![
            module_id.to_string(),
            item_kind.as_str(),
            item_id.to_string(),
        ])?;

        if let Some(row) = rows.next()? {
            let existing = module_item_from_row(row)?;
            drop(rows);
            drop(stmt);

            conn.execute(
                "UPDATE module_items SET sequence_order = ?, required = ? WHERE id = ?",
                params![sequence_order, required as i32, existing.id.to_string()],
            )?;

            Ok(Upserted {
                entity: ModuleItem {
                    sequence_order,
                    required,
                    ..existing
                },
                created: false,
            })
        } else {
            drop(rows);
            drop(stmt);

            let id = Uuid::new_v4();
            conn.execute(
                "INSERT INTO module_items (id, module_id, item_type, item_id, sequence_order, required)
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    id.to_string(),
                    module_id.to_string(),
                    item_kind.as_str(),
                    item_id.to_string(),
                    sequence_order,
                    required as i32,
                ],
            )?;

            Ok(Upserted {
                entity: ModuleItem {
                    id,
                    module_id,
                    item_kind,
                    item_id,
                    sequence_order,
                    required,
                },
                created: true,
            })
        }
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

// ============================================================
// Row mapping
// ============================================================

const COURSE_COLS: &str = "id, slug, title, description, estimated_hours, difficulty_level, \
                           published, sequence_order, created_at, updated_at";

const MODULE_COLS: &str = "id, course_id, slug, title, description, sequence_order, \
                           estimated_minutes, published, learning_objectives, created_at, updated_at";

const MICROLESSON_COLS: &str = "id, module_id, slug, title, content, sequence_order, \
                                estimated_minutes, difficulty, published, key_concepts, \
                                objectives, prerequisite_ids, created_at, updated_at";

const LAB_COLS: &str = "id, slug, title, difficulty, lab_type, lab_format, estimated_minutes, \
                        description, instructions, success_criteria, steps, max_attempts, \
                        points_reward, is_active, category, programming_language, starter_code, \
                        solution_code, test_cases, created_at, updated_at";

const QUIZ_COLS: &str = "id, module_id, title, passing_score, quiz_type, time_limit_minutes, \
                         max_attempts, shuffle_questions, show_correct_answers, created_at, updated_at";

fn course_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Course> {
    Ok(Course {
        id: parse_uuid(row.get::<_, String>(0)?),
        slug: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        estimated_hours: row.get(4)?,
        difficulty_level: DifficultyTier::from_str(&row.get::<_, String>(5)?)
            .unwrap_or(DifficultyTier::Beginner),
        published: row.get::<_, i32>(6)? != 0,
        sequence_order: row.get(7)?,
        created_at: parse_datetime(row.get::<_, String>(8)?),
        updated_at: parse_datetime(row.get::<_, String>(9)?),
    })
}

fn module_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CourseModule> {
    Ok(CourseModule {
        id: parse_uuid(row.get::<_, String>(0)?),
        course_id: parse_uuid(row.get::<_, String>(1)?),
        slug: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        sequence_order: row.get(5)?,
        estimated_minutes: row.get(6)?,
        published: row.get::<_, i32>(7)? != 0,
        learning_objectives: parse_string_list(row.get::<_, String>(8)?),
        created_at: parse_datetime(row.get::<_, String>(9)?),
        updated_at: parse_datetime(row.get::<_, String>(10)?),
    })
}

fn microlesson_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Microlesson> {
    Ok(Microlesson {
        id: parse_uuid(row.get::<_, String>(0)?),
        module_id: parse_uuid(row.get::<_, String>(1)?),
        slug: row.get(2)?,
        title: row.get(3)?,
        content: row.get(4)?,
        sequence_order: row.get(5)?,
        estimated_minutes: row.get(6)?,
        difficulty: row.get(7)?,
        published: row.get::<_, i32>(8)? != 0,
        key_concepts: parse_string_list(row.get::<_, String>(9)?),
        objectives: parse_string_list(row.get::<_, String>(10)?),
        prerequisite_ids: parse_string_list(row.get::<_, String>(11)?),
        created_at: parse_datetime(row.get::<_, String>(12)?),
        updated_at: parse_datetime(row.get::<_, String>(13)?),
    })
}

fn exercise_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Exercise> {
    let payload_json: String = row.get(4)?;
    let payload: ExercisePayload = serde_json::from_str(&payload_json).unwrap_or_default();

    Ok(Exercise {
        id: parse_uuid(row.get::<_, String>(0)?),
        microlesson_id: parse_uuid(row.get::<_, String>(1)?),
        kind: ExerciseKind::from_str(&row.get::<_, String>(2)?)
            .unwrap_or(ExerciseKind::ShortAnswer),
        sequence_order: row.get(3)?,
        payload,
        created_at: parse_datetime(row.get::<_, String>(5)?),
    })
}

fn lesson_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Lesson> {
    Ok(Lesson {
        id: parse_uuid(row.get::<_, String>(0)?),
        title: row.get(1)?,
        content: row.get(2)?,
        reading_time_minutes: row.get(3)?,
        video_url: row.get(4)?,
        created_at: parse_datetime(row.get::<_, String>(5)?),
        updated_at: parse_datetime(row.get::<_, String>(6)?),
    })
}

fn lab_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Lab> {
    let steps_json: String = row.get(10)?;
    let test_cases_json: Option<String> = row.get(18)?;

    Ok(Lab {
        id: parse_uuid(row.get::<_, String>(0)?),
        slug: row.get(1)?,
        title: row.get(2)?,
        difficulty: row.get(3)?,
        lab_type: row.get(4)?,
        lab_format: row.get(5)?,
        estimated_minutes: row.get(6)?,
        description: row.get(7)?,
        instructions: row.get(8)?,
        success_criteria: row.get(9)?,
        steps: serde_json::from_str(&steps_json).unwrap_or(serde_json::Value::Array(vec![])),
        max_attempts: row.get(11)?,
        points_reward: row.get(12)?,
        is_active: row.get::<_, i32>(13)? != 0,
        category: row.get(14)?,
        programming_language: row.get(15)?,
        starter_code: row.get(16)?,
        solution_code: row.get(17)?,
        test_cases: test_cases_json.and_then(|s| serde_json::from_str(&s).ok()),
        created_at: parse_datetime(row.get::<_, String>(19)?),
        updated_at: parse_datetime(row.get::<_, String>(20)?),
    })
}

fn quiz_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Quiz> {
    Ok(Quiz {
        id: parse_uuid(row.get::<_, String>(0)?),
        module_id: parse_uuid(row.get::<_, String>(1)?),
        title: row.get(2)?,
        passing_score: row.get(3)?,
        quiz_type: row.get(4)?,
        time_limit_minutes: row.get(5)?,
        max_attempts: row.get(6)?,
        shuffle_questions: row.get::<_, i32>(7)? != 0,
        show_correct_answers: row.get::<_, i32>(8)? != 0,
        created_at: parse_datetime(row.get::<_, String>(9)?),
        updated_at: parse_datetime(row.get::<_, String>(10)?),
    })
}

fn question_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<QuizQuestion> {
    let options_json: Option<String> = row.get(8)?;

    Ok(QuizQuestion {
        id: parse_uuid(row.get::<_, String>(0)?),
        quiz_id: parse_uuid(row.get::<_, String>(1)?),
        question_text: row.get(2)?,
        question_type: QuestionType::from_str(&row.get::<_, String>(3)?)
            .unwrap_or(QuestionType::MultipleChoice),
        sequence_order: row.get(4)?,
        points: row.get(5)?,
        difficulty_level: row.get(6)?,
        explanation: row.get(7)?,
        options: options_json.and_then(|s| serde_json::from_str(&s).ok()),
        correct_answer: row.get(9)?,
        expected_output: row.get(10)?,
    })
}

fn module_item_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ModuleItem> {
    Ok(ModuleItem {
        id: parse_uuid(row.get::<_, String>(0)?),
        module_id: parse_uuid(row.get::<_, String>(1)?),
        item_kind: ItemKind::from_str(&row.get::<_, String>(2)?).unwrap_or(ItemKind::Lesson),
        item_id: parse_uuid(row.get::<_, String>(3)?),
        sequence_order: row.get(4)?,
        required: row.get::<_, i32>(5)? != 0,
    })
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn parse_string_list(s: String) -> Vec<String> {
    serde_json::from_str(&s).unwrap_or_default()
}
