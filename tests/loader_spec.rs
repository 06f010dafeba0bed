use std::fs;
use std::path::Path;

use speculate2::speculate;
use syllabus::db::Database;
use syllabus::loader::{
    discover_lesson_files, discover_manifests, CourseLoader, FailureKind, LoadOptions,
};
use syllabus::models::*;
use syllabus::validator::{self, DocumentKind};

const DOCKER_MANIFEST: &str = r#"
course:
  slug: docker-101
  title: Docker 101
  description: Containers from scratch
  level: beginner
  estimated_hours: 6
modules:
  - slug: basics
    title: Basics
    sequence_order: 1
    lessons:
      - intro
"#;

const INTRO_LESSON: &str = r##"
slug: intro
title: Intro
content_md: "# Welcome to containers"
estimated_minutes: 10
exercises:
  - type: terminal
    description: List running containers
    command: docker ps
"##;

fn write_course(base: &Path, course_dir: &str, manifest: &str) {
    let dir = base.join(course_dir);
    fs::create_dir_all(&dir).expect("Failed to create course dir");
    fs::write(dir.join("manifest.yml"), manifest).expect("Failed to write manifest");
}

fn write_microlesson(base: &Path, course_dir: &str, slug: &str, yaml: &str) {
    let dir = base.join(course_dir).join("microlessons");
    fs::create_dir_all(&dir).expect("Failed to create microlessons dir");
    fs::write(dir.join(format!("{slug}.yml")), yaml).expect("Failed to write lesson");
}

fn quiet() -> LoadOptions {
    LoadOptions {
        validate: true,
        verbose: false,
    }
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
        let content = tempfile::tempdir().expect("Failed to create temp dir");
        let base = vec![content.path().to_path_buf()];
    }

    describe "discovery" {
        it "finds manifests recursively in sorted order" {
            write_course(content.path(), "k8s-101", DOCKER_MANIFEST);
            write_course(content.path(), "docker-101", DOCKER_MANIFEST);

            let manifests = discover_manifests(content.path()).expect("Scan failed");
            assert_eq!(manifests.len(), 2);
            assert!(manifests[0].ends_with("docker-101/manifest.yml"));
            assert!(manifests[1].ends_with("k8s-101/manifest.yml"));
        }

        it "skips an unreadable subdirectory and keeps scanning" {
            use std::os::unix::fs::PermissionsExt;

            write_course(content.path(), "docker-101", DOCKER_MANIFEST);
            let locked = content.path().join("locked");
            fs::create_dir_all(&locked).expect("Failed to create dir");
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))
                .expect("Failed to set permissions");

            let manifests = discover_manifests(content.path()).expect("Scan failed");
            assert!(manifests.iter().any(|m| m.ends_with("docker-101/manifest.yml")));

            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))
                .expect("Failed to restore permissions");
        }

        it "lists lesson files beside a manifest in sorted order" {
            write_course(content.path(), "docker-101", DOCKER_MANIFEST);
            write_microlesson(content.path(), "docker-101", "intro", INTRO_LESSON);
            write_microlesson(content.path(), "docker-101", "advanced", INTRO_LESSON);

            let files = discover_lesson_files(&content.path().join("docker-101"));
            assert_eq!(files.len(), 2);
            assert!(files[0].ends_with("microlessons/advanced.yml"));
            assert!(files[1].ends_with("microlessons/intro.yml"));
        }

        it "returns no lesson files for a course without a microlessons directory" {
            write_course(content.path(), "docker-101", DOCKER_MANIFEST);

            let files = discover_lesson_files(&content.path().join("docker-101"));
            assert!(files.is_empty());
        }

        it "flags an invalid lesson file found beside a valid manifest" {
            write_course(content.path(), "docker-101", DOCKER_MANIFEST);
            write_microlesson(
                content.path(),
                "docker-101",
                "intro",
                "title: Intro\ncontent_md: body\n",
            );

            let files = discover_lesson_files(&content.path().join("docker-101"));
            assert_eq!(files.len(), 1);

            let outcome = validator::validate_file(&files[0], DocumentKind::Microlesson);
            assert!(!outcome.is_valid());
            assert!(outcome.errors.iter().any(|e| e.contains("slug")));
        }

        it "warns on a missing base directory instead of failing" {
            let missing = vec![content.path().join("does-not-exist")];
            let stats = CourseLoader::new(db.clone(), quiet()).load_all(&missing);

            assert!(!stats.has_failures());
            assert!(stats.warnings.iter().any(|w| w.contains("Directory not found")));
        }
    }

    describe "loading a course tree" {
        it "creates the full hierarchy from manifest and lesson files" {
            write_course(content.path(), "docker-101", DOCKER_MANIFEST);
            write_microlesson(content.path(), "docker-101", "intro", INTRO_LESSON);

            let stats = CourseLoader::new(db.clone(), quiet()).load_all(&base);

            assert!(!stats.has_failures(), "failures: {:?}", stats.failures);
            assert_eq!(stats.courses_created, 1);
            assert_eq!(stats.modules_created, 1);
            assert_eq!(stats.microlessons_created, 1);
            assert_eq!(stats.exercises_created, 1);

            let course = db.get_course_by_slug("docker-101")
                .expect("Query failed")
                .expect("Course missing");
            assert_eq!(course.title, "Docker 101");
            assert_eq!(course.difficulty_level, DifficultyTier::Beginner);

            let modules = db.get_modules_by_course(course.id).expect("Query failed");
            assert_eq!(modules.len(), 1);

            let microlesson = db.get_microlesson_by_slug("intro")
                .expect("Query failed")
                .expect("Microlesson missing");
            assert_eq!(microlesson.module_id, modules[0].id);
            assert_eq!(microlesson.content, "# Welcome to containers");

            let exercises = db.get_exercises(microlesson.id).expect("Query failed");
            assert_eq!(exercises.len(), 1);
            assert_eq!(exercises[0].kind, ExerciseKind::Terminal);
            assert_eq!(exercises[0].payload.command.as_deref(), Some("docker ps"));
            assert_eq!(exercises[0].payload.timeout_sec, Some(60));
        }

        it "converges on a second run instead of duplicating" {
            write_course(content.path(), "docker-101", DOCKER_MANIFEST);
            write_microlesson(content.path(), "docker-101", "intro", INTRO_LESSON);

            CourseLoader::new(db.clone(), quiet()).load_all(&base);
            let second = CourseLoader::new(db.clone(), quiet()).load_all(&base);

            assert_eq!(second.courses_created, 0);
            assert_eq!(second.courses_updated, 1);
            assert_eq!(second.modules_created, 0);
            assert_eq!(second.microlessons_created, 0);
            assert_eq!(db.get_all_courses().expect("Query failed").len(), 1);

            let microlesson = db.get_microlesson_by_slug("intro")
                .expect("Query failed")
                .expect("Microlesson missing");
            assert_eq!(db.get_exercises(microlesson.id).expect("Query failed").len(), 1);
        }

        it "updates only the changed field on reload" {
            write_course(content.path(), "docker-101", DOCKER_MANIFEST);
            write_microlesson(content.path(), "docker-101", "intro", INTRO_LESSON);
            CourseLoader::new(db.clone(), quiet()).load_all(&base);

            let retitled = INTRO_LESSON.replace("title: Intro", "title: Introduction");
            write_microlesson(content.path(), "docker-101", "intro", &retitled);
            CourseLoader::new(db.clone(), quiet()).load_all(&base);

            let microlesson = db.get_microlesson_by_slug("intro")
                .expect("Query failed")
                .expect("Microlesson missing");
            assert_eq!(microlesson.title, "Introduction");
            assert_eq!(microlesson.content, "# Welcome to containers");
            assert_eq!(microlesson.estimated_minutes, Some(10));
        }
    }

    describe "validation gate" {
        it "records a schema failure and writes nothing for an invalid manifest" {
            write_course(
                content.path(),
                "broken",
                "course:\n  title: No Slug Here\nmodules: []\n",
            );

            let stats = CourseLoader::new(db.clone(), quiet()).load_all(&base);

            assert!(stats.has_failures());
            assert_eq!(stats.failures[0].kind, FailureKind::Schema);
            assert!(stats.failures[0].messages.iter().any(|m| m.contains("slug")));
            assert_eq!(stats.courses_created, 0);
            assert!(db.get_all_courses().expect("Query failed").is_empty());
        }

        it "records a parse failure for malformed YAML" {
            write_course(content.path(), "broken", "course: [unclosed\n");

            let stats = CourseLoader::new(db.clone(), quiet()).load_all(&base);

            assert!(stats.has_failures());
            assert_eq!(stats.failures[0].kind, FailureKind::Parse);
            assert!(stats.failures[0].messages[0].contains("YAML syntax error"));
        }

        it "isolates a bad course from a good one" {
            write_course(content.path(), "docker-101", DOCKER_MANIFEST);
            write_microlesson(content.path(), "docker-101", "intro", INTRO_LESSON);
            write_course(content.path(), "broken", "course: [unclosed\n");

            let stats = CourseLoader::new(db.clone(), quiet()).load_all(&base);

            assert_eq!(stats.failures.len(), 1);
            assert_eq!(stats.courses_created, 1);
            assert!(db.get_course_by_slug("docker-101").expect("Query failed").is_some());
        }

        it "loads everything when validation is disabled" {
            // Missing title would normally fail the schema gate.
            write_course(
                content.path(),
                "docker-101",
                "course:\n  slug: docker-101\nmodules: []\n",
            );

            let options = LoadOptions { validate: false, verbose: false };
            let stats = CourseLoader::new(db.clone(), options).load_all(&base);

            assert!(!stats.has_failures());
            assert_eq!(stats.courses_created, 1);
        }
    }

    describe "missing references" {
        it "warns on a missing lesson file and keeps loading" {
            write_course(content.path(), "docker-101", DOCKER_MANIFEST);
            write_microlesson(content.path(), "docker-101", "other", INTRO_LESSON);

            let stats = CourseLoader::new(db.clone(), quiet()).load_all(&base);

            assert!(!stats.has_failures());
            assert!(stats.warnings.iter().any(|w| w.contains("intro.yml")));
            assert_eq!(stats.courses_created, 1);
            assert_eq!(stats.microlessons_created, 0);
        }

        it "warns when the microlessons directory is absent" {
            write_course(content.path(), "docker-101", DOCKER_MANIFEST);

            let stats = CourseLoader::new(db.clone(), quiet()).load_all(&base);

            assert!(!stats.has_failures());
            assert!(stats.warnings.iter().any(|w| w.contains("no microlessons directory")));
        }
    }

    describe "inline module content" {
        it "loads course lessons, labs and quizzes with module links" {
            let manifest = r#"
course:
  slug: docker-101
  title: Docker 101
modules:
  - slug: basics
    title: Basics
    lessons: []
    course_lessons:
      - title: "Reading: Images"
        content: Layers and registries
        reading_time_minutes: 5
    labs:
      - slug: run-nginx
        title: Run nginx
        difficulty: easy
        lab_type: docker
        lab_format: terminal
        estimated_minutes: 15
        tasks:
          - instruction: Start nginx
            validation: docker ps | grep nginx
    quizzes:
      - title: Checkpoint
        passing_score: 80
        questions:
          - type: mcq
            question: Which command lists images?
            options: ["docker images", "docker ps"]
            correct: 0
          - type: true_false
            question: Containers share the host kernel?
            correct: true
"#;
            write_course(content.path(), "docker-101", manifest);

            let stats = CourseLoader::new(db.clone(), quiet()).load_all(&base);
            assert!(!stats.has_failures(), "failures: {:?}", stats.failures);
            assert_eq!(stats.lessons_created, 1);
            assert_eq!(stats.labs_created, 1);
            assert_eq!(stats.quizzes_created, 1);

            let course = db.get_course_by_slug("docker-101")
                .expect("Query failed")
                .expect("Course missing");
            let module = &db.get_modules_by_course(course.id).expect("Query failed")[0];

            let items = db.get_module_items(module.id).expect("Query failed");
            assert_eq!(items.len(), 3);

            let quiz = db.get_quiz(module.id, "Checkpoint")
                .expect("Query failed")
                .expect("Quiz missing");
            assert_eq!(quiz.passing_score, 80);

            let questions = db.get_quiz_questions(quiz.id).expect("Query failed");
            assert_eq!(questions.len(), 2);
            assert_eq!(questions[0].question_type, QuestionType::MultipleChoice);
            assert_eq!(questions[0].correct_answer.as_deref(), Some("docker images"));
            assert_eq!(questions[1].question_type, QuestionType::TrueFalse);
            assert_eq!(questions[1].correct_answer.as_deref(), Some("true"));
        }

        it "reloading a quiz keeps one row and rebuilds its questions" {
            let manifest = r#"
course:
  slug: docker-101
  title: Docker 101
modules:
  - slug: basics
    title: Basics
    lessons: []
    quizzes:
      - title: Checkpoint
        passing_score: 70
        questions:
          - type: true_false
            question: Containers share the host kernel?
            correct: true
"#;
            write_course(content.path(), "docker-101", manifest);
            CourseLoader::new(db.clone(), quiet()).load_all(&base);
            let second = CourseLoader::new(db.clone(), quiet()).load_all(&base);

            assert_eq!(second.quizzes_created, 0);
            assert_eq!(second.quizzes_updated, 1);

            let course = db.get_course_by_slug("docker-101")
                .expect("Query failed")
                .expect("Course missing");
            let module = &db.get_modules_by_course(course.id).expect("Query failed")[0];
            let quiz = db.get_quiz(module.id, "Checkpoint")
                .expect("Query failed")
                .expect("Quiz missing");
            assert_eq!(db.get_quiz_questions(quiz.id).expect("Query failed").len(), 1);
        }
    }

    describe "shared microlessons" {
        it "re-points a shared slug to the most recent module" {
            write_course(content.path(), "docker-101", DOCKER_MANIFEST);
            write_microlesson(content.path(), "docker-101", "intro", INTRO_LESSON);

            let k8s_manifest = DOCKER_MANIFEST
                .replace("docker-101", "k8s-101")
                .replace("Docker 101", "Kubernetes 101");
            write_course(content.path(), "k8s-101", &k8s_manifest);
            write_microlesson(content.path(), "k8s-101", "intro", INTRO_LESSON);

            let stats = CourseLoader::new(db.clone(), quiet()).load_all(&base);

            assert_eq!(stats.courses_created, 2);
            assert_eq!(stats.microlessons_created, 1);
            assert_eq!(stats.microlessons_updated, 1);

            let k8s = db.get_course_by_slug("k8s-101")
                .expect("Query failed")
                .expect("Course missing");
            let k8s_module = &db.get_modules_by_course(k8s.id).expect("Query failed")[0];
            let microlesson = db.get_microlesson_by_slug("intro")
                .expect("Query failed")
                .expect("Microlesson missing");
            assert_eq!(microlesson.module_id, k8s_module.id);
        }
    }

    describe "exercise kind degradation" {
        it "stores reflection exercises as short_answer but keeps the prompt" {
            let lesson = r#"
slug: intro
title: Intro
content_md: body
exercises:
  - type: reflection
    prompt: What did you learn?
    slug: wrap-up
"#;
            write_course(content.path(), "docker-101", DOCKER_MANIFEST);
            write_microlesson(content.path(), "docker-101", "intro", lesson);

            let stats = CourseLoader::new(db.clone(), quiet()).load_all(&base);
            assert!(!stats.has_failures(), "failures: {:?}", stats.failures);

            let microlesson = db.get_microlesson_by_slug("intro")
                .expect("Query failed")
                .expect("Microlesson missing");
            let exercises = db.get_exercises(microlesson.id).expect("Query failed");
            assert_eq!(exercises.len(), 1);
            assert_eq!(exercises[0].kind, ExerciseKind::ShortAnswer);
            assert_eq!(exercises[0].payload.prompt.as_deref(), Some("What did you learn?"));
            assert_eq!(exercises[0].payload.slug.as_deref(), Some("wrap-up"));
        }
    }
}
