use speculate2::speculate;
use syllabus::db::Database;
use syllabus::models::*;
use uuid::Uuid;

fn create_test_course(db: &Database) -> Course {
    db.upsert_course(
        "docker-101",
        CourseInput {
            title: Some("Docker 101".to_string()),
            ..Default::default()
        },
    )
    .expect("Failed to create course")
    .entity
}

fn create_test_module(db: &Database, course: &Course) -> CourseModule {
    db.upsert_module(
        course.id,
        "basics",
        ModuleInput {
            title: Some("Basics".to_string()),
            ..Default::default()
        },
    )
    .expect("Failed to create module")
    .entity
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "courses" {
        describe "upsert_course" {
            it "creates a course on first upsert" {
                let up = db.upsert_course("docker-101", CourseInput {
                    title: Some("Docker 101".to_string()),
                    description: Some("Containers from scratch".to_string()),
                    ..Default::default()
                }).expect("Failed to upsert");

                assert!(up.created);
                assert_eq!(up.entity.slug, "docker-101");
                assert_eq!(up.entity.title, "Docker 101");
                assert!(up.entity.published);
                assert_eq!(up.entity.difficulty_level, DifficultyTier::Beginner);
            }

            it "updates the same row on second upsert" {
                let first = db.upsert_course("docker-101", CourseInput {
                    title: Some("Docker 101".to_string()),
                    ..Default::default()
                }).expect("Failed to upsert");

                let second = db.upsert_course("docker-101", CourseInput {
                    title: Some("Docker 101 Revised".to_string()),
                    ..Default::default()
                }).expect("Failed to upsert");

                assert!(!second.created);
                assert_eq!(second.entity.id, first.entity.id);
                assert_eq!(second.entity.title, "Docker 101 Revised");
                assert_eq!(db.get_all_courses().expect("Query failed").len(), 1);
            }

            it "does not clobber stored fields with None inputs" {
                db.upsert_course("docker-101", CourseInput {
                    title: Some("Docker 101".to_string()),
                    description: Some("Containers from scratch".to_string()),
                    estimated_hours: Some(8.0),
                    difficulty_level: Some(DifficultyTier::Intermediate),
                    ..Default::default()
                }).expect("Failed to upsert");

                let up = db.upsert_course("docker-101", CourseInput {
                    title: Some("Renamed".to_string()),
                    ..Default::default()
                }).expect("Failed to upsert");

                assert_eq!(up.entity.title, "Renamed");
                assert_eq!(up.entity.description, Some("Containers from scratch".to_string()));
                assert_eq!(up.entity.estimated_hours, Some(8.0));
                assert_eq!(up.entity.difficulty_level, DifficultyTier::Intermediate);
            }
        }

        describe "get_course_by_slug" {
            it "returns None for an unknown slug" {
                let found = db.get_course_by_slug("nope").expect("Query failed");
                assert!(found.is_none());
            }
        }
    }

    describe "modules" {
        it "scopes the slug to the parent course" {
            let docker = create_test_course(&db);
            let k8s = db.upsert_course("k8s-101", CourseInput {
                title: Some("Kubernetes 101".to_string()),
                ..Default::default()
            }).expect("Failed to upsert").entity;

            let first = db.upsert_module(docker.id, "basics", ModuleInput {
                title: Some("Docker Basics".to_string()),
                ..Default::default()
            }).expect("Failed to upsert");
            let second = db.upsert_module(k8s.id, "basics", ModuleInput {
                title: Some("Kubernetes Basics".to_string()),
                ..Default::default()
            }).expect("Failed to upsert");

            assert!(first.created);
            assert!(second.created);
            assert_ne!(first.entity.id, second.entity.id);
        }

        it "merges learning objectives only when provided" {
            let course = create_test_course(&db);
            db.upsert_module(course.id, "basics", ModuleInput {
                title: Some("Basics".to_string()),
                learning_objectives: Some(vec!["run a container".to_string()]),
                ..Default::default()
            }).expect("Failed to upsert");

            let up = db.upsert_module(course.id, "basics", ModuleInput {
                title: Some("Basics".to_string()),
                learning_objectives: None,
                ..Default::default()
            }).expect("Failed to upsert");

            assert_eq!(up.entity.learning_objectives, vec!["run a container".to_string()]);
        }

        it "lists modules in sequence order" {
            let course = create_test_course(&db);
            db.upsert_module(course.id, "advanced", ModuleInput {
                title: Some("Advanced".to_string()),
                sequence_order: Some(2),
                ..Default::default()
            }).expect("Failed to upsert");
            db.upsert_module(course.id, "basics", ModuleInput {
                title: Some("Basics".to_string()),
                sequence_order: Some(1),
                ..Default::default()
            }).expect("Failed to upsert");

            let modules = db.get_modules_by_course(course.id).expect("Query failed");
            assert_eq!(modules.len(), 2);
            assert_eq!(modules[0].slug, "basics");
            assert_eq!(modules[1].slug, "advanced");
        }
    }

    describe "microlessons" {
        it "keys on the slug globally and re-points the module" {
            let course = create_test_course(&db);
            let first_module = create_test_module(&db, &course);
            let second_module = db.upsert_module(course.id, "advanced", ModuleInput {
                title: Some("Advanced".to_string()),
                ..Default::default()
            }).expect("Failed to upsert").entity;

            let created = db.upsert_microlesson(first_module.id, "intro", MicrolessonInput {
                title: Some("Intro".to_string()),
                content: Some("# Intro".to_string()),
                ..Default::default()
            }).expect("Failed to upsert");
            assert!(created.created);

            let moved = db.upsert_microlesson(second_module.id, "intro", MicrolessonInput {
                title: Some("Intro".to_string()),
                content: Some("# Intro".to_string()),
                ..Default::default()
            }).expect("Failed to upsert");

            assert!(!moved.created);
            assert_eq!(moved.entity.id, created.entity.id);
            assert_eq!(moved.entity.module_id, second_module.id);
        }

        it "preserves stored difficulty when the input omits it" {
            let course = create_test_course(&db);
            let module = create_test_module(&db, &course);

            db.upsert_microlesson(module.id, "intro", MicrolessonInput {
                title: Some("Intro".to_string()),
                difficulty: Some("medium".to_string()),
                ..Default::default()
            }).expect("Failed to upsert");

            let up = db.upsert_microlesson(module.id, "intro", MicrolessonInput {
                title: Some("Intro".to_string()),
                ..Default::default()
            }).expect("Failed to upsert");

            assert_eq!(up.entity.difficulty, Some("medium".to_string()));
        }
    }

    describe "exercises" {
        it "replaces the whole set on reload" {
            let course = create_test_course(&db);
            let module = create_test_module(&db, &course);
            let microlesson = db.upsert_microlesson(module.id, "intro", MicrolessonInput {
                title: Some("Intro".to_string()),
                ..Default::default()
            }).expect("Failed to upsert").entity;

            let three: Vec<NewExercise> = (1..=3).map(|i| NewExercise {
                kind: ExerciseKind::Terminal,
                sequence_order: i,
                payload: ExercisePayload {
                    command: Some(format!("docker step{i}")),
                    ..Default::default()
                },
            }).collect();
            db.replace_exercises(microlesson.id, three).expect("Failed to replace");
            assert_eq!(db.get_exercises(microlesson.id).expect("Query failed").len(), 3);

            let two: Vec<NewExercise> = (1..=2).map(|i| NewExercise {
                kind: ExerciseKind::Mcq,
                sequence_order: i,
                payload: ExercisePayload::default(),
            }).collect();
            db.replace_exercises(microlesson.id, two).expect("Failed to replace");

            let stored = db.get_exercises(microlesson.id).expect("Query failed");
            assert_eq!(stored.len(), 2);
            assert!(stored.iter().all(|e| e.kind == ExerciseKind::Mcq));
        }

        it "round-trips the payload through storage" {
            let course = create_test_course(&db);
            let module = create_test_module(&db, &course);
            let microlesson = db.upsert_microlesson(module.id, "intro", MicrolessonInput {
                title: Some("Intro".to_string()),
                ..Default::default()
            }).expect("Failed to upsert").entity;

            let payload = ExercisePayload {
                description: Some("List containers".to_string()),
                hints: vec!["try -a".to_string()],
                command: Some("docker ps".to_string()),
                timeout_sec: Some(30),
                ..Default::default()
            };
            db.replace_exercises(microlesson.id, vec![NewExercise {
                kind: ExerciseKind::Terminal,
                sequence_order: 1,
                payload: payload.clone(),
            }]).expect("Failed to replace");

            let stored = db.get_exercises(microlesson.id).expect("Query failed");
            assert_eq!(stored[0].payload, payload);
        }
    }

    describe "lessons" {
        it "upserts by title" {
            let first = db.upsert_lesson("Reading: Images", LessonInput {
                content: Some("Layers".to_string()),
                ..Default::default()
            }).expect("Failed to upsert");
            let second = db.upsert_lesson("Reading: Images", LessonInput {
                reading_time_minutes: Some(5),
                ..Default::default()
            }).expect("Failed to upsert");

            assert!(first.created);
            assert!(!second.created);
            assert_eq!(second.entity.id, first.entity.id);
            assert_eq!(second.entity.content, Some("Layers".to_string()));
            assert_eq!(second.entity.reading_time_minutes, Some(5));
        }
    }

    describe "labs" {
        it "upserts by slug with defaults on create" {
            let up = db.upsert_lab("run-nginx", LabInput {
                title: Some("Run nginx".to_string()),
                ..Default::default()
            }).expect("Failed to upsert");

            assert!(up.created);
            assert_eq!(up.entity.max_attempts, 3);
            assert_eq!(up.entity.points_reward, 10);
            assert!(up.entity.is_active);
        }

        it "keeps editor fields across a reload that omits them" {
            db.upsert_lab("fizzbuzz", LabInput {
                title: Some("FizzBuzz".to_string()),
                programming_language: Some("python".to_string()),
                starter_code: Some("def fizzbuzz(n): ...".to_string()),
                ..Default::default()
            }).expect("Failed to upsert");

            let up = db.upsert_lab("fizzbuzz", LabInput {
                title: Some("FizzBuzz".to_string()),
                ..Default::default()
            }).expect("Failed to upsert");

            assert_eq!(up.entity.programming_language, Some("python".to_string()));
            assert_eq!(up.entity.starter_code, Some("def fizzbuzz(n): ...".to_string()));
        }
    }

    describe "quizzes" {
        it "keys on module and title so reloads converge" {
            let course = create_test_course(&db);
            let module = create_test_module(&db, &course);

            let first = db.upsert_quiz(module.id, "Checkpoint", QuizInput::default())
                .expect("Failed to upsert");
            let second = db.upsert_quiz(module.id, "Checkpoint", QuizInput {
                passing_score: Some(80),
                ..Default::default()
            }).expect("Failed to upsert");

            assert!(first.created);
            assert!(!second.created);
            assert_eq!(second.entity.id, first.entity.id);
            assert_eq!(first.entity.passing_score, 70);
            assert_eq!(second.entity.passing_score, 80);
        }

        it "replaces questions wholesale" {
            let course = create_test_course(&db);
            let module = create_test_module(&db, &course);
            let quiz = db.upsert_quiz(module.id, "Checkpoint", QuizInput::default())
                .expect("Failed to upsert").entity;

            db.replace_quiz_questions(quiz.id, vec![
                NewQuizQuestion {
                    question_text: "Containers share the host kernel?".to_string(),
                    question_type: QuestionType::TrueFalse,
                    sequence_order: 1,
                    points: 1,
                    difficulty_level: None,
                    explanation: None,
                    options: None,
                    correct_answer: Some("true".to_string()),
                    expected_output: None,
                },
                NewQuizQuestion {
                    question_text: "Which command lists images?".to_string(),
                    question_type: QuestionType::MultipleChoice,
                    sequence_order: 2,
                    points: 2,
                    difficulty_level: None,
                    explanation: None,
                    options: Some(vec!["docker images".to_string(), "docker ps".to_string()]),
                    correct_answer: Some("docker images".to_string()),
                    expected_output: None,
                },
            ]).expect("Failed to replace");

            db.replace_quiz_questions(quiz.id, vec![NewQuizQuestion {
                question_text: "Only question".to_string(),
                question_type: QuestionType::Command,
                sequence_order: 1,
                points: 1,
                difficulty_level: None,
                explanation: None,
                options: None,
                correct_answer: None,
                expected_output: Some("CONTAINER ID".to_string()),
            }]).expect("Failed to replace");

            let stored = db.get_quiz_questions(quiz.id).expect("Query failed");
            assert_eq!(stored.len(), 1);
            assert_eq!(stored[0].question_type, QuestionType::Command);
        }
    }

    describe "module_items" {
        it "upserts on the (module, kind, item) triple" {
            let course = create_test_course(&db);
            let module = create_test_module(&db, &course);
            let lesson_id = Uuid::new_v4();

            let first = db.upsert_module_item(module.id, ItemKind::Lesson, lesson_id, 1, true)
                .expect("Failed to upsert");
            let second = db.upsert_module_item(module.id, ItemKind::Lesson, lesson_id, 5, false)
                .expect("Failed to upsert");

            assert!(first.created);
            assert!(!second.created);
            assert_eq!(second.entity.id, first.entity.id);
            assert_eq!(second.entity.sequence_order, 5);
            assert!(!second.entity.required);
            assert_eq!(db.get_module_items(module.id).expect("Query failed").len(), 1);
        }

        it "allows the same item id under different kinds" {
            let course = create_test_course(&db);
            let module = create_test_module(&db, &course);
            let shared_id = Uuid::new_v4();

            db.upsert_module_item(module.id, ItemKind::Lesson, shared_id, 1, true)
                .expect("Failed to upsert");
            db.upsert_module_item(module.id, ItemKind::Lab, shared_id, 2, true)
                .expect("Failed to upsert");

            assert_eq!(db.get_module_items(module.id).expect("Query failed").len(), 2);
        }
    }
}
