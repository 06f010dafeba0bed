//! Pure, total mappings from loose YAML vocabulary into the fixed
//! vocabularies of the data model. None of these fail: unrecognized input
//! falls back to a documented default.

use crate::models::{DifficultyTier, ExerciseKind, ExercisePayload, QuestionType};

use super::docs::ExerciseDoc;

/// Fold a free-text level into the difficulty tiers. Case-insensitive;
/// unrecognized or missing input defaults to beginner.
pub fn map_level(raw: Option<&str>) -> DifficultyTier {
    match raw.map(|s| s.to_ascii_lowercase()).as_deref() {
        Some("beginner") | Some("easy") => DifficultyTier::Beginner,
        Some("intermediate") | Some("medium") => DifficultyTier::Intermediate,
        Some("advanced") | Some("hard") => DifficultyTier::Advanced,
        _ => DifficultyTier::Beginner,
    }
}

/// Map a YAML exercise tag onto the closed kind set.
///
/// `reflection`, `checkpoint` and `sql` all degrade to `short_answer`: the
/// existing content was authored against that collapse, so it is preserved
/// rather than widened. The type-specific payload survives regardless (see
/// [`build_exercise_payload`]).
pub fn map_exercise_kind(raw: Option<&str>) -> ExerciseKind {
    match raw {
        Some("terminal") => ExerciseKind::Terminal,
        Some("mcq") => ExerciseKind::Mcq,
        Some("code") | Some("coding") => ExerciseKind::Code,
        Some("sandbox") => ExerciseKind::Sandbox,
        Some("short_answer") => ExerciseKind::ShortAnswer,
        _ => ExerciseKind::ShortAnswer,
    }
}

/// Map a quiz question tag; unrecognized tags default to multiple choice.
pub fn map_question_type(raw: Option<&str>) -> QuestionType {
    match raw {
        Some("mcq") | Some("multiple_choice") => QuestionType::MultipleChoice,
        Some("true_false") => QuestionType::TrueFalse,
        Some("command") => QuestionType::Command,
        _ => QuestionType::MultipleChoice,
    }
}

/// Project the fields relevant to the exercise's *raw* tag into a payload,
/// on top of the shared base (description, hints, require_pass, difficulty).
pub fn build_exercise_payload(doc: &ExerciseDoc) -> ExercisePayload {
    let mut payload = ExercisePayload {
        description: doc.description.clone(),
        hints: doc.hints.clone().unwrap_or_default(),
        require_pass: doc.require_pass.unwrap_or(false),
        difficulty: doc
            .difficulty
            .clone()
            .unwrap_or_else(|| "medium".to_string()),
        ..Default::default()
    };

    match doc.exercise_type.as_deref() {
        Some("terminal") => {
            payload.command = doc.command.clone();
            payload.timeout_sec = Some(doc.timeout_sec.unwrap_or(60));
            payload.validation = Some(
                doc.validation
                    .clone()
                    .unwrap_or(serde_json::Value::Object(Default::default())),
            );
        }
        Some("mcq") => {
            payload.question = doc.question.clone();
            payload.options = Some(doc.options.clone().unwrap_or_default());
            payload.correct_answer_index = doc.correct_answer_index;
            payload.correct_answer = doc.correct_answer_index.and_then(|idx| {
                doc.options
                    .as_ref()
                    .and_then(|opts| usize::try_from(idx).ok().and_then(|i| opts.get(i)))
                    .cloned()
            });
            payload.explanation = doc.explanation.clone();
        }
        Some("short_answer") => {
            payload.question = doc.question.clone();
            payload.expected_answer = doc.expected_answer.clone();
            payload.validation_type = Some(
                doc.validation_type
                    .clone()
                    .unwrap_or_else(|| "flexible".to_string()),
            );
        }
        Some("reflection") | Some("checkpoint") => {
            payload.prompt = doc.prompt.clone();
            payload.slug = doc.slug.clone();
        }
        Some("coding") | Some("code") => {
            payload.question = doc.question.clone();
            payload.language = Some(
                doc.language
                    .clone()
                    .unwrap_or_else(|| "python".to_string()),
            );
            payload.starter_code = doc.starter_code.clone();
            payload.solution_code = doc.solution_code.clone();
            payload.test_cases = Some(
                doc.test_cases
                    .clone()
                    .unwrap_or(serde_json::Value::Array(vec![])),
            );
        }
        Some("sql") => {
            payload.question = doc.question.clone();
            payload.schema = doc.schema.clone();
            payload.expected_result = doc.expected_result.clone();
        }
        _ => {}
    }

    payload
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_synonyms_fold_into_tiers() {
        assert_eq!(map_level(Some("easy")), DifficultyTier::Beginner);
        assert_eq!(map_level(Some("Medium")), DifficultyTier::Intermediate);
        assert_eq!(map_level(Some("HARD")), DifficultyTier::Advanced);
        assert_eq!(map_level(Some("advanced")), DifficultyTier::Advanced);
    }

    #[test]
    fn unrecognized_level_defaults_to_beginner() {
        assert_eq!(map_level(Some("expert")), DifficultyTier::Beginner);
        assert_eq!(map_level(None), DifficultyTier::Beginner);
    }

    #[test]
    fn recognized_kinds_pass_through() {
        assert_eq!(map_exercise_kind(Some("terminal")), ExerciseKind::Terminal);
        assert_eq!(map_exercise_kind(Some("mcq")), ExerciseKind::Mcq);
        assert_eq!(map_exercise_kind(Some("sandbox")), ExerciseKind::Sandbox);
        assert_eq!(map_exercise_kind(Some("coding")), ExerciseKind::Code);
    }

    #[test]
    fn degraded_and_unknown_tags_fall_back_to_short_answer() {
        assert_eq!(
            map_exercise_kind(Some("reflection")),
            ExerciseKind::ShortAnswer
        );
        assert_eq!(
            map_exercise_kind(Some("checkpoint")),
            ExerciseKind::ShortAnswer
        );
        assert_eq!(map_exercise_kind(Some("sql")), ExerciseKind::ShortAnswer);
        assert_eq!(map_exercise_kind(Some("essay")), ExerciseKind::ShortAnswer);
        assert_eq!(map_exercise_kind(None), ExerciseKind::ShortAnswer);
    }

    #[test]
    fn terminal_payload_carries_command_and_defaults() {
        let doc = ExerciseDoc {
            exercise_type: Some("terminal".to_string()),
            command: Some("docker ps".to_string()),
            ..Default::default()
        };

        let payload = build_exercise_payload(&doc);
        assert_eq!(payload.command.as_deref(), Some("docker ps"));
        assert_eq!(payload.timeout_sec, Some(60));
        assert_eq!(payload.difficulty, "medium");
    }

    #[test]
    fn mcq_payload_resolves_correct_answer_from_index() {
        let doc = ExerciseDoc {
            exercise_type: Some("mcq".to_string()),
            question: Some("Which flag lists all containers?".to_string()),
            options: Some(vec!["-a".to_string(), "-l".to_string()]),
            correct_answer_index: Some(0),
            ..Default::default()
        };

        let payload = build_exercise_payload(&doc);
        assert_eq!(payload.correct_answer.as_deref(), Some("-a"));
        assert_eq!(payload.correct_answer_index, Some(0));
    }

    #[test]
    fn mcq_payload_tolerates_out_of_range_index() {
        let doc = ExerciseDoc {
            exercise_type: Some("mcq".to_string()),
            options: Some(vec!["a".to_string()]),
            correct_answer_index: Some(7),
            ..Default::default()
        };

        let payload = build_exercise_payload(&doc);
        assert!(payload.correct_answer.is_none());
    }

    #[test]
    fn reflection_payload_keeps_prompt_despite_kind_collapse() {
        let doc = ExerciseDoc {
            exercise_type: Some("reflection".to_string()),
            prompt: Some("What did you learn?".to_string()),
            slug: Some("wrap-up".to_string()),
            ..Default::default()
        };

        assert_eq!(map_exercise_kind(doc.exercise_type.as_deref()), ExerciseKind::ShortAnswer);
        let payload = build_exercise_payload(&doc);
        assert_eq!(payload.prompt.as_deref(), Some("What did you learn?"));
        assert_eq!(payload.slug.as_deref(), Some("wrap-up"));
    }

    #[test]
    fn coding_payload_defaults_language_to_python() {
        let doc = ExerciseDoc {
            exercise_type: Some("coding".to_string()),
            question: Some("Implement fizzbuzz".to_string()),
            ..Default::default()
        };

        let payload = build_exercise_payload(&doc);
        assert_eq!(payload.language.as_deref(), Some("python"));
    }
}
