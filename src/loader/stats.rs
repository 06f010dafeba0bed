use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Failure taxonomy for a single file or entity. Missing-reference problems
/// are not failures at all; they land in [`LoadStats::warnings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Malformed YAML (or an unreadable file).
    #[error("parse failure")]
    Parse,
    /// Structural problems caught before any write.
    #[error("schema validation failed")]
    Schema,
    /// A save failed after validation passed.
    #[error("persistence error")]
    Persistence,
}

/// One recorded failure. The run continues past these; they are surfaced in
/// the final summary so an operator can fix the file and re-run.
#[derive(Debug, Clone, Serialize)]
pub struct LoadFailure {
    pub course: String,
    pub file: PathBuf,
    pub kind: FailureKind,
    pub messages: Vec<String>,
}

/// Running counters and failure records aggregated across a whole load.
///
/// The exit status of a load is soft: failures are visible here but never
/// abort the pass.
#[derive(Debug, Default, Clone, Serialize)]
pub struct LoadStats {
    pub courses_created: usize,
    pub courses_updated: usize,
    pub modules_created: usize,
    pub modules_updated: usize,
    pub microlessons_created: usize,
    pub microlessons_updated: usize,
    pub exercises_created: usize,
    pub lessons_created: usize,
    pub lessons_updated: usize,
    pub labs_created: usize,
    pub labs_updated: usize,
    pub quizzes_created: usize,
    pub quizzes_updated: usize,
    pub warnings: Vec<String>,
    pub failures: Vec<LoadFailure>,
}

impl LoadStats {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

impl fmt::Display for LoadStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(f, "Course Loading Summary")?;
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(
            f,
            "Courses:      {} created, {} updated",
            self.courses_created, self.courses_updated
        )?;
        writeln!(
            f,
            "Modules:      {} created, {} updated",
            self.modules_created, self.modules_updated
        )?;
        writeln!(
            f,
            "Microlessons: {} created, {} updated",
            self.microlessons_created, self.microlessons_updated
        )?;
        writeln!(f, "Exercises:    {} created", self.exercises_created)?;
        writeln!(
            f,
            "Lessons:      {} created, {} updated",
            self.lessons_created, self.lessons_updated
        )?;
        writeln!(
            f,
            "Labs:         {} created, {} updated",
            self.labs_created, self.labs_updated
        )?;
        writeln!(
            f,
            "Quizzes:      {} created, {} updated",
            self.quizzes_created, self.quizzes_updated
        )?;

        if !self.warnings.is_empty() {
            writeln!(f, "\nWarnings: {}", self.warnings.len())?;
            for warning in &self.warnings {
                writeln!(f, "  - {warning}")?;
            }
        }

        if !self.failures.is_empty() {
            writeln!(f, "\nFailures: {}", self.failures.len())?;
            for failure in &self.failures {
                writeln!(
                    f,
                    "  - {} ({}): {}",
                    failure.course,
                    failure.file.display(),
                    failure.kind
                )?;
                for message in &failure.messages {
                    writeln!(f, "      {message}")?;
                }
            }
        }

        write!(f, "{}", "=".repeat(60))
    }
}
