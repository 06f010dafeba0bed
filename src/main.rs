use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use syllabus::db::Database;
use syllabus::loader::{discover_lesson_files, discover_manifests, CourseLoader, LoadOptions};
use syllabus::validator::{self, DocumentKind, ValidationOutcome};

#[derive(Parser)]
#[command(name = "syllabus")]
#[command(about = "Load YAML course content into the content database")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover and load course content from base directories
    Load {
        /// Base directories to scan (defaults to the conventional content paths)
        dirs: Vec<PathBuf>,

        /// Skip schema validation before loading
        #[arg(long)]
        no_validate: bool,

        /// Suppress per-entity progress logs
        #[arg(short, long)]
        quiet: bool,

        /// Database file path (defaults to the per-user data directory)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Validate manifests without writing anything
    Validate {
        /// Base directories to scan (defaults to the conventional content paths)
        dirs: Vec<PathBuf>,
    },
    /// Run pending database migrations and exit
    Migrate {
        /// Database file path (defaults to the per-user data directory)
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn init_tracing(quiet: bool) {
    let default_directive = if quiet { "syllabus=warn" } else { "syllabus=info" };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_directive.into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn report_outcome(path: &Path, outcome: &ValidationOutcome) -> bool {
    for warning in &outcome.warnings {
        println!("WARN  {}: {warning}", path.display());
    }
    if outcome.is_valid() {
        println!("OK    {}", path.display());
        true
    } else {
        for error in &outcome.errors {
            println!("ERROR {}: {error}", path.display());
        }
        false
    }
}

fn open_database(path: Option<PathBuf>) -> anyhow::Result<Database> {
    let db = match path {
        Some(path) => Database::open(path)?,
        None => Database::open_default()?,
    };
    db.migrate()?;
    Ok(db)
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Load {
            dirs,
            no_validate,
            quiet,
            db,
        }) => {
            init_tracing(quiet);

            let db = open_database(db)?;
            let options = LoadOptions {
                validate: !no_validate,
                verbose: !quiet,
            };

            let base_paths = if dirs.is_empty() {
                CourseLoader::default_base_paths()
            } else {
                dirs
            };

            let stats = CourseLoader::new(db, options).load_all(&base_paths);
            println!("{stats}");

            // Per-file failures are reported in the summary but do not fail
            // the process; a load that saved nine of ten courses is still a
            // useful load.
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Validate { dirs }) => {
            init_tracing(false);

            let base_paths = if dirs.is_empty() {
                CourseLoader::default_base_paths()
            } else {
                dirs
            };

            let mut invalid = 0usize;
            let mut checked = 0usize;

            for dir in &base_paths {
                if !dir.is_dir() {
                    tracing::warn!("Directory not found: {}", dir.display());
                    continue;
                }

                for manifest in discover_manifests(dir)? {
                    checked += 1;
                    let outcome = validator::validate_file(&manifest, DocumentKind::Manifest);
                    if !report_outcome(&manifest, &outcome) {
                        invalid += 1;
                    }

                    let course_dir = manifest.parent().unwrap_or(Path::new("."));
                    for lesson in discover_lesson_files(course_dir) {
                        checked += 1;
                        let outcome =
                            validator::validate_file(&lesson, DocumentKind::Microlesson);
                        if !report_outcome(&lesson, &outcome) {
                            invalid += 1;
                        }
                    }
                }
            }

            println!("{checked} file(s) checked, {invalid} invalid");
            if invalid > 0 {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Some(Commands::Migrate { db }) => {
            init_tracing(false);
            open_database(db)?;
            println!("Database is up to date");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            init_tracing(false);

            let db = open_database(None)?;
            let stats = CourseLoader::new(db, LoadOptions::default())
                .load_all(&CourseLoader::default_base_paths());
            println!("{stats}");
            Ok(ExitCode::SUCCESS)
        }
    }
}
