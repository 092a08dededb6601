use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use registrar_core::ids::CourseName;
use registrar_engine::{Registry, RegistryConfig};
use registrar_telemetry::{init_telemetry, TelemetryConfig};

#[derive(Parser)]
#[command(name = "registrar", about = "Course-enrollment registry over flat record files")]
struct Cli {
    /// Course records file.
    #[arg(long, global = true)]
    courses: Option<PathBuf>,
    /// Student records file.
    #[arg(long, global = true)]
    students: Option<PathBuf>,
    /// Write records back to the source files after the operation.
    #[arg(long, global = true)]
    save: bool,
    /// Machine-readable output.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the course catalog.
    Courses,
    /// Show the authenticated student's schedule.
    Schedule {
        #[arg(long)]
        id: String,
        #[arg(long)]
        password: String,
    },
    /// Enroll the authenticated student in a course.
    Enroll {
        #[arg(long)]
        id: String,
        #[arg(long)]
        password: String,
        course: String,
    },
    /// Drop the authenticated student from a course.
    Drop {
        #[arg(long)]
        id: String,
        #[arg(long)]
        password: String,
        course: String,
    },
}

fn main() -> Result<()> {
    init_telemetry(&TelemetryConfig::default());
    let cli = Cli::parse();

    let mut registry = Registry::with_config(RegistryConfig::default())?;
    tracing::debug!("registry ready");
    if let Some(path) = &cli.courses {
        registry.load_courses(path)?;
    }
    if let Some(path) = &cli.students {
        registry.load_students(path)?;
    }

    match &cli.command {
        Command::Courses => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(registry.list_all_courses())?);
            } else {
                for course in registry.list_all_courses() {
                    println!("{course}");
                }
            }
        }
        Command::Schedule { id, password } => {
            authenticate(&mut registry, id, password)?;
            let schedule = registry.list_user_courses()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&schedule)?);
            } else {
                for course in schedule {
                    println!("{course}");
                }
            }
        }
        Command::Enroll { id, password, course } => {
            authenticate(&mut registry, id, password)?;
            let name = CourseName::new(course.clone());
            let enrolled = registry.add_user_to_course(&name)?;
            report_outcome(cli.json, "enrolled", course, enrolled)?;
        }
        Command::Drop { id, password, course } => {
            authenticate(&mut registry, id, password)?;
            let name = CourseName::new(course.clone());
            let dropped = registry.remove_user_from_course(&name)?;
            report_outcome(cli.json, "dropped", course, dropped)?;
        }
    }

    if cli.save {
        if cli.courses.is_some() {
            registry.save_courses()?;
        }
        if cli.students.is_some() {
            registry.save_students()?;
        }
    }

    Ok(())
}

fn authenticate(registry: &mut Registry, id: &str, password: &str) -> Result<()> {
    if !registry.login(id, password) {
        bail!("login failed for {id}");
    }
    Ok(())
}

fn report_outcome(json: bool, action: &str, course: &str, succeeded: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::json!({ "course": course, "action": action, "succeeded": succeeded })
        );
    } else if succeeded {
        println!("{action}: {course}");
    } else {
        println!("rejected: {course}");
    }
    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}
