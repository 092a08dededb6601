//! Line-oriented record codecs for course and student files.
//!
//! One comma-delimited record per line. A malformed line is skipped with a
//! warning; it never aborts the load. A missing file is a typed failure.

use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{instrument, warn};

use registrar_core::course::Course;
use registrar_core::security::PasswordHash;
use registrar_core::users::{Identity, Student};

use crate::error::StoreError;

/// Reads course records (`name,credits,capacity`) from the given file.
#[instrument]
pub fn read_course_records(path: &Path) -> Result<Vec<Course>, StoreError> {
    let text = read_file(path)?;
    let mut courses = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        match parse_course_line(line) {
            Ok(course) => courses.push(course),
            Err(reason) => warn!(line = idx + 1, %reason, "skipping malformed course record"),
        }
    }
    Ok(courses)
}

/// Reads student records from the given file. Trailing fields are course
/// names, resolved against the already-loaded catalog via `lookup`; a name
/// that does not resolve, or an enrollment the student's credit cap rejects,
/// discards the whole line.
#[instrument(skip(lookup))]
pub fn read_student_records<'c, F>(path: &Path, lookup: F) -> Result<Vec<Student>, StoreError>
where
    F: Fn(&str) -> Option<&'c Course>,
{
    let text = read_file(path)?;
    let mut students = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        match parse_student_line(line, &lookup) {
            Ok(student) => students.push(student),
            Err(reason) => warn!(line = idx + 1, %reason, "skipping malformed student record"),
        }
    }
    Ok(students)
}

/// Writes course records in the given order, overwriting the destination.
#[instrument(skip(courses), fields(count = courses.len()))]
pub fn write_course_records(path: &Path, courses: &[Course]) -> Result<(), StoreError> {
    let mut out = String::new();
    for course in courses {
        let _ = writeln!(out, "{course}");
    }
    std::fs::write(path, out)?;
    Ok(())
}

/// Writes student records in the given order, overwriting the destination.
/// The stored password digest is serialized here and nowhere else.
#[instrument(skip(students), fields(count = students.len()))]
pub fn write_student_records(path: &Path, students: &[Student]) -> Result<(), StoreError> {
    let mut out = String::new();
    for student in students {
        let identity = student.identity();
        let _ = write!(
            out,
            "{},{},{},{},{},{}",
            identity.first_name(),
            identity.last_name(),
            identity.id(),
            identity.email(),
            identity.password().expose(),
            student.max_credits(),
        );
        for enrollment in student.schedule() {
            let _ = write!(out, ",{}", enrollment.course());
        }
        out.push('\n');
    }
    std::fs::write(path, out)?;
    Ok(())
}

fn read_file(path: &Path) -> Result<String, StoreError> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            StoreError::NotFound(path.display().to_string())
        } else {
            StoreError::Io(e.to_string())
        }
    })
}

fn parse_course_line(line: &str) -> Result<Course, String> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 3 {
        return Err(format!("expected 3 fields, got {}", fields.len()));
    }
    let credits: u8 = fields[1]
        .parse()
        .map_err(|_| format!("non-integer credits: {}", fields[1]))?;
    let capacity: usize = fields[2]
        .parse()
        .map_err(|_| format!("non-integer capacity: {}", fields[2]))?;
    Course::new(fields[0], credits, capacity).map_err(|e| e.to_string())
}

fn parse_student_line<'c, F>(line: &str, lookup: &F) -> Result<Student, String>
where
    F: Fn(&str) -> Option<&'c Course>,
{
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 6 {
        return Err(format!("expected at least 6 fields, got {}", fields.len()));
    }
    let max_credits: u8 = fields[5]
        .parse()
        .map_err(|_| format!("non-integer max credits: {}", fields[5]))?;
    let identity = Identity::new(
        fields[0],
        fields[1],
        fields[2],
        fields[3],
        PasswordHash::from_digest(fields[4]),
    )
    .map_err(|e| e.to_string())?;
    let mut student = Student::new(identity, max_credits).map_err(|e| e.to_string())?;
    for &name in &fields[6..] {
        let course = lookup(name).ok_or_else(|| format!("unknown course: {name}"))?;
        if !student.add_course(course) {
            return Err(format!("enrollment rejected: {name}"));
        }
    }
    Ok(student)
}
