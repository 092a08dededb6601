use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use registrar_core::course::Course;
use registrar_core::ids::CourseName;
use registrar_core::security::{ConfigError, HashScheme};
use registrar_core::users::Student;
use registrar_store::records;

use crate::error::RegistryError;
use crate::session::Session;

/// Registry construction options.
#[derive(Clone, Debug)]
pub struct RegistryConfig {
    /// Password-hash algorithm name. Resolved once at construction; an
    /// unknown name fails here, never at login time.
    pub hash_algorithm: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            hash_algorithm: registrar_core::security::DEFAULT_HASH_ALGORITHM.to_string(),
        }
    }
}

/// The enrollment manager. Owns the course catalog, the student body, and
/// the single current session, and coordinates the cross-entity invariant:
/// an enrollment exists only when both the course and the student agree.
///
/// Explicitly constructed and passed by handle; construct one per test.
pub struct Registry {
    courses: Vec<Course>,
    students: Vec<Student>,
    session: Option<Session>,
    course_file: Option<PathBuf>,
    student_file: Option<PathBuf>,
    scheme: HashScheme,
}

impl Registry {
    pub fn new() -> Self {
        Self::from_scheme(HashScheme::default())
    }

    pub fn with_config(config: RegistryConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_scheme(HashScheme::from_name(&config.hash_algorithm)?))
    }

    fn from_scheme(scheme: HashScheme) -> Self {
        Self {
            courses: Vec::new(),
            students: Vec::new(),
            session: None,
            course_file: None,
            student_file: None,
            scheme,
        }
    }

    // --- session ---

    /// Logs the student in if no session is active and the credentials
    /// match. A false return is a rejection, not an error.
    #[instrument(skip(self, password))]
    pub fn login(&mut self, id: &str, password: &str) -> bool {
        if self.session.is_some() {
            debug!("login rejected: a session is already active");
            return false;
        }
        let Some(student) = self.students.iter().find(|s| s.id().as_str() == id) else {
            debug!("login rejected: no such student");
            return false;
        };
        if !self.scheme.verify(password, student.password()) {
            debug!("login rejected: password mismatch");
            return false;
        }
        let user_id = student.id().clone();
        info!(user_id = %user_id, "logged in");
        self.session = Some(Session::start(user_id));
        true
    }

    /// Clears the session unconditionally.
    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            let duration = chrono::Utc::now() - session.logged_in_at();
            info!(
                user_id = %session.user_id(),
                duration_secs = duration.num_seconds(),
                "logged out"
            );
        }
    }

    pub fn current_user(&self) -> Option<&Student> {
        let session = self.session.as_ref()?;
        self.students.iter().find(|s| s.id() == session.user_id())
    }

    // --- catalog and student body ---

    /// Idempotent insert: a course with an already-registered name is a
    /// silent no-op.
    pub fn add_course(&mut self, course: Course) {
        if self.courses.iter().any(|c| c == &course) {
            return;
        }
        self.courses.push(course);
    }

    /// Idempotent insert: a student with an already-registered id is a
    /// silent no-op.
    pub fn add_student(&mut self, student: Student) {
        if self.students.iter().any(|s| s.id() == student.id()) {
            return;
        }
        self.students.push(student);
    }

    pub fn course_by_name(&self, name: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.name().as_str() == name)
    }

    /// All registered courses, insertion order.
    pub fn list_all_courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    // --- enrollment ---

    /// The session user's enrolled courses, in enrollment order, resolved
    /// against the catalog.
    pub fn list_user_courses(&self) -> Result<Vec<&Course>, RegistryError> {
        let student = self.current_user().ok_or(RegistryError::NotLoggedIn)?;
        let mut courses = Vec::with_capacity(student.schedule().len());
        for enrollment in student.schedule() {
            match self.courses.iter().find(|c| c.name() == enrollment.course()) {
                Some(course) => courses.push(course),
                None => debug!(
                    course = %enrollment.course(),
                    "schedule references an unregistered course"
                ),
            }
        }
        Ok(courses)
    }

    /// Enrolls the session user in the named course. Both sides must agree
    /// before either side mutates: the student must be credit-eligible and
    /// the course must have room and not already list the user. On any
    /// rejection — including an unknown course name — nothing changes and
    /// the result is `Ok(false)`.
    #[instrument(skip(self))]
    pub fn add_user_to_course(&mut self, name: &CourseName) -> Result<bool, RegistryError> {
        let session = self.session.as_ref().ok_or(RegistryError::NotLoggedIn)?;
        let Some(ci) = self.courses.iter().position(|c| c.name() == name) else {
            debug!("enrollment rejected: unknown course");
            return Ok(false);
        };
        let Some(si) = self
            .students
            .iter()
            .position(|s| s.id() == session.user_id())
        else {
            debug!("enrollment rejected: session user not in student body");
            return Ok(false);
        };

        let eligible = {
            let course = &self.courses[ci];
            let student = &self.students[si];
            student.can_add_course(course) && course.can_enroll(student)
        };
        if !eligible {
            debug!("enrollment rejected");
            return Ok(false);
        }

        let added = self.students[si].add_course(&self.courses[ci]);
        let enrolled = {
            let student = &self.students[si];
            self.courses[ci].enroll(student)
        };
        info!(course = %name, "enrolled");
        Ok(added && enrolled)
    }

    /// Drops the session user from the named course. The course-roster drop
    /// is best-effort and unreported; the returned bool is whether the
    /// student-side removal occurred. Dropping a course the user is not
    /// rostered in is a no-op on that side, not a failure signal.
    #[instrument(skip(self))]
    pub fn remove_user_from_course(&mut self, name: &CourseName) -> Result<bool, RegistryError> {
        let session = self.session.as_ref().ok_or(RegistryError::NotLoggedIn)?;
        let user_id = session.user_id().clone();
        if let Some(course) = self.courses.iter_mut().find(|c| c.name() == name) {
            course.drop_student(&user_id);
        }
        let Some(student) = self.students.iter_mut().find(|s| s.id() == &user_id) else {
            return Ok(false);
        };
        let removed = student.remove_course(name);
        if removed {
            info!(course = %name, "dropped");
        }
        Ok(removed)
    }

    // --- persistence ---

    /// Loads course records and folds them into the catalog via the
    /// idempotent add. Remembers the path for save-back.
    #[instrument(skip(self))]
    pub fn load_courses(&mut self, path: &Path) -> Result<(), RegistryError> {
        self.course_file = Some(path.to_owned());
        let loaded = records::read_course_records(path)?;
        let count = loaded.len();
        for course in loaded {
            self.add_course(course);
        }
        info!(count, "course records loaded");
        Ok(())
    }

    /// Loads student records, resolving trailing course names against the
    /// already-loaded catalog. Remembers the path for save-back.
    #[instrument(skip(self))]
    pub fn load_students(&mut self, path: &Path) -> Result<(), RegistryError> {
        self.student_file = Some(path.to_owned());
        let loaded = records::read_student_records(path, |name| {
            self.courses.iter().find(|c| c.name().as_str() == name)
        })?;
        let count = loaded.len();
        for student in loaded {
            self.add_student(student);
        }
        info!(count, "student records loaded");
        Ok(())
    }

    /// Writes the catalog back to the remembered course file.
    #[instrument(skip(self))]
    pub fn save_courses(&self) -> Result<(), RegistryError> {
        let path = self
            .course_file
            .as_deref()
            .ok_or(RegistryError::NoSourceFile("course"))?;
        records::write_course_records(path, &self.courses)?;
        info!(count = self.courses.len(), "course records saved");
        Ok(())
    }

    /// Writes the student body back to the remembered student file.
    #[instrument(skip(self))]
    pub fn save_students(&self) -> Result<(), RegistryError> {
        let path = self
            .student_file
            .as_deref()
            .ok_or(RegistryError::NoSourceFile("student"))?;
        records::write_student_records(path, &self.students)?;
        info!(count = self.students.len(), "student records saved");
        Ok(())
    }

    /// Drops all courses, students, and the session, and forgets the
    /// remembered file paths. Nothing is saved first.
    pub fn clear_data(&mut self) {
        self.courses.clear();
        self.students.clear();
        self.session = None;
        self.course_file = None;
        self.student_file = None;
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
