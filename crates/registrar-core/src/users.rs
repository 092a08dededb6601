use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::course::Course;
use crate::errors::ValidationError;
use crate::ids::{CourseName, UserId};
use crate::security::PasswordHash;

/// Maximum credit load any student may carry.
pub const MAX_CREDITS: u8 = 18;

/// The generic user identity: who a person is, independent of academic
/// state. Password arrives pre-hashed; plaintext never survives construction.
#[derive(Clone, Debug)]
pub struct Identity {
    first_name: String,
    last_name: String,
    id: UserId,
    email: String,
    password: PasswordHash,
}

impl Identity {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        id: impl Into<String>,
        email: impl Into<String>,
        password: PasswordHash,
    ) -> Result<Self, ValidationError> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        let id = id.into();
        let email = email.into();
        if first_name.is_empty() {
            return Err(ValidationError::EmptyField { field: "first name" });
        }
        if last_name.is_empty() {
            return Err(ValidationError::EmptyField { field: "last name" });
        }
        if id.is_empty() {
            return Err(ValidationError::EmptyField { field: "id" });
        }
        if email.is_empty() {
            return Err(ValidationError::EmptyField { field: "email" });
        }
        if !email.contains('@') {
            return Err(ValidationError::InvalidEmail { value: email });
        }
        Ok(Self {
            first_name,
            last_name,
            id: UserId::new(id),
            email,
            password,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &PasswordHash {
        &self.password
    }
}

// Identity equality is by id alone.
impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Identity {}

/// One entry in a student's schedule: the course name plus that course's
/// credit value at enrollment time.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Enrollment {
    course: CourseName,
    credits: u8,
}

impl Enrollment {
    pub fn course(&self) -> &CourseName {
        &self.course
    }

    pub fn credits(&self) -> u8 {
        self.credits
    }
}

/// A student: an identity plus academic state. The schedule is mutated only
/// through add/remove, and the credit-load invariant
/// `current_credits() <= max_credits` holds after every operation.
#[derive(Clone, Debug)]
pub struct Student {
    identity: Identity,
    max_credits: u8,
    schedule: Vec<Enrollment>,
}

impl Student {
    pub fn new(identity: Identity, max_credits: u8) -> Result<Self, ValidationError> {
        if max_credits > MAX_CREDITS {
            return Err(ValidationError::MaxCreditsOutOfRange { max_credits });
        }
        Ok(Self {
            identity,
            max_credits,
            schedule: Vec::new(),
        })
    }

    pub fn with_default_credits(identity: Identity) -> Self {
        Self {
            identity,
            max_credits: MAX_CREDITS,
            schedule: Vec::new(),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn id(&self) -> &UserId {
        self.identity.id()
    }

    pub fn password(&self) -> &PasswordHash {
        self.identity.password()
    }

    pub fn max_credits(&self) -> u8 {
        self.max_credits
    }

    /// Enrollments in insertion order.
    pub fn schedule(&self) -> &[Enrollment] {
        &self.schedule
    }

    /// Current credit load, recomputed on demand from the schedule. Not
    /// cached, so it cannot drift.
    pub fn current_credits(&self) -> u32 {
        self.schedule.iter().map(|e| u32::from(e.credits)).sum()
    }

    pub fn set_max_credits(&mut self, max_credits: u8) -> Result<(), ValidationError> {
        if max_credits > MAX_CREDITS {
            return Err(ValidationError::MaxCreditsOutOfRange { max_credits });
        }
        let load = self.current_credits();
        if u32::from(max_credits) < load {
            return Err(ValidationError::MaxCreditsBelowLoad {
                requested: max_credits,
                load,
            });
        }
        self.max_credits = max_credits;
        Ok(())
    }

    /// True iff adding the course keeps the load within `max_credits` and the
    /// course is not already on the schedule. Side-effect-free.
    pub fn can_add_course(&self, course: &Course) -> bool {
        self.current_credits() + u32::from(course.credits()) <= u32::from(self.max_credits)
            && !self.schedule.iter().any(|e| e.course() == course.name())
    }

    /// Re-checks eligibility before appending; a rejected add leaves the
    /// schedule untouched.
    pub fn add_course(&mut self, course: &Course) -> bool {
        if !self.can_add_course(course) {
            return false;
        }
        self.schedule.push(Enrollment {
            course: course.name().clone(),
            credits: course.credits(),
        });
        true
    }

    /// Removes the course from the schedule if present; returns whether
    /// removed.
    pub fn remove_course(&mut self, name: &CourseName) -> bool {
        let before = self.schedule.len();
        self.schedule.retain(|e| e.course() != name);
        self.schedule.len() < before
    }
}

// Full-object equality: identity (by id) plus schedule plus max_credits.
impl PartialEq for Student {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
            && self.schedule == other.schedule
            && self.max_credits == other.max_credits
    }
}

impl Eq for Student {}

impl Hash for Student {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.id().hash(state);
        self.schedule.hash(state);
        self.max_credits.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::HashScheme;

    fn identity(id: &str) -> Identity {
        Identity::new(
            "Jane",
            "Doe",
            id,
            "jdoe@example.edu",
            HashScheme::default().hash("pw"),
        )
        .unwrap()
    }

    fn course(name: &str, credits: u8) -> Course {
        Course::new(name, credits, 10).unwrap()
    }

    #[test]
    fn identity_rejects_empty_fields() {
        let hash = HashScheme::default().hash("pw");
        assert!(Identity::new("", "Doe", "jdoe", "j@x.edu", hash.clone()).is_err());
        assert!(Identity::new("Jane", "", "jdoe", "j@x.edu", hash.clone()).is_err());
        assert!(Identity::new("Jane", "Doe", "", "j@x.edu", hash.clone()).is_err());
        assert!(Identity::new("Jane", "Doe", "jdoe", "", hash).is_err());
    }

    #[test]
    fn identity_rejects_malformed_email() {
        let hash = HashScheme::default().hash("pw");
        assert_eq!(
            Identity::new("Jane", "Doe", "jdoe", "not-an-email", hash).unwrap_err(),
            ValidationError::InvalidEmail { value: "not-an-email".into() }
        );
    }

    #[test]
    fn new_rejects_max_credits_above_cap() {
        assert_eq!(
            Student::new(identity("jdoe"), 19).unwrap_err(),
            ValidationError::MaxCreditsOutOfRange { max_credits: 19 }
        );
        assert!(Student::new(identity("jdoe"), 0).is_ok());
    }

    #[test]
    fn default_max_credits_is_eighteen() {
        let s = Student::with_default_credits(identity("jdoe"));
        assert_eq!(s.max_credits(), 18);
    }

    #[test]
    fn credit_cap_rejects_oversized_course() {
        let mut s = Student::new(identity("jdoe"), 3).unwrap();
        let big = course("CSC216", 4);
        assert!(!s.can_add_course(&big));
        assert!(!s.add_course(&big));
        assert_eq!(s.current_credits(), 0);
    }

    #[test]
    fn credit_load_invariant_holds_across_operations() {
        let mut s = Student::new(identity("jdoe"), 7).unwrap();
        assert!(s.add_course(&course("CSC216", 3)));
        assert!(s.add_course(&course("CSC230", 4)));
        assert!(!s.add_course(&course("CSC316", 1)));
        assert!(s.current_credits() <= u32::from(s.max_credits()));

        assert!(s.remove_course(&CourseName::new("CSC230")));
        assert!(s.add_course(&course("CSC316", 1)));
        assert_eq!(s.current_credits(), 4);
    }

    #[test]
    fn add_course_twice_is_rejected() {
        let mut s = Student::with_default_credits(identity("jdoe"));
        let c = course("CSC216", 3);
        assert!(s.add_course(&c));
        assert!(!s.add_course(&c));
        assert_eq!(s.schedule().len(), 1);
        assert_eq!(s.current_credits(), 3);
    }

    #[test]
    fn remove_course_reports_whether_removed() {
        let mut s = Student::with_default_credits(identity("jdoe"));
        s.add_course(&course("CSC216", 3));
        assert!(s.remove_course(&CourseName::new("CSC216")));
        assert!(!s.remove_course(&CourseName::new("CSC216")));
    }

    #[test]
    fn set_max_credits_never_below_load() {
        let mut s = Student::with_default_credits(identity("jdoe"));
        s.add_course(&course("CSC216", 3));
        assert_eq!(
            s.set_max_credits(2).unwrap_err(),
            ValidationError::MaxCreditsBelowLoad { requested: 2, load: 3 }
        );
        assert!(s.set_max_credits(3).is_ok());
        assert!(s.set_max_credits(19).is_err());
    }

    #[test]
    fn equality_covers_schedule_and_max_credits() {
        let mut a = Student::with_default_credits(identity("jdoe"));
        let b = Student::with_default_credits(identity("jdoe"));
        assert_eq!(a, b);

        a.add_course(&course("CSC216", 3));
        assert_ne!(a, b);

        let c = Student::with_default_credits(identity("other"));
        assert_ne!(b, c);
    }
}
