use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::errors::ValidationError;
use crate::ids::{CourseName, UserId};
use crate::users::Student;

/// Minimum credit hours.
pub const MIN_HOURS: u8 = 1;
/// Maximum credit hours.
pub const MAX_HOURS: u8 = 4;

/// A course in the catalog. Tracks its own roster and enforces capacity and
/// duplicate checks on enroll/drop. Identity is the name alone.
#[derive(Clone, Debug, Serialize)]
pub struct Course {
    name: CourseName,
    credits: u8,
    capacity: usize,
    roster: Vec<UserId>,
}

impl Course {
    pub fn new(
        name: impl Into<String>,
        credits: u8,
        capacity: usize,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyField { field: "name" });
        }
        if !(MIN_HOURS..=MAX_HOURS).contains(&credits) {
            return Err(ValidationError::CreditsOutOfRange { credits });
        }
        if capacity == 0 {
            return Err(ValidationError::CapacityNotPositive);
        }
        Ok(Self {
            name: CourseName::new(name),
            credits,
            capacity,
            roster: Vec::new(),
        })
    }

    pub fn name(&self) -> &CourseName {
        &self.name
    }

    pub fn credits(&self) -> u8 {
        self.credits
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Enrolled student ids, in enrollment order.
    pub fn roster(&self) -> &[UserId] {
        &self.roster
    }

    pub fn enrollment_count(&self) -> usize {
        self.roster.len()
    }

    /// Capacity can grow or shrink, but never below the current enrollment.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<(), ValidationError> {
        if capacity == 0 {
            return Err(ValidationError::CapacityNotPositive);
        }
        if capacity < self.roster.len() {
            return Err(ValidationError::CapacityBelowEnrollment {
                requested: capacity,
                enrolled: self.roster.len(),
            });
        }
        self.capacity = capacity;
        Ok(())
    }

    /// True iff there is room and the student is not already on the roster.
    /// Side-effect-free.
    pub fn can_enroll(&self, student: &Student) -> bool {
        self.roster.len() < self.capacity && !self.roster.contains(student.id())
    }

    /// Re-checks eligibility before appending; a rejected enroll leaves the
    /// roster untouched.
    pub fn enroll(&mut self, student: &Student) -> bool {
        if !self.can_enroll(student) {
            return false;
        }
        self.roster.push(student.id().clone());
        true
    }

    /// Removes the student from the roster if present; returns whether a
    /// removal occurred.
    pub fn drop_student(&mut self, id: &UserId) -> bool {
        let before = self.roster.len();
        self.roster.retain(|enrolled| enrolled != id);
        self.roster.len() < before
    }
}

// Equality and hashing are keyed solely on the name so that records loaded
// with differing credits/capacity still de-duplicate.
impl PartialEq for Course {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Course {}

impl Hash for Course {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Record-line shape: `name,credits,capacity`.
impl std::fmt::Display for Course {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.name, self.credits, self.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::HashScheme;
    use crate::users::Identity;

    fn student(id: &str) -> Student {
        let identity = Identity::new(
            "Jane",
            "Doe",
            id,
            "jdoe@example.edu",
            HashScheme::default().hash("pw"),
        )
        .unwrap();
        Student::with_default_credits(identity)
    }

    #[test]
    fn new_rejects_empty_name() {
        assert_eq!(
            Course::new("", 3, 10).unwrap_err(),
            ValidationError::EmptyField { field: "name" }
        );
    }

    #[test]
    fn new_rejects_credits_out_of_range() {
        assert!(Course::new("CSC216", 0, 10).is_err());
        assert!(Course::new("CSC216", 5, 10).is_err());
        assert!(Course::new("CSC216", 1, 10).is_ok());
        assert!(Course::new("CSC216", 4, 10).is_ok());
    }

    #[test]
    fn new_rejects_zero_capacity() {
        assert_eq!(
            Course::new("CSC216", 3, 0).unwrap_err(),
            ValidationError::CapacityNotPositive
        );
    }

    #[test]
    fn capacity_limit_holds() {
        let mut course = Course::new("CSC216", 3, 10).unwrap();
        course.set_capacity(1).unwrap();

        let a = student("a");
        let b = student("b");
        assert!(course.enroll(&a));
        assert!(!course.enroll(&b));
        assert_eq!(course.enrollment_count(), 1);
        assert!(course.enrollment_count() <= course.capacity());
    }

    #[test]
    fn enroll_twice_is_rejected_without_duplicate() {
        let mut course = Course::new("CSC216", 3, 10).unwrap();
        let a = student("a");
        assert!(course.enroll(&a));
        assert!(!course.enroll(&a));
        assert_eq!(course.roster(), &[a.id().clone()]);
    }

    #[test]
    fn drop_reports_whether_removed() {
        let mut course = Course::new("CSC216", 3, 10).unwrap();
        let a = student("a");
        course.enroll(&a);
        assert!(course.drop_student(a.id()));
        assert!(!course.drop_student(a.id()));
        assert_eq!(course.enrollment_count(), 0);
    }

    #[test]
    fn set_capacity_never_below_enrollment() {
        let mut course = Course::new("CSC216", 3, 10).unwrap();
        course.enroll(&student("a"));
        course.enroll(&student("b"));
        assert_eq!(
            course.set_capacity(1).unwrap_err(),
            ValidationError::CapacityBelowEnrollment { requested: 1, enrolled: 2 }
        );
        assert!(course.set_capacity(2).is_ok());
        assert!(course.set_capacity(0).is_err());
    }

    #[test]
    fn equality_is_by_name_only() {
        let a = Course::new("CSC216", 3, 10).unwrap();
        let b = Course::new("CSC216", 1, 250).unwrap();
        let c = Course::new("CSC230", 3, 10).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn roster_preserves_insertion_order() {
        let mut course = Course::new("CSC216", 3, 10).unwrap();
        for id in ["c", "a", "b"] {
            course.enroll(&student(id));
        }
        let order: Vec<&str> = course.roster().iter().map(|id| id.as_str()).collect();
        assert_eq!(order, ["c", "a", "b"]);
    }

    #[test]
    fn display_is_record_line_shape() {
        let course = Course::new("CSC216", 3, 10).unwrap();
        assert_eq!(course.to_string(), "CSC216,3,10");
    }
}
