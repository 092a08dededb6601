pub mod error;
pub mod records;

pub use error::StoreError;
pub use records::{
    read_course_records, read_student_records, write_course_records, write_student_records,
};
