pub mod course;
pub mod errors;
pub mod ids;
pub mod security;
pub mod users;

pub use course::Course;
pub use errors::ValidationError;
pub use security::{ConfigError, HashScheme, PasswordHash};
pub use users::{Enrollment, Identity, Student};
