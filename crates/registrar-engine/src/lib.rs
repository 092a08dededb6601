pub mod error;
pub mod registry;
pub mod session;

pub use error::RegistryError;
pub use registry::{Registry, RegistryConfig};
pub use session::Session;
