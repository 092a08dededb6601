use registrar_store::StoreError;

/// Structural failures of registry operations. Business-rule rejections
/// (failed enrollment, failed login) are boolean outcomes, not errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("not logged in")]
    NotLoggedIn,

    #[error("no {0} file on record")]
    NoSourceFile(&'static str),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
