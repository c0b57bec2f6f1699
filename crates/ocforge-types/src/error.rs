use thiserror::Error;

/// Errors from repository operations (used by trait definitions in ocforge-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from the auth collaborator.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email '{0}' is already registered")]
    EmailTaken(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("not signed in")]
    NotSignedIn,

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for AuthError {
    fn from(err: RepositoryError) -> Self {
        AuthError::Storage(err.to_string())
    }
}

/// Errors surfaced by workbench actions. None of them invalidates the draft.
#[derive(Debug, Error)]
pub enum WorkbenchError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("sign in required")]
    AuthenticationRequired,

    #[error("character not found")]
    NotFound,

    #[error("service error: {0}")]
    Collaborator(String),
}

impl WorkbenchError {
    /// Whether the caller should send the user to the sign-in view.
    pub fn requires_sign_in(&self) -> bool {
        matches!(self, WorkbenchError::AuthenticationRequired)
    }
}

/// Errors surfaced by the dashboard list view.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("sign in required")]
    AuthenticationRequired,

    #[error("character not found")]
    NotFound,

    #[error("service error: {0}")]
    Collaborator(String),
}
