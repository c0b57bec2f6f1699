//! Auth collaborator port.
//!
//! The workbench and dashboard never authenticate anyone themselves: they
//! ask an `AuthProvider` for the current session and refuse to touch
//! persistence without one. Views subscribe to session changes through a
//! `tokio::sync::watch` channel and redirect to sign-in when it empties.

pub mod watch;

use std::future::Future;
use std::sync::Arc;

use ocforge_types::error::AuthError;
use ocforge_types::user::{Credentials, Session, User};

pub use watch::SessionWatch;

/// Session lifecycle operations offered by the auth service.
pub trait AuthProvider: Send + Sync {
    /// The active session, if any.
    fn current_session(&self) -> impl Future<Output = Result<Option<Session>, AuthError>> + Send;

    /// Authenticate with existing credentials and make the session active.
    fn sign_in(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Session, AuthError>> + Send;

    /// Register a new account and make its session active.
    fn sign_up(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Session, AuthError>> + Send;

    /// End the active session. No-op when signed out.
    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>> + Send;

    /// Receive every change of the active session.
    fn subscribe(&self) -> tokio::sync::watch::Receiver<Option<Session>>;
}

impl<T: AuthProvider> AuthProvider for Arc<T> {
    fn current_session(&self) -> impl Future<Output = Result<Option<Session>, AuthError>> + Send {
        (**self).current_session()
    }

    fn sign_in(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Session, AuthError>> + Send {
        (**self).sign_in(credentials)
    }

    fn sign_up(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Session, AuthError>> + Send {
        (**self).sign_up(credentials)
    }

    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>> + Send {
        (**self).sign_out()
    }

    fn subscribe(&self) -> tokio::sync::watch::Receiver<Option<Session>> {
        (**self).subscribe()
    }
}

/// Resolve the signed-in user or fail with `AuthError::NotSignedIn`.
pub async fn require_user<A: AuthProvider>(auth: &A) -> Result<User, AuthError> {
    auth.current_session()
        .await?
        .map(|session| session.user)
        .ok_or(AuthError::NotSignedIn)
}
