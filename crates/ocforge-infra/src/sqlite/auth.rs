//! SQLite-backed auth provider.
//!
//! Accounts live in the `users` table with Argon2id PHC password hashes.
//! Every sign-in or sign-up opens a row in `sessions` in place of the
//! previous one; the active token is remembered in `{data_dir}/session` so
//! that the next process picks the session back up.

use std::path::{Path, PathBuf};

use argon2::Argon2;
use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::Utc;
use ocforge_core::auth::{AuthProvider, SessionWatch};
use ocforge_types::error::AuthError;
use ocforge_types::user::{Credentials, Session, User, UserId};
use sqlx::Row;
use tokio::sync::watch;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, repository_error};

/// File under the data directory holding the active session token.
pub const SESSION_FILE: &str = "session";

/// Auth provider storing accounts and sessions in SQLite.
pub struct SqliteAuthProvider {
    pool: DatabasePool,
    session_file: PathBuf,
    session: SessionWatch,
}

impl SqliteAuthProvider {
    /// Open the provider and restore the session remembered in `data_dir`.
    ///
    /// A stale or unreadable token file is ignored (and removed when its
    /// session no longer exists).
    pub async fn open(pool: DatabasePool, data_dir: &Path) -> Result<Self, AuthError> {
        let provider = Self {
            pool,
            session_file: data_dir.join(SESSION_FILE),
            session: SessionWatch::default(),
        };

        if let Some(token) = provider.read_token().await {
            match provider.load_session(&token).await? {
                Some(session) => {
                    tracing::debug!(email = %session.user.email, "restored session");
                    provider.session.publish(Some(session));
                }
                None => {
                    tracing::debug!("remembered session no longer exists");
                    provider.forget_token().await;
                }
            }
        }

        Ok(provider)
    }

    async fn read_token(&self) -> Option<String> {
        match tokio::fs::read_to_string(&self.session_file).await {
            Ok(content) => {
                let token = content.trim().to_string();
                (!token.is_empty()).then_some(token)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!("Failed to read {}: {err}", self.session_file.display());
                None
            }
        }
    }

    async fn remember_token(&self, token: &str) -> Result<(), AuthError> {
        if let Some(parent) = self.session_file.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AuthError::Storage(e.to_string()))?;
        }
        tokio::fs::write(&self.session_file, token)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))
    }

    async fn forget_token(&self) {
        if let Err(err) = tokio::fs::remove_file(&self.session_file).await {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove {}: {err}", self.session_file.display());
            }
        }
    }

    async fn load_session(&self, token: &str) -> Result<Option<Session>, AuthError> {
        let row = sqlx::query(
            "SELECT s.token, s.created_at AS session_created_at, u.id, u.email, u.created_at
             FROM sessions s JOIN users u ON u.id = s.user_id
             WHERE s.token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user = user_from_row(&row)?;
        let created_at: String = row.try_get("session_created_at").map_err(query_error)?;
        Ok(Some(Session {
            token: row.try_get("token").map_err(query_error)?,
            user,
            created_at: parse_datetime(&created_at)?,
        }))
    }

    /// Open a session for `user`, persist its token and publish it.
    ///
    /// The session it replaces, if any, is deleted.
    async fn start_session(&self, user: User) -> Result<Session, AuthError> {
        let session = Session {
            token: new_token(),
            user,
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES (?, ?, ?)")
            .bind(&session.token)
            .bind(session.user.id.to_string())
            .bind(format_datetime(&session.created_at))
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if let Some(previous) = self.session.current() {
            sqlx::query("DELETE FROM sessions WHERE token = ?")
                .bind(&previous.token)
                .execute(&self.pool.writer)
                .await
                .map_err(query_error)?;
            tracing::debug!(email = %previous.user.email, "replaced previous session");
        }

        self.remember_token(&session.token).await?;
        self.session.publish(Some(session.clone()));
        tracing::info!(email = %session.user.email, "signed in");
        Ok(session)
    }
}

fn query_error(err: sqlx::Error) -> AuthError {
    repository_error(err).into()
}

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<User, AuthError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    let created_at: String = row.try_get("created_at").map_err(query_error)?;
    Ok(User {
        id: id
            .parse::<UserId>()
            .map_err(|e| AuthError::Storage(format!("invalid user id: {e}")))?,
        email: row.try_get("email").map_err(query_error)?,
        created_at: parse_datetime(&created_at)?,
    })
}

/// 256-bit random token, hex encoded.
fn new_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Storage(format!("password hashing failed: {e}")))
}

fn verify_password(password: &str, stored: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| AuthError::Storage(format!("invalid password hash: {e}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Storage(format!("password verification failed: {e}"))),
    }
}

impl AuthProvider for SqliteAuthProvider {
    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.session.current())
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        credentials.validate()?;
        let email = credentials.normalized_email();

        let row = sqlx::query("SELECT id, email, password_hash, created_at FROM users WHERE email = ?")
            .bind(&email)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        let Some(row) = row else {
            tracing::warn!(%email, "sign-in failed: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let stored: String = row.try_get("password_hash").map_err(query_error)?;
        if !verify_password(&credentials.password, &stored)? {
            tracing::warn!(%email, "sign-in failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        self.start_session(user_from_row(&row)?).await
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        credentials.validate()?;
        let email = credentials.normalized_email();
        let user = User {
            id: UserId::new(),
            email: email.clone(),
            created_at: Utc::now(),
        };
        let password_hash = hash_password(&credentials.password)?;

        let result = sqlx::query(
            "INSERT INTO users (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&email)
        .bind(&password_hash)
        .bind(format_datetime(&user.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => {
                return Err(AuthError::EmailTaken(email));
            }
            Err(e) => return Err(query_error(e)),
        }

        tracing::info!(%email, "account created");
        self.start_session(user).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(session) = self.session.current() else {
            return Ok(());
        };

        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(&session.token)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        self.forget_token().await;
        self.session.publish(None);
        tracing::info!(email = %session.user.email, "signed out");
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }
}
