//! Account and session types for the auth collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use std::fmt;
use std::str::FromStr;

use crate::error::AuthError;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Unique identifier for a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token.
    pub token: String,
    pub user: User,
    pub created_at: DateTime<Utc>,
}

/// Email and password as entered on the sign-in form.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"****")
            .finish()
    }
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Normalized email: trimmed and lowercased.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }

    /// Form-level validation, run before the collaborator is contacted.
    ///
    /// Checks the normalized email, so surrounding whitespace and case are
    /// accepted here and stripped before storage.
    pub fn validate(&self) -> Result<(), AuthError> {
        let normalized = Self::new(self.normalized_email(), self.password.clone());
        Validate::validate(&normalized).map_err(invalid_input)?;
        if !has_plain_address(&normalized.email) {
            return Err(AuthError::InvalidInput(
                "please enter a valid email address".to_string(),
            ));
        }
        Ok(())
    }
}

/// Rules the RFC-permissive `email` validator lets through: dots at the
/// edges of the local part or doubled, and a missing or one-letter TLD.
fn has_plain_address(email: &str) -> bool {
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((_, tld)) => tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()),
        None => false,
    }
}

/// First message for the first failing field, email before password.
fn invalid_input(errors: ValidationErrors) -> AuthError {
    let fields = errors.field_errors();
    let message = ["email", "password"]
        .iter()
        .filter_map(|field| fields.get(*field))
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string());
    AuthError::InvalidInput(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_ok(email: &str) -> bool {
        Credentials::new(email, "secret1").validate().is_ok()
    }

    #[test]
    fn test_email_validation() {
        assert!(email_ok("ael@forge.io"));
        assert!(email_ok("a.b@sub.forge.io"));
        assert!(email_ok("nyx+oc@forge.dev"));
        assert!(!email_ok("forge.io"));
        assert!(!email_ok("@forge.io"));
        assert!(!email_ok("ael@forge"));
        assert!(!email_ok("ael@.io"));
        assert!(!email_ok("ael@forge."));
        assert!(!email_ok("a el@forge.io"));
        assert!(!email_ok("a@b@forge.io"));
    }

    #[test]
    fn test_malformed_addresses_rejected() {
        let malformed = [
            "a..b@forge.c",
            "<>@forge.io",
            "a@-forge.io",
            ".a@forge.io",
            "a.@forge.io",
            "ael@forge.i0",
        ];
        for email in malformed {
            let result = Credentials::new(email, "secret1").validate();
            assert!(
                matches!(result, Err(AuthError::InvalidInput(ref msg)) if msg.contains("email")),
                "{email} should be rejected"
            );
        }
    }

    #[test]
    fn test_short_password_rejected() {
        let creds = Credentials::new("ael@forge.io", "x".repeat(MIN_PASSWORD_LEN - 1));
        assert!(matches!(
            creds.validate(),
            Err(AuthError::InvalidInput(ref msg)) if msg.contains("at least 6")
        ));
        let creds = Credentials::new("ael@forge.io", "x".repeat(MIN_PASSWORD_LEN));
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn test_email_normalized() {
        let creds = Credentials::new("  Ael@Forge.IO ", "secret1");
        assert_eq!(creds.normalized_email(), "ael@forge.io");
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn test_debug_hides_password() {
        let creds = Credentials::new("ael@forge.io", "hunter22");
        assert!(!format!("{creds:?}").contains("hunter22"));
    }
}
