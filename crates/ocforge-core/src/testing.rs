//! In-memory collaborators shared by the unit tests of this crate.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::Utc;
use ocforge_types::character::{Character, CharacterFields, CharacterId};
use ocforge_types::error::{AuthError, RepositoryError};
use ocforge_types::user::{Credentials, Session, User, UserId};
use tokio::sync::watch;

use crate::auth::{AuthProvider, SessionWatch};
use crate::repository::character::CharacterRepository;

/// Vec-backed character store with call counters and failure injection.
#[derive(Default)]
pub struct MockCharacterRepository {
    rows: Mutex<Vec<Character>>,
    calls: AtomicUsize,
    inserts: AtomicUsize,
    updated: Mutex<Vec<CharacterId>>,
    fail_next: AtomicBool,
}

impl MockCharacterRepository {
    /// Make the next call of any kind fail with a query error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn updated_ids(&self) -> Vec<CharacterId> {
        self.updated.lock().unwrap().clone()
    }

    fn enter(&self) -> Result<(), RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(RepositoryError::Query("injected failure".to_string()));
        }
        Ok(())
    }
}

impl CharacterRepository for MockCharacterRepository {
    async fn insert(
        &self,
        user_id: &UserId,
        fields: &CharacterFields,
    ) -> Result<Character, RepositoryError> {
        self.enter()?;
        self.inserts.fetch_add(1, Ordering::SeqCst);
        let character = Character::new(*user_id, fields.clone());
        self.rows.lock().unwrap().push(character.clone());
        Ok(character)
    }

    async fn update(
        &self,
        id: &CharacterId,
        fields: &CharacterFields,
    ) -> Result<Character, RepositoryError> {
        self.enter()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        row.apply(fields.clone());
        self.updated.lock().unwrap().push(*id);
        Ok(row.clone())
    }

    async fn get_by_id(&self, id: &CharacterId) -> Result<Option<Character>, RepositoryError> {
        self.enter()?;
        Ok(self.rows.lock().unwrap().iter().find(|c| &c.id == id).cloned())
    }

    async fn list_by_owner(&self, user_id: &UserId) -> Result<Vec<Character>, RepositoryError> {
        self.enter()?;
        let mut owned: Vec<Character> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|c| &c.user_id == user_id)
            .cloned()
            .collect();
        // Stable: rows created in the same instant stay newest-inserted first.
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn delete(&self, id: &CharacterId) -> Result<(), RepositoryError> {
        self.enter()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| &c.id != id);
        if rows.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// Auth provider holding a single session in a [`SessionWatch`].
pub struct MockAuth {
    session: SessionWatch,
}

impl MockAuth {
    pub fn signed_in(email: &str) -> Self {
        Self {
            session: SessionWatch::new(Some(session_for(email))),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            session: SessionWatch::new(None),
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.session.current().map(|s| s.user.id)
    }
}

fn session_for(email: &str) -> Session {
    let now = Utc::now();
    Session {
        token: uuid::Uuid::now_v7().to_string(),
        user: User {
            id: UserId::new(),
            email: email.to_string(),
            created_at: now,
        },
        created_at: now,
    }
}

impl AuthProvider for MockAuth {
    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.session.current())
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        credentials.validate()?;
        let session = session_for(&credentials.normalized_email());
        self.session.publish(Some(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        self.sign_in(credentials).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.session.publish(None);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }
}
