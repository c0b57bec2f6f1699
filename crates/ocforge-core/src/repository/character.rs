//! Character repository trait definition.

use std::sync::Arc;

use ocforge_types::character::{Character, CharacterFields, CharacterId};
use ocforge_types::error::RepositoryError;
use ocforge_types::user::UserId;

/// Repository trait for the `characters` table.
///
/// Implementations live in ocforge-infra (e.g., SqliteCharacterRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait CharacterRepository: Send + Sync {
    /// Insert a new row owned by `user_id`. Returns the stored row,
    /// including the id the store assigned.
    fn insert(
        &self,
        user_id: &UserId,
        fields: &CharacterFields,
    ) -> impl std::future::Future<Output = Result<Character, RepositoryError>> + Send;

    /// Overwrite the mutable columns of an existing row.
    ///
    /// Returns `RepositoryError::NotFound` if no row has this id.
    fn update(
        &self,
        id: &CharacterId,
        fields: &CharacterFields,
    ) -> impl std::future::Future<Output = Result<Character, RepositoryError>> + Send;

    /// Get a character by id.
    fn get_by_id(
        &self,
        id: &CharacterId,
    ) -> impl std::future::Future<Output = Result<Option<Character>, RepositoryError>> + Send;

    /// All characters owned by a user, newest `created_at` first.
    fn list_by_owner(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<Character>, RepositoryError>> + Send;

    /// Permanently delete a character by id.
    fn delete(
        &self,
        id: &CharacterId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

impl<T: CharacterRepository> CharacterRepository for Arc<T> {
    fn insert(
        &self,
        user_id: &UserId,
        fields: &CharacterFields,
    ) -> impl std::future::Future<Output = Result<Character, RepositoryError>> + Send {
        (**self).insert(user_id, fields)
    }

    fn update(
        &self,
        id: &CharacterId,
        fields: &CharacterFields,
    ) -> impl std::future::Future<Output = Result<Character, RepositoryError>> + Send {
        (**self).update(id, fields)
    }

    fn get_by_id(
        &self,
        id: &CharacterId,
    ) -> impl std::future::Future<Output = Result<Option<Character>, RepositoryError>> + Send {
        (**self).get_by_id(id)
    }

    fn list_by_owner(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<Character>, RepositoryError>> + Send {
        (**self).list_by_owner(user_id)
    }

    fn delete(
        &self,
        id: &CharacterId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send {
        (**self).delete(id)
    }
}
