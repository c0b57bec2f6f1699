//! Dashboard: the signed-in user's saved characters.

use ocforge_types::character::{Character, CharacterId};
use ocforge_types::error::{AuthError, DashboardError, RepositoryError};
use ocforge_types::user::User;

use crate::auth::AuthProvider;
use crate::repository::character::CharacterRepository;

/// Cached list of the signed-in user's characters, newest first.
pub struct Dashboard<R: CharacterRepository, A: AuthProvider> {
    repo: R,
    auth: A,
    characters: Vec<Character>,
}

impl<R: CharacterRepository, A: AuthProvider> Dashboard<R, A> {
    pub fn new(repo: R, auth: A) -> Self {
        Self {
            repo,
            auth,
            characters: Vec::new(),
        }
    }

    /// Fetch the owner's characters and replace the cached list.
    pub async fn load(&mut self) -> Result<&[Character], DashboardError> {
        let user = self.user().await?;
        self.characters = self
            .repo
            .list_by_owner(&user.id)
            .await
            .map_err(|e| DashboardError::Collaborator(e.to_string()))?;
        tracing::debug!(count = self.characters.len(), "loaded characters");
        Ok(&self.characters)
    }

    /// The list as of the last `load` or `delete`.
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn find(&self, id: &CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| &c.id == id)
    }

    /// Delete one of the owner's characters and drop it from the list.
    ///
    /// Characters that do not exist or belong to someone else are reported
    /// as `NotFound`; the list is left untouched on any error.
    pub async fn delete(&mut self, id: &CharacterId) -> Result<Character, DashboardError> {
        let user = self.user().await?;

        let character = self
            .repo
            .get_by_id(id)
            .await
            .map_err(|e| DashboardError::Collaborator(e.to_string()))?
            .filter(|c| c.user_id == user.id)
            .ok_or(DashboardError::NotFound)?;

        self.repo.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => DashboardError::NotFound,
            other => DashboardError::Collaborator(other.to_string()),
        })?;

        self.characters.retain(|c| &c.id != id);
        tracing::info!(character_id = %id, name = %character.name, "character deleted");
        Ok(character)
    }

    async fn user(&self) -> Result<User, DashboardError> {
        crate::auth::require_user(&self.auth)
            .await
            .map_err(|e| match e {
                AuthError::NotSignedIn => DashboardError::AuthenticationRequired,
                other => DashboardError::Collaborator(other.to_string()),
            })
    }
}
