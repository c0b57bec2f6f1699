//! SQLite character repository implementation.
//!
//! Implements `CharacterRepository` from `ocforge-core` using sqlx with split read/write pools.

use ocforge_core::repository::character::CharacterRepository;
use ocforge_types::character::{Character, CharacterFields, CharacterId, KeywordSet};
use ocforge_types::error::RepositoryError;
use ocforge_types::user::UserId;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, repository_error};

/// SQLite-backed implementation of `CharacterRepository`.
pub struct SqliteCharacterRepository {
    pool: DatabasePool,
}

impl SqliteCharacterRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Character.
struct CharacterRow {
    id: String,
    user_id: String,
    name: String,
    keywords: String,
    persona_prompt: String,
    avatar_url: Option<String>,
    bio: Option<String>,
    created_at: String,
    updated_at: String,
}

impl CharacterRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            keywords: row.try_get("keywords")?,
            persona_prompt: row.try_get("persona_prompt")?,
            avatar_url: row.try_get("avatar_url")?,
            bio: row.try_get("bio")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_character(self) -> Result<Character, RepositoryError> {
        let id = self
            .id
            .parse::<CharacterId>()
            .map_err(|e| RepositoryError::Query(format!("invalid character id: {e}")))?;

        let user_id = self
            .user_id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?;

        let stored: Vec<String> = serde_json::from_str(&self.keywords)
            .map_err(|e| RepositoryError::Query(format!("invalid keywords JSON: {e}")))?;

        Ok(Character {
            id,
            user_id,
            name: self.name,
            // Rows written elsewhere may carry more than the allowed keywords.
            keywords: KeywordSet::from_stored(stored).to_vec(),
            persona_prompt: self.persona_prompt,
            avatar_url: self.avatar_url,
            bio: self.bio,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn keywords_json(fields: &CharacterFields) -> Result<String, RepositoryError> {
    serde_json::to_string(&fields.keywords).map_err(|e| RepositoryError::Query(e.to_string()))
}

impl CharacterRepository for SqliteCharacterRepository {
    async fn insert(
        &self,
        user_id: &UserId,
        fields: &CharacterFields,
    ) -> Result<Character, RepositoryError> {
        let character = Character::new(*user_id, fields.clone());

        let result = sqlx::query(
            "INSERT INTO characters (id, user_id, name, keywords, persona_prompt, avatar_url, bio, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(character.id.to_string())
        .bind(user_id.to_string())
        .bind(&character.name)
        .bind(keywords_json(fields)?)
        .bind(&character.persona_prompt)
        .bind(&character.avatar_url)
        .bind(&character.bio)
        .bind(format_datetime(&character.created_at))
        .bind(format_datetime(&character.updated_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => {
                tracing::debug!(character_id = %character.id, "inserted character");
                Ok(character)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("FOREIGN KEY") => {
                Err(RepositoryError::Conflict(format!("unknown owner '{user_id}'")))
            }
            Err(e) => Err(repository_error(e)),
        }
    }

    async fn update(
        &self,
        id: &CharacterId,
        fields: &CharacterFields,
    ) -> Result<Character, RepositoryError> {
        let mut character = self.get_by_id(id).await?.ok_or(RepositoryError::NotFound)?;
        character.apply(fields.clone());

        let result = sqlx::query(
            "UPDATE characters SET name = ?, keywords = ?, persona_prompt = ?, avatar_url = ?, bio = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&character.name)
        .bind(keywords_json(fields)?)
        .bind(&character.persona_prompt)
        .bind(&character.avatar_url)
        .bind(&character.bio)
        .bind(format_datetime(&character.updated_at))
        .bind(id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(repository_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(character)
    }

    async fn get_by_id(&self, id: &CharacterId) -> Result<Option<Character>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM characters WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(repository_error)?;

        match row {
            Some(row) => {
                let character_row = CharacterRow::from_row(&row)
                    .map_err(repository_error)?;
                Ok(Some(character_row.into_character()?))
            }
            None => Ok(None),
        }
    }

    async fn list_by_owner(&self, user_id: &UserId) -> Result<Vec<Character>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM characters WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(repository_error)?;

        let mut characters = Vec::with_capacity(rows.len());
        for row in &rows {
            let character_row =
                CharacterRow::from_row(row).map_err(repository_error)?;
            characters.push(character_row.into_character()?);
        }

        Ok(characters)
    }

    async fn delete(&self, id: &CharacterId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM characters WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(repository_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
