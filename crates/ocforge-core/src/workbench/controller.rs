//! Workbench controller.
//!
//! Generation is split into `begin_*` / `complete_*` halves. `begin_*`
//! snapshots the inputs and marks the control pending; other edits may
//! happen in between; `complete_*` writes its result unconditionally, so the
//! last completion wins. The async `generate_*` methods run both halves
//! around the simulated latency.

use ocforge_types::character::{
    Character, CharacterCard, CharacterDraft, CharacterId, KeywordToggle,
};
use ocforge_types::config::SimulatedLatency;
use ocforge_types::error::{RepositoryError, WorkbenchError};
use ocforge_types::event::{GenerationKind, SaveStatus, WorkbenchEvent};

use crate::auth::AuthProvider;
use crate::chat::ChatSession;
use crate::event::{EventBus, WorkbenchEvents};
use crate::generator::ContentGenerator;
use crate::repository::character::CharacterRepository;

/// A persona generation in flight, holding the keywords it was started with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaJob {
    pub keywords: Vec<String>,
}

/// An avatar generation in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarJob;

/// Result of a successful save.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    /// The row as stored.
    pub character: Character,
    /// `true` for the first save (insert), `false` for an update.
    pub created: bool,
}

/// One editing session over a [`CharacterDraft`].
pub struct Workbench<R: CharacterRepository, A: AuthProvider, G: ContentGenerator> {
    repo: R,
    auth: A,
    generator: G,
    latency: SimulatedLatency,
    draft: CharacterDraft,
    status: SaveStatus,
    persona_pending: bool,
    avatar_pending: bool,
    chat: ChatSession,
    events: EventBus,
}

impl<R: CharacterRepository, A: AuthProvider, G: ContentGenerator> Workbench<R, A, G> {
    /// Open a workbench on an empty draft.
    pub fn new(repo: R, auth: A, generator: G, latency: SimulatedLatency) -> Self {
        Self::with_draft(repo, auth, generator, latency, CharacterDraft::new())
    }

    /// Open a workbench on a prepared draft (e.g. from launch parameters).
    pub fn with_draft(
        repo: R,
        auth: A,
        generator: G,
        latency: SimulatedLatency,
        draft: CharacterDraft,
    ) -> Self {
        let status = SaveStatus::resting(draft.is_persisted());
        Self {
            repo,
            auth,
            generator,
            latency,
            draft,
            status,
            persona_pending: false,
            avatar_pending: false,
            chat: ChatSession::new(),
            events: EventBus::default(),
        }
    }

    /// Open a workbench on a saved character owned by the signed-in user.
    ///
    /// A character owned by someone else is reported as not found.
    pub async fn open(
        repo: R,
        auth: A,
        generator: G,
        latency: SimulatedLatency,
        id: &CharacterId,
    ) -> Result<Self, WorkbenchError> {
        let user = match auth.current_session().await {
            Ok(Some(session)) => session.user,
            Ok(None) => return Err(WorkbenchError::AuthenticationRequired),
            Err(e) => return Err(WorkbenchError::Collaborator(e.to_string())),
        };

        let character = repo
            .get_by_id(id)
            .await
            .map_err(|e| WorkbenchError::Collaborator(e.to_string()))?
            .filter(|c| c.user_id == user.id)
            .ok_or(WorkbenchError::NotFound)?;

        tracing::debug!(character_id = %id, "opened saved character");
        let draft = CharacterDraft::from_character(&character);
        Ok(Self::with_draft(repo, auth, generator, latency, draft))
    }

    pub fn draft(&self) -> &CharacterDraft {
        &self.draft
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    /// Subscribe to status changes, generation progress and save results.
    pub fn subscribe(&self) -> WorkbenchEvents {
        self.events.subscribe()
    }

    /// Whether the given generation control is pending.
    pub fn is_generating(&self, kind: GenerationKind) -> bool {
        match kind {
            GenerationKind::Persona => self.persona_pending,
            GenerationKind::Avatar => self.avatar_pending,
        }
    }

    // -----------------------------------------------------------------------
    // Direct edits
    // -----------------------------------------------------------------------

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.set_name(name);
    }

    pub fn set_persona(&mut self, persona: impl Into<String>) {
        self.draft.set_persona(persona);
    }

    /// Use a portrait picked elsewhere (e.g. in the avatar maker).
    pub fn set_avatar_url(&mut self, url: impl Into<String>) {
        self.draft.set_avatar_url(url);
    }

    pub fn toggle_keyword(&mut self, keyword: &str) -> KeywordToggle {
        let outcome = self.draft.toggle_keyword(keyword);
        if outcome == KeywordToggle::Ignored {
            tracing::debug!(keyword, "keyword ignored (blank or trait limit reached)");
        }
        outcome
    }

    /// Replace the name with a generated one.
    pub fn randomize_name(&mut self) -> &str {
        let name = self.generator.random_name();
        self.draft.set_name(name);
        &self.draft.name
    }

    // -----------------------------------------------------------------------
    // Generation
    // -----------------------------------------------------------------------

    /// Start persona generation from the current keywords.
    ///
    /// Returns `None` without touching anything when no keyword is selected.
    pub fn begin_persona_generation(&mut self) -> Option<PersonaJob> {
        if self.draft.keywords.is_empty() {
            return None;
        }
        self.persona_pending = true;
        self.events.publish(WorkbenchEvent::GenerationStarted {
            kind: GenerationKind::Persona,
        });
        Some(PersonaJob {
            keywords: self.draft.keywords.to_vec(),
        })
    }

    /// Write the persona for a job, replacing whatever is there now.
    pub fn complete_persona_generation(&mut self, job: PersonaJob) {
        let persona = self.generator.persona(&job.keywords);
        self.draft.set_persona(persona);
        self.persona_pending = false;
        self.events.publish(WorkbenchEvent::GenerationCompleted {
            kind: GenerationKind::Persona,
        });
    }

    /// Generate a persona after the simulated delay.
    ///
    /// Returns `false` (and leaves the persona alone) when no keyword is
    /// selected.
    pub async fn generate_persona(&mut self) -> bool {
        let Some(job) = self.begin_persona_generation() else {
            return false;
        };
        tokio::time::sleep(self.latency.persona).await;
        self.complete_persona_generation(job);
        true
    }

    /// Start avatar generation. Always permitted.
    pub fn begin_avatar_generation(&mut self) -> AvatarJob {
        self.avatar_pending = true;
        self.events.publish(WorkbenchEvent::GenerationStarted {
            kind: GenerationKind::Avatar,
        });
        AvatarJob
    }

    /// Replace the avatar with a freshly generated URL.
    pub fn complete_avatar_generation(&mut self, _job: AvatarJob) {
        let url = self.generator.avatar_url();
        self.draft.set_avatar_url(url);
        self.avatar_pending = false;
        self.events.publish(WorkbenchEvent::GenerationCompleted {
            kind: GenerationKind::Avatar,
        });
    }

    /// Generate an avatar after the simulated delay and return its URL.
    pub async fn generate_avatar(&mut self) -> Option<&str> {
        let job = self.begin_avatar_generation();
        tokio::time::sleep(self.latency.avatar).await;
        self.complete_avatar_generation(job);
        self.draft.avatar_url.as_deref()
    }

    // -----------------------------------------------------------------------
    // Chat
    // -----------------------------------------------------------------------

    /// Send a chat message and wait for the character's reply.
    ///
    /// Returns `None` when the input is ignored (blank, reply pending, or
    /// the character has no name or persona).
    pub async fn send_chat_message(&mut self, input: &str) -> Option<String> {
        let request = self.chat.begin_send(&self.draft, input)?;
        tokio::time::sleep(self.latency.reply).await;
        let reply = self
            .generator
            .chat_reply(&request.character_name, &request.input);
        self.chat.complete_reply(reply.clone());
        Some(reply)
    }

    // -----------------------------------------------------------------------
    // Export and save
    // -----------------------------------------------------------------------

    /// The draft as a character card. No side effects.
    pub fn export_snapshot(&self) -> CharacterCard {
        self.draft.to_card()
    }

    /// Persist the draft.
    ///
    /// Inserts on the first save and adopts the returned id; updates by
    /// that id afterwards. Nothing is sent when the name is blank or
    /// nobody is signed in. On failure the draft is left exactly as it was.
    pub async fn save(&mut self) -> Result<SaveOutcome, WorkbenchError> {
        if self.draft.name.trim().is_empty() {
            return Err(WorkbenchError::Validation(
                "character name is required".to_string(),
            ));
        }

        let user = match self.auth.current_session().await {
            Ok(Some(session)) => session.user,
            Ok(None) => {
                tracing::warn!("save refused: not signed in");
                return Err(WorkbenchError::AuthenticationRequired);
            }
            Err(e) => return Err(WorkbenchError::Collaborator(e.to_string())),
        };

        // A save future dropped mid-flight leaves `Saving` behind; take it over.
        self.transition(self.status.begin().unwrap_or(SaveStatus::Saving));

        let fields = self.draft.to_fields();
        let existing = self.draft.id;
        let result = match existing {
            None => self.repo.insert(&user.id, &fields).await,
            Some(id) => self.repo.update(&id, &fields).await,
        };

        match result {
            Ok(character) => {
                let created = existing.is_none();
                if created {
                    self.draft.adopt_id(character.id);
                }
                self.transition(self.status.finish(true));
                tracing::info!(character_id = %character.id, created, "character saved");
                self.events.publish(WorkbenchEvent::Saved {
                    id: character.id,
                    created,
                });
                Ok(SaveOutcome { character, created })
            }
            Err(e) => {
                tracing::warn!(error = %e, "character save failed");
                self.transition(self.status.finish(false));
                self.events.publish(WorkbenchEvent::SaveFailed {
                    reason: e.to_string(),
                });
                self.transition(self.status.settle(self.draft.is_persisted()));
                Err(match e {
                    RepositoryError::NotFound => WorkbenchError::NotFound,
                    other => WorkbenchError::Collaborator(other.to_string()),
                })
            }
        }
    }

    fn transition(&mut self, to: SaveStatus) {
        if self.status == to {
            return;
        }
        let from = self.status;
        self.status = to;
        self.events.publish(WorkbenchEvent::StatusChanged { from, to });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::TemplateGenerator;
    use crate::testing::{MockAuth, MockCharacterRepository};
    use ocforge_types::config::GlobalConfig;
    use std::sync::Arc;

    type TestWorkbench =
        Workbench<Arc<MockCharacterRepository>, Arc<MockAuth>, TemplateGenerator>;

    fn workbench(repo: &Arc<MockCharacterRepository>, auth: &Arc<MockAuth>) -> TestWorkbench {
        Workbench::new(
            repo.clone(),
            auth.clone(),
            TemplateGenerator::seeded(9, "https://picsum.photos"),
            GlobalConfig::instant().latency(),
        )
    }

    fn signed_in() -> (Arc<MockCharacterRepository>, Arc<MockAuth>) {
        (
            Arc::new(MockCharacterRepository::default()),
            Arc::new(MockAuth::signed_in("ael@forge.io")),
        )
    }

    #[test]
    fn trait_selection_caps_at_three() {
        let (repo, auth) = signed_in();
        let mut wb = workbench(&repo, &auth);
        for word in ["Warrior", "Noble", "Mage", "Thief"] {
            wb.toggle_keyword(word);
        }
        assert_eq!(wb.draft().keywords.as_slice(), ["Warrior", "Noble", "Mage"]);
    }

    #[tokio::test]
    async fn generate_persona_without_keywords_is_noop() {
        let (repo, auth) = signed_in();
        let mut wb = workbench(&repo, &auth);
        wb.set_persona("hand written");
        assert!(!wb.generate_persona().await);
        assert_eq!(wb.draft().persona, "hand written");
        assert!(!wb.is_generating(GenerationKind::Persona));
    }

    #[tokio::test]
    async fn generate_persona_replaces_persona() {
        let (repo, auth) = signed_in();
        let mut wb = workbench(&repo, &auth);
        wb.toggle_keyword("Vampire");
        assert!(wb.generate_persona().await);
        assert!(wb.draft().persona.contains("Vampire"));
    }

    #[test]
    fn pending_persona_overwrites_intervening_edits() {
        let (repo, auth) = signed_in();
        let mut wb = workbench(&repo, &auth);
        wb.toggle_keyword("Angel");
        let job = wb.begin_persona_generation().unwrap();
        assert!(wb.is_generating(GenerationKind::Persona));

        wb.toggle_keyword("Angel");
        wb.toggle_keyword("Demon");
        wb.set_persona("typed while waiting");
        wb.complete_persona_generation(job);

        assert!(wb.draft().persona.contains("Angel"));
        assert!(!wb.draft().persona.contains("Demon"));
        assert_eq!(wb.draft().keywords.as_slice(), ["Demon"]);
    }

    #[test]
    fn last_persona_completion_wins() {
        let (repo, auth) = signed_in();
        let mut wb = workbench(&repo, &auth);
        wb.toggle_keyword("Knight");
        let first = wb.begin_persona_generation().unwrap();
        wb.toggle_keyword("Scholar");
        let second = wb.begin_persona_generation().unwrap();

        wb.complete_persona_generation(second);
        wb.complete_persona_generation(first);

        assert!(!wb.draft().persona.contains("Scholar"));
    }

    #[tokio::test]
    async fn generate_avatar_replaces_url() {
        let (repo, auth) = signed_in();
        let mut wb = workbench(&repo, &auth);
        let first = wb.generate_avatar().await.unwrap().to_string();
        let second = wb.generate_avatar().await.unwrap().to_string();
        assert_ne!(first, second);
        assert_eq!(wb.draft().avatar_url.as_deref(), Some(second.as_str()));
    }

    #[tokio::test]
    async fn generation_progress_is_published() {
        let (repo, auth) = signed_in();
        let mut wb = workbench(&repo, &auth);
        let mut events = wb.subscribe();

        assert!(!wb.generate_persona().await);
        wb.toggle_keyword("Mage");
        assert!(wb.generate_persona().await);
        wb.generate_avatar().await;

        assert_eq!(
            events.drain(),
            vec![
                WorkbenchEvent::GenerationStarted {
                    kind: GenerationKind::Persona,
                },
                WorkbenchEvent::GenerationCompleted {
                    kind: GenerationKind::Persona,
                },
                WorkbenchEvent::GenerationStarted {
                    kind: GenerationKind::Avatar,
                },
                WorkbenchEvent::GenerationCompleted {
                    kind: GenerationKind::Avatar,
                },
            ]
        );
    }

    #[tokio::test]
    async fn save_with_empty_name_never_calls_repository() {
        let (repo, auth) = signed_in();
        let mut wb = workbench(&repo, &auth);
        wb.toggle_keyword("Noble");

        let err = wb.save().await.unwrap_err();
        assert!(matches!(err, WorkbenchError::Validation(_)));
        assert_eq!(repo.call_count(), 0);
        assert_eq!(wb.status(), SaveStatus::New);
    }

    #[tokio::test]
    async fn first_save_inserts_then_updates_same_id() {
        let (repo, auth) = signed_in();
        let mut wb = workbench(&repo, &auth);
        wb.set_name("Ael");

        let first = wb.save().await.unwrap();
        assert!(first.created);
        let id = wb.draft().id.unwrap();
        assert_eq!(first.character.id, id);
        assert_eq!(wb.status(), SaveStatus::Saved);

        wb.set_persona("An elven archer who never misses.");
        let second = wb.save().await.unwrap();
        assert!(!second.created);
        assert_eq!(wb.draft().id, Some(id));
        assert_eq!(repo.insert_calls(), 1);
        assert_eq!(repo.updated_ids(), vec![id]);
        assert_eq!(
            second.character.bio.as_deref(),
            Some("An elven archer who never misses.")
        );
    }

    #[tokio::test]
    async fn save_signed_out_requires_sign_in() {
        let repo = Arc::new(MockCharacterRepository::default());
        let auth = Arc::new(MockAuth::signed_out());
        let mut wb = workbench(&repo, &auth);
        wb.set_name("Ael");

        let err = wb.save().await.unwrap_err();
        assert!(err.requires_sign_in());
        assert_eq!(repo.call_count(), 0);
        assert!(wb.draft().id.is_none());
    }

    #[tokio::test]
    async fn failed_first_save_leaves_draft_new() {
        let (repo, auth) = signed_in();
        repo.fail_next();
        let mut wb = workbench(&repo, &auth);
        wb.set_name("Ael");
        let before = wb.draft().clone();
        let mut events = wb.subscribe();

        let err = wb.save().await.unwrap_err();
        assert!(matches!(err, WorkbenchError::Collaborator(_)));
        assert_eq!(wb.draft(), &before);
        assert_eq!(wb.status(), SaveStatus::New);

        let seen: Vec<SaveStatus> = events
            .drain()
            .into_iter()
            .filter_map(|event| match event {
                WorkbenchEvent::StatusChanged { to, .. } => Some(to),
                _ => None,
            })
            .collect();
        assert_eq!(
            seen,
            vec![SaveStatus::Saving, SaveStatus::SaveFailed, SaveStatus::New]
        );

        // A retry after the failure succeeds.
        assert!(wb.save().await.unwrap().created);
    }

    #[tokio::test]
    async fn failed_update_keeps_id_and_saved_status() {
        let (repo, auth) = signed_in();
        let mut wb = workbench(&repo, &auth);
        wb.set_name("Ael");
        wb.save().await.unwrap();
        let id = wb.draft().id;

        repo.fail_next();
        assert!(wb.save().await.is_err());
        assert_eq!(wb.draft().id, id);
        assert_eq!(wb.status(), SaveStatus::Saved);
    }

    #[tokio::test]
    async fn open_hydrates_owned_character_only() {
        let (repo, auth) = signed_in();
        let mut wb = workbench(&repo, &auth);
        wb.set_name("Ael");
        wb.toggle_keyword("Mage");
        let saved = wb.save().await.unwrap().character;

        let reopened = Workbench::open(
            repo.clone(),
            auth.clone(),
            TemplateGenerator::seeded(1, "https://picsum.photos"),
            GlobalConfig::instant().latency(),
            &saved.id,
        )
        .await
        .unwrap();
        assert_eq!(reopened.draft().id, Some(saved.id));
        assert_eq!(reopened.draft().keywords.as_slice(), ["Mage"]);
        assert_eq!(reopened.status(), SaveStatus::Saved);

        let stranger = Arc::new(MockAuth::signed_in("nyx@forge.io"));
        let result = Workbench::open(
            repo.clone(),
            stranger,
            TemplateGenerator::seeded(1, "https://picsum.photos"),
            GlobalConfig::instant().latency(),
            &saved.id,
        )
        .await;
        assert!(matches!(result, Err(WorkbenchError::NotFound)));
    }

    #[tokio::test]
    async fn chat_round_trip() {
        let (repo, auth) = signed_in();
        let mut wb = workbench(&repo, &auth);
        assert!(wb.send_chat_message("hi").await.is_none());

        wb.set_name("Zepharis");
        wb.set_persona("A storm mage.");
        let reply = wb.send_chat_message("hi").await.unwrap();
        assert!(reply.contains("Zepharis"));
        assert_eq!(wb.chat().messages().len(), 2);
    }

    #[test]
    fn export_snapshot_has_no_side_effects() {
        let (repo, auth) = signed_in();
        let mut wb = workbench(&repo, &auth);
        wb.set_name("Valdor");
        let card = wb.export_snapshot();
        assert_eq!(card.name, "Valdor");
        assert_eq!(repo.call_count(), 0);
        assert_eq!(wb.status(), SaveStatus::New);
    }

    #[test]
    fn randomize_name_sets_non_empty_name() {
        let (repo, auth) = signed_in();
        let mut wb = workbench(&repo, &auth);
        let name = wb.randomize_name().to_string();
        assert!(!name.is_empty());
        assert_eq!(wb.draft().name, name);
    }
}
