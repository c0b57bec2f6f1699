//! Application state wiring collaborators together.
//!
//! The workbench and dashboard are generic over repository/auth/generator
//! traits; AppState pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use ocforge_core::dashboard::Dashboard;
use ocforge_core::generator::TemplateGenerator;
use ocforge_core::workbench::Workbench;
use ocforge_infra::config::load_global_config;
use ocforge_infra::filesystem::resolve_data_dir;
use ocforge_infra::sqlite::auth::SqliteAuthProvider;
use ocforge_infra::sqlite::character::SqliteCharacterRepository;
use ocforge_infra::sqlite::pool::{DatabasePool, database_url};
use ocforge_types::character::{CharacterDraft, CharacterId};
use ocforge_types::config::GlobalConfig;
use ocforge_types::error::WorkbenchError;

/// Concrete type aliases for the generics pinned to infra implementations.
pub type ConcreteWorkbench =
    Workbench<Arc<SqliteCharacterRepository>, Arc<SqliteAuthProvider>, TemplateGenerator>;

pub type ConcreteDashboard = Dashboard<Arc<SqliteCharacterRepository>, Arc<SqliteAuthProvider>>;

/// Shared application state used by every CLI command.
#[derive(Clone)]
pub struct AppState {
    pub characters: Arc<SqliteCharacterRepository>,
    pub auth: Arc<SqliteAuthProvider>,
    pub config: GlobalConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB,
    /// restore the remembered session.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;

        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;
        let characters = SqliteCharacterRepository::new(db_pool.clone());
        let auth = SqliteAuthProvider::open(db_pool, &data_dir).await?;

        Ok(Self {
            characters: Arc::new(characters),
            auth: Arc::new(auth),
            config,
            data_dir,
        })
    }

    pub fn generator(&self) -> TemplateGenerator {
        TemplateGenerator::new(self.config.avatar_base_url.clone())
    }

    /// A workbench over a fresh or launch-prefilled draft.
    pub fn workbench(&self, draft: CharacterDraft) -> ConcreteWorkbench {
        Workbench::with_draft(
            self.characters.clone(),
            self.auth.clone(),
            self.generator(),
            self.config.latency(),
            draft,
        )
    }

    /// A workbench over a saved character owned by the signed-in user.
    pub async fn open_workbench(&self, id: &CharacterId) -> Result<ConcreteWorkbench, WorkbenchError> {
        Workbench::open(
            self.characters.clone(),
            self.auth.clone(),
            self.generator(),
            self.config.latency(),
            id,
        )
        .await
    }

    pub fn dashboard(&self) -> ConcreteDashboard {
        Dashboard::new(self.characters.clone(), self.auth.clone())
    }
}
