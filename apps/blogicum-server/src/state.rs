//! Application state - shared across all handlers.

use std::sync::Arc;

use actix_web::web;

use blogicum_core::ports::{PasswordService, TokenService};
use blogicum_core::services::{
    AccountService, BlogService, ModerationService, Repositories, TaxonomyService,
};
use blogicum_infra::database::DatabaseConfig;
use blogicum_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};
use migration::{Migrator, MigratorTrait};

use crate::config::AppConfig;
use crate::middleware::error::AppError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: Arc<BlogService>,
    pub accounts: Arc<AccountService>,
    pub taxonomy: Arc<TaxonomyService>,
    pub moderation: Arc<ModerationService>,
    pub tokens: Arc<dyn TokenService>,
    /// Which backend the repositories talk to, reported by the health check.
    pub storage: &'static str,
}

impl AppState {
    /// Build the application state, falling back to in-memory storage when
    /// no database is configured or reachable.
    pub async fn new(config: &AppConfig) -> Self {
        let (repos, storage) = match &config.database {
            Some(db_config) => match Self::postgres(db_config, config.run_migrations).await {
                Some(repos) => (repos, "postgres"),
                None => (Self::memory(), "memory"),
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                (Self::memory(), "memory")
            }
        };

        let state = Self::with_repositories(
            repos,
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            Arc::new(Argon2PasswordService::default()),
            config.posts_per_page,
            storage,
        );

        if let Some(admin) = &config.admin
            && let Err(e) = state
                .accounts
                .ensure_staff_account(&admin.username, &admin.password)
                .await
        {
            tracing::error!(username = %admin.username, error = %e, "Failed to create staff account");
        }

        tracing::info!(storage, "Application state initialized");
        state
    }

    /// Wire the services on top of an existing set of repositories.
    pub fn with_repositories(
        repos: Repositories,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        per_page: u64,
        storage: &'static str,
    ) -> Self {
        Self {
            accounts: Arc::new(AccountService::new(
                repos.users.clone(),
                passwords,
                tokens.clone(),
            )),
            taxonomy: Arc::new(TaxonomyService::new(
                repos.users.clone(),
                repos.categories.clone(),
                repos.locations.clone(),
            )),
            moderation: Arc::new(ModerationService::new(repos.clone())),
            blog: Arc::new(BlogService::new(repos, per_page)),
            tokens,
            storage,
        }
    }

    /// Register the state and extractor configuration on an app.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.clone()))
            .app_data(web::Data::new(self.tokens.clone()))
            .app_data(
                web::JsonConfig::default()
                    .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
            )
            .app_data(
                web::QueryConfig::default()
                    .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
            )
            .app_data(web::PathConfig::default().error_handler(|err, _req| {
                AppError::NotFound(format!("No such page: {err}")).into()
            }));
    }

    fn memory() -> Repositories {
        Arc::new(InMemoryStore::new()).repositories()
    }

    async fn postgres(config: &DatabaseConfig, run_migrations: bool) -> Option<Repositories> {
        let db = match blogicum_infra::database::connect(config).await {
            Ok(db) => db,
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                return None;
            }
        };

        if run_migrations {
            match Migrator::up(&db, None).await {
                Ok(()) => tracing::info!("Migrations applied"),
                Err(e) => tracing::error!(error = %e, "Failed to apply migrations"),
            }
        }

        Some(blogicum_infra::database::repositories(db))
    }
}
