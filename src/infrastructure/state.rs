//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{BookRepository, BorrowingRepository, DomainError, MemberRepository};
use crate::infrastructure::config::Config;
use crate::infrastructure::{
    SeaOrmBookRepository, SeaOrmBorrowingRepository, SeaOrmMemberRepository,
};
use crate::modules::integrations::openlibrary::OpenLibraryClient;
use crate::services::CirculationService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub book_repo: Arc<dyn BookRepository>,
    pub member_repo: Arc<dyn MemberRepository>,
    /// Borrow/return rules with the configured loan policy
    pub circulation: Arc<CirculationService>,
    pub openlibrary: OpenLibraryClient,
}

impl AppState {
    /// State with default configuration: no due dates, public Open Library.
    ///
    /// Falls back to a client without a timeout if the TLS backend cannot be
    /// initialised.
    pub fn new(db: DatabaseConnection) -> Self {
        let config = Config::default();
        Self::with_config(db.clone(), &config).unwrap_or_else(|e| {
            tracing::warn!("Using fallback HTTP client: {}", e);
            Self::assemble(
                db,
                &config,
                OpenLibraryClient::with_client(reqwest::Client::new(), &config.openlibrary_url),
            )
        })
    }

    /// Create a new AppState with all repositories initialized
    pub fn with_config(db: DatabaseConnection, config: &Config) -> Result<Self, DomainError> {
        let openlibrary = OpenLibraryClient::new(
            &config.openlibrary_url,
            Duration::from_secs(config.lookup_timeout_secs),
        )?;

        Ok(Self::assemble(db, config, openlibrary))
    }

    fn assemble(db: DatabaseConnection, config: &Config, openlibrary: OpenLibraryClient) -> Self {
        let book_repo: Arc<dyn BookRepository> = Arc::new(SeaOrmBookRepository::new(db.clone()));
        let member_repo: Arc<dyn MemberRepository> =
            Arc::new(SeaOrmMemberRepository::new(db.clone()));
        let borrowing_repo: Arc<dyn BorrowingRepository> =
            Arc::new(SeaOrmBorrowingRepository::new(db));

        let circulation = Arc::new(CirculationService::new(
            borrowing_repo,
            member_repo.clone(),
            config.loan_policy,
        ));

        Self {
            book_repo,
            member_repo,
            circulation,
            openlibrary,
        }
    }
}
