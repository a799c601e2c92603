//! Application state for shared services

use std::sync::Arc;

use crate::config::SessionConfig;
use crate::domain::account::AccountRepository;
use crate::domain::catalog::CatalogRepository;
use crate::domain::session::SessionStore;
use crate::domain::upload::UploadSink;
use crate::domain::{Account, AccountId, DomainError};
use crate::infrastructure::account::{AccountService, PasswordHasher, RegisterAccountRequest};
use crate::infrastructure::inference::PredictionService;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountServiceTrait>,
    pub session_store: Arc<dyn SessionStore>,
    pub catalog: Arc<dyn CatalogRepository>,
    pub prediction_service: Arc<PredictionService>,
    /// Present only when upload persistence is enabled
    pub upload_sink: Option<Arc<dyn UploadSink>>,
    pub session: SessionConfig,
}

/// Trait for account service operations
#[async_trait::async_trait]
pub trait AccountServiceTrait: Send + Sync {
    async fn register(&self, request: RegisterAccountRequest) -> Result<Account, DomainError>;
    async fn authenticate(&self, email: &str, password: &str)
        -> Result<Option<Account>, DomainError>;
    async fn get(&self, id: AccountId) -> Result<Option<Account>, DomainError>;
}

#[async_trait::async_trait]
impl<R, H> AccountServiceTrait for AccountService<R, H>
where
    R: AccountRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn register(&self, request: RegisterAccountRequest) -> Result<Account, DomainError> {
        AccountService::register(self, request).await
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Account>, DomainError> {
        AccountService::authenticate(self, email, password).await
    }

    async fn get(&self, id: AccountId) -> Result<Option<Account>, DomainError> {
        AccountService::get(self, id).await
    }
}

impl AppState {
    pub fn new(
        account_service: Arc<dyn AccountServiceTrait>,
        session_store: Arc<dyn SessionStore>,
        catalog: Arc<dyn CatalogRepository>,
        prediction_service: Arc<PredictionService>,
        session: SessionConfig,
    ) -> Self {
        Self {
            account_service,
            session_store,
            catalog,
            prediction_service,
            upload_sink: None,
            session,
        }
    }

    pub fn with_upload_sink(mut self, sink: Arc<dyn UploadSink>) -> Self {
        self.upload_sink = Some(sink);
        self
    }
}
