//! App Context

use std::{fmt, sync::Arc, time::Duration};

use thiserror::Error;

use crate::{
    api::{ApiError, HttpStorefrontApi, StorefrontApi},
    checkout::CheckoutSession,
    config::{ClientConfig, ConfigError},
    orders::OrderWatch,
    session::{SessionError, SessionStore},
    storage::LocalStore,
};

/// Errors building the application context.
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error("failed to build storefront client")]
    Api(#[source] ApiError),

    /// The persisted session could not be read.
    #[error("failed to restore session")]
    Session(#[source] SessionError),
}

/// Services shared by every command.
#[derive(Clone)]
pub struct AppContext {
    /// Storefront API
    pub api: Arc<dyn StorefrontApi>,

    /// Signed-in session
    pub session: Arc<SessionStore>,

    /// Local state file
    pub storage: LocalStore,

    /// Delay between order status refreshes
    pub poll_interval: Duration,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("session", &self.session)
            .field("storage", &self.storage)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build the context from configuration and restore any persisted session.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the HTTP client cannot be built, or
    /// the local store cannot be read.
    pub async fn from_config(config: &ClientConfig) -> Result<Self, AppInitError> {
        config.validate()?;

        let api = HttpStorefrontApi::new(&config.api_url, config.http_timeout())
            .map_err(AppInitError::Api)?;

        let context = Self::new(
            Arc::new(api),
            LocalStore::new(&config.state_file),
            config.poll_interval(),
        );

        context
            .session
            .restore()
            .await
            .map_err(AppInitError::Session)?;

        Ok(context)
    }

    /// Assemble a context around an existing API client.
    pub fn new(api: Arc<dyn StorefrontApi>, storage: LocalStore, poll_interval: Duration) -> Self {
        Self {
            session: Arc::new(SessionStore::new(Arc::clone(&api), storage.clone())),
            api,
            storage,
            poll_interval,
        }
    }

    /// Start a checkout of the signed-in user's cart, priced with their current membership.
    ///
    /// # Errors
    ///
    /// Returns an error without a session, or if the profile or cart cannot be fetched.
    pub async fn checkout(&self) -> Result<CheckoutSession, SessionError> {
        let token = self.session.require_token().await?;

        if self.session.profile().await.is_none() {
            self.session.refresh_profile().await?;
        }

        let items = self.api.cart(&token).await?;
        let membership = self.session.membership().await;

        Ok(CheckoutSession::new(
            Arc::clone(&self.api),
            token,
            items,
            membership,
        ))
    }

    /// Watch an order of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotSignedIn`] without a session.
    pub async fn watch_order(&self, order_id: &str) -> Result<OrderWatch, SessionError> {
        let token = self.session.require_token().await?;

        Ok(OrderWatch::spawn(
            Arc::clone(&self.api),
            token,
            order_id,
            self.poll_interval,
        ))
    }
}
