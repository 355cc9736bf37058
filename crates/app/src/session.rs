//! Session Store
//!
//! Holds the signed-in user's token and profile. Other components read membership flags from
//! here. The session changes through [`SessionStore::login`], [`SessionStore::logout`] and
//! [`SessionStore::refresh_profile`]; [`SessionStore::sync_membership`] patches the cached
//! membership after a checkout consumed a free gift wrap.

use std::{fmt, sync::Arc};

use silk::membership::Membership;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::{
    api::{ApiError, Credentials, Profile, StorefrontApi},
    storage::{LocalStore, StorageError},
};

/// Errors raised by session actions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No one is signed in.
    #[error("not signed in")]
    NotSignedIn,

    /// The storefront API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The token could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone)]
struct Session {
    token: String,
    profile: Option<Profile>,
}

/// Shared session state.
pub struct SessionStore {
    api: Arc<dyn StorefrontApi>,
    storage: LocalStore,
    state: RwLock<Option<Session>>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create a signed-out store.
    pub fn new(api: Arc<dyn StorefrontApi>, storage: LocalStore) -> Self {
        Self {
            api,
            storage,
            state: RwLock::new(None),
        }
    }

    /// Pick up a token persisted by an earlier run. Returns whether one was found.
    ///
    /// The profile is not fetched; call [`SessionStore::refresh_profile`] when it is needed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] if the local store cannot be read.
    pub async fn restore(&self) -> Result<bool, SessionError> {
        let Some(token) = self.storage.token()? else {
            return Ok(false);
        };

        *self.state.write().await = Some(Session {
            token,
            profile: None,
        });

        Ok(true)
    }

    /// Sign in, persist the token and load the profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected, the token cannot be persisted, or the
    /// profile cannot be fetched.
    pub async fn login(&self, credentials: &Credentials) -> Result<Profile, SessionError> {
        let token = self.api.login(credentials).await?;

        self.storage.save_token(&token)?;

        *self.state.write().await = Some(Session {
            token,
            profile: None,
        });

        info!(email = %credentials.email, "signed in");

        self.refresh_profile().await
    }

    /// Sign out and forget the persisted token.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] if the persisted token cannot be removed. The
    /// in-memory session is cleared regardless.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let previous = self.state.write().await.take();

        self.storage.clear_token()?;

        if previous.is_some() {
            info!("signed out");
        }

        Ok(())
    }

    /// Reload the profile, e.g. after a membership change.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotSignedIn`] without a session, or the API error.
    pub async fn refresh_profile(&self) -> Result<Profile, SessionError> {
        let token = self.require_token().await?;
        let profile = self.api.profile(&token).await?;

        let mut state = self.state.write().await;

        // A logout or re-login while the request was in flight wins.
        if let Some(session) = state.as_mut().filter(|session| session.token == token) {
            session.profile = Some(profile.clone());
        }

        Ok(profile)
    }

    /// Current session token
    pub async fn token(&self) -> Option<String> {
        self.state
            .read()
            .await
            .as_ref()
            .map(|session| session.token.clone())
    }

    /// Current session token, or [`SessionError::NotSignedIn`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotSignedIn`] without a session.
    pub async fn require_token(&self) -> Result<String, SessionError> {
        self.token().await.ok_or(SessionError::NotSignedIn)
    }

    /// Last loaded profile
    pub async fn profile(&self) -> Option<Profile> {
        self.state
            .read()
            .await
            .as_ref()
            .and_then(|session| session.profile.clone())
    }

    /// Membership flags of the signed-in user; a standard customer when unknown.
    ///
    /// This is the cached profile. A gift-wrap selection decrements the counter on the server,
    /// so callers push the new flags back with [`SessionStore::sync_membership`] or reload them
    /// with [`SessionStore::refresh_profile`].
    pub async fn membership(&self) -> Membership {
        self.profile()
            .await
            .map_or_else(Membership::standard, |profile| profile.membership)
    }

    /// Overwrite the cached membership flags. Does nothing until a profile has been loaded.
    pub async fn sync_membership(&self, membership: Membership) {
        let mut state = self.state.write().await;

        if let Some(profile) = state.as_mut().and_then(|session| session.profile.as_mut()) {
            profile.membership = membership;
        }
    }

    /// Whether a session token is held.
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use tempfile::TempDir;
    use testresult::TestResult;

    use crate::api::MockStorefrontApi;

    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            email: "asha@example.com".to_string(),
            password: "secret".to_string(),
        }
    }

    fn profile(membership: Membership) -> Profile {
        Profile {
            id: "u1".to_string(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            membership,
            wishlist: Vec::new(),
        }
    }

    fn store(api: MockStorefrontApi, dir: &TempDir) -> SessionStore {
        SessionStore::new(Arc::new(api), LocalStore::new(dir.path().join("state.json")))
    }

    #[tokio::test]
    async fn login_persists_token_and_loads_profile() -> TestResult {
        let dir = TempDir::new()?;
        let mut api = MockStorefrontApi::new();

        api.expect_login()
            .once()
            .withf(|credentials| credentials.email == "asha@example.com")
            .return_once(|_| Ok("tok-1".to_string()));

        api.expect_profile()
            .once()
            .with(eq("tok-1"))
            .return_once(|_| Ok(profile(Membership::luxe(2))));

        let session = store(api, &dir);
        let loaded = session.login(&credentials()).await?;

        assert_eq!(loaded.membership, Membership::luxe(2));
        assert_eq!(session.token().await.as_deref(), Some("tok-1"));
        assert_eq!(session.membership().await, Membership::luxe(2));
        assert!(session.is_authenticated().await);
        assert_eq!(
            LocalStore::new(dir.path().join("state.json")).token()?.as_deref(),
            Some("tok-1")
        );

        Ok(())
    }

    #[tokio::test]
    async fn rejected_login_leaves_session_empty() -> TestResult {
        let dir = TempDir::new()?;
        let mut api = MockStorefrontApi::new();

        api.expect_login().once().return_once(|_| {
            Err(ApiError::Rejected {
                message: "Invalid credentials".to_string(),
            })
        });

        api.expect_profile().never();

        let session = store(api, &dir);

        assert!(matches!(
            session.login(&credentials()).await,
            Err(SessionError::Api(ApiError::Rejected { .. }))
        ));
        assert!(!session.is_authenticated().await);

        Ok(())
    }

    #[tokio::test]
    async fn logout_clears_memory_and_disk() -> TestResult {
        let dir = TempDir::new()?;
        let mut api = MockStorefrontApi::new();

        api.expect_login().return_once(|_| Ok("tok-1".to_string()));
        api.expect_profile()
            .return_once(|_| Ok(profile(Membership::standard())));

        let session = store(api, &dir);

        session.login(&credentials()).await?;
        session.logout().await?;

        assert!(!session.is_authenticated().await);
        assert_eq!(session.profile().await, None);
        assert_eq!(session.membership().await, Membership::standard());
        assert_eq!(
            LocalStore::new(dir.path().join("state.json")).token()?,
            None
        );

        Ok(())
    }

    #[tokio::test]
    async fn restore_picks_up_persisted_token() -> TestResult {
        let dir = TempDir::new()?;
        LocalStore::new(dir.path().join("state.json")).save_token("tok-9")?;

        let mut api = MockStorefrontApi::new();

        api.expect_profile()
            .once()
            .with(eq("tok-9"))
            .return_once(|_| Ok(profile(Membership::luxe(0))));

        let session = store(api, &dir);

        assert!(session.restore().await?);
        assert_eq!(session.profile().await, None);

        session.refresh_profile().await?;

        assert_eq!(session.membership().await, Membership::luxe(0));

        Ok(())
    }

    #[tokio::test]
    async fn refresh_without_session_is_not_signed_in() -> TestResult {
        let dir = TempDir::new()?;
        let mut api = MockStorefrontApi::new();

        api.expect_profile().never();

        let session = store(api, &dir);

        assert!(!session.restore().await?);
        assert!(matches!(
            session.refresh_profile().await,
            Err(SessionError::NotSignedIn)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn used_gift_wrap_is_reflected_in_membership() -> TestResult {
        let dir = TempDir::new()?;
        let mut api = MockStorefrontApi::new();

        api.expect_login().return_once(|_| Ok("tok-1".to_string()));
        api.expect_profile()
            .once()
            .return_once(|_| Ok(profile(Membership::luxe(1))));

        let session = store(api, &dir);
        session.login(&credentials()).await?;

        session.sync_membership(Membership::luxe(0)).await;

        assert_eq!(session.membership().await, Membership::luxe(0));
        assert_eq!(
            session.profile().await.map(|profile| profile.name),
            Some("Asha".to_string())
        );

        Ok(())
    }

    #[tokio::test]
    async fn membership_sync_without_profile_is_ignored() -> TestResult {
        let dir = TempDir::new()?;
        let mut api = MockStorefrontApi::new();

        api.expect_profile().never();

        let session = store(api, &dir);
        session.sync_membership(Membership::luxe(3)).await;

        assert_eq!(session.membership().await, Membership::standard());
        assert!(!session.is_authenticated().await);

        Ok(())
    }
}
