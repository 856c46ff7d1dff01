//! Signed-in state: tokens, the cached user, and the guard that reads them.

pub mod guard;
pub mod store;

pub use guard::{guard, landing_route, Access, Route, RouteDecision};
pub use store::{keys, FileSessionStore, MemorySessionStore, SessionStore, StoreError};

use tracing::{info, warn};

use crate::api::{ApiError, AuthApi};
use crate::domain::{AuthGrant, AuthTokens, Credentials, User};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("not signed in")]
    NotSignedIn,
}

/// Auth session holder; the single owner of persisted tokens and the cached user.
#[derive(Debug)]
pub struct AuthSession<S> {
    store: S,
    tokens: Option<AuthTokens>,
    user: Option<User>,
}

impl<S: SessionStore> AuthSession<S> {
    /// Rebuilds the session from storage. A cached user that no longer parses is discarded.
    pub fn restore(mut store: S) -> Self {
        let tokens = match (
            store.get(keys::ACCESS_TOKEN),
            store.get(keys::REFRESH_TOKEN),
        ) {
            (Some(access_token), Some(refresh_token)) => Some(AuthTokens {
                access_token,
                refresh_token,
            }),
            _ => None,
        };

        let user = store
            .get(keys::USER)
            .and_then(|raw| match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    warn!(error = %err, "dropping unreadable cached user");
                    if let Err(err) = store.remove(keys::USER) {
                        warn!(error = %err, "could not clear cached user");
                    }
                    None
                }
            });

        Self {
            store,
            tokens,
            user,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_some() && self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(User::is_admin)
    }

    pub fn user(&self) -> Option<&User> {
        if self.is_authenticated() {
            self.user.as_ref()
        } else {
            None
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.tokens
            .as_ref()
            .map(|tokens| tokens.access_token.as_str())
    }

    pub fn authorize(&self, route: &Route) -> RouteDecision {
        guard(route, self.user())
    }

    pub fn landing_route(&self) -> Route {
        self.user().map_or(Route::Login, landing_route)
    }

    pub async fn login<A: AuthApi>(
        &mut self,
        api: &A,
        credentials: &Credentials,
    ) -> Result<&User, SessionError> {
        let grant = api.login(credentials).await?;
        self.establish(grant)
    }

    pub async fn register<A: AuthApi>(
        &mut self,
        api: &A,
        credentials: &Credentials,
    ) -> Result<&User, SessionError> {
        let grant = api.register(credentials).await?;
        self.establish(grant)
    }

    /// Swaps the token pair. A rejected refresh token ends the session.
    pub async fn refresh<A: AuthApi>(&mut self, api: &A) -> Result<(), SessionError> {
        let refresh_token = self
            .tokens
            .as_ref()
            .map(|tokens| tokens.refresh_token.clone())
            .ok_or(SessionError::NotSignedIn)?;

        match api.refresh(&refresh_token).await {
            Ok(tokens) => {
                self.persist_tokens(&tokens)?;
                self.tokens = Some(tokens);
                info!("session tokens refreshed");
                Ok(())
            }
            Err(err @ ApiError::Unauthorized(_)) => {
                self.logout()?;
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.tokens = None;
        self.user = None;
        self.store.remove(keys::ACCESS_TOKEN)?;
        self.store.remove(keys::REFRESH_TOKEN)?;
        self.store.remove(keys::USER)?;
        info!("signed out");
        Ok(())
    }

    fn establish(&mut self, grant: AuthGrant) -> Result<&User, SessionError> {
        let tokens = grant.tokens();
        self.persist_tokens(&tokens)?;
        let raw_user = serde_json::to_string(&grant.user).map_err(StoreError::from)?;
        self.store.set(keys::USER, &raw_user)?;

        info!(user_id = %grant.user.id, role = ?grant.user.role, "signed in");
        self.tokens = Some(tokens);
        Ok(self.user.insert(grant.user))
    }

    fn persist_tokens(&mut self, tokens: &AuthTokens) -> Result<(), SessionError> {
        self.store.set(keys::ACCESS_TOKEN, &tokens.access_token)?;
        self.store.set(keys::REFRESH_TOKEN, &tokens.refresh_token)?;
        Ok(())
    }
}
