//! Registration, login and bearer-token resolution

use crate::core::auth::Identity;
use crate::core::entity::{PublicUser, User};
use crate::core::error::{AuthError, EntityError, HubError, HubResult};
use crate::core::password::{DECOY_HASH, hash_password, verify_password};
use crate::core::store::UserStore;
use crate::core::token::TokenSigner;
use crate::core::validation::{LoginInput, RegisterInput};
use serde::Serialize;
use std::sync::Arc;

/// A user together with a freshly issued token
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: PublicUser,
    pub token: String,
}

/// Owns the credential store and the token signer
#[derive(Clone)]
pub struct Authenticator {
    users: Arc<dyn UserStore>,
    signer: TokenSigner,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserStore>, signer: TokenSigner) -> Self {
        Self { users, signer }
    }

    /// Create a learner account and sign it in.
    ///
    /// The role always comes from [`User::new_learner`]; the request body has no
    /// way to set it.
    pub async fn register(&self, input: RegisterInput) -> HubResult<AuthSession> {
        let registration = input.validate()?;

        if self.users.find_by_email(&registration.email).await?.is_some() {
            return Err(EntityError::DuplicateEmail {
                email: registration.email,
            }
            .into());
        }

        let password = registration.password;
        let hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| HubError::Internal(e.to_string()))?
            .map_err(|e| HubError::Internal(format!("{:#}", e)))?;

        let user = User::new_learner(registration.name, registration.email.clone(), hash);
        // A concurrent registration can still win between the lookup and the insert
        let user = self
            .users
            .create(user)
            .await?
            .ok_or(EntityError::DuplicateEmail {
                email: registration.email,
            })?;

        tracing::info!(user_id = %user.id, "user registered");
        self.session(&user)
    }

    /// Verify credentials. Unknown email and wrong password fail identically.
    pub async fn login(&self, input: LoginInput) -> HubResult<AuthSession> {
        let (email, password) = input.validate()?;

        let user = self.users.find_by_email(&email).await?;
        let stored = user
            .as_ref()
            .map_or_else(|| DECOY_HASH.to_string(), |u| u.password_hash.clone());
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .map_err(|e| HubError::Internal(e.to_string()))?;
        let Some(user) = user.filter(|_| matches) else {
            return Err(AuthError::InvalidCredentials.into());
        };

        tracing::debug!(user_id = %user.id, "login succeeded");
        self.session(&user)
    }

    /// Resolve a bearer token to the identity of an existing user
    pub async fn resolve(&self, token: &str) -> HubResult<Identity> {
        let user_id = self.signer.verify(token).ok_or(AuthError::InvalidToken)?;
        let user = self
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        Ok(Identity::from(&user))
    }

    fn session(&self, user: &User) -> HubResult<AuthSession> {
        Ok(AuthSession {
            user: user.to_public(),
            token: self
                .signer
                .issue(user.id)
                .map_err(|e| HubError::Internal(format!("{:#}", e)))?,
        })
    }
}
