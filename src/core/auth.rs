//! Authorization for learnhub
//!
//! Requests carry an [`AuthContext`]: either an authenticated [`Identity`]
//! resolved from a bearer token, or `Anonymous`. Operations declare an
//! [`AuthPolicy`] and ask it to authorize the context before touching the store.
//!
//! Policies:
//! - `Public`: anyone
//! - `Authenticated`: any resolved identity
//! - `CreatorOrAdmin`: the resource creator or an admin
//! - `AdminOnly`: admins

use crate::core::entity::{Role, User};
use crate::core::error::{AuthError, HubResult};
use uuid::Uuid;

/// The authenticated caller
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Authorization context extracted from a request
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthContext {
    /// Caller presented a valid token for an existing user
    Authenticated(Identity),

    /// No token presented
    #[default]
    Anonymous,
}

impl AuthContext {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            AuthContext::Authenticated(identity) => Some(identity),
            AuthContext::Anonymous => None,
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.identity().map(|i| i.id)
    }

    pub fn is_admin(&self) -> bool {
        self.identity().is_some_and(Identity::is_admin)
    }

    /// The identity, or `MissingToken` for anonymous callers
    pub fn require(&self) -> HubResult<&Identity> {
        self.identity().ok_or_else(|| AuthError::MissingToken.into())
    }
}

/// Authorization policy for an operation
#[derive(Debug, Clone, PartialEq)]
pub enum AuthPolicy {
    /// Public access (no auth required)
    Public,

    /// Any authenticated user
    Authenticated,

    /// Creator of the target resource, or any admin
    CreatorOrAdmin { creator: Uuid },

    /// Admin only
    AdminOnly,
}

impl AuthPolicy {
    /// Check if auth context satisfies this policy
    pub fn check(&self, context: &AuthContext) -> bool {
        match self {
            AuthPolicy::Public => true,
            AuthPolicy::Authenticated => context.identity().is_some(),
            AuthPolicy::CreatorOrAdmin { creator } => context
                .identity()
                .is_some_and(|i| i.id == *creator || i.is_admin()),
            AuthPolicy::AdminOnly => context.is_admin(),
        }
    }

    /// Authorize `context`, returning the caller's identity.
    ///
    /// Anonymous callers fail with `MissingToken` for every policy except
    /// `Public`; authenticated callers that fail the policy get `Forbidden`
    /// carrying `denied`.
    pub fn authorize<'a>(&self, context: &'a AuthContext, denied: &str) -> HubResult<&'a Identity> {
        let identity = context.require()?;
        if self.check(context) {
            Ok(identity)
        } else {
            Err(AuthError::forbidden(denied).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::HubError;

    fn identity(role: Role) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_policy_check() {
        let learner = AuthContext::Authenticated(identity(Role::Learner));
        let anon = AuthContext::Anonymous;

        assert!(AuthPolicy::Public.check(&anon));
        assert!(!AuthPolicy::Authenticated.check(&anon));
        assert!(AuthPolicy::Authenticated.check(&learner));
        assert!(!AuthPolicy::AdminOnly.check(&learner));
    }

    #[test]
    fn test_creator_or_admin() {
        let creator = identity(Role::Learner);
        let policy = AuthPolicy::CreatorOrAdmin {
            creator: creator.id,
        };

        assert!(policy.check(&AuthContext::Authenticated(creator)));
        assert!(policy.check(&AuthContext::Authenticated(identity(Role::Admin))));
        assert!(!policy.check(&AuthContext::Authenticated(identity(Role::Learner))));
        assert!(!policy.check(&AuthContext::Anonymous));
    }

    #[test]
    fn test_authorize_error_kinds() {
        let policy = AuthPolicy::AdminOnly;

        let anon = policy.authorize(&AuthContext::Anonymous, "Admins only");
        assert!(matches!(anon, Err(HubError::Auth(AuthError::MissingToken))));

        let learner = AuthContext::Authenticated(identity(Role::Learner));
        match policy.authorize(&learner, "Admins only") {
            Err(HubError::Auth(AuthError::Forbidden { message })) => {
                assert_eq!(message, "Admins only")
            }
            other => panic!("expected Forbidden, got {:?}", other),
        }

        let admin = AuthContext::Authenticated(identity(Role::Admin));
        assert!(policy.authorize(&admin, "Admins only").is_ok());
    }
}
