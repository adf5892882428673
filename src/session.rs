//! Session
//!
//! Explicit per-session context replacing the original storefront's
//! process-global browser storage. Each session owns its cart exclusively and
//! carries its own authentication state, with a defined start, login, logout,
//! and persistence lifecycle.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{
    auth::{AuthSession, CredentialService},
    cart::Cart,
    store::{JsonStore, StoreError},
};

/// Opaque session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh session id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.simple().fmt(f)
    }
}

#[derive(Debug, Clone)]
struct AuthState {
    user_id: String,
    token: String,
}

/// A single shopper's session: id, owned cart, and optional authenticated
/// user.
///
/// No cross-session sharing exists; callers hold one `Session` per actor and
/// mutate it synchronously.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    cart: Cart,
    auth: Option<AuthState>,
}

impl Session {
    /// Start a fresh anonymous session with an empty cart.
    #[must_use]
    pub fn start() -> Self {
        Self {
            id: SessionId::new(),
            cart: Cart::new(),
            auth: None,
        }
    }

    /// Resume a session from a previously persisted cart blob.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the cart blob cannot be read or parsed.
    pub fn resume(id: SessionId, store: &JsonStore) -> Result<Self, StoreError> {
        let cart = store.load_cart(id)?;

        Ok(Self {
            id,
            cart,
            auth: None,
        })
    }

    /// The session id.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The session's cart.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The session's cart, mutably.
    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Bind an authenticated user to this session after registration or
    /// login. Replaces any previous binding.
    pub fn authenticate(&mut self, auth: &AuthSession) {
        self.auth = Some(AuthState {
            user_id: auth.user.id.clone(),
            token: auth.token.clone(),
        });

        debug!(session = %self.id, user_id = %auth.user.id, "session authenticated");
    }

    /// Id of the authenticated user, if any.
    #[must_use]
    pub fn current_user_id(&self) -> Option<&str> {
        self.auth.as_ref().map(|auth| auth.user_id.as_str())
    }

    /// The session token presented on authenticated calls, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.auth.as_ref().map(|auth| auth.token.as_str())
    }

    /// Tear down the authentication state: revoke the token and drop the
    /// binding. The cart survives logout.
    pub fn logout(&mut self, credentials: &mut CredentialService) {
        if let Some(auth) = self.auth.take() {
            credentials.revoke_token(&auth.token);
            debug!(session = %self.id, "session logged out");
        }
    }

    /// Persist this session's cart as a whole blob.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the blob cannot be written.
    pub fn persist(&self, store: &JsonStore) -> Result<(), StoreError> {
        store.save_cart(self.id, &self.cart)
    }
}
