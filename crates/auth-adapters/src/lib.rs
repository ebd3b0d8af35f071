//! # auth-adapters
//!
//! `IdentityProvider` implementations. Credential acquisition (login
//! forms, tokens) lives outside the pipeline; these adapters only hold
//! the resolved user for the duration of a session.

use async_trait::async_trait;
use domains::{IdentityProvider, UserId};
use std::sync::RwLock;
use tracing::debug;

/// Holds the user signed into this session, if any.
#[derive(Default)]
pub struct SessionIdentity {
    current: RwLock<Option<UserId>>,
}

impl SessionIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that starts out already authenticated.
    pub fn signed_in(user: UserId) -> Self {
        Self {
            current: RwLock::new(Some(user)),
        }
    }

    pub fn sign_in(&self, user: UserId) {
        debug!(%user, "session identity resolved");
        *self.current.write().expect("identity lock poisoned") = Some(user);
    }

    pub fn sign_out(&self) {
        *self.current.write().expect("identity lock poisoned") = None;
    }
}

#[async_trait]
impl IdentityProvider for SessionIdentity {
    async fn current_user(&self) -> Option<UserId> {
        self.current
            .read()
            .expect("identity lock poisoned")
            .clone()
    }
}
