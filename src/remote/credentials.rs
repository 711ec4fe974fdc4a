use std::sync::{Arc, RwLock};

/// A signed-in user and the bearer token the store accepts for them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthIdentity {
    pub user: String,
    pub token: String,
}

impl AuthIdentity {
    pub fn new(user: impl Into<String>, token: impl Into<String>) -> anyhow::Result<Self> {
        let user = user.into();
        let token = token.into();
        if user.trim().is_empty() {
            anyhow::bail!("user is empty");
        }
        if token.trim().is_empty() {
            anyhow::bail!("token is empty");
        }
        Ok(Self { user, token })
    }
}

/// Source of the current identity. Implementations must return the live value on every call;
/// callers never cache it across requests.
pub trait CredentialProvider: Send + Sync {
    fn identity(&self) -> Option<AuthIdentity>;

    fn bearer_token(&self) -> Option<String> {
        self.identity().map(|i| i.token)
    }

    fn allows_changes(&self) -> bool {
        self.identity().is_some()
    }
}

/// Never signed in.
#[derive(Clone, Copy, Debug, Default)]
pub struct Anonymous;

impl CredentialProvider for Anonymous {
    fn identity(&self) -> Option<AuthIdentity> {
        None
    }
}

/// Process-wide identity slot, written by sign-in/refresh/sign-out and read by every request.
#[derive(Clone, Debug, Default)]
pub struct SharedCredentials {
    inner: Arc<RwLock<Option<AuthIdentity>>>,
}

impl SharedCredentials {
    pub fn new(identity: Option<AuthIdentity>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(identity)),
        }
    }

    pub fn sign_in(&self, identity: AuthIdentity) {
        tracing::info!(user = %identity.user, "signed in");
        *self.write() = Some(identity);
    }

    /// Replaces the token of the signed-in user. Returns false when nobody is signed in.
    pub fn refresh_token(&self, token: String) -> bool {
        let mut guard = self.write();
        match guard.as_mut() {
            Some(identity) => {
                identity.token = token;
                tracing::debug!(user = %identity.user, "token refreshed");
                true
            }
            None => false,
        }
    }

    pub fn sign_out(&self) {
        if let Some(identity) = self.write().take() {
            tracing::info!(user = %identity.user, "signed out");
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<AuthIdentity>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl CredentialProvider for SharedCredentials {
    fn identity(&self) -> Option<AuthIdentity> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
