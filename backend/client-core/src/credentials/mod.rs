//! Credential persistence seam.
//!
//! The host application owns the real key-value store (browser local
//! storage, OS keychain, ...). The core only reads and writes through this
//! trait, so credential rotation takes effect on the next request without
//! any coordination.

use common::{Profile, RedactedSecret};

use std::sync::RwLock;

/// Persistent slots for the access token, the vendor API key and the
/// signed-in profile. Each slot is independently settable and clearable.
pub trait CredentialStore: Send + Sync {
    fn token(&self) -> Option<RedactedSecret>;
    fn set_token(&self, token: Option<RedactedSecret>);

    fn api_key(&self) -> Option<RedactedSecret>;
    fn set_api_key(&self, key: Option<RedactedSecret>);

    fn profile(&self) -> Option<Profile>;
    fn set_profile(&self, profile: Option<Profile>);

    /// Sign-out: removes the token and profile. The API key survives, it
    /// stays valid across sessions.
    fn clear_auth(&self) {
        self.set_token(None);
        self.set_profile(None);
    }
}

/// In-memory store for tests and embedding hosts without persistence.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    slots: RwLock<Slots>,
}

#[derive(Default)]
struct Slots {
    token: Option<RedactedSecret>,
    api_key: Option<RedactedSecret>,
    profile: Option<Profile>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn token(&self) -> Option<RedactedSecret> {
        self.slots.read().expect("credential store lock poisoned").token.clone()
    }

    fn set_token(&self, token: Option<RedactedSecret>) {
        self.slots.write().expect("credential store lock poisoned").token = token;
    }

    fn api_key(&self) -> Option<RedactedSecret> {
        self.slots.read().expect("credential store lock poisoned").api_key.clone()
    }

    fn set_api_key(&self, key: Option<RedactedSecret>) {
        self.slots.write().expect("credential store lock poisoned").api_key = key;
    }

    fn profile(&self) -> Option<Profile> {
        self.slots.read().expect("credential store lock poisoned").profile.clone()
    }

    fn set_profile(&self, profile: Option<Profile>) {
        self.slots.write().expect("credential store lock poisoned").profile = profile;
    }
}
