// Unit tests for the in-memory credential store

use crate::credentials::{CredentialStore, InMemoryCredentialStore};

use common::{Profile, RedactedSecret};

#[test]
fn given_store_when_slots_set_then_each_reads_back_independently() {
    let store = InMemoryCredentialStore::new();
    assert!(store.token().is_none());
    assert!(store.api_key().is_none());
    assert!(store.profile().is_none());

    store.set_token(Some(RedactedSecret::from("tkn")));
    store.set_api_key(Some(RedactedSecret::from("key")));
    store.set_profile(Some(Profile {
        name: String::from("alice"),
        email: None,
    }));

    assert_eq!(store.token().map(|t| t.as_str().to_owned()), Some(String::from("tkn")));
    assert_eq!(store.api_key().map(|k| k.as_str().to_owned()), Some(String::from("key")));
    assert_eq!(store.profile().map(|p| p.name), Some(String::from("alice")));

    store.set_token(None);
    assert!(store.token().is_none(), "slots clear independently");
    assert!(store.api_key().is_some());
}

/// **VALUE**: Verifies sign-out clears the token and profile but keeps the
/// API key.
///
/// **WHY THIS MATTERS**: The vendor API key is account-independent and
/// stays valid across sessions; wiping it on sign-out would force the user
/// to re-provision it on every login.
///
/// **BUG THIS CATCHES**: Would catch a clear_auth that wipes all three
/// slots.
#[test]
fn given_full_store_when_clear_auth_then_api_key_survives() {
    let store = InMemoryCredentialStore::new();
    store.set_token(Some(RedactedSecret::from("tkn")));
    store.set_api_key(Some(RedactedSecret::from("key")));
    store.set_profile(Some(Profile {
        name: String::from("alice"),
        email: Some(String::from("alice@example.com")),
    }));

    store.clear_auth();

    assert!(store.token().is_none());
    assert!(store.profile().is_none());
    assert_eq!(store.api_key().map(|k| k.as_str().to_owned()), Some(String::from("key")));
}
