// Tests for the credential store

use casteradm_core::{CredentialStore, Credentials, MemoryStorage, SessionStorage};
use std::sync::Arc;

fn create_test_store() -> (MemoryStorage, CredentialStore) {
    let storage = MemoryStorage::new();
    let store = CredentialStore::new(Arc::new(storage.clone()));
    (storage, store)
}

// ============================================================================
// Read / Write Tests
// ============================================================================

#[test]
fn test_get_on_empty_storage() {
    let (_storage, store) = create_test_store();
    let creds = store.get();

    assert_eq!(creds.user, None);
    assert_eq!(creds.password, None);
}

#[test]
fn test_set_then_get() {
    let (_storage, store) = create_test_store();
    store.set("alice", "pw1");

    assert_eq!(store.get(), Credentials::new("alice", "pw1"));
}

#[test]
fn test_set_overwrites_previous_pair() {
    let (_storage, store) = create_test_store();
    store.set("alice", "pw1");
    store.set("bob", "pw2");

    let creds = store.get();
    assert_eq!(creds.user.as_deref(), Some("bob"));
    assert_eq!(creds.password.as_deref(), Some("pw2"));
}

#[test]
fn test_set_accepts_empty_strings() {
    let (_storage, store) = create_test_store();
    store.set("", "");

    let creds = store.get();
    assert_eq!(creds.user.as_deref(), Some(""));
    assert_eq!(creds.password.as_deref(), Some(""));
}

#[test]
fn test_uses_literal_storage_keys() {
    let (storage, store) = create_test_store();
    store.set("alice", "pw1");

    assert_eq!(storage.get_item("user"), Some("alice".to_string()));
    assert_eq!(storage.get_item("password"), Some("pw1".to_string()));
}

// ============================================================================
// Clear Tests
// ============================================================================

#[test]
fn test_clear_removes_both_values() {
    let (storage, store) = create_test_store();
    store.set("alice", "pw1");
    store.clear();

    assert_eq!(store.get(), Credentials::default());
    assert!(storage.is_empty());
}

#[test]
fn test_clear_is_idempotent() {
    let (_storage, store) = create_test_store();
    store.clear();
    store.clear();

    assert!(!store.is_logged_in());
}

// ============================================================================
// Login State Tests
// ============================================================================

#[test]
fn test_is_logged_in_after_set() {
    let (_storage, store) = create_test_store();
    assert!(!store.is_logged_in());

    store.set("alice", "pw1");
    assert!(store.is_logged_in());
}

#[test]
fn test_is_logged_in_false_after_clear() {
    let (_storage, store) = create_test_store();
    store.set("alice", "pw1");
    store.clear();

    assert!(!store.is_logged_in());
}

#[test]
fn test_is_logged_in_false_for_empty_user() {
    let (_storage, store) = create_test_store();
    store.set("", "pw1");

    assert!(!store.is_logged_in());
}

#[test]
fn test_stores_sharing_storage_see_same_session() {
    let storage = MemoryStorage::new();
    let login = CredentialStore::new(Arc::new(storage.clone()));
    let api = CredentialStore::new(Arc::new(storage));

    login.set("alice", "pw1");
    assert!(api.is_logged_in());
    assert_eq!(api.get().user.as_deref(), Some("alice"));
}
