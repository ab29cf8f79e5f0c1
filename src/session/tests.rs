use super::*;
use crate::api::ApiError;
use serde_json::json;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

// =========================================================
// Shared mock storage
// =========================================================

struct TestContext {
    /// Operation log to verify calling order
    log: RefCell<Vec<String>>,
    /// In-memory key/value entries
    entries: RefCell<HashMap<String, String>>,
}

impl TestContext {
    fn new() -> Self {
        Self {
            log: RefCell::new(Vec::new()),
            entries: RefCell::new(HashMap::new()),
        }
    }

    fn entry(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

struct TestStorage {
    ctx: Rc<TestContext>,
}

impl StorageAdapter for TestStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.ctx.log.borrow_mut().push(format!("get:{key}"));
        self.ctx.entry(key)
    }

    fn set(&self, key: &str, value: &str) {
        self.ctx.log.borrow_mut().push(format!("set:{key}"));
        self.ctx
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.ctx.log.borrow_mut().push(format!("remove:{key}"));
        self.ctx.entries.borrow_mut().remove(key);
    }
}

fn store_with(entries: &[(&str, &str)]) -> (SessionStore, Rc<TestContext>) {
    let ctx = Rc::new(TestContext::new());
    for (key, value) in entries {
        ctx.entries
            .borrow_mut()
            .insert((*key).to_string(), (*value).to_string());
    }
    let store = SessionStore::new(Rc::new(TestStorage { ctx: ctx.clone() }));
    (store, ctx)
}

fn admin_profile() -> UserProfile {
    let Value::Object(fields) = json!({"role": "ROLE_ADMIN", "username": "root"}) else {
        unreachable!()
    };
    UserProfile::new(fields)
}

// =========================================================
// Seeding
// =========================================================

#[test]
fn empty_storage_starts_unauthenticated() {
    let (store, _ctx) = store_with(&[]);
    assert!(!store.is_authenticated());
    assert!(!store.is_privileged(Capability::Admin));
    assert_eq!(store.token(), None);
}

#[test]
fn seeds_token_and_profile_from_storage() {
    let (store, _ctx) = store_with(&[
        (STORAGE_KEY_TOKEN, "T1"),
        (STORAGE_KEY_PROFILE, r#"{"role":"ROLE_ADMIN","username":"a"}"#),
    ]);
    assert!(store.is_authenticated());
    assert!(store.is_privileged(Capability::Admin));
    assert_eq!(store.token().as_deref(), Some("T1"));
}

#[test]
fn malformed_profile_resets_but_keeps_token() {
    let (store, _ctx) = store_with(&[
        (STORAGE_KEY_TOKEN, "T1"),
        (STORAGE_KEY_PROFILE, "not json at all"),
    ]);
    assert!(store.is_authenticated());
    assert!(!store.is_privileged(Capability::Admin));
    assert!(store.state().with_untracked(|s| s.profile.is_empty()));
}

#[test]
fn non_object_profile_counts_as_malformed() {
    let (store, _ctx) = store_with(&[
        (STORAGE_KEY_TOKEN, "T1"),
        (STORAGE_KEY_PROFILE, r#"[1,2,3]"#),
    ]);
    assert!(store.state().with_untracked(|s| s.profile.is_empty()));
}

#[test]
fn empty_token_entry_counts_as_absent() {
    let (store, _ctx) = store_with(&[(STORAGE_KEY_TOKEN, "")]);
    assert!(!store.is_authenticated());
}

// =========================================================
// Login / logout / invalidate
// =========================================================

#[test]
fn apply_login_sets_state_and_persists_both_entries() {
    let (store, ctx) = store_with(&[]);
    store.apply_login("T1".to_string(), admin_profile());

    assert!(store.is_authenticated());
    assert!(store.is_privileged(Capability::Admin));
    assert_eq!(ctx.entry(STORAGE_KEY_TOKEN).as_deref(), Some("T1"));
    let persisted = ctx.entry(STORAGE_KEY_PROFILE).expect("profile persisted");
    assert_eq!(
        UserProfile::parse(&persisted).unwrap().role(),
        Some("ROLE_ADMIN")
    );
}

#[test]
fn logout_clears_memory_and_storage() {
    let (store, ctx) = store_with(&[
        (STORAGE_KEY_TOKEN, "T1"),
        (STORAGE_KEY_PROFILE, r#"{"role":"ROLE_ADMIN"}"#),
    ]);
    store.logout();

    assert!(!store.is_authenticated());
    assert!(!store.is_privileged(Capability::Admin));
    assert_eq!(ctx.entry(STORAGE_KEY_TOKEN), None);
    assert_eq!(ctx.entry(STORAGE_KEY_PROFILE), None);
}

#[test]
fn logout_is_idempotent() {
    let (store, ctx) = store_with(&[]);
    store.logout();
    store.logout();
    assert!(!store.is_authenticated());
    assert!(ctx.entries.borrow().is_empty());
}

#[test]
fn invalidate_and_logout_interleave_safely() {
    let (store, ctx) = store_with(&[(STORAGE_KEY_TOKEN, "T1")]);
    store.invalidate();
    store.logout();
    store.invalidate();
    store.invalidate();
    assert!(!store.is_authenticated());
    assert!(ctx.entries.borrow().is_empty());
}

// =========================================================
// Profile merge
// =========================================================

#[test]
fn merge_profile_overwrites_and_keeps_other_fields() {
    let (store, ctx) = store_with(&[
        (STORAGE_KEY_TOKEN, "T1"),
        (
            STORAGE_KEY_PROFILE,
            r#"{"role":"ROLE_USER","username":"a","remainingTokens":100}"#,
        ),
    ]);

    let Value::Object(patch) = json!({"remainingTokens": 60, "usedTokens": 40}) else {
        unreachable!()
    };
    store.merge_profile(patch);

    let state = store.state().get_untracked();
    assert_eq!(state.profile.get_i64("remainingTokens"), Some(60));
    assert_eq!(state.profile.get_i64("usedTokens"), Some(40));
    assert_eq!(state.profile.role(), Some("ROLE_USER"));

    // 持久化副本与内存一致
    let persisted = UserProfile::parse(&ctx.entry(STORAGE_KEY_PROFILE).unwrap()).unwrap();
    assert_eq!(persisted, state.profile);
}

// =========================================================
// Derived queries
// =========================================================

#[test]
fn unknown_or_missing_role_is_not_privileged() {
    let (store, _ctx) = store_with(&[
        (STORAGE_KEY_TOKEN, "T1"),
        (STORAGE_KEY_PROFILE, r#"{"role":"ROLE_SOMETHING"}"#),
    ]);
    assert!(!store.is_privileged(Capability::Admin));

    let (store, _ctx) = store_with(&[(STORAGE_KEY_TOKEN, "T1"), (STORAGE_KEY_PROFILE, "{}")]);
    assert!(!store.is_privileged(Capability::Admin));
}

#[test]
fn signals_follow_login_and_logout() {
    let (store, _ctx) = store_with(&[]);
    let authed = store.is_authenticated_signal();
    let admin = store.is_admin_signal();

    assert!(!authed.get_untracked());
    store.apply_login("T1".to_string(), admin_profile());
    assert!(authed.get_untracked());
    assert!(admin.get_untracked());
    store.logout();
    assert!(!authed.get_untracked());
    assert!(!admin.get_untracked());
}

#[test]
fn display_name_prefers_real_name() {
    let Value::Object(fields) = json!({"username": "a", "realName": "管理员"}) else {
        unreachable!()
    };
    let profile = UserProfile::new(fields);
    assert_eq!(profile.display_name(), Some("管理员"));

    let Value::Object(fields) = json!({"username": "a"}) else {
        unreachable!()
    };
    assert_eq!(UserProfile::new(fields).display_name(), Some("a"));
}

// =========================================================
// AuthError mapping
// =========================================================

#[test]
fn auth_error_takes_server_message_when_present() {
    let error = ApiError::Domain {
        message: "用户名或密码错误".to_string(),
    };
    assert_eq!(AuthError::from_api(&error).message(), "用户名或密码错误");

    let error = ApiError::Status {
        status: 423,
        message: Some("账号已锁定".to_string()),
    };
    assert_eq!(AuthError::from_api(&error).message(), "账号已锁定");
}

#[test]
fn auth_error_falls_back_to_generic_message() {
    let error = ApiError::Network("timeout".to_string());
    assert_eq!(AuthError::from_api(&error).message(), "登录失败");

    let error = ApiError::Status {
        status: 500,
        message: None,
    };
    assert_eq!(AuthError::from_api(&error).message(), "登录失败");
}
