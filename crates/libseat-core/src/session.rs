// ── Session store ──
//
// Who is signed in. Readers take a cheap `Arc` snapshot through
// `ArcSwap`; writers publish a new snapshot and bump a `watch` version so
// subscribers (sidebar, role-gated views) can re-render.

use std::sync::Arc;

use arc_swap::ArcSwap;
use secrecy::SecretString;
use tokio::sync::watch;

use libseat_api::models::{Role, User};

/// Immutable view of the current session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub user: Option<User>,
    /// Refresh token issued at login, kept for token renewal and logout.
    pub refresh: Option<SecretString>,
}

impl Session {
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// Admin pages are visible to admins and superadmins.
    pub fn is_admin(&self) -> bool {
        self.role().is_some_and(Role::is_admin)
    }

    pub fn is_superadmin(&self) -> bool {
        self.role() == Some(Role::Superadmin)
    }
}

pub struct SessionStore {
    current: ArcSwap<Session>,
    version: watch::Sender<u64>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            current: ArcSwap::from_pointee(Session::default()),
            version,
        }
    }

    pub fn snapshot(&self) -> Arc<Session> {
        self.current.load_full()
    }

    pub fn user(&self) -> Option<User> {
        self.current.load().user.clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.load().is_signed_in()
    }

    pub fn sign_in(&self, user: User, refresh: Option<SecretString>) {
        self.publish(Session {
            user: Some(user),
            refresh,
        });
    }

    /// Replace the profile after a `GET auth/me/`, keeping the tokens.
    pub fn update_user(&self, user: User) {
        let refresh = self.current.load().refresh.clone();
        self.publish(Session {
            user: Some(user),
            refresh,
        });
    }

    pub fn clear(&self) {
        self.publish(Session::default());
    }

    /// Subscribe to session changes. The value is a change counter.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    fn publish(&self, session: Session) {
        self.current.store(Arc::new(session));
        self.version.send_modify(|v| *v += 1);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "username": "ada",
            "role": role.to_string(),
        }))
        .unwrap()
    }

    #[test]
    fn sign_in_publishes_new_snapshot() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();
        assert!(!store.is_signed_in());

        store.sign_in(user(Role::Student), None);

        assert!(rx.has_changed().unwrap());
        assert!(store.is_signed_in());
        assert_eq!(*rx.borrow_and_update(), 1);
        assert!(!store.snapshot().is_admin());
    }

    #[test]
    fn role_helpers_follow_user() {
        let store = SessionStore::new();
        store.sign_in(user(Role::Superadmin), None);
        let session = store.snapshot();
        assert!(session.is_admin());
        assert!(session.is_superadmin());

        store.update_user(user(Role::Admin));
        assert!(store.snapshot().is_admin());
        assert!(!store.snapshot().is_superadmin());
    }

    #[test]
    fn old_snapshots_survive_clear() {
        let store = SessionStore::new();
        store.sign_in(user(Role::Member), None);
        let before = store.snapshot();
        store.clear();
        assert!(before.is_signed_in());
        assert!(!store.is_signed_in());
    }
}
