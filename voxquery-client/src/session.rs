use anyhow::Context;
use std::sync::Mutex;

/// Where the session token lives in the OS keyring.
///
/// This is intentionally constant so upgrades don't orphan the credential.
const SERVICE: &str = "voxquery";
const TOKEN_USER: &str = "session_token";

/// Process-wide session token register: single writer, many readers,
/// last write wins. Read on every outbound request, cleared on 401.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> anyhow::Result<Option<String>>;
    fn set(&self, token: &str) -> anyhow::Result<()>;
    fn clear(&self) -> anyhow::Result<()>;
}

/// Notified when the backend rejects the session, so whatever owns
/// navigation can send the user back to a login view.
pub trait AuthRedirect: Send + Sync {
    fn redirect_to_login(&self);
}

/// Durable store backed by the OS keyring.
#[derive(Debug, Clone, Default)]
pub struct KeyringStore;

impl SessionStore for KeyringStore {
    fn get(&self) -> anyhow::Result<Option<String>> {
        let entry = keyring::Entry::new(SERVICE, TOKEN_USER).context("create keyring entry")?;
        match entry.get_password() {
            Ok(v) => Ok(Some(v)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(anyhow::Error::new(e)).context("get session token"),
        }
    }

    fn set(&self, token: &str) -> anyhow::Result<()> {
        let entry = keyring::Entry::new(SERVICE, TOKEN_USER).context("create keyring entry")?;
        entry.set_password(token).context("set session token")
    }

    fn clear(&self) -> anyhow::Result<()> {
        let entry = keyring::Entry::new(SERVICE, TOKEN_USER).context("create keyring entry")?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(anyhow::Error::new(e)).context("clear session token"),
        }
    }
}

/// In-memory store for tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemoryStore {
    token: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl SessionStore for MemoryStore {
    fn get(&self) -> anyhow::Result<Option<String>> {
        Ok(self.token.lock().unwrap().clone())
    }

    fn set(&self, token: &str) -> anyhow::Result<()> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_last_write_wins() {
        let store = MemoryStore::default();
        assert_eq!(store.get().unwrap(), None);

        store.set("first").unwrap();
        store.set("second").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("second"));

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
        // Clearing an already-empty store is fine.
        store.clear().unwrap();
    }
}
