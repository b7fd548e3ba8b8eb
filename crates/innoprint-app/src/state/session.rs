//! # Session
//!
//! One signed-in storefront session: the identity plus its address book.
//!
//! A `Session` is an explicit object owned by whoever serves the user
//! (the CLI process, a request handler). Nothing here is process-global,
//! so concurrent sessions stay isolated.

use std::sync::{PoisonError, RwLock};
use tracing::info;

use innoprint_core::Identity;
use innoprint_db::Database;

use super::addresses::AddressBook;
use crate::error::{SessionError, SessionResult};

#[derive(Debug)]
pub struct Session {
    identity: RwLock<Option<Identity>>,
    addresses: AddressBook,
}

impl Session {
    /// Creates a signed-out session backed by `db`.
    pub fn new(db: &Database) -> Self {
        Session {
            identity: RwLock::new(None),
            addresses: AddressBook::new(db.addresses()),
        }
    }

    /// Signs `identity` in and loads their saved addresses.
    ///
    /// The identity stays signed in even if the address load fails; the
    /// failure is recorded on the address book and returned.
    pub async fn sign_in(&self, identity: Identity) -> SessionResult<()> {
        info!(uid = %identity.uid, "Signing in");

        let uid = identity.uid.clone();
        *self.identity.write().unwrap_or_else(PoisonError::into_inner) = Some(identity);

        self.addresses.sign_in(&uid).await?;
        Ok(())
    }

    /// Signs out and drops the cached addresses.
    pub fn sign_out(&self) {
        info!("Signing out");
        *self.identity.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.addresses.sign_out();
    }

    pub fn identity(&self) -> Option<Identity> {
        self.identity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The signed-in identity, or `Unauthenticated`.
    pub fn require_identity(&self) -> SessionResult<Identity> {
        self.identity().ok_or(SessionError::Unauthenticated)
    }

    pub fn addresses(&self) -> &AddressBook {
        &self.addresses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LoadPhase;
    use innoprint_db::DbConfig;

    fn identity(uid: &str) -> Identity {
        Identity {
            uid: uid.to_string(),
            email: format!("{}@example.com", uid),
            display_name: None,
        }
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let session = Session::new(&db);

        assert!(matches!(
            session.require_identity(),
            Err(SessionError::Unauthenticated)
        ));

        session.sign_in(identity("u1")).await.unwrap();
        assert_eq!(session.require_identity().unwrap().uid, "u1");
        assert_eq!(session.addresses().phase(), LoadPhase::Ready);

        session.sign_out();
        assert!(session.identity().is_none());
        assert_eq!(session.addresses().phase(), LoadPhase::Idle);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let first = Session::new(&db);
        let second = Session::new(&db);

        first.sign_in(identity("u1")).await.unwrap();
        second.sign_in(identity("u2")).await.unwrap();
        first.sign_out();

        assert_eq!(second.require_identity().unwrap().uid, "u2");
        assert_eq!(second.addresses().user_id().as_deref(), Some("u2"));
    }
}
