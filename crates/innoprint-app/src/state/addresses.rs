//! # Address Book
//!
//! In-memory mirror of the signed-in user's saved addresses.
//!
//! ## Load Phases
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    AddressBook Lifecycle                                │
//! │                                                                         │
//! │   sign_in(uid)            mutation (add/update/remove/set default)      │
//! │        │                          │                                     │
//! │        ▼                          ▼                                     │
//! │  ┌──────────┐  fetch  ┌──────────┐  store call  ┌──────────┐           │
//! │  │   Idle   │───────►│ Loading  │◄─────────────│  Ready   │           │
//! │  └──────────┘        └────┬─────┘  + re-fetch  └──────────┘           │
//! │        ▲                  │                          ▲                  │
//! │        │                  └──────────────────────────┘                  │
//! │        │                                                                │
//! │   sign_out() ─── clears the list, no store round trip                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! - The cached list lives behind a `RwLock` and is never held across an
//!   `.await`, so readers always get a consistent snapshot.
//! - Store operations are serialized by an async `Mutex`: one mutation and
//!   its re-fetch complete before the next starts.
//!
//! Every mutation is followed by a full re-fetch, so after it returns the
//! cached list matches the store.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use innoprint_core::validation::validate_address;
use innoprint_core::{Address, NewAddress};
use innoprint_db::{AddressRepository, DbError, DbResult};

use crate::error::{SessionError, SessionResult};

/// Where the cached list stands relative to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPhase {
    /// Nobody signed in; the list is empty.
    #[default]
    Idle,
    /// A store call or re-fetch is in flight.
    Loading,
    /// The list reflects the store as of the last fetch.
    Ready,
}

/// What a UI renders from the address book.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressSnapshot {
    pub phase: LoadPhase,
    pub addresses: Vec<Address>,
    /// Message of the last failed store operation.
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct BookState {
    user_id: Option<String>,
    phase: LoadPhase,
    addresses: Vec<Address>,
    last_error: Option<String>,
}

/// Address cache for one session.
#[derive(Debug)]
pub struct AddressBook {
    repo: AddressRepository,
    state: RwLock<BookState>,
    op_lock: Mutex<()>,
}

impl AddressBook {
    /// Creates an empty, signed-out address book.
    pub fn new(repo: AddressRepository) -> Self {
        AddressBook {
            repo,
            state: RwLock::new(BookState::default()),
            op_lock: Mutex::new(()),
        }
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Binds the book to `user_id` and loads their addresses.
    pub async fn sign_in(&self, user_id: &str) -> SessionResult<Vec<Address>> {
        info!(user_id = %user_id, "Loading address book");

        {
            let mut state = self.write();
            state.user_id = Some(user_id.to_string());
            state.addresses.clear();
            state.last_error = None;
        }

        let _guard = self.op_lock.lock().await;
        self.reload(user_id).await
    }

    /// Forgets the user and their addresses. No store call is made.
    pub fn sign_out(&self) {
        debug!("Clearing address book");
        *self.write() = BookState::default();
    }

    /// Re-fetches the list from the store.
    ///
    /// Signed out, this returns an empty list without touching the store.
    pub async fn refresh(&self) -> SessionResult<Vec<Address>> {
        let Some(user_id) = self.user_id() else {
            return Ok(Vec::new());
        };

        let _guard = self.op_lock.lock().await;
        self.reload(&user_id).await
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Validates and saves a new address for the signed-in user.
    ///
    /// The user's first address is always saved as the default, whatever
    /// the form says. "First" is decided by the store, not the cache.
    pub async fn add_address(&self, form: NewAddress) -> SessionResult<Address> {
        let user_id = self.require_user()?;
        validate_address(&form)?;

        let _guard = self.op_lock.lock().await;
        self.begin();

        let mut address = form.into_address(user_id.as_str());

        let existing = self.record(self.repo.count_for_user(&user_id).await)?;
        if existing == 0 {
            debug!(user_id = %user_id, "First address becomes the default");
            address.is_default = true;
        }

        let id = self.record(self.repo.save(&address).await)?;
        address.id = Some(id);

        self.reload(&user_id).await?;
        Ok(address)
    }

    /// Saves changes to one of the signed-in user's addresses.
    ///
    /// ## Errors
    /// - `Unauthenticated` when signed out
    /// - `Ownership` when `address.user_id` is not the signed-in user
    /// - `Validation` for an unsaved address or invalid fields
    pub async fn update_address(&self, address: Address) -> SessionResult<()> {
        let user_id = self.require_user()?;

        let Some(address_id) = address.id.clone() else {
            return Err(SessionError::Validation(
                innoprint_core::ValidationError::required("id"),
            ));
        };

        if address.user_id != user_id {
            return Err(SessionError::Ownership { address_id });
        }

        validate_address(&form_of(&address))?;

        let _guard = self.op_lock.lock().await;
        self.begin();

        self.record(self.repo.save(&address).await)?;

        self.reload(&user_id).await?;
        Ok(())
    }

    /// Deletes one of the signed-in user's addresses.
    ///
    /// Removing the default leaves the user without one; no other address
    /// is promoted.
    pub async fn remove_address(&self, address_id: &str) -> SessionResult<()> {
        let user_id = self.require_user()?;

        let _guard = self.op_lock.lock().await;
        self.ensure_owned(&user_id, address_id).await?;
        self.begin();

        self.record(self.repo.delete(address_id).await)?;

        self.reload(&user_id).await?;
        Ok(())
    }

    /// Makes `address_id` the signed-in user's only default address.
    pub async fn set_as_default(&self, address_id: &str) -> SessionResult<()> {
        let user_id = self.require_user()?;

        let _guard = self.op_lock.lock().await;
        self.ensure_owned(&user_id, address_id).await?;
        self.begin();

        self.record(self.repo.set_default(address_id, &user_id).await)?;

        self.reload(&user_id).await?;
        Ok(())
    }

    // =========================================================================
    // Reads (cache only)
    // =========================================================================

    pub fn user_id(&self) -> Option<String> {
        self.read().user_id.clone()
    }

    pub fn addresses(&self) -> Vec<Address> {
        self.read().addresses.clone()
    }

    /// The cached default address, if any.
    pub fn default_address(&self) -> Option<Address> {
        self.read().addresses.iter().find(|a| a.is_default).cloned()
    }

    /// Looks an address up in the cache by id.
    pub fn find(&self, address_id: &str) -> Option<Address> {
        self.read()
            .addresses
            .iter()
            .find(|a| a.id.as_deref() == Some(address_id))
            .cloned()
    }

    pub fn phase(&self) -> LoadPhase {
        self.read().phase
    }

    pub fn last_error(&self) -> Option<String> {
        self.read().last_error.clone()
    }

    pub fn snapshot(&self) -> AddressSnapshot {
        let state = self.read();
        AddressSnapshot {
            phase: state.phase,
            addresses: state.addresses.clone(),
            error: state.last_error.clone(),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn read(&self) -> RwLockReadGuard<'_, BookState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BookState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn require_user(&self) -> SessionResult<String> {
        self.user_id().ok_or(SessionError::Unauthenticated)
    }

    fn begin(&self) {
        let mut state = self.write();
        state.phase = LoadPhase::Loading;
        state.last_error = None;
    }

    /// Fails with `Ownership` when the stored address belongs to someone else.
    async fn ensure_owned(&self, user_id: &str, address_id: &str) -> SessionResult<()> {
        match self.record(self.repo.get_by_id(address_id).await)? {
            Some(stored) if stored.user_id == user_id => Ok(()),
            Some(_) => Err(SessionError::Ownership {
                address_id: address_id.to_string(),
            }),
            None => Err(DbError::not_found("Address", address_id).into()),
        }
    }

    /// Logs and records a store failure, then hands it back.
    fn record<T>(&self, result: DbResult<T>) -> SessionResult<T> {
        result.map_err(|err| {
            error!(error = %err, "Address store operation failed");
            let mut state = self.write();
            state.last_error = Some(err.to_string());
            if state.phase == LoadPhase::Loading {
                state.phase = LoadPhase::Ready;
            }
            SessionError::Store(err)
        })
    }

    /// Fetches `user_id`'s list. Caller holds the operation lock.
    async fn reload(&self, user_id: &str) -> SessionResult<Vec<Address>> {
        self.write().phase = LoadPhase::Loading;

        let addresses = self.record(self.repo.list_for_user(user_id).await)?;

        let mut state = self.write();
        // A sign-out or user switch while fetching wins.
        if state.user_id.as_deref() == Some(user_id) {
            state.addresses = addresses.clone();
            state.phase = LoadPhase::Ready;
        }

        debug!(user_id = %user_id, count = addresses.len(), "Address book refreshed");
        Ok(addresses)
    }
}

fn form_of(address: &Address) -> NewAddress {
    NewAddress {
        name: address.name.clone(),
        line1: address.line1.clone(),
        line2: address.line2.clone(),
        city: address.city.clone(),
        state: address.state.clone(),
        zip_code: address.zip_code.clone(),
        country: address.country.clone(),
        is_default: address.is_default,
    }
}
