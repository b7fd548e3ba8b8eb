//! # Address Commands
//!
//! Saved addresses on the profile page and address selection on the
//! delivery step.
//!
//! ## Delivery Step
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ( ) Home - 12 MG Road, Bengaluru 560001        [default]              │
//! │  ( ) Office - 4 Residency Road, Bengaluru 560025                       │
//! │  ( ) Use a new address  ──► form ──► validated ──► saved               │
//! │                                                                         │
//! │  select_delivery_address(Saved { addressId }) | (New { address })      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use innoprint_core::{Address, NewAddress};
use innoprint_db::DbError;

use crate::error::{ApiResult, SessionError};
use crate::state::{AddressSnapshot, Session};

/// How the delivery step picked its address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DeliverySelection {
    /// One of the user's saved addresses.
    #[serde(rename_all = "camelCase")]
    Saved { address_id: String },
    /// A newly entered address, saved before use.
    New { address: NewAddress },
}

/// Returns the cached address list with its load phase.
pub fn get_addresses(session: &Session) -> AddressSnapshot {
    session.addresses().snapshot()
}

/// Re-fetches the address list from the store.
pub async fn refresh_addresses(session: &Session) -> ApiResult<AddressSnapshot> {
    session.addresses().refresh().await?;
    Ok(session.addresses().snapshot())
}

/// Saves a new address. The user's first address becomes the default.
pub async fn add_address(session: &Session, form: NewAddress) -> ApiResult<Address> {
    debug!(name = %form.name, "add_address command");
    Ok(session.addresses().add_address(form).await?)
}

/// Saves edits to an existing address.
pub async fn update_address(session: &Session, address: Address) -> ApiResult<AddressSnapshot> {
    debug!(id = ?address.id, "update_address command");
    session.addresses().update_address(address).await?;
    Ok(session.addresses().snapshot())
}

/// Deletes an address.
pub async fn remove_address(session: &Session, address_id: &str) -> ApiResult<AddressSnapshot> {
    debug!(id = %address_id, "remove_address command");
    session.addresses().remove_address(address_id).await?;
    Ok(session.addresses().snapshot())
}

/// Makes an address the default.
pub async fn set_default_address(
    session: &Session,
    address_id: &str,
) -> ApiResult<AddressSnapshot> {
    debug!(id = %address_id, "set_default_address command");
    session.addresses().set_as_default(address_id).await?;
    Ok(session.addresses().snapshot())
}

/// Resolves the delivery step to a stored address.
///
/// ## Behavior
/// - `Saved`: looks the id up in the cache, re-fetching once on a miss
/// - `New`: validates the form and saves it through the address book
pub async fn select_delivery_address(
    session: &Session,
    selection: DeliverySelection,
) -> ApiResult<Address> {
    session.require_identity()?;
    let book = session.addresses();

    match selection {
        DeliverySelection::Saved { address_id } => {
            debug!(id = %address_id, "Selecting saved delivery address");

            if let Some(address) = book.find(&address_id) {
                return Ok(address);
            }

            book.refresh().await?;
            book.find(&address_id).ok_or_else(|| {
                SessionError::Store(DbError::not_found("Address", address_id)).into()
            })
        }
        DeliverySelection::New { address } => {
            debug!("Saving new delivery address");
            Ok(book.add_address(address).await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use innoprint_core::Identity;
    use innoprint_db::{Database, DbConfig};

    fn form(name: &str) -> NewAddress {
        NewAddress {
            name: name.to_string(),
            line1: "4 Residency Road".to_string(),
            line2: Some("  ".to_string()),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            zip_code: "560025".to_string(),
            country: "India".to_string(),
            is_default: false,
        }
    }

    async fn signed_in(db: &Database, uid: &str) -> Session {
        let session = Session::new(db);
        session
            .sign_in(Identity {
                uid: uid.to_string(),
                email: format!("{}@example.com", uid),
                display_name: None,
            })
            .await
            .unwrap();
        session
    }

    #[tokio::test]
    async fn test_new_delivery_address_is_saved() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let session = signed_in(&db, "u1").await;

        let address = select_delivery_address(
            &session,
            DeliverySelection::New {
                address: form("Office"),
            },
        )
        .await
        .unwrap();

        assert!(address.is_default);
        assert_eq!(address.line2, None);
        assert_eq!(get_addresses(&session).addresses.len(), 1);
    }

    #[tokio::test]
    async fn test_saved_delivery_address() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let session = signed_in(&db, "u1").await;
        let saved = add_address(&session, form("Home")).await.unwrap();

        let picked = select_delivery_address(
            &session,
            DeliverySelection::Saved {
                address_id: saved.id.clone().unwrap(),
            },
        )
        .await
        .unwrap();
        assert_eq!(picked.id, saved.id);

        let err = select_delivery_address(
            &session,
            DeliverySelection::Saved {
                address_id: "missing".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_invalid_new_address_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let session = signed_in(&db, "u1").await;

        let mut bad = form("Office");
        bad.city = String::new();
        let err = select_delivery_address(&session, DeliverySelection::New { address: bad })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_signed_out_selection_is_unauthenticated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let session = Session::new(&db);

        let err = select_delivery_address(
            &session,
            DeliverySelection::New {
                address: form("Office"),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
    }

    #[test]
    fn test_selection_json_shape() {
        let json = r#"{ "kind": "saved", "addressId": "a-1" }"#;
        let selection: DeliverySelection = serde_json::from_str(json).unwrap();
        assert!(matches!(
            selection,
            DeliverySelection::Saved { ref address_id } if address_id == "a-1"
        ));
    }
}
