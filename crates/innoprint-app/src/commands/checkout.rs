//! # Checkout Commands
//!
//! Payment page and order confirmation.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Flow                                        │
//! │                                                                         │
//! │  checkout_summary ───► Subtotal ₹880 · Shipping ₹100 · GST ₹158        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  create_payment ─────► PaymentRequest { ORD123456789, 88000 paise }    │
//! │       │                     │                                           │
//! │       │                     ▼                                           │
//! │       │               payment widget (external)                         │
//! │       │                     │ payment id                                │
//! │       ▼                     ▼                                           │
//! │  confirm_order ──────► OrderConfirmation + print counter += 1          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use innoprint_core::checkout::{
    is_order_reference, order_reference, CheckoutSummary, OrderConfirmation, PaymentRequest,
};
use innoprint_core::pricing::{calculate, PricingEngine, PricingResult, PrintOptions, PrintRequest};
use innoprint_core::{Model, ValidationError};
use innoprint_db::{Database, DbError};

use super::catalogue::get_model;
use super::pricing::check_request;
use crate::error::{ApiResult, SessionError};
use crate::state::{AppConfig, Session};

/// Which model and options are being bought.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub model_id: String,
    #[serde(default)]
    pub options: PrintRequest,
}

/// What the payment page shows before paying.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPreview {
    pub model_id: String,
    pub model_title: String,
    pub options: PrintOptions,
    pub quote: PricingResult,
    pub summary: CheckoutSummary,
}

/// Reported back once the payment widget succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmOrderRequest {
    pub order_reference: String,
    pub payment_id: String,
    pub model_id: String,
    #[serde(default)]
    pub options: PrintRequest,
    pub address_id: String,
}

async fn price(
    db: &Database,
    pricing: &PricingEngine,
    model_id: &str,
    request: &PrintRequest,
) -> ApiResult<(Model, PrintOptions, PricingResult)> {
    check_request(request)?;
    let model = get_model(db, model_id).await?;
    let options = pricing.resolve(request)?;
    let quote = calculate(model.base_price, model.base_print_time, &options);
    Ok((model, options, quote))
}

/// Builds the subtotal, shipping, tax and total breakdown.
pub async fn checkout_summary(
    db: &Database,
    pricing: &PricingEngine,
    config: &AppConfig,
    request: &CheckoutRequest,
) -> ApiResult<CheckoutPreview> {
    debug!(model_id = %request.model_id, "checkout_summary command");

    let (model, options, quote) = price(db, pricing, &request.model_id, &request.options).await?;
    let summary = CheckoutSummary::new(
        &quote,
        config.checkout.shipping_money(),
        config.checkout.tax_rate(),
    );

    Ok(CheckoutPreview {
        model_id: model.id,
        model_title: model.title,
        options,
        quote,
        summary,
    })
}

/// Prepares the payment widget hand-off for the signed-in user.
///
/// The widget is given the quoted print total; tax and shipping are shown
/// on the page only.
pub async fn create_payment(
    db: &Database,
    pricing: &PricingEngine,
    config: &AppConfig,
    session: &Session,
    request: &CheckoutRequest,
) -> ApiResult<PaymentRequest> {
    let identity = session.require_identity()?;
    debug!(model_id = %request.model_id, uid = %identity.uid, "create_payment command");

    let (model, _options, quote) = price(db, pricing, &request.model_id, &request.options).await?;

    let payment = PaymentRequest::new(
        &model,
        &quote,
        config.store.currency_code.as_str(),
        config.store.name.as_str(),
        order_reference(Uuid::new_v4().as_u128()),
        Some(identity.email),
    );

    info!(
        order_reference = %payment.order_reference,
        amount_minor = payment.amount_minor,
        "Payment prepared"
    );
    Ok(payment)
}

/// Records a paid order and returns its confirmation.
///
/// ## Errors
/// - `VALIDATION_ERROR` for a malformed order reference or empty payment id
/// - `UNAUTHENTICATED` when signed out
/// - `NOT_FOUND` when the address is not one of the user's, or the model
///   does not exist
pub async fn confirm_order(
    db: &Database,
    pricing: &PricingEngine,
    config: &AppConfig,
    session: &Session,
    request: ConfirmOrderRequest,
) -> ApiResult<OrderConfirmation> {
    debug!(order_reference = %request.order_reference, "confirm_order command");

    if !is_order_reference(&request.order_reference) {
        return Err(ValidationError::InvalidFormat {
            field: "order_reference".to_string(),
            reason: "expected ORD followed by 9 digits".to_string(),
        }
        .into());
    }
    if request.payment_id.trim().is_empty() {
        return Err(ValidationError::required("payment_id").into());
    }

    session.require_identity()?;

    let book = session.addresses();
    let address = match book.find(&request.address_id) {
        Some(address) => address,
        None => {
            book.refresh().await?;
            book.find(&request.address_id).ok_or_else(|| {
                SessionError::Store(DbError::not_found("Address", request.address_id.as_str()))
            })?
        }
    };

    let (model, options, quote) = price(db, pricing, &request.model_id, &request.options).await?;
    let summary = CheckoutSummary::new(
        &quote,
        config.checkout.shipping_money(),
        config.checkout.tax_rate(),
    );

    db.models().record_print(&model.id).await?;

    let confirmation = OrderConfirmation::new(
        request.order_reference,
        request.payment_id,
        &model,
        options,
        quote,
        summary,
        address,
        Utc::now(),
    );

    info!(
        order_reference = %confirmation.order_reference,
        model_id = %confirmation.model_id,
        "Order confirmed"
    );
    Ok(confirmation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::Duration;
    use innoprint_core::{Identity, Money, NewAddress};
    use innoprint_db::seed::seed_catalogue;
    use innoprint_db::DbConfig;

    struct Fixture {
        db: Database,
        pricing: PricingEngine,
        config: AppConfig,
        session: Session,
        model_id: String,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_catalogue(&db).await.unwrap();
        let model_id = db
            .models()
            .list_listed(None)
            .await
            .unwrap()
            .into_iter()
            .find(|m| m.title == "Model 01")
            .unwrap()
            .id;

        let session = Session::new(&db);
        session
            .sign_in(Identity {
                uid: "u1".to_string(),
                email: "asha@example.com".to_string(),
                display_name: Some("Asha".to_string()),
            })
            .await
            .unwrap();

        Fixture {
            db,
            pricing: PricingEngine::default(),
            config: AppConfig::default(),
            session,
            model_id,
        }
    }

    fn request(model_id: &str) -> CheckoutRequest {
        CheckoutRequest {
            model_id: model_id.to_string(),
            options: PrintRequest::default(),
        }
    }

    #[tokio::test]
    async fn test_summary_adds_tax_and_shipping() {
        let f = fixture().await;

        let preview = checkout_summary(&f.db, &f.pricing, &f.config, &request(&f.model_id))
            .await
            .unwrap();

        // Default selection has supports on: 800 × 1.10 = 880.
        assert_eq!(preview.quote.total, Money::from_major(880));
        assert_eq!(preview.summary.shipping, Money::from_major(100));
        assert_eq!(preview.summary.tax, Money::from_major(158));
        assert_eq!(preview.summary.total, Money::from_major(1138));
    }

    #[tokio::test]
    async fn test_payment_hands_off_quote_total() {
        let f = fixture().await;

        let payment = create_payment(
            &f.db,
            &f.pricing,
            &f.config,
            &f.session,
            &request(&f.model_id),
        )
        .await
        .unwrap();

        assert_eq!(payment.amount_minor, 88_000);
        assert_eq!(payment.currency, "INR");
        assert_eq!(payment.prefill_email.as_deref(), Some("asha@example.com"));
        assert!(is_order_reference(&payment.order_reference));
    }

    #[tokio::test]
    async fn test_payment_requires_sign_in() {
        let f = fixture().await;
        f.session.sign_out();

        let err = create_payment(&f.db, &f.pricing, &f.config, &f.session, &request(&f.model_id))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
    }

    #[tokio::test]
    async fn test_confirm_order_counts_print() {
        let f = fixture().await;
        let address = f
            .session
            .addresses()
            .add_address(NewAddress {
                name: "Asha".to_string(),
                line1: "12 MG Road".to_string(),
                line2: None,
                city: "Bengaluru".to_string(),
                state: "Karnataka".to_string(),
                zip_code: "560001".to_string(),
                country: "India".to_string(),
                is_default: false,
            })
            .await
            .unwrap();

        let confirmation = confirm_order(
            &f.db,
            &f.pricing,
            &f.config,
            &f.session,
            ConfirmOrderRequest {
                order_reference: "ORD000000042".to_string(),
                payment_id: "pay_123".to_string(),
                model_id: f.model_id.clone(),
                options: PrintRequest::default(),
                address_id: address.id.clone().unwrap(),
            },
        )
        .await
        .unwrap();

        assert_eq!(confirmation.shipping_address.id, address.id);
        assert_eq!(
            confirmation.estimated_delivery - confirmation.ordered_at,
            Duration::days(7)
        );

        let model = f.db.models().get_by_id(&f.model_id).await.unwrap().unwrap();
        assert_eq!(model.print_count, 46);
    }

    #[tokio::test]
    async fn test_confirm_order_rejects_bad_input() {
        let f = fixture().await;

        let bad_reference = ConfirmOrderRequest {
            order_reference: "ORD42".to_string(),
            payment_id: "pay_123".to_string(),
            model_id: f.model_id.clone(),
            options: PrintRequest::default(),
            address_id: "a-1".to_string(),
        };
        let err = confirm_order(&f.db, &f.pricing, &f.config, &f.session, bad_reference)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let unknown_address = ConfirmOrderRequest {
            order_reference: "ORD000000042".to_string(),
            payment_id: "pay_123".to_string(),
            model_id: f.model_id.clone(),
            options: PrintRequest::default(),
            address_id: "a-1".to_string(),
        };
        let err = confirm_order(&f.db, &f.pricing, &f.config, &f.session, unknown_address)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
