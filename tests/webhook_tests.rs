mod common;

use common::app;
use quickgift_core::application::orders::{CreateOrder, OrderLine};
use quickgift_core::application::payments::InitializePayment;
use quickgift_core::domain::order::{DeliveryDetails, OrderStatus};
use quickgift_core::domain::payment::{PaymentOutcome, PaymentState, PaymentTarget};
use quickgift_core::error::CoreError;
use quickgift_core::infrastructure::gateway::sign_body;
use quickgift_core::interfaces::webhook::{WebhookAck, WebhookHandler};

const SECRET: &str = "sk_test_webhook";

async fn order_with_pending_payment(app: &common::TestApp) -> (String, String) {
    let order = app
        .orders
        .create(
            "user-1",
            CreateOrder {
                items: vec![OrderLine { product_id: "p-chocolate".to_string(), quantity: 1 }],
                delivery: DeliveryDetails::default(),
                is_express: false,
            },
        )
        .await
        .unwrap();
    let receipt = app
        .payments
        .initialize(
            "user-1",
            InitializePayment {
                target: PaymentTarget::Order(order.id.clone()),
                amount: order.total,
                email: "user@example.test".to_string(),
            },
        )
        .await
        .unwrap();
    (order.id, receipt.reference)
}

fn charge_success(reference: &str) -> Vec<u8> {
    serde_json::json!({
        "event": "charge.success",
        "data": { "reference": reference, "channel": "card" },
    })
    .to_string()
    .into_bytes()
}

#[tokio::test]
async fn test_valid_signature_reconciles_the_payment() {
    let app = app().await;
    let (order_id, reference) = order_with_pending_payment(&app).await;
    let handler = WebhookHandler::new(app.payments.clone(), Some(SECRET.to_string()));

    let body = charge_success(&reference);
    let signature = sign_body(SECRET, &body);

    let ack = handler.handle(&body, Some(&signature)).await.unwrap();
    assert_eq!(ack, WebhookAck::Ok);

    let payment = app.payments.get(&reference).await.unwrap();
    assert_eq!(payment.state, PaymentState::Success);
    assert_eq!(payment.channel.as_deref(), Some("card"));

    let order = app.orders.get(&order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn test_wrong_signature_never_mutates_state() {
    let app = app().await;
    let (order_id, reference) = order_with_pending_payment(&app).await;
    let handler = WebhookHandler::new(app.payments.clone(), Some(SECRET.to_string()));

    let body = charge_success(&reference);
    let forged = sign_body("some-other-secret", &body);

    let err = handler.handle(&body, Some(&forged)).await.unwrap_err();
    assert!(matches!(err, CoreError::AuthenticationFailed));

    // the perfectly valid payload must not have been applied
    let payment = app.payments.get(&reference).await.unwrap();
    assert_eq!(payment.state, PaymentState::Pending);
    let order = app.orders.get(&order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
}

#[tokio::test]
async fn test_missing_signature_header_is_rejected() {
    let app = app().await;
    let (_, reference) = order_with_pending_payment(&app).await;
    let handler = WebhookHandler::new(app.payments.clone(), Some(SECRET.to_string()));

    let body = charge_success(&reference);
    let err = handler.handle(&body, None).await.unwrap_err();
    assert!(matches!(err, CoreError::AuthenticationFailed));
}

#[tokio::test]
async fn test_duplicate_delivery_is_acknowledged_without_reapplying() {
    let app = app().await;
    let (order_id, reference) = order_with_pending_payment(&app).await;
    let handler = WebhookHandler::new(app.payments.clone(), Some(SECRET.to_string()));

    let body = charge_success(&reference);
    let signature = sign_body(SECRET, &body);

    handler.handle(&body, Some(&signature)).await.unwrap();
    let ack = handler.handle(&body, Some(&signature)).await.unwrap();
    assert_eq!(ack, WebhookAck::Ok);

    let order = app.orders.get(&order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn test_late_conflicting_report_is_acknowledged_but_not_applied() {
    let app = app().await;
    let (_, reference) = order_with_pending_payment(&app).await;
    let handler = WebhookHandler::new(app.payments.clone(), Some(SECRET.to_string()));

    app.payments
        .apply_outcome(&reference, PaymentOutcome::Failure, None)
        .await
        .unwrap();

    let body = charge_success(&reference);
    let signature = sign_body(SECRET, &body);

    // the gateway must stop retrying, so this is an ack, not an error
    let ack = handler.handle(&body, Some(&signature)).await.unwrap();
    assert_eq!(ack, WebhookAck::Ok);

    let payment = app.payments.get(&reference).await.unwrap();
    assert_eq!(payment.state, PaymentState::Failed);
}

#[tokio::test]
async fn test_unrelated_event_is_ignored() {
    let app = app().await;
    let (_, reference) = order_with_pending_payment(&app).await;
    let handler = WebhookHandler::new(app.payments.clone(), Some(SECRET.to_string()));

    let body = serde_json::json!({
        "event": "transfer.success",
        "data": { "reference": reference, "channel": "card" },
    })
    .to_string()
    .into_bytes();
    let signature = sign_body(SECRET, &body);

    let ack = handler.handle(&body, Some(&signature)).await.unwrap();
    assert_eq!(ack, WebhookAck::Ok);

    let payment = app.payments.get(&reference).await.unwrap();
    assert_eq!(payment.state, PaymentState::Pending);
}

#[tokio::test]
async fn test_charge_failed_event_settles_the_payment_as_failed() {
    let app = app().await;
    let (order_id, reference) = order_with_pending_payment(&app).await;
    let handler = WebhookHandler::new(app.payments.clone(), Some(SECRET.to_string()));

    let body = serde_json::json!({
        "event": "charge.failed",
        "data": { "reference": reference, "channel": null },
    })
    .to_string()
    .into_bytes();
    let signature = sign_body(SECRET, &body);

    handler.handle(&body, Some(&signature)).await.unwrap();

    let payment = app.payments.get(&reference).await.unwrap();
    assert_eq!(payment.state, PaymentState::Failed);
    let order = app.orders.get(&order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
}

#[tokio::test]
async fn test_unknown_reference_with_valid_signature_is_not_found() {
    let app = app().await;
    let handler = WebhookHandler::new(app.payments.clone(), Some(SECRET.to_string()));

    let body = charge_success("QG-PAY-DOESNOTEXIST");
    let signature = sign_body(SECRET, &body);

    let err = handler.handle(&body, Some(&signature)).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn test_dev_mode_handler_accepts_unsigned_deliveries() {
    let app = app().await;
    let (order_id, reference) = order_with_pending_payment(&app).await;
    let handler = WebhookHandler::new(app.payments.clone(), None);

    let body = charge_success(&reference);
    handler.handle(&body, None).await.unwrap();

    let order = app.orders.get(&order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Confirmed);
}
