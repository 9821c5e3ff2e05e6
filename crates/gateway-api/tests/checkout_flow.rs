use axum::http::StatusCode;
use axum_test::TestServer;
use gateway_api::{create_router, AppConfig, AppState};
use gateway_core::{FixedClock, GatewayConfig, NavigationMessage};
use serde_json::{json, Value};
use std::sync::Arc;

const YEAR: i32 = 2024;

fn server() -> TestServer {
    let config = AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
    };
    let state = AppState::with_parts(
        config,
        GatewayConfig::default(),
        Arc::new(FixedClock::at_year(YEAR)),
    );
    TestServer::new(create_router(state)).unwrap()
}

fn redirect_message(location: &str) -> NavigationMessage {
    let query = location.strip_prefix("/result?").expect("redirect to result view");
    NavigationMessage::from_query_string(query).unwrap()
}

#[tokio::test]
async fn root_redirects_to_card() {
    let response = server().get("/").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/card");
}

#[tokio::test]
async fn health_reports_service() {
    let body: Value = server().get("/health").await.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "mock-gateway");
}

#[tokio::test]
async fn card_form_success_redirects_with_artifacts() {
    let server = server();
    let next_year = (YEAR + 1).to_string();

    let response = server
        .post("/card")
        .form(&[
            ("cardNumber", "4111 1111 1111 1111"),
            ("cardHolderName", "Jane Doe"),
            ("expMonth", "06"),
            ("expYear", next_year.as_str()),
            ("cvv", "123"),
        ])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    let location = response.header("location");
    let message = redirect_message(location.to_str().unwrap());

    assert!(message.success);
    assert_eq!(message.order, "123456");
    assert_eq!(message.amount_cents, 100);
    assert_eq!(message.card_type.map(|t| t.as_str()), Some("VISA"));
    assert!(message.masked_pan.unwrap().ends_with("1111"));
    assert_eq!(message.card_holder.as_deref(), Some("Jane Doe"));
    assert_eq!(message.save_card, Some(false));

    let page = server.get("/result").add_query_params(&json!({ "success": "true" })).await;
    page.assert_status_ok();
    assert!(page.text().contains("Approved"));
}

#[tokio::test]
async fn card_form_errors_rerender() {
    let response = server()
        .post("/card")
        .form(&[("cardNumber", "4111"), ("expMonth", "13"), ("saveCard", "on")])
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let html = response.text();
    assert!(html.contains("Card number must be 16 digits"));
    assert!(html.contains("Card holder name is required"));
    assert!(html.contains("Invalid month"));
    assert!(html.contains("Invalid year"));
    assert!(html.contains("CVV must be 3-4 digits"));
    assert!(html.contains("value=\"4111\""));
}

#[tokio::test]
async fn wallet_form_uses_query_context() {
    let response = server()
        .post("/wallet")
        .add_query_param("amount", "50")
        .add_query_param("wallet_number", "01122334455")
        .form(&[("mpin", "111111"), ("otp", "222222")])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    let location = response.header("location");
    let message = redirect_message(location.to_str().unwrap());

    assert_eq!(message.amount_cents, 5000);
    assert_eq!(message.wallet_number.as_deref(), Some("01122334455"));
    assert!(location.to_str().unwrap().contains("payment_type=mobile_wallet"));
}

#[tokio::test]
async fn wallet_page_shows_defaults() {
    let response = server().get("/wallet").await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("01010101010"));
    assert!(html.contains("EGP 1"));
}

#[tokio::test]
async fn wallet_malformed_amount_falls_back_silently() {
    let server = server();

    let page = server.get("/wallet").add_query_param("amount", "abc").await;
    page.assert_status_ok();
    assert!(page.text().contains("EGP 1<"));

    let response = server
        .post("/wallet")
        .add_query_param("amount", "abc")
        .form(&[("mpin", "111111"), ("otp", "222222")])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    let location = response.header("location");
    let location = location.to_str().unwrap();
    assert!(location.contains("amount_cents=100&"));
    assert_eq!(redirect_message(location).amount_cents, 100);
}

#[tokio::test]
async fn wallet_repeated_keys_use_first_value() {
    let server = server();

    let page = server
        .get("/wallet")
        .add_query_param("amount", "50")
        .add_query_param("amount", "60")
        .await;
    page.assert_status_ok();
    assert!(page.text().contains("EGP 50<"));

    let response = server
        .post("/wallet")
        .add_query_param("amount", "50")
        .add_query_param("amount", "60")
        .add_query_param("order", "A-1")
        .add_query_param("order", "B-2")
        .form(&[("mpin", "111111"), ("otp", "222222")])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    let location = response.header("location");
    let message = redirect_message(location.to_str().unwrap());
    assert_eq!(message.amount_cents, 5000);
    assert_eq!(message.order, "A-1");
}

#[tokio::test]
async fn wallet_form_errors_rerender() {
    let response = server()
        .post("/wallet")
        .form(&[("mpin", "12a34b56"), ("otp", "12")])
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let html = response.text();
    assert!(html.contains("OTP must be 6 digits"));
    assert!(!html.contains("MPIN must be 6 digits"));
}

#[tokio::test]
async fn result_page_declines_without_true_flag() {
    let server = server();

    let missing = server.get("/result").await;
    assert!(missing.text().contains("Declined"));

    let declined = server
        .get("/result")
        .add_query_param("success", "false")
        .await;
    assert!(declined.text().contains("Declined"));

    let approved = server
        .get("/result")
        .add_query_param("success", "true")
        .await;
    assert!(approved.text().contains("Approved"));
}

#[tokio::test]
async fn result_repeated_flag_uses_first_value() {
    let server = server();

    let approved = server
        .get("/result")
        .add_query_param("success", "true")
        .add_query_param("success", "false")
        .await;
    approved.assert_status_ok();
    assert!(approved.text().contains("Approved"));

    let declined = server
        .get("/result")
        .add_query_param("success", "false")
        .add_query_param("success", "true")
        .await;
    declined.assert_status_ok();
    assert!(declined.text().contains("Declined"));

    let body: Value = server
        .get("/api/v1/result")
        .add_query_param("success", "true")
        .add_query_param("success", "false")
        .await
        .json();
    assert_eq!(body["outcome"], "approved");
}

#[tokio::test]
async fn api_card_submit() {
    let response = server()
        .post("/api/v1/card")
        .json(&json!({
            "cardNumber": "5500000000000004",
            "cardHolderName": "John Roe",
            "expMonth": "12",
            "expYear": "2044",
            "cvv": "1234",
            "saveCard": true
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"]["card_type"], "MASTERCARD");
    assert_eq!(body["message"]["masked_pan"], "**** **** **** 0004");
    assert_eq!(body["message"]["save_card"], true);
    assert!(body["location"]
        .as_str()
        .unwrap()
        .starts_with("/result?success=true&order=123456&amount_cents=100&token=mock_tok_"));
}

#[tokio::test]
async fn api_card_submit_reports_all_errors() {
    let response = server()
        .post("/api/v1/card")
        .json(&json!({ "expYear": "2045" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["code"], 422);
    assert_eq!(body["errors"]["expYear"], "Invalid year");
    assert_eq!(body["errors"].as_object().unwrap().len(), 5);
}

#[tokio::test]
async fn api_wallet_submit() {
    let response = server()
        .post("/api/v1/wallet")
        .json(&json!({ "amount": "50", "order": "A-1", "mpin": "111111", "otp": "222222" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"]["amount_cents"], 5000);
    assert_eq!(body["message"]["order"], "A-1");
    assert_eq!(body["message"]["payment_type"], "mobile_wallet");
    assert_eq!(body["message"]["wallet_number"], "01010101010");
}

#[tokio::test]
async fn api_result() {
    let body: Value = server()
        .get("/api/v1/result")
        .add_query_param("success", "yes")
        .await
        .json();
    assert_eq!(body["outcome"], "declined");
    assert_eq!(body["title"], "Declined");
}

#[tokio::test]
async fn api_normalize() {
    let server = server();

    let body: Value = server
        .post("/api/v1/normalize")
        .json(&json!({ "form": "card", "field": "cardNumber", "value": "41111111111111119999" }))
        .await
        .json();
    assert_eq!(body["value"], "4111 1111 1111 1111");

    let response = server
        .post("/api/v1/normalize")
        .json(&json!({ "form": "wallet", "field": "cvv", "value": "1" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}
