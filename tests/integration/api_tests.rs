//! API integration tests
//!
//! These run against a live server with a migrated database, Redis and an
//! `admin` profile whose password is in `BASECAMP_TEST_ADMIN_PASSWORD`.

use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn admin_password() -> String {
    std::env::var("BASECAMP_TEST_ADMIN_PASSWORD").unwrap_or_else(|_| "admin-password".to_string())
}

/// Helper to get an authenticated client
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": admin_password()
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Decimals serialize as strings and keep the column scale ("9000" or "9000.00")
fn amount(value: &Value) -> f64 {
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("amount should be a decimal string")
}

/// A unique email per run so the duplicate guard never trips across tests
fn unique_email() -> String {
    format!("parent-{}@example.com", Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_reuses_redis_connection() {
    let client = Client::new();

    for _ in 0..3 {
        let response = client
            .get(format!("{}/ready", BASE_URL))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());

        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["status"], "ready");
    }
}

#[tokio::test]
#[ignore]
async fn test_responses_are_gzip_compressed_on_request() {
    let client = Client::new();

    let response = client
        .get(format!("{}/programs", BASE_URL))
        .header("Accept-Encoding", "gzip")
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("content-encoding")
            .and_then(|v| v.to_str().ok()),
        Some("gzip")
    );
}

#[tokio::test]
#[ignore]
async fn test_login_returns_admin_portal() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": admin_password()
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["portal"], "admin");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_get_current_profile() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["login"], "admin");
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
#[ignore]
async fn test_list_programs_is_public() {
    let client = Client::new();

    let response = client
        .get(format!("{}/programs", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_quote_two_children() {
    let client = Client::new();

    let response = client
        .post(format!("{}/registrations/quote", BASE_URL))
        .json(&json!({
            "program": "holiday_camp",
            "children": [
                { "full_name": "Amani", "age_bracket": "7-10", "number_of_days": 2, "sessions": ["half", "full"] },
                { "full_name": "Zuri", "age_bracket": "4-6", "number_of_days": 1, "sessions": ["full"] }
            ]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["children"].as_array().map(Vec::len), Some(2));
    assert_eq!(amount(&body["total"]), 9000.0);
}

#[tokio::test]
#[ignore]
async fn test_submit_registration_then_reject_duplicate() {
    let client = Client::new();
    let form = json!({
        "program": "holiday_camp",
        "parent_name": "Wanjiru Kamau",
        "email": unique_email(),
        "phone": "+254 712 345 678",
        "payment_method": "mpesa",
        "children": [
            { "full_name": "Amani", "age_bracket": "7-10", "number_of_days": 3 }
        ]
    });

    let response = client
        .post(format!("{}/registrations", BASE_URL))
        .json(&form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["registration"]["id"].is_string());
    assert_eq!(amount(&body["registration"]["total_amount"]), 10500.0);
    assert!(body["qr_token"].is_string());
    assert!(body["email"]["status"].is_string());

    let response = client
        .post(format!("{}/registrations", BASE_URL))
        .json(&form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_submit_registration_reports_field_errors() {
    let client = Client::new();

    let response = client
        .post(format!("{}/registrations", BASE_URL))
        .json(&json!({
            "program": "homeschooling",
            "parent_name": "Otieno",
            "email": "not-an-email",
            "phone": "+254 700 000 000",
            "payment_method": "cash",
            "children": [
                { "full_name": "Baraka", "number_of_days": 2 }
            ]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "InvalidFields");
    assert!(body["details"]["email"].is_array());
    assert!(body["details"]["children[0].date_of_birth"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_closed_program_is_unavailable() {
    let client = Client::new();

    let response = client
        .post(format!("{}/registrations/quote", BASE_URL))
        .json(&json!({
            "program": "team_building",
            "children": [{ "full_name": "Team", "age_bracket": "14-17", "number_of_days": 1 }]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_admin_lists_registrations_and_leads() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    for path in ["admin/registrations", "admin/leads"] {
        let response = client
            .get(format!("{}/{}?per_page=5", BASE_URL, path))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());

        let body: Value = response.json().await.expect("Failed to parse response");
        assert!(body["items"].is_array());
        assert!(body["total"].is_number());
        assert_eq!(body["per_page"], 5);
    }
}

#[tokio::test]
#[ignore]
async fn test_portal_requires_token() {
    let client = Client::new();

    let response = client
        .get(format!("{}/accounts/dashboard", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_accounts_dashboard() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/accounts/dashboard", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["recent_transactions"].as_array().map_or(false, |t| t.len() <= 5));
    assert!(body["budgets"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_create_and_delete_invoice() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let number = format!("INV-{}", &Uuid::new_v4().simple().to_string()[..8]);

    let response = client
        .post(format!("{}/accounts/invoices", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "invoice_number": number,
            "customer_name": "Green Hills School",
            "total_amount": "45000"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let id = body["id"].as_str().expect("No ID in response");

    let response = client
        .post(format!("{}/accounts/invoices", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "invoice_number": number,
            "customer_name": "Green Hills School",
            "total_amount": "45000"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    let response = client
        .delete(format!("{}/accounts/invoices/{}", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_vendor_with_bill_cannot_be_deleted() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/vendors", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "name": "Savanna Transport", "category": "transport" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let vendor: Value = response.json().await.expect("Failed to parse response");
    let vendor_id = vendor["id"].as_str().expect("No ID in response");

    let response = client
        .post(format!("{}/vendors/bills", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "vendor_id": vendor_id,
            "bill_number": "B-001",
            "amount": "12000"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let bill: Value = response.json().await.expect("Failed to parse response");
    let bill_id = bill["id"].as_str().expect("No ID in response");

    let response = client
        .delete(format!("{}/vendors/{}", BASE_URL, vendor_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);

    for path in [format!("vendors/bills/{}", bill_id), format!("vendors/{}", vendor_id)] {
        let response = client
            .delete(format!("{}/{}", BASE_URL, path))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), 204);
    }
}

#[tokio::test]
#[ignore]
async fn test_faq_answers_price_question() {
    let client = Client::new();

    let response = client
        .post(format!("{}/faq/ask", BASE_URL))
        .json(&json!({ "question": "How much does a full day cost?" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["matched"], true);
}
