//! Integration tests for the activation workflow.

mod helpers;

use chrono::Months;
use futures::future::join_all;
use http::StatusCode;

use cartpass_core::types::money::Kobo;
use cartpass_service::sticker::ActivationRequest;

use helpers::TestApp;

/// The concrete end-to-end scenario: LGA priced at 340,000 kobo/month,
/// two-month activation paid as 6,800 Naira.
#[tokio::test]
async fn activation_scenario_end_to_end() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let lga = app.create_lga(340_000).await;
    let (batch_id, code) = app.generate_batch(&lga, 10).await;
    let officer = app.officer_ctx(&lga);

    let response = app
        .request(
            "POST",
            "/api/stickers/activate",
            Some(serde_json::json!({
                "sticker_code": code,
                "beneficiary_name": "Musa Ibrahim",
                "beneficiary_phone": "08031234567",
                "duration_months": 2,
                "amount_paid": 6800,
            })),
            Some(&officer),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let data = &response.body["data"];
    assert_eq!(data["sticker_code"], serde_json::json!(code));
    assert_eq!(data["amount_paid_kobo"], serde_json::json!(680_000));
    let receipt_number = data["receipt"]["receipt_number"]
        .as_str()
        .expect("receipt number")
        .to_string();
    assert!(receipt_number.starts_with("RCP-"));

    // The receipt resolves through the dispute lookup.
    let lookup = app
        .request(
            "GET",
            &format!("/api/activations/{receipt_number}"),
            None,
            Some(&officer),
        )
        .await;
    assert_eq!(lookup.status, StatusCode::OK);
    assert_eq!(
        lookup.body["data"]["amount_paid_kobo"],
        serde_json::json!(680_000)
    );

    // Expiry is exactly activation + 2 months, and the counter moved once.
    let sticker = app
        .state
        .sticker_repo
        .find_by_code(&code)
        .await
        .expect("lookup")
        .expect("sticker exists");
    let activated_at = sticker.activated_at.expect("activated_at set");
    assert_eq!(
        sticker.expires_at.expect("expires_at set"),
        activated_at.checked_add_months(Months::new(2)).expect("expiry")
    );
    assert_eq!(app.used_count(batch_id).await, 1);

    // A second attempt with any payload must fail loudly, not silently
    // succeed.
    let again = app
        .request(
            "POST",
            "/api/stickers/activate",
            Some(serde_json::json!({
                "sticker_code": code,
                "beneficiary_name": "Someone Else",
                "duration_months": 1,
                "amount_paid": 3400,
            })),
            Some(&officer),
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.body["error"], serde_json::json!("ALREADY_ACTIVATED"));
    assert!(again.body["details"]["activated_at"].is_string());
    assert_eq!(app.used_count(batch_id).await, 1);
}

/// Of N concurrent activations of the same code, exactly one succeeds and
/// the rest observe `ALREADY_ACTIVATED`; the counter moves exactly once.
#[tokio::test]
async fn concurrent_activation_is_at_most_once() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let lga = app.create_lga(100_000).await;
    let (batch_id, code) = app.generate_batch(&lga, 10).await;

    let attempts = 8;
    let futures = (0..attempts).map(|i| {
        let service = app.state.activation_service.clone();
        let officer = app.officer_ctx(&lga);
        let code = code.clone();
        async move {
            service
                .activate(
                    &officer,
                    &Default::default(),
                    ActivationRequest {
                        sticker_code: code,
                        beneficiary_name: format!("Officer {i} Customer"),
                        beneficiary_phone: None,
                        duration_months: 1,
                        amount_paid: Kobo(100_000),
                        payment_method: None,
                        activated_at_override: None,
                        geo: None,
                    },
                )
                .await
        }
    });

    let results = join_all(futures).await;

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let already = results
        .iter()
        .filter(|r| matches!(r, Err(e) if e.is_already_activated()))
        .count();

    assert_eq!(successes, 1, "exactly one activation must win");
    assert_eq!(already, attempts - 1, "all losers must see ALREADY_ACTIVATED");
    assert_eq!(app.used_count(batch_id).await, 1);

    // The final sticker state matches the single winner's data.
    let winner = results
        .into_iter()
        .find_map(Result::ok)
        .expect("one winner");
    let sticker = app
        .state
        .sticker_repo
        .find_by_code(&winner.sticker_code)
        .await
        .expect("lookup")
        .expect("sticker exists");
    assert_eq!(sticker.beneficiary_id, Some(winner.beneficiary.id));
    assert_eq!(sticker.expires_at, Some(winner.expires_at));
}

/// `used_count` ends at exactly M after M activations against the batch.
#[tokio::test]
async fn batch_counter_matches_activation_count() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let lga = app.create_lga(50_000).await;
    let (batch_id, _) = app.generate_batch(&lga, 10).await;
    let officer = app.officer_ctx(&lga);

    for i in 0..5 {
        let code = app.any_sticker_code(batch_id).await;
        let response = app
            .request(
                "POST",
                "/api/stickers/activate",
                Some(serde_json::json!({
                    "sticker_code": code,
                    "beneficiary_name": format!("Customer {i}"),
                    "duration_months": 1,
                    "amount_paid": 500,
                })),
                Some(&officer),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    }

    assert_eq!(app.used_count(batch_id).await, 5);
}

/// Exact amounts pass; a 2-kobo deviation is rejected with both sides in
/// the error payload.
#[tokio::test]
async fn amount_validation_round_trip() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let lga = app.create_lga(340_000).await;
    let (_, code) = app.generate_batch(&lga, 10).await;
    let officer = app.officer_ctx(&lga);

    // Off by 200 kobo (2 Naira): rejected, sticker untouched.
    let response = app
        .request(
            "POST",
            "/api/stickers/activate",
            Some(serde_json::json!({
                "sticker_code": code,
                "beneficiary_name": "Musa Ibrahim",
                "duration_months": 2,
                "amount_paid": 6802,
            })),
            Some(&officer),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], serde_json::json!("AMOUNT_MISMATCH"));
    assert_eq!(
        response.body["details"]["expected_kobo"],
        serde_json::json!(680_000)
    );
    assert_eq!(
        response.body["details"]["provided_kobo"],
        serde_json::json!(680_200)
    );

    // A 2-kobo deviation at the service level also fails (tolerance is 1).
    let result = app
        .state
        .activation_service
        .activate(
            &officer,
            &Default::default(),
            ActivationRequest {
                sticker_code: code.clone(),
                beneficiary_name: "Musa Ibrahim".to_string(),
                beneficiary_phone: None,
                duration_months: 2,
                amount_paid: Kobo(680_002),
                payment_method: None,
                activated_at_override: None,
                geo: None,
            },
        )
        .await;
    assert!(matches!(result, Err(ref e) if e.message.contains("680002")));

    // The exact amount succeeds.
    let response = app
        .request(
            "POST",
            "/api/stickers/activate",
            Some(serde_json::json!({
                "sticker_code": code,
                "beneficiary_name": "Musa Ibrahim",
                "duration_months": 2,
                "amount_paid": 6800,
            })),
            Some(&officer),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
}

/// Input validation: bad duration, bad phone, unknown code.
#[tokio::test]
async fn activation_input_validation() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let lga = app.create_lga(100_000).await;
    let (_, code) = app.generate_batch(&lga, 10).await;
    let officer = app.officer_ctx(&lga);

    // Duration outside 1..=6.
    let response = app
        .request(
            "POST",
            "/api/stickers/activate",
            Some(serde_json::json!({
                "sticker_code": code,
                "beneficiary_name": "Musa",
                "duration_months": 7,
                "amount_paid": 7000,
            })),
            Some(&officer),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], serde_json::json!("VALIDATION"));

    // Malformed phone.
    let response = app
        .request(
            "POST",
            "/api/stickers/activate",
            Some(serde_json::json!({
                "sticker_code": code,
                "beneficiary_name": "Musa",
                "beneficiary_phone": "12345",
                "duration_months": 1,
                "amount_paid": 1000,
            })),
            Some(&officer),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    // Unknown code.
    let response = app
        .request(
            "POST",
            "/api/stickers/activate",
            Some(serde_json::json!({
                "sticker_code": "ZZZ-9999999999999999999",
                "beneficiary_name": "Musa",
                "duration_months": 1,
                "amount_paid": 1000,
            })),
            Some(&officer),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    // Nothing was activated along the way.
    let sticker = app
        .state
        .sticker_repo
        .find_by_code(&code)
        .await
        .expect("lookup")
        .expect("sticker exists");
    assert!(sticker.activated_at.is_none());
}

/// Beneficiaries dedup by phone: two activations with the same phone share
/// one record, and the name refreshes.
#[tokio::test]
async fn beneficiary_dedup_by_phone() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let lga = app.create_lga(100_000).await;
    let (batch_id, _) = app.generate_batch(&lga, 10).await;
    let officer = app.officer_ctx(&lga);

    let first_code = app.any_sticker_code(batch_id).await;
    let response = app
        .request(
            "POST",
            "/api/stickers/activate",
            Some(serde_json::json!({
                "sticker_code": first_code,
                "beneficiary_name": "Musa Ibrahim",
                "beneficiary_phone": "0803 123 4567",
                "duration_months": 1,
                "amount_paid": 1000,
            })),
            Some(&officer),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let first_id = response.body["data"]["beneficiary"]["id"].clone();

    let second_code = app.any_sticker_code(batch_id).await;
    let response = app
        .request(
            "POST",
            "/api/stickers/activate",
            Some(serde_json::json!({
                "sticker_code": second_code,
                "beneficiary_name": "Musa A. Ibrahim",
                "beneficiary_phone": "+2348031234567",
                "duration_months": 1,
                "amount_paid": 1000,
            })),
            Some(&officer),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["beneficiary"]["id"], first_id);
    assert_eq!(
        response.body["data"]["beneficiary"]["full_name"],
        serde_json::json!("Musa A. Ibrahim")
    );
}
