//! Integration tests for public and officer-facing verification.

mod helpers;

use chrono::{Duration, Utc};
use http::StatusCode;

use helpers::TestApp;

/// An unknown code verifies as invalid and still leaves an audit entry.
#[tokio::test]
async fn verify_unknown_code_is_invalid() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let code = format!("{}-17540000000000000000", helpers::random_lga_code());
    let response = app
        .request(
            "POST",
            "/api/verify",
            Some(serde_json::json!({ "sticker_code": code })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["valid"], serde_json::json!(false));
    assert_eq!(response.body["data"]["result"], serde_json::json!("invalid"));
    assert_eq!(app.verification_count(&code).await, 1);
}

/// Verification is idempotent with respect to sticker state: repeated
/// checks of an unused sticker always answer the same and only the
/// append-only log grows.
#[tokio::test]
async fn verify_is_idempotent_and_append_only() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let lga = app.create_lga(100_000).await;
    let (_, code) = app.generate_batch(&lga, 10).await;

    for _ in 0..5 {
        let response = app
            .request(
                "POST",
                "/api/verify",
                Some(serde_json::json!({ "sticker_code": code })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["data"]["valid"], serde_json::json!(false));
        assert_eq!(response.body["data"]["status"], serde_json::json!("unused"));
    }

    let sticker = app
        .state
        .sticker_repo
        .find_by_code(&code)
        .await
        .expect("lookup")
        .expect("sticker exists");
    assert!(sticker.activated_at.is_none(), "verify never mutates state");
    assert_eq!(app.verification_count(&code).await, 5);
}

/// An active sticker verifies as valid with days remaining; once past its
/// expiry it reads expired without any intervening write.
#[tokio::test]
async fn verify_active_and_lazily_expired() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let lga = app.create_lga(100_000).await;
    let (batch_id, active_code) = app.generate_batch(&lga, 10).await;
    let officer = app.officer_ctx(&lga);

    // One sticker activated now for 2 months.
    let response = app
        .request(
            "POST",
            "/api/stickers/activate",
            Some(serde_json::json!({
                "sticker_code": active_code,
                "beneficiary_name": "Musa Ibrahim",
                "duration_months": 2,
                "amount_paid": 2000,
            })),
            Some(&officer),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let response = app
        .request(
            "POST",
            "/api/verify",
            Some(serde_json::json!({ "sticker_code": active_code })),
            None,
        )
        .await;
    assert_eq!(response.body["data"]["valid"], serde_json::json!(true));
    assert_eq!(response.body["data"]["status"], serde_json::json!("active"));
    assert!(response.body["data"]["days_remaining"].as_i64().expect("days") > 50);
    assert_eq!(
        response.body["data"]["beneficiary"],
        serde_json::json!("Musa Ibrahim")
    );

    // Another sticker back-dated so its one-month period already lapsed.
    let expired_code = app.any_sticker_code(batch_id).await;
    let back_dated = Utc::now() - Duration::days(45);
    let response = app
        .request(
            "POST",
            "/api/stickers/activate",
            Some(serde_json::json!({
                "sticker_code": expired_code,
                "beneficiary_name": "Garba Sani",
                "duration_months": 1,
                "amount_paid": 1000,
                "activated_at": back_dated,
            })),
            Some(&officer),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let response = app
        .request(
            "POST",
            "/api/verify",
            Some(serde_json::json!({ "sticker_code": expired_code })),
            None,
        )
        .await;
    assert_eq!(response.body["data"]["valid"], serde_json::json!(false));
    assert_eq!(response.body["data"]["result"], serde_json::json!("expired"));
    assert!(response.body["data"]["days_overdue"].as_i64().expect("days") > 10);

    // The stored status column still says active: expiry is derived.
    let stored: String =
        sqlx::query_scalar("SELECT status::TEXT FROM stickers WHERE code = $1")
            .bind(&expired_code)
            .fetch_one(&app.db_pool)
            .await
            .expect("status");
    assert_eq!(stored, "active");
}

/// A revoked sticker verifies as failed on both channels.
#[tokio::test]
async fn verify_revoked_sticker_fails() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let lga = app.create_lga(100_000).await;
    let (_, code) = app.generate_batch(&lga, 10).await;
    let admin = app.admin_ctx(&lga);

    let response = app
        .request(
            "POST",
            &format!("/api/stickers/{code}/revoke"),
            Some(serde_json::json!({ "reason": "damaged sticker" })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let response = app
        .request(
            "POST",
            "/api/verify",
            Some(serde_json::json!({ "sticker_code": code })),
            None,
        )
        .await;
    assert_eq!(response.body["data"]["valid"], serde_json::json!(false));
    assert_eq!(response.body["data"]["result"], serde_json::json!("failed"));

    // The officer-facing path classifies identically.
    let officer = app.officer_ctx(&lga);
    let response = app
        .request(
            "GET",
            &format!("/api/stickers/{code}/verify"),
            None,
            Some(&officer),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["valid"], serde_json::json!(false));
    assert_eq!(response.body["data"]["result"], serde_json::json!("failed"));
}

/// The audit history endpoint returns the append-only trail, newest first.
#[tokio::test]
async fn verification_history_is_readable() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let lga = app.create_lga(100_000).await;
    let (_, code) = app.generate_batch(&lga, 10).await;
    let officer = app.officer_ctx(&lga);

    for _ in 0..3 {
        app.request(
            "POST",
            "/api/verify",
            Some(serde_json::json!({ "sticker_code": code })),
            None,
        )
        .await;
    }

    let response = app
        .request(
            "GET",
            &format!("/api/stickers/{code}/verifications"),
            None,
            Some(&officer),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["data"]["total_items"],
        serde_json::json!(3)
    );
    let items = response.body["data"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 3);
    for item in items {
        assert_eq!(item["channel"], serde_json::json!("api"));
        assert_eq!(item["result"], serde_json::json!("failed"));
    }
}
