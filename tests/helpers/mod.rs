//! Shared test helpers for integration tests.
//!
//! Integration tests run against a real PostgreSQL database named by
//! `CARTPASS_TEST_DATABASE_URL`. When the variable is unset each test
//! prints a notice and exits early, so the suite stays green on machines
//! without a database.
//!
//! Tests never truncate shared tables: each test creates its own LGA with
//! a random code and only touches rows it created, so test binaries can
//! run in parallel against one database.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use cartpass_api::{AppState, build_router};
use cartpass_core::config::app::ServerConfig;
use cartpass_core::config::database::DatabaseConfig;
use cartpass_core::config::logging::LoggingConfig;
use cartpass_core::config::permits::PermitConfig;
use cartpass_core::config::AppConfig;
use cartpass_core::types::money::Kobo;
use cartpass_entity::lga::Lga;
use cartpass_service::context::{ActorRole, RequestContext};

/// A request outcome captured for assertions.
pub struct TestResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Parsed JSON body.
    pub body: Value,
}

/// Test application context.
pub struct TestApp {
    /// The Axum router for making in-process requests.
    pub router: Router,
    /// Database pool for direct queries.
    pub db_pool: PgPool,
    /// The wired application state, for driving services directly.
    pub state: AppState,
}

impl TestApp {
    /// Create a test application, or `None` when no test database is
    /// configured.
    pub async fn spawn() -> Option<Self> {
        let Ok(url) = std::env::var("CARTPASS_TEST_DATABASE_URL") else {
            eprintln!("CARTPASS_TEST_DATABASE_URL not set; skipping integration test");
            return None;
        };

        let config = AppConfig {
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url,
                max_connections: 5,
                min_connections: 1,
                connect_timeout_seconds: 5,
                idle_timeout_seconds: 60,
            },
            logging: LoggingConfig::default(),
            permits: PermitConfig::default(),
        };

        let db = cartpass_database::DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database");
        cartpass_database::migration::run_migrations(db.pool())
            .await
            .expect("Failed to run migrations");

        let db_pool = db.into_pool();
        let state = AppState::new(config, db_pool.clone());
        let router = build_router(state.clone());

        Some(Self {
            router,
            db_pool,
            state,
        })
    }

    /// Register an LGA with a random code and the given price.
    pub async fn create_lga(&self, price_kobo: i64) -> Lga {
        let code = random_lga_code();
        self.state
            .lga_repo
            .create(&format!("Test {code}"), &code, Some("Ogun"), Kobo(price_kobo))
            .await
            .expect("Failed to create test LGA")
    }

    /// A request context for an LGA admin.
    pub fn admin_ctx(&self, lga: &Lga) -> RequestContext {
        RequestContext::new(
            Uuid::new_v4(),
            "Test Admin".to_string(),
            ActorRole::LgaAdmin,
            Some(lga.id),
        )
    }

    /// A request context for a field officer.
    pub fn officer_ctx(&self, lga: &Lga) -> RequestContext {
        RequestContext::new(
            Uuid::new_v4(),
            "Test Officer".to_string(),
            ActorRole::Officer,
            Some(lga.id),
        )
    }

    /// Perform an in-process request, optionally authenticated as `actor`.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        actor: Option<&RequestContext>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(ctx) = actor {
            builder = builder
                .header("x-actor-id", ctx.actor_id.to_string())
                .header("x-actor-name", ctx.actor_name.clone())
                .header("x-actor-role", ctx.role.as_str());
            if let Some(lga_id) = ctx.lga_id {
                builder = builder.header("x-actor-lga", lga_id.to_string());
            }
        }

        let request = match body {
            Some(json) => builder
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("Failed to build request"),
            None => builder.body(Body::empty()).expect("Failed to build request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response body was not JSON")
        };

        TestResponse { status, body }
    }

    /// Generate a batch through the API and return `(batch_id, one sticker code)`.
    pub async fn generate_batch(&self, lga: &Lga, quantity: i64) -> (Uuid, String) {
        let admin = self.admin_ctx(lga);
        let response = self
            .request(
                "POST",
                "/api/batches",
                Some(serde_json::json!({
                    "lga_id": lga.id,
                    "quantity": quantity,
                })),
                Some(&admin),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

        let batch_id: Uuid = response.body["data"]["batch"]["id"]
            .as_str()
            .expect("batch id")
            .parse()
            .expect("batch id uuid");

        let sticker_code = self.any_sticker_code(batch_id).await;
        (batch_id, sticker_code)
    }

    /// Fetch one unused sticker code from a batch.
    pub async fn any_sticker_code(&self, batch_id: Uuid) -> String {
        sqlx::query_scalar::<_, String>(
            "SELECT code FROM stickers WHERE batch_id = $1 AND status = 'unused' LIMIT 1",
        )
        .bind(batch_id)
        .fetch_one(&self.db_pool)
        .await
        .expect("Batch has no unused sticker")
    }

    /// Current `used_count` of a batch.
    pub async fn used_count(&self, batch_id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT used_count FROM sticker_batches WHERE id = $1")
            .bind(batch_id)
            .fetch_one(&self.db_pool)
            .await
            .expect("Batch not found")
    }

    /// Number of verification log entries for a code.
    pub async fn verification_count(&self, code: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM verification_log WHERE sticker_code = $1")
            .bind(code)
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to count verification log")
    }
}

/// A random letters-only LGA code, so parallel tests never collide.
pub fn random_lga_code() -> String {
    Uuid::new_v4()
        .as_bytes()
        .iter()
        .take(6)
        .map(|b| char::from(b'A' + (b % 26)))
        .collect()
}
