//! Beneficiary repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use cartpass_core::error::{AppError, ErrorKind};
use cartpass_core::result::AppResult;
use cartpass_entity::beneficiary::{Beneficiary, NewBeneficiary};

/// Repository for beneficiary ("cart pusher") records.
#[derive(Debug, Clone)]
pub struct BeneficiaryRepository {
    pool: PgPool,
}

impl BeneficiaryRepository {
    /// Create a new beneficiary repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve or create a beneficiary inside the activation transaction.
    ///
    /// With a phone number the insert upserts on the `(lga_id, phone)`
    /// natural key, reusing the existing record and refreshing its name.
    /// Without a phone number every activation gets a fresh anonymous row.
    pub async fn resolve(
        &self,
        conn: &mut PgConnection,
        data: &NewBeneficiary,
    ) -> AppResult<Beneficiary> {
        let query = if data.phone.is_some() {
            "INSERT INTO beneficiaries (lga_id, full_name, phone) VALUES ($1, $2, $3) \
             ON CONFLICT (lga_id, phone) WHERE phone IS NOT NULL \
             DO UPDATE SET full_name = EXCLUDED.full_name, updated_at = NOW() \
             RETURNING *"
        } else {
            "INSERT INTO beneficiaries (lga_id, full_name, phone) VALUES ($1, $2, $3) RETURNING *"
        };

        sqlx::query_as::<_, Beneficiary>(query)
            .bind(data.lga_id)
            .bind(&data.full_name)
            .bind(&data.phone)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to resolve beneficiary", e)
            })
    }

    /// Find a beneficiary by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Beneficiary>> {
        sqlx::query_as::<_, Beneficiary>("SELECT * FROM beneficiaries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find beneficiary", e)
            })
    }

    /// Find a beneficiary by its normalized phone within an LGA.
    pub async fn find_by_phone(
        &self,
        lga_id: Uuid,
        phone: &str,
    ) -> AppResult<Option<Beneficiary>> {
        sqlx::query_as::<_, Beneficiary>(
            "SELECT * FROM beneficiaries WHERE lga_id = $1 AND phone = $2",
        )
        .bind(lga_id)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find beneficiary by phone", e)
        })
    }
}
