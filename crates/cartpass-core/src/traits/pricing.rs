//! Pricing collaborator seam.

use async_trait::async_trait;
use uuid::Uuid;

use crate::result::AppResult;
use crate::types::money::Kobo;

/// Read access to an LGA's currently configured sticker price.
///
/// The activation workflow consults this at activation time rather than
/// trusting the price cached on the sticker at batch-generation time, so
/// price changes apply to not-yet-activated stickers.
#[async_trait]
pub trait PricingProvider: Send + Sync {
    /// The current unit price for the LGA, or `None` when the LGA has no
    /// configured price.
    async fn current_unit_price(&self, lga_id: Uuid) -> AppResult<Option<Kobo>>;
}
