//! Price configuration

use serde::{Deserialize, Serialize};

/// Storefront prices in CUP
///
/// Always replaced as a whole, there is no partial update path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceConfig {
    pub movie_price: u32,
    /// Price per season
    pub series_price: u32,
    /// Surcharge applied to bank-transfer payments
    pub transfer_fee_percentage: u32,
    pub novel_price_per_chapter: u32,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            movie_price: 80,
            series_price: 300,
            transfer_fee_percentage: 10,
            novel_price_per_chapter: 5,
        }
    }
}

impl PriceConfig {
    /// `base` plus the transfer surcharge, rounded half up
    pub fn with_transfer_fee(&self, base: u32) -> u32 {
        let scaled = u64::from(base) * (100 + u64::from(self.transfer_fee_percentage));
        u32::try_from((scaled + 50) / 100).unwrap_or(u32::MAX)
    }

    /// Cost of a novel with the given number of chapters
    pub fn novel_cost(&self, chapters: u32) -> u32 {
        chapters.saturating_mul(self.novel_price_per_chapter)
    }
}
