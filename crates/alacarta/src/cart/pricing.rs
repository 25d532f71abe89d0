//! Cart pricing
//!
//! Movies cost a flat price, series cost per selected season. Items paid by
//! bank transfer carry the transfer surcharge.

use super::{CartItem, CartState, MediaType, PaymentType};
use crate::state::PriceConfig;

/// Price of an item before any transfer surcharge
pub fn base_price(item: &CartItem, prices: &PriceConfig) -> u32 {
    match item.media_type {
        MediaType::Movie => prices.movie_price,
        MediaType::Tv => item.season_count().saturating_mul(prices.series_price),
    }
}

/// Price the customer pays for an item
pub fn item_price(item: &CartItem, prices: &PriceConfig) -> u32 {
    let base = base_price(item, prices);
    match item.payment_type {
        PaymentType::Cash => base,
        PaymentType::Transfer => prices.with_transfer_fee(base),
    }
}

/// Cart totals split by payment type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartTotals {
    pub cash: u32,
    /// Transfer items including the surcharge
    pub transfer: u32,
    /// Surcharge part of `transfer`
    pub transfer_fee: u32,
}

impl CartTotals {
    pub fn compute(cart: &CartState, prices: &PriceConfig) -> Self {
        cart.items.iter().fold(Self::default(), |mut totals, item| {
            let base = base_price(item, prices);
            let price = item_price(item, prices);
            match item.payment_type {
                PaymentType::Cash => totals.cash += base,
                PaymentType::Transfer => {
                    totals.transfer += price;
                    totals.transfer_fee += price - base;
                }
            }
            totals
        })
    }

    pub fn total(&self) -> u32 {
        self.cash + self.transfer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cart(items: Vec<CartItem>) -> CartState {
        CartState { items }
    }

    #[test]
    fn test_item_prices() {
        let prices = PriceConfig::default();

        assert_eq!(item_price(&CartItem::movie(1, "Up"), &prices), 80);
        assert_eq!(
            item_price(&CartItem::series(2, "Dark").with_seasons(vec![1, 2, 3]), &prices),
            900
        );
        assert_eq!(
            item_price(
                &CartItem::movie(1, "Up").with_payment(PaymentType::Transfer),
                &prices
            ),
            88
        );
        // 300 * 1.1 = 330
        assert_eq!(
            item_price(
                &CartItem::series(2, "Dark").with_payment(PaymentType::Transfer),
                &prices
            ),
            330
        );
    }

    #[test]
    fn test_transfer_fee_rounds() {
        let prices = PriceConfig {
            movie_price: 85,
            transfer_fee_percentage: 10,
            ..PriceConfig::default()
        };
        // 85 * 1.1 = 93.5
        assert_eq!(
            item_price(
                &CartItem::movie(1, "Up").with_payment(PaymentType::Transfer),
                &prices
            ),
            94
        );
    }

    #[test]
    fn test_totals_split_by_payment_type() {
        let prices = PriceConfig::default();
        let totals = CartTotals::compute(
            &cart(vec![
                CartItem::movie(1, "Up"),
                CartItem::series(2, "Dark").with_seasons(vec![1, 2]),
                CartItem::movie(3, "Coco").with_payment(PaymentType::Transfer),
            ]),
            &prices,
        );

        assert_eq!(
            totals,
            CartTotals {
                cash: 680,
                transfer: 88,
                transfer_fee: 8,
            }
        );
        assert_eq!(totals.total(), 768);
    }

    #[test]
    fn test_empty_cart_totals() {
        let totals = CartTotals::compute(&CartState::default(), &PriceConfig::default());
        assert_eq!(totals.total(), 0);
    }
}
