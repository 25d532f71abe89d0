//! Shopping cart
//!
//! Movies and series picked by the customer, with season selection and a
//! payment type per item. The cart is independent of the admin store: it only
//! reads the current [`PriceConfig`](crate::state::PriceConfig) to price items.

mod persistence;
mod pricing;

pub use persistence::CartStore;
pub use pricing::{item_price, CartTotals};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentType {
    #[default]
    Cash,
    Transfer,
}

impl PaymentType {
    /// Label used in order messages
    pub fn label(&self) -> &'static str {
        match self {
            PaymentType::Cash => "Efectivo",
            PaymentType::Transfer => "Transferencia",
        }
    }
}

/// One movie or series in the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: u64,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_seasons: Option<Vec<u32>>,
    #[serde(default)]
    pub payment_type: PaymentType,
}

impl CartItem {
    pub fn movie(id: u64, title: impl Into<String>) -> Self {
        Self::new(id, title, MediaType::Movie)
    }

    pub fn series(id: u64, title: impl Into<String>) -> Self {
        Self::new(id, title, MediaType::Tv)
    }

    fn new(id: u64, title: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            id,
            title: title.into(),
            media_type,
            poster_path: None,
            selected_seasons: None,
            payment_type: PaymentType::Cash,
        }
    }

    pub fn with_seasons(mut self, seasons: Vec<u32>) -> Self {
        self.selected_seasons = Some(seasons);
        self
    }

    pub fn with_payment(mut self, payment_type: PaymentType) -> Self {
        self.payment_type = payment_type;
        self
    }

    /// Number of seasons billed; a series always bills at least one
    pub fn season_count(&self) -> u32 {
        let selected = self.selected_seasons.as_ref().map_or(0, Vec::len);
        u32::try_from(selected).unwrap_or(u32::MAX).max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    Add(CartItem),
    Remove(u64),
    UpdateSeasons { id: u64, seasons: Vec<u32> },
    UpdatePaymentType { id: u64, payment_type: PaymentType },
    Clear,
    Load(Vec<CartItem>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    pub items: Vec<CartItem>,
}

impl CartState {
    pub fn contains(&self, id: u64) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub fn find(&self, id: u64) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Pure cart reducer
pub fn reduce_cart(mut state: CartState, action: &CartAction) -> CartState {
    match action {
        CartAction::Add(item) => {
            let duplicate = state
                .items
                .iter()
                .any(|existing| existing.id == item.id && existing.media_type == item.media_type);
            if duplicate {
                log::debug!("{:?} {} already in cart", item.media_type, item.id);
                return state;
            }
            let mut item = item.clone();
            // Payment type is chosen later, per item, in the cart
            item.payment_type = PaymentType::Cash;
            if item.media_type == MediaType::Tv && item.selected_seasons.is_none() {
                item.selected_seasons = Some(vec![1]);
            }
            state.items.push(item);
        }

        CartAction::Remove(id) => {
            state.items.retain(|item| item.id != *id);
        }

        CartAction::UpdateSeasons { id, seasons } => {
            for item in state.items.iter_mut().filter(|item| item.id == *id) {
                item.selected_seasons = Some(seasons.clone());
            }
        }

        CartAction::UpdatePaymentType { id, payment_type } => {
            for item in state.items.iter_mut().filter(|item| item.id == *id) {
                item.payment_type = *payment_type;
            }
        }

        CartAction::Clear => state.items.clear(),

        CartAction::Load(items) => state.items = items.clone(),
    }
    state
}
