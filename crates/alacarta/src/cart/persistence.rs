//! Cart persistence under `movieCart`

use alacarta_storage::{LocalStorage, CART_KEY};

use super::{reduce_cart, CartAction, CartItem, CartState};

/// Cart bound to a storage medium
///
/// Every action is reduced and the item list written back right away.
/// Storage problems are logged; the in-memory cart keeps working.
pub struct CartStore<S: LocalStorage> {
    storage: S,
    state: CartState,
}

impl<S: LocalStorage> CartStore<S> {
    /// Load the persisted cart, or start empty when there is none
    pub fn open(storage: S) -> Self {
        let items = load_items(&storage);
        let state = reduce_cart(CartState::default(), &CartAction::Load(items));
        Self { storage, state }
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    pub fn dispatch(&mut self, action: CartAction) {
        log::debug!("Cart action: {:?}", action);
        self.state = reduce_cart(std::mem::take(&mut self.state), &action);
        self.save();
    }

    fn save(&self) {
        match serde_json::to_string(&self.state.items) {
            Ok(json) => {
                if let Err(e) = self.storage.set_item(CART_KEY, &json) {
                    log::error!("Failed to save cart: {}", e);
                }
            }
            Err(e) => log::error!("Failed to serialize cart: {}", e),
        }
    }
}

fn load_items<S: LocalStorage>(storage: &S) -> Vec<CartItem> {
    let json = match storage.get_item(CART_KEY) {
        Ok(Some(json)) => json,
        Ok(None) => return Vec::new(),
        Err(e) => {
            log::error!("Failed to read cart: {}", e);
            return Vec::new();
        }
    };
    match serde_json::from_str(&json) {
        Ok(items) => items,
        Err(e) => {
            log::error!("Error loading cart from storage: {}", e);
            Vec::new()
        }
    }
}
