use crate::actions::PricesAction;
use crate::state::{AdminState, SyncField};

pub fn reduce(mut state: AdminState, action: &PricesAction) -> AdminState {
    match action {
        PricesAction::Update(prices) => {
            state.prices = *prices;
            state.record_admin_change(SyncField::Prices);
        }
    }
    state
}
