//! Publishes `admin_state_change` events for effective admin edits

use serde_json::{json, Value};
use std::sync::Arc;

use crate::actions::{Action, DeliveryZoneAction, NovelAction, PricesAction};
use crate::dispatcher::Dispatcher;
use crate::events::{AdminChangeEvent, ChangeFeed, ChangeType};
use crate::middleware::{is_effective, Middleware};
use crate::stamp::Clock;
use crate::state::AdminState;

pub struct ChangeEventMiddleware {
    feed: ChangeFeed,
    clock: Arc<dyn Clock>,
}

impl ChangeEventMiddleware {
    pub fn new(feed: ChangeFeed, clock: Arc<dyn Clock>) -> Self {
        Self { feed, clock }
    }
}

fn to_data<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        log::error!("Failed to serialize change event data: {}", e);
        Value::Null
    })
}

fn change_of(action: &Action) -> Option<(ChangeType, Value)> {
    let change = match action {
        Action::Prices(PricesAction::Update(prices)) => (ChangeType::Prices, to_data(prices)),
        Action::DeliveryZone(DeliveryZoneAction::Add(zone)) => {
            (ChangeType::DeliveryZoneAdd, to_data(zone))
        }
        Action::DeliveryZone(DeliveryZoneAction::Update(zone)) => {
            (ChangeType::DeliveryZoneUpdate, to_data(zone))
        }
        Action::DeliveryZone(DeliveryZoneAction::Delete(id)) => {
            (ChangeType::DeliveryZoneDelete, json!({ "id": id }))
        }
        Action::Novel(NovelAction::Add(novel)) => (ChangeType::NovelAdd, to_data(novel)),
        Action::Novel(NovelAction::Update(novel)) => (ChangeType::NovelUpdate, to_data(novel)),
        Action::Novel(NovelAction::Delete(id)) => (ChangeType::NovelDelete, json!({ "id": id })),
        _ => return None,
    };
    Some(change)
}

impl Middleware for ChangeEventMiddleware {
    fn handle(&mut self, _action: &Action, _state: &AdminState, _dispatcher: &Dispatcher) -> bool {
        true
    }

    fn after_reduce(
        &mut self,
        action: &Action,
        previous: &AdminState,
        _state: &AdminState,
        _dispatcher: &Dispatcher,
    ) {
        if !is_effective(action, previous) {
            return;
        }
        if let Some((change, data)) = change_of(action) {
            log::debug!("Publishing {} change event", change);
            self.feed
                .publish(AdminChangeEvent::new(change, data, self.clock.now()));
        }
    }
}
