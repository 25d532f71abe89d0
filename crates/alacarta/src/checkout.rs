//! Checkout
//!
//! Validates the customer form, turns the cart into an order and renders the
//! order as a plain-text message plus a `wa.me` deep link. The link is only
//! produced here, never opened.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::cart::{item_price, CartItem, CartState, CartTotals, MediaType};
use crate::state::{AdminState, DeliveryZone, PriceConfig};

/// Field name → message, empty when the form is valid
pub type ValidationErrors = BTreeMap<&'static str, String>;

const PICKUP_LABEL: &str = "Recogida en tienda";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub full_name: String,
    pub phone: String,
    pub address: String,
}

/// How the order reaches the customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryChoice {
    Pickup,
    /// Home delivery; `None` until a zone is picked
    Home(Option<DeliveryZone>),
}

impl DeliveryChoice {
    /// Home delivery to the zone with `zone_id`, if it is offered
    pub fn home(state: &AdminState, zone_id: u64) -> Self {
        let zone = available_zones(state).find(|zone| zone.id == zone_id).cloned();
        if zone.is_none() {
            log::warn!("Delivery zone {} is not available", zone_id);
        }
        DeliveryChoice::Home(zone)
    }

    fn zone_name(&self) -> &str {
        match self {
            DeliveryChoice::Home(Some(zone)) => &zone.name,
            _ => PICKUP_LABEL,
        }
    }

    pub fn cost(&self) -> u32 {
        match self {
            DeliveryChoice::Home(Some(zone)) => zone.cost,
            _ => 0,
        }
    }
}

/// Zones offered at checkout
pub fn available_zones(state: &AdminState) -> impl Iterator<Item = &DeliveryZone> {
    state.active_delivery_zones()
}

fn phone_pattern() -> Option<&'static Regex> {
    static PHONE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    PHONE_REGEX
        .get_or_init(|| match Regex::new(r"^[+]?[0-9\s\-()]{8,}$") {
            Ok(regex) => Some(regex),
            Err(e) => {
                log::error!("Invalid phone pattern: {}", e);
                None
            }
        })
        .as_ref()
}

/// Check the checkout form
pub fn validate(customer: &CustomerInfo, delivery: &DeliveryChoice) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if customer.full_name.trim().is_empty() {
        errors.insert("fullName", "El nombre completo es requerido".to_string());
    }

    if customer.phone.trim().is_empty() {
        errors.insert("phone", "El teléfono es requerido".to_string());
    } else if phone_pattern().is_some_and(|pattern| !pattern.is_match(&customer.phone)) {
        errors.insert("phone", "Formato de teléfono inválido".to_string());
    }

    if customer.address.trim().is_empty() {
        errors.insert("address", "La dirección es requerida".to_string());
    }

    if matches!(delivery, DeliveryChoice::Home(None)) {
        errors.insert(
            "deliveryZone",
            "Debe seleccionar una zona de entrega".to_string(),
        );
    }

    errors
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderZone {
    pub name: String,
    pub cost: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    #[serde(flatten)]
    pub item: CartItem,
    pub price: u32,
}

/// A validated order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub customer_info: CustomerInfo,
    pub delivery_zone: OrderZone,
    pub delivery_cost: u32,
    pub items: Vec<OrderLine>,
    /// Item prices, transfer surcharge included
    pub subtotal: u32,
    pub transfer_fee: u32,
    pub cash_total: u32,
    pub transfer_total: u32,
    pub total: u32,
}

impl Order {
    /// Validate the form and price the cart
    pub fn build(
        customer: &CustomerInfo,
        delivery: &DeliveryChoice,
        cart: &CartState,
        prices: &PriceConfig,
        at: DateTime<Utc>,
    ) -> Result<Self, ValidationErrors> {
        let errors = validate(customer, delivery);
        if !errors.is_empty() {
            return Err(errors);
        }

        let totals = CartTotals::compute(cart, prices);
        let items = cart
            .items
            .iter()
            .map(|item| OrderLine {
                item: item.clone(),
                price: item_price(item, prices),
            })
            .collect();
        let delivery_cost = delivery.cost();

        Ok(Self {
            order_id: format!("TV-{}", at.timestamp_millis()),
            customer_info: customer.clone(),
            delivery_zone: OrderZone {
                name: delivery.zone_name().to_string(),
                cost: delivery_cost,
            },
            delivery_cost,
            items,
            subtotal: totals.total(),
            transfer_fee: totals.transfer_fee,
            cash_total: totals.cash,
            transfer_total: totals.transfer,
            total: totals.total() + delivery_cost,
        })
    }

    /// Plain-text order summary sent to the store
    pub fn message(&self) -> String {
        let customer = &self.customer_info;
        let mut out = format!(
            "🎬 *PEDIDO - TV A LA CARTA*\n\n\
             📋 *ID de Orden:* {}\n\n\
             👤 *DATOS DEL CLIENTE:*\n\
             • Nombre: {}\n\
             • Teléfono: {}\n\
             • Dirección: {}\n\n\
             🎯 *PRODUCTOS SOLICITADOS:*\n",
            self.order_id, customer.full_name, customer.phone, customer.address
        );

        for (n, line) in self.items.iter().enumerate() {
            out.push_str(&line.describe(n + 1));
        }

        out.push_str(&format!(
            "\n📍 *ENTREGA:*\n\
             • Zona: {}\n\
             • Costo: ${} CUP\n\n\
             💰 *RESUMEN:*\n",
            self.delivery_zone.name, self.delivery_cost
        ));
        if self.cash_total > 0 {
            out.push_str(&format!("• Efectivo: ${} CUP\n", self.cash_total));
        }
        if self.transfer_total > 0 {
            out.push_str(&format!(
                "• Transferencia: ${} CUP (incluye recargo de ${} CUP)\n",
                self.transfer_total, self.transfer_fee
            ));
        }
        out.push_str(&format!(
            "• Subtotal: ${} CUP\n\
             • Entrega: ${} CUP\n\
             • *TOTAL: ${} CUP*",
            self.subtotal, self.delivery_cost, self.total
        ));
        out
    }
}

impl OrderLine {
    /// Numbered entry of the order message, with its price line
    fn describe(&self, number: usize) -> String {
        let item = &self.item;
        let heading = match item.media_type {
            MediaType::Movie => format!("{}. 🎥 {} (Película)", number, item.title),
            MediaType::Tv => {
                let seasons = item
                    .selected_seasons
                    .as_deref()
                    .unwrap_or(&[])
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}. 📺 {} (Serie) - Temporadas: {}", number, item.title, seasons)
            }
        };
        format!(
            "{}\n   💳 {}: ${} CUP\n",
            heading,
            item.payment_type.label(),
            self.price
        )
    }
}

/// Percent-encode like JavaScript's `encodeURIComponent`
pub fn encode_uri_component(input: &str) -> String {
    const UNRESERVED: &[u8] = b"-_.!~*'()";

    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        if byte.is_ascii_alphanumeric() || UNRESERVED.contains(&byte) {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

/// `https://wa.me/<number>?text=<message>`
pub fn whatsapp_url(number: &str, message: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        number,
        encode_uri_component(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::PaymentType;
    use crate::state::NewDeliveryZone;
    use pretty_assertions::assert_eq;

    fn customer() -> CustomerInfo {
        CustomerInfo {
            full_name: "Ana Pérez".to_string(),
            phone: "+53 5469-0878".to_string(),
            address: "Calle 23 #456, Vedado".to_string(),
        }
    }

    fn admin_with_zones() -> AdminState {
        let now = Utc::now();
        let mut state = AdminState::default();
        state
            .delivery_zones
            .push(DeliveryZone::create(1, NewDeliveryZone::new("Vista Alegre", 300), now));
        let mut inactive = DeliveryZone::create(2, NewDeliveryZone::new("Cerrada", 50), now);
        inactive.active = false;
        state.delivery_zones.push(inactive);
        state
    }

    fn cart() -> CartState {
        CartState {
            items: vec![
                CartItem::movie(1, "Coco"),
                CartItem::series(2, "Dark")
                    .with_seasons(vec![1, 2])
                    .with_payment(PaymentType::Transfer),
            ],
        }
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        assert!(validate(&customer(), &DeliveryChoice::Pickup).is_empty());
    }

    #[test]
    fn test_collects_all_errors() {
        let errors = validate(&CustomerInfo::default(), &DeliveryChoice::Home(None));

        assert_eq!(
            errors.keys().copied().collect::<Vec<_>>(),
            vec!["address", "deliveryZone", "fullName", "phone"]
        );
        assert_eq!(errors["phone"], "El teléfono es requerido");
    }

    #[test]
    fn test_phone_format() {
        for (phone, valid) in [
            ("54690878", true),
            ("+53 (5) 469-0878", true),
            ("1234567", false),
            ("5469abcd0878", false),
        ] {
            let customer = CustomerInfo {
                phone: phone.to_string(),
                ..customer()
            };
            let errors = validate(&customer, &DeliveryChoice::Pickup);
            assert_eq!(errors.is_empty(), valid, "phone {:?}", phone);
        }
    }

    #[test]
    fn test_only_active_zones_are_offered() {
        let state = admin_with_zones();
        let names: Vec<&str> = available_zones(&state).map(|z| z.name.as_str()).collect();
        assert_eq!(names, vec!["Vista Alegre"]);

        assert_eq!(DeliveryChoice::home(&state, 2), DeliveryChoice::Home(None));
        assert!(matches!(DeliveryChoice::home(&state, 1), DeliveryChoice::Home(Some(_))));
    }

    #[test]
    fn test_build_order_with_delivery() {
        let state = admin_with_zones();
        let at = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let order = Order::build(
            &customer(),
            &DeliveryChoice::home(&state, 1),
            &cart(),
            &state.prices,
            at,
        )
        .unwrap();

        assert_eq!(order.order_id, "TV-1700000000123");
        assert_eq!(order.delivery_cost, 300);
        assert_eq!(order.cash_total, 80);
        // 2 seasons * 300 * 1.1
        assert_eq!(order.transfer_total, 660);
        assert_eq!(order.transfer_fee, 60);
        assert_eq!(order.subtotal, 740);
        assert_eq!(order.total, 1040);
        assert_eq!(order.items[1].price, 660);
    }

    #[test]
    fn test_build_rejects_invalid_form() {
        let errors = Order::build(
            &CustomerInfo::default(),
            &DeliveryChoice::Pickup,
            &cart(),
            &PriceConfig::default(),
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_message_lists_items_and_totals() {
        let order = Order::build(
            &customer(),
            &DeliveryChoice::Pickup,
            &cart(),
            &PriceConfig::default(),
            Utc::now(),
        )
        .unwrap();
        let message = order.message();

        assert!(message.contains("• Nombre: Ana Pérez"));
        assert!(message.contains("1. 🎥 Coco (Película)"));
        assert!(message.contains("2. 📺 Dark (Serie) - Temporadas: 1, 2"));
        assert!(message.contains("💳 Transferencia: $660 CUP"));
        assert!(message.contains("• Zona: Recogida en tienda"));
        assert!(message.ends_with("• *TOTAL: $740 CUP*"));
    }

    #[test]
    fn test_message_layout() {
        let at = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let order = Order::build(
            &customer(),
            &DeliveryChoice::Pickup,
            &cart(),
            &PriceConfig::default(),
            at,
        )
        .unwrap();

        let expected = "🎬 *PEDIDO - TV A LA CARTA*\n\n\
            📋 *ID de Orden:* TV-1700000000000\n\n\
            👤 *DATOS DEL CLIENTE:*\n\
            • Nombre: Ana Pérez\n\
            • Teléfono: +53 5469-0878\n\
            • Dirección: Calle 23 #456, Vedado\n\n\
            🎯 *PRODUCTOS SOLICITADOS:*\n\
            1. 🎥 Coco (Película)\n\
            \x20  💳 Efectivo: $80 CUP\n\
            2. 📺 Dark (Serie) - Temporadas: 1, 2\n\
            \x20  💳 Transferencia: $660 CUP\n\
            \n📍 *ENTREGA:*\n\
            • Zona: Recogida en tienda\n\
            • Costo: $0 CUP\n\n\
            💰 *RESUMEN:*\n\
            • Efectivo: $80 CUP\n\
            • Transferencia: $660 CUP (incluye recargo de $60 CUP)\n\
            • Subtotal: $740 CUP\n\
            • Entrega: $0 CUP\n\
            • *TOTAL: $740 CUP*";
        assert_eq!(order.message(), expected);
    }

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(encode_uri_component("a b&c=d"), "a%20b%26c%3Dd");
        assert_eq!(encode_uri_component("(ok)!*~'_.-"), "(ok)!*~'_.-");
        assert_eq!(encode_uri_component("Pérez\n"), "P%C3%A9rez%0A");
        assert_eq!(encode_uri_component("🎬"), "%F0%9F%8E%AC");
    }

    #[test]
    fn test_whatsapp_url() {
        assert_eq!(
            whatsapp_url("5354690878", "Hola #1"),
            "https://wa.me/5354690878?text=Hola%20%231"
        );
    }

    #[test]
    fn test_order_serializes_like_order_data() {
        let order = Order::build(
            &customer(),
            &DeliveryChoice::Pickup,
            &cart(),
            &PriceConfig::default(),
            Utc::now(),
        )
        .unwrap();
        let value = serde_json::to_value(&order).unwrap();

        assert_eq!(value["customerInfo"]["fullName"], "Ana Pérez");
        assert_eq!(value["deliveryZone"]["name"], PICKUP_LABEL);
        assert_eq!(value["items"][0]["type"], "movie");
        assert_eq!(value["items"][0]["price"], 80);
        assert_eq!(value["cashTotal"], 80);
    }
}
