use crate::state::PriceConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricesAction {
    /// Replace the whole price configuration
    Update(PriceConfig),
}
