//! TV a la Carta admin core
//!
//! Admin state store with cross-tab sync, plus the storefront's cart and
//! checkout. The pieces:
//!
//! - [`store::Store`]: Redux loop over [`state::AdminState`]
//! - [`sync`]: envelopes in shared storage, fanned out to every tab
//! - [`cart`] / [`checkout`]: pricing, validation, order message
//! - [`export`]: system backup archive

pub mod actions;
pub mod cart;
pub mod checkout;
pub mod dispatcher;
pub mod events;
pub mod export;
pub mod logger;
pub mod middleware;
pub mod reducers;
pub mod remote;
pub mod stamp;
pub mod state;
pub mod store;
pub mod sync;

pub use store::{Credentials, Store, StoreServices};
