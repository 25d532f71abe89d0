//! Well-known storage keys

/// Full admin state snapshot, rewritten on every change
pub const ADMIN_STATE_KEY: &str = "admin_system_state";

/// Cart item list
pub const CART_KEY: &str = "movieCart";
