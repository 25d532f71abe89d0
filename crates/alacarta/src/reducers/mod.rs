pub mod admin_reducer;
pub mod auth_reducer;
pub mod backup_reducer;
pub mod delivery_zone_reducer;
pub mod notification_reducer;
pub mod novel_reducer;
pub mod prices_reducer;
pub mod sync_reducer;
