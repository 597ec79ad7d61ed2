pub mod analyze;
pub mod classify;
pub mod inventory;
pub mod status;
