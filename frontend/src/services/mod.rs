pub mod api;
pub mod guard_store;
pub mod logging;
