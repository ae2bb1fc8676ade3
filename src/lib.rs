pub mod app_state;
pub mod config;
pub mod error;
pub mod prelude;
pub mod record;
pub mod server;
pub mod service;
pub mod storage;
