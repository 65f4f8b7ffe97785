pub mod app;
pub mod browser;
pub mod config;
pub mod http_cache;
pub mod http_client;
pub mod logging;
pub mod logo;
pub mod provider;
pub mod router;
pub mod source;
pub mod state;
pub mod teams_fetch;
pub mod ui;
