pub mod api;
pub mod app;
pub mod config;
pub mod jobs;
pub mod logging;
pub mod metrics;
pub mod notify;
pub mod push;
pub mod stream;
pub mod ui;
