pub mod api;
pub mod auth;
pub mod config;
pub mod discord;
pub mod metrics;
pub mod model;
pub mod pager;
