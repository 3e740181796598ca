pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod templates_structs;
