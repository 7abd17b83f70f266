pub mod api;
pub mod config;
pub mod questions;
pub mod session;
