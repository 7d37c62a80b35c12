pub mod audit;
pub mod auth;
pub mod config;
pub mod repositories;
