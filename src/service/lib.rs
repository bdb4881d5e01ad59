pub mod api;
pub mod error;
pub mod models;
pub mod persistence;
pub mod services;
pub mod settings;
