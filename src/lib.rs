pub mod auth;
pub mod command_handlers;
pub mod configuration;
pub mod db;
pub mod error;
pub mod login_handlers;
pub mod models;
pub mod routes;
pub mod startup;
pub mod telemetry;
