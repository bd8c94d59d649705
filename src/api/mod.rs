//! API layer - HTTP endpoint handlers organized by domain.

mod application;
mod health;
mod metrics;
mod provider;
mod routes;
mod template;
mod tenant;
mod user;

pub use routes::api_routes;
