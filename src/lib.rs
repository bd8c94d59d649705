// Shared infrastructure
pub mod config;
pub mod error;
pub mod metrics;
pub mod validation;

// Backend access
pub mod client;

// Domain
pub mod applications;
pub mod listing;
pub mod template;
pub mod tenant;
pub mod users;

// HTTP layer
pub mod api;
pub mod server;
