//! Clients - HTTP clients for the back-office REST API

pub mod api_gateway;

pub use api_gateway::ApiGateway;
