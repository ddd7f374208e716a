pub mod config;
pub mod http_gateway;
pub mod observability;
