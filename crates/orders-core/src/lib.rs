//! orders-core: orders service (data access + inbound HTTP)

pub mod config;
pub mod errors;

pub mod application;

pub use orders_types::{domain, ports};

pub mod inbound; // HTTP adapter (server, middleware, handlers)

#[cfg(test)]
mod test_support;
